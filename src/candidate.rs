//! # Image Candidate Module
//!
//! Un candidato è un file scelto dall'utente, non ancora validato: una risorsa
//! binaria opaca con tipo MIME, dimensione in byte e nome visualizzato.
//!
//! ## Responsabilità:
//! - Definisce `ImageCandidate` e la sorgente dei byte (`ImageSource`)
//! - Lettura asincrona e lazy dei byte, con `UploadError::Read` se la risorsa
//!   non è più leggibile (file rimosso, permessi revocati)
//! - Espone il trait `BinaryResource` condiviso da candidati e immagini ottimizzate

use crate::error::UploadError;
use crate::file_manager::FileManager;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where the bytes of a resource live
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes already held in memory
    Memory(Arc<[u8]>),
    /// File read on demand; may become unreadable after selection
    File(PathBuf),
}

impl ImageSource {
    /// Read the whole resource
    pub async fn read(&self, name: &str) -> Result<Arc<[u8]>, UploadError> {
        match self {
            ImageSource::Memory(bytes) => Ok(Arc::clone(bytes)),
            ImageSource::File(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|source| UploadError::Read {
                    name: name.to_string(),
                    source,
                }),
        }
    }
}

/// A binary resource that can be packaged for transport
pub trait BinaryResource {
    fn mime_type(&self) -> &str;
    fn display_name(&self) -> &str;
    /// Handle to the bytes; cloning shares the buffer
    fn source(&self) -> ImageSource;
}

/// A user-supplied file before validation
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub mime_type: String,
    pub byte_size: u64,
    pub display_name: String,
    pub source: ImageSource,
}

impl ImageCandidate {
    /// Candidate backed by in-memory bytes; `byte_size` is the buffer length
    pub fn from_bytes(
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            mime_type: mime_type.into(),
            byte_size: bytes.len() as u64,
            display_name: display_name.into(),
            source: ImageSource::Memory(bytes),
        }
    }

    /// Candidate backed by a file on disk.
    ///
    /// The MIME type is declared from the extension, the way a browser file
    /// picker does; the bytes are not read until they are needed.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let metadata = tokio::fs::metadata(path).await?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: FileManager::mime_type_for_path(path).to_string(),
            byte_size: metadata.len(),
            display_name,
            source: ImageSource::File(path.to_path_buf()),
        })
    }

    /// `image/*` check, case-insensitive
    pub fn is_image(&self) -> bool {
        self.mime_type
            .get(..6)
            .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
            .unwrap_or(false)
    }

    pub async fn read(&self) -> Result<Arc<[u8]>, UploadError> {
        self.source.read(&self.display_name).await
    }
}

impl BinaryResource for ImageCandidate {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn source(&self) -> ImageSource {
        self.source.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_prefix_check() {
        let png = ImageCandidate::from_bytes("a.png", "image/png", vec![0u8; 4]);
        let upper = ImageCandidate::from_bytes("a.png", "IMAGE/PNG", vec![0u8; 4]);
        let pdf = ImageCandidate::from_bytes("a.pdf", "application/pdf", vec![0u8; 4]);
        let empty = ImageCandidate::from_bytes("a", "", vec![0u8; 4]);

        assert!(png.is_image());
        assert!(upper.is_image());
        assert!(!pdf.is_image());
        assert!(!empty.is_image());
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("foto.JPG");
        tokio::fs::write(&path, vec![7u8; 1234]).await.unwrap();

        let candidate = ImageCandidate::from_path(&path).await.unwrap();
        assert_eq!(candidate.display_name, "foto.JPG");
        assert_eq!(candidate.mime_type, "image/jpeg");
        assert_eq!(candidate.byte_size, 1234);
        assert_eq!(candidate.read().await.unwrap().len(), 1234);
    }

    #[tokio::test]
    async fn test_removed_file_becomes_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.png");
        tokio::fs::write(&path, b"png").await.unwrap();

        let candidate = ImageCandidate::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let err = candidate.read().await.unwrap_err();
        assert!(matches!(err, UploadError::Read { ref name, .. } if name == "gone.png"));
    }
}

//! Base64 packaging of binary resources as `data:` URIs.

use crate::candidate::BinaryResource;
use crate::error::UploadError;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

/// Converts binary resources into transport-safe text.
///
/// The output is a data URI (`data:<mime>;base64,<payload>`), the same shape a
/// browser file reader produces. Reading is the only suspension point; there is
/// no retry, fallback is the caller's decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Encoder;

impl Base64Encoder {
    pub fn new() -> Self {
        Self
    }

    pub async fn encode(&self, resource: &impl BinaryResource) -> Result<String, UploadError> {
        let bytes = resource.source().read(resource.display_name()).await?;
        let uri = Self::data_uri(resource.mime_type(), &bytes);
        debug!("Encoded {} ({} chars)", resource.display_name(), uri.len());
        Ok(uri)
    }

    /// Build a data URI from bytes already in memory
    pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::ImageCandidate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_encodes_memory_candidate() {
        let candidate = ImageCandidate::from_bytes("a.png", "image/png", b"hello".to_vec());
        let uri = Base64Encoder::new().encode(&candidate).await.unwrap();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn test_unreadable_resource_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.jpg");
        tokio::fs::write(&path, b"jpeg").await.unwrap();
        let candidate = ImageCandidate::from_path(&path).await.unwrap();
        drop(temp_dir);

        let err = Base64Encoder::new().encode(&candidate).await.unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
    }

    #[test]
    fn test_empty_mime_falls_back_to_octet_stream() {
        assert_eq!(
            Base64Encoder::data_uri("", &[0xff]),
            "data:application/octet-stream;base64,/w=="
        );
    }
}

//! # File Management Module
//!
//! Questo modulo gestisce la discovery dei file selezionati da riga di comando
//! e la determinazione del loro tipo MIME.
//!
//! ## Responsabilità:
//! - Espansione dei path: file espliciti passano così come sono, le directory
//!   vengono visitate ricorsivamente cercando solo immagini
//! - Determinazione tipo MIME dall'estensione (come un file picker del browser)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati riconosciuti:
//! - **Immagini**: JPG, JPEG, PNG, WebP, GIF, BMP, TIFF, HEIC, SVG
//! - **Altri**: PDF, TXT, video comuni (verranno rifiutati dal validator)
//!
//! ## Esempio:
//! ```ignore
//! let files = FileManager::expand_paths(&[PathBuf::from("/path/to/photos")]);
//! for file in files {
//!     let candidate = ImageCandidate::from_path(&file).await?;
//! }
//! ```

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Manages file discovery and type detection
pub struct FileManager;

impl FileManager {
    /// Expand user-provided paths into the ordered list of files to attach.
    ///
    /// Explicit files are kept even when they are not images, so the validator
    /// can reject them with a notification. Directories contribute only image
    /// files, sorted by path.
    pub fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(path)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.path().to_path_buf())
                    .filter(|p| Self::is_image(p))
                    .collect();
                found.sort();
                files.extend(found);
            } else if path.exists() {
                files.push(path.clone());
            } else {
                warn!("Skipping missing path: {}", path.display());
            }
        }

        files
    }

    /// Declared MIME type for a path, based on its extension
    pub fn mime_type_for_path(path: &Path) -> &'static str {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" | "jfif" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "tif" | "tiff" => "image/tiff",
            "heic" => "image/heic",
            "svg" => "image/svg+xml",
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            "mp4" => "video/mp4",
            "mov" => "video/quicktime",
            _ => "application/octet-stream",
        }
    }

    /// Check if a file is an image, by declared type
    pub fn is_image(path: &Path) -> bool {
        Self::mime_type_for_path(path).starts_with("image/")
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

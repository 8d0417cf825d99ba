//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce l'indicatore di caricamento e le statistiche di assemblaggio.
//!
//! ## Responsabilità:
//! - Spinner `indicatif` usato come indicatore di caricamento in console
//! - Tracking statistiche per invio (immagini ottimizzate, fallback, omesse)
//! - Calcolo byte originali vs byte codificati
//!
//! ## Statistiche tracciate:
//! - **images_processed**: Totale immagini elaborate
//! - **images_optimized**: Immagini ridimensionate e ricodificate con successo
//! - **images_fallback**: Immagini inviate in originale dopo un errore
//! - **images_omitted**: Immagini perse (ottimizzazione e fallback falliti)
//! - **total_original_size**: Dimensione totale dei file originali
//! - **total_encoded_size**: Lunghezza totale dei campi base64 prodotti
//!
//! ## Esempio:
//! ```ignore
//! let spinner = ProgressManager::spinner("Sending form...");
//! let mut stats = AssemblyStats::new();
//! stats.add_optimized(original_size, encoded.len());
//! spinner.finish_and_clear();
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Console rendering of the loading indicator
pub struct ProgressManager;

impl ProgressManager {
    /// Create a spinner for indeterminate progress
    pub fn spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }

        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        spinner
    }
}

/// Statistics for one assembled submission
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub images_processed: usize,
    pub images_optimized: usize,
    pub images_fallback: usize,
    pub images_omitted: usize,
    pub total_original_size: u64,
    pub total_encoded_size: u64,
}

impl AssemblyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_optimized(&mut self, original_size: u64, encoded_size: usize) {
        self.images_processed += 1;
        self.images_optimized += 1;
        self.total_original_size += original_size;
        self.total_encoded_size += encoded_size as u64;
    }

    pub fn add_fallback(&mut self, original_size: u64, encoded_size: usize) {
        self.images_processed += 1;
        self.images_fallback += 1;
        self.total_original_size += original_size;
        self.total_encoded_size += encoded_size as u64;
    }

    pub fn add_omitted(&mut self, original_size: u64) {
        self.images_processed += 1;
        self.images_omitted += 1;
        self.total_original_size += original_size;
    }

    /// Payload growth or shrink relative to the originals; base64 alone adds ~33%
    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_original_size, self.total_encoded_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Images: {} | Optimized: {} | Original fallback: {} | Omitted: {} | Originals: {} | Encoded: {} ({:.2}%)",
            self.images_processed,
            self.images_optimized,
            self.images_fallback,
            self.images_omitted,
            FileManager::format_size(self.total_original_size),
            FileManager::format_size(self.total_encoded_size),
            self.overall_reduction_percent()
        )
    }
}

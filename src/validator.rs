//! # Image Validation Module
//!
//! Applica i vincoli di numero, tipo e dimensione ai file scelti dall'utente
//! prima che entrino nel `PreviewState`.
//!
//! ## Regole:
//! - **Capacità**: se `attuali + batch > max_images` l'intero batch viene
//!   rifiutato, nessun file viene aggiunto
//! - **Tipo**: il tipo MIME dichiarato deve essere `image/*`, altrimenti il file
//!   viene saltato
//! - **Dimensione**: oltre `max_image_size` byte il file viene saltato
//!
//! Ogni rifiuto produce una notifica di errore non fatale; i file validi
//! vengono aggiunti in ordine.

use crate::candidate::ImageCandidate;
use crate::config::Config;
use crate::error::UploadError;
use crate::notify::{UiEvent, UiSink};
use crate::state::{CandidateId, PreviewState};
use tracing::{debug, warn};

/// A candidate skipped during validation
#[derive(Debug)]
pub struct Rejection {
    pub display_name: String,
    pub error: UploadError,
}

/// Result of validating one batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub accepted: Vec<CandidateId>,
    pub rejected: Vec<Rejection>,
}

/// Enforces count/type/size constraints on candidates
#[derive(Debug, Clone)]
pub struct ImageValidator {
    max_image_size: u64,
}

impl ImageValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            max_image_size: config.max_image_size,
        }
    }

    /// Check a single candidate's type and size
    pub fn check(&self, candidate: &ImageCandidate) -> Result<(), UploadError> {
        if !candidate.is_image() {
            return Err(UploadError::InvalidType {
                name: candidate.display_name.clone(),
                mime_type: candidate.mime_type.clone(),
            });
        }

        if candidate.byte_size > self.max_image_size {
            return Err(UploadError::TooLarge {
                name: candidate.display_name.clone(),
                size: candidate.byte_size,
                max: self.max_image_size,
            });
        }

        Ok(())
    }

    /// Validate `batch` and append the accepted candidates to `state`.
    ///
    /// Capacity is the state's own `max_images`, so the batch either fits
    /// entirely or nothing is inserted.
    ///
    /// # Errors
    /// `CapacityExceeded` when the batch as a whole does not fit; `state` is
    /// left unchanged in that case. Per-candidate rejections are reported in
    /// the outcome, not as errors.
    pub fn accept_batch(
        &self,
        state: &mut PreviewState,
        batch: Vec<ImageCandidate>,
        ui: &dyn UiSink,
    ) -> Result<BatchOutcome, UploadError> {
        let mut outcome = BatchOutcome::default();
        if batch.is_empty() {
            return Ok(outcome);
        }

        if batch.len() > state.remaining_capacity() {
            let err = UploadError::CapacityExceeded {
                current: state.len(),
                incoming: batch.len(),
                max: state.max_images(),
            };
            warn!("{}", err);
            ui.emit(UiEvent::error(format!(
                "Only {} images are allowed at most.",
                state.max_images()
            )));
            return Err(err);
        }

        for candidate in batch {
            if let Err(error) = self.check(&candidate) {
                warn!("Rejected {}: {}", candidate.display_name, error);
                ui.emit(UiEvent::error(Self::rejection_message(&error, self.max_image_size)));
                outcome.rejected.push(Rejection {
                    display_name: candidate.display_name,
                    error,
                });
                continue;
            }

            debug!("Accepted {} ({} bytes)", candidate.display_name, candidate.byte_size);
            outcome.accepted.push(state.push(candidate)?);
        }

        Ok(outcome)
    }

    fn rejection_message(error: &UploadError, max_image_size: u64) -> String {
        match error {
            UploadError::InvalidType { .. } => "Only image files are allowed.".to_string(),
            UploadError::TooLarge { .. } => format!(
                "Images must not exceed {}.",
                crate::file_manager::FileManager::format_size(max_image_size)
            ),
            other => other.to_string(),
        }
    }
}

//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore della pipeline di caricamento.
//!
//! ## Responsabilità:
//! - Definisce `UploadError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi, mostrabili all'utente
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `CapacityExceeded`: Il batch supererebbe `max_images` (batch intero rifiutato)
//! - `InvalidType`: Il candidato non è un'immagine (saltato)
//! - `TooLarge`: Il candidato supera `max_image_size` (saltato)
//! - `Decode`: L'optimizer non riesce a decodificare (attiva il fallback)
//! - `Encode`: Re-encoding JPEG o conversione base64 fallita
//! - `Read`: La risorsa binaria è diventata illeggibile
//! - `Transport`: Errore di rete durante l'invio (stato NON ripulito)
//! - `NoImages` / `MissingRequiredFields`: Validazione del form fallita
//!
//! ## Politica di propagazione:
//! - Errori di validazione: recuperati localmente per candidato
//! - Errori di ottimizzazione/encoding: recuperati via fallback per candidato
//! - Errori di trasporto: mostrati all'utente, nessun retry automatico
//!
//! ## Esempio:
//! ```ignore
//! if candidate.byte_size > config.max_image_size {
//!     return Err(UploadError::TooLarge { name, size, max });
//! }
//! ```

use std::io;

/// Custom error types for the upload pipeline
#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("Only {max} images are allowed (have {current}, tried to add {incoming})")]
    CapacityExceeded {
        current: usize,
        incoming: usize,
        max: usize,
    },

    #[error("Only image files are allowed: {name} is {mime_type}")]
    InvalidType { name: String, mime_type: String },

    #[error("Images must not exceed {max} bytes: {name} is {size} bytes")]
    TooLarge { name: String, size: u64, max: u64 },

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("Could not read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Network error while sending the form: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("At least one image must be attached")]
    NoImages,

    #[error("Required fields are empty: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    #[error("No submission endpoint configured")]
    MissingEndpoint,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UploadError {
    /// True for the errors the assembler recovers from by falling back to the
    /// original, unoptimized image.
    pub fn is_recoverable_by_fallback(&self) -> bool {
        matches!(
            self,
            UploadError::Decode(_) | UploadError::Encode(_) | UploadError::Read { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_mentions_limit() {
        let err = UploadError::CapacityExceeded {
            current: 3,
            incoming: 8,
            max: 10,
        };
        assert!(err.to_string().contains("Only 10 images"));
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let err = UploadError::MissingRequiredFields(vec!["nombre".into(), "email".into()]);
        assert_eq!(err.to_string(), "Required fields are empty: nombre, email");
    }

    #[test]
    fn test_fallback_classification() {
        assert!(UploadError::Decode("bad".into()).is_recoverable_by_fallback());
        assert!(UploadError::Encode("bad".into()).is_recoverable_by_fallback());
        assert!(!UploadError::NoImages.is_recoverable_by_fallback());
        assert!(!UploadError::MissingEndpoint.is_recoverable_by_fallback());
    }
}

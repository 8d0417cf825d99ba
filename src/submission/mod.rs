//! # Submission Module
//!
//! Modulo che separa le responsabilità dell'invio in sottomoduli:
//! - `assembler`: Optimize → encode per immagine, fallback e merge dei campi
//! - `payload`: Mappa piatta nome campo → valore
//! - `transport`: Invio one-way all'endpoint

pub mod assembler;
pub mod payload;
pub mod transport;

pub use assembler::{AssembledSubmission, ImageResult, SubmissionAssembler};
pub use payload::{image_field_name, SubmissionPayload, IMAGE_FIELD_PREFIX};
pub use transport::{HttpTransport, Transport};

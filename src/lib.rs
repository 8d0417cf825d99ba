//! # Form Uploader Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare della pipeline di caricamento immagini
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore della pipeline
//! - `candidate`: File scelti dall'utente e loro sorgente di byte
//! - `state`: Elenco ordinato delle immagini accettate (`PreviewState`)
//! - `validator`: Vincoli di numero, tipo e dimensione
//! - `resize`: Calcolo dimensioni e ricampionamento
//! - `image_processor`: Decodifica, resize e re-encoding JPEG
//! - `encoder`: Conversione base64 in data URI
//! - `form`: Campi del form e validazione dei campi obbligatori
//! - `submission`: Assemblaggio del payload e trasporto
//! - `session`: Orchestratore di un form con le sue immagini
//! - `notify`: Eventi verso l'interfaccia utente
//! - `progress`: Statistiche e indicatore di caricamento
//! - `file_manager`: Discovery dei file e tipi MIME
//!
//! ## Utilizzo:
//! ```ignore
//! use form_uploader::{Config, FormData, FormSession, ImageCandidate};
//!
//! let mut session = FormSession::from_config(config, FormData::new("contacto"), ui)?;
//! session.add_files(vec![ImageCandidate::from_path(&path).await?]).await?;
//! session.submit().await?;
//! ```

pub mod candidate;
pub mod config;
pub mod encoder;
pub mod error;
pub mod file_manager;
pub mod form;
pub mod image_processor;
pub mod notify;
pub mod progress;
pub mod resize;
pub mod session;
pub mod state;
pub mod submission;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use candidate::{ImageCandidate, ImageSource};
pub use config::Config;
pub use encoder::Base64Encoder;
pub use error::UploadError;
pub use form::{FormData, FormField};
pub use image_processor::{ImageOptimizer, OptimizedImage};
pub use notify::{Severity, UiEvent, UiSink};
pub use session::{FormSession, SubmitOutcome};
pub use state::{CandidateId, PreviewState};
pub use submission::{HttpTransport, SubmissionAssembler, SubmissionPayload, Transport};
pub use validator::ImageValidator;

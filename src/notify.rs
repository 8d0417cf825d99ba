//! # UI Notification Module
//!
//! Questo modulo definisce i segnali che la pipeline emette verso l'interfaccia:
//! notifiche, indicatore di caricamento, anteprime e reset del form.
//!
//! ## Responsabilità:
//! - Definisce `UiEvent` (serializzabile come JSON con tag `type`)
//! - Definisce il trait `UiSink` implementato dai vari consumatori
//! - `JsonLinesSink`: un evento JSON per riga su stdout (host Python/Electron)
//! - `ConsoleSink`: log `tracing` e spinner `indicatif` per il caricamento
//! - `RecordingSink`: raccoglie gli eventi in memoria (test, embedding)
//!
//! ## Tipi di evento:
//! - `notify`: messaggio con severità `success`, `info` o `error`
//! - `loading`: mostra/nasconde l'indicatore di caricamento
//! - `preview_ready`: data URI dell'anteprima di un'immagine accettata
//! - `preview_removed`: anteprima rimossa dall'utente
//! - `invalid_fields`: campi obbligatori da evidenziare
//! - `form_reset`: form e anteprime ripuliti dopo l'invio

use crate::progress::ProgressManager;
use crate::state::CandidateId;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Side-effect signal for the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Notify { severity: Severity, message: String },
    Loading { active: bool },
    PreviewReady { id: CandidateId, name: String, data_uri: String },
    PreviewRemoved { id: CandidateId },
    InvalidFields { names: Vec<String> },
    FormReset,
}

impl UiEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Notify {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Notify {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notify {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Receiver of UI events
pub trait UiSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

/// Emits each event as one JSON line on stdout
pub struct JsonLinesSink;

impl UiSink for JsonLinesSink {
    fn emit(&self, event: UiEvent) {
        if let Ok(json) = serde_json::to_string(&event) {
            println!("{}", json);
        }
    }
}

/// Human-facing console output
#[derive(Default)]
pub struct ConsoleSink {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiSink for ConsoleSink {
    fn emit(&self, event: UiEvent) {
        match event {
            UiEvent::Notify { severity: Severity::Error, message } => error!("{}", message),
            UiEvent::Notify { message, .. } => info!("{}", message),
            UiEvent::Loading { active } => {
                let Ok(mut spinner) = self.spinner.lock() else {
                    return;
                };
                if active {
                    *spinner = Some(ProgressManager::spinner("Processing..."));
                } else if let Some(bar) = spinner.take() {
                    bar.finish_and_clear();
                }
            }
            UiEvent::PreviewReady { id, name, data_uri } => {
                info!("🖼️  {} {} ready ({} chars preview)", id, name, data_uri.len());
            }
            UiEvent::PreviewRemoved { id } => info!("Removed image {}", id),
            UiEvent::InvalidFields { names } => error!("Please fill in: {}", names.join(", ")),
            UiEvent::FormReset => info!("Form reset"),
        }
    }
}

/// Keeps every event in memory
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages of the notifications with the given severity
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Notify { severity: s, message } if s == severity => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl UiSink for RecordingSink {
    fn emit(&self, event: UiEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

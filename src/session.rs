//! # Form Session Orchestrator
//!
//! Orchestratore principale che possiede lo stato di un form e delega
//! validazione, assemblaggio e invio ai moduli specializzati.
//!
//! ## Responsabilità:
//! - Possiede `PreviewState` e `FormData` per tutta la vita del form
//! - `add_files`: validazione del batch e generazione anteprime
//! - `remove_image`: rimozione di un'immagine accettata
//! - `submit`: validazione form → assemblaggio → invio → reset ritardato
//! - Emette notifiche e indicatore di caricamento verso la UI
//!
//! ## Esiti dell'invio:
//! - **Richiesta inviata**: notifica di successo, attesa `reset_delay_ms`,
//!   poi stato e form vengono ripuliti
//! - **Errore di rete**: notifica di errore, stato intatto, l'utente può riprovare
//! - **Immagini omesse**: notifica di errore parziale, l'invio prosegue

use crate::candidate::ImageCandidate;
use crate::config::Config;
use crate::encoder::Base64Encoder;
use crate::error::UploadError;
use crate::form::FormData;
use crate::notify::{UiEvent, UiSink};
use crate::progress::AssemblyStats;
use crate::state::{CandidateId, PreviewState};
use crate::submission::{HttpTransport, SubmissionAssembler, SubmissionPayload, Transport};
use crate::validator::{BatchOutcome, ImageValidator};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of a submission that got past form validation
#[derive(Debug)]
pub struct SubmitOutcome {
    /// False when the payload was only assembled (dry run)
    pub dispatched: bool,
    pub payload: SubmissionPayload,
    /// Image indices left out of the payload
    pub omitted: Vec<usize>,
    pub stats: AssemblyStats,
}

/// One form with its attached images
pub struct FormSession<T: Transport> {
    config: Config,
    state: PreviewState,
    form: FormData,
    validator: ImageValidator,
    assembler: SubmissionAssembler,
    encoder: Base64Encoder,
    transport: T,
    ui: Arc<dyn UiSink>,
}

impl FormSession<HttpTransport> {
    /// Session posting to the configured endpoint
    pub fn from_config(config: Config, form: FormData, ui: Arc<dyn UiSink>) -> Result<Self, UploadError> {
        let transport = HttpTransport::from_config(&config)?;
        Ok(Self::new(config, form, transport, ui))
    }
}

impl<T: Transport> FormSession<T> {
    pub fn new(config: Config, form: FormData, transport: T, ui: Arc<dyn UiSink>) -> Self {
        Self {
            state: PreviewState::new(config.max_images),
            validator: ImageValidator::new(&config),
            assembler: SubmissionAssembler::new(&config),
            encoder: Base64Encoder::new(),
            config,
            form,
            transport,
            ui,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormData {
        &mut self.form
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate a batch of files and attach the accepted ones
    pub async fn add_files(&mut self, batch: Vec<ImageCandidate>) -> Result<BatchOutcome, UploadError> {
        let outcome = self
            .validator
            .accept_batch(&mut self.state, batch, self.ui.as_ref())?;

        for id in &outcome.accepted {
            self.render_preview(*id).await;
        }

        Ok(outcome)
    }

    async fn render_preview(&self, id: CandidateId) {
        let Some(candidate) = self.state.get(id) else {
            return;
        };

        match self.encoder.encode(candidate).await {
            Ok(data_uri) => self.ui.emit(UiEvent::PreviewReady {
                id,
                name: candidate.display_name.clone(),
                data_uri,
            }),
            Err(e) => warn!("No preview for {}: {}", candidate.display_name, e),
        }
    }

    /// Detach an image; indices of later images shift down
    pub fn remove_image(&mut self, id: CandidateId) -> Option<ImageCandidate> {
        let removed = self.state.remove(id)?;
        debug!("Removed {} ({})", removed.display_name, id);
        self.ui.emit(UiEvent::PreviewRemoved { id });
        Some(removed)
    }

    /// Check required fields and attached images, signalling every problem
    pub fn validate(&self) -> Result<(), UploadError> {
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            self.ui.emit(UiEvent::InvalidFields { names: missing });
        }
        if self.state.is_empty() {
            self.ui.emit(UiEvent::error(UploadError::NoImages.to_string()));
        }
        self.form.validate(self.state.len())
    }

    /// Assemble the payload from the current images and send it.
    ///
    /// # Errors
    /// - Form validation errors; nothing is sent
    /// - `Transport` on a network failure; images and fields are kept
    pub async fn submit(&mut self) -> Result<SubmitOutcome, UploadError> {
        self.validate()?;

        self.ui.emit(UiEvent::Loading { active: true });

        let candidates = self.state.snapshot();
        let assembled = self.assembler.assemble(&self.form, &candidates).await;

        if !assembled.is_complete() {
            let positions: Vec<String> = assembled.omitted.iter().map(|i| (i + 1).to_string()).collect();
            self.ui.emit(UiEvent::error(format!(
                "{} image(s) could not be processed and will not be sent (position {}).",
                assembled.omitted.len(),
                positions.join(", ")
            )));
        }

        let outcome = SubmitOutcome {
            dispatched: false,
            payload: assembled.payload,
            omitted: assembled.omitted,
            stats: assembled.stats,
        };

        if self.config.dry_run {
            self.ui.emit(UiEvent::Loading { active: false });
            self.ui.emit(UiEvent::info(format!(
                "Dry run: {} fields assembled, {} images, nothing sent.",
                outcome.payload.len(),
                outcome.payload.image_count()
            )));
            return Ok(outcome);
        }

        self.ui.emit(UiEvent::info("Sending form, please wait..."));

        match self.transport.dispatch(&outcome.payload).await {
            Ok(()) => {
                self.ui.emit(UiEvent::Loading { active: false });
                info!("Request dispatched ({} images)", outcome.payload.image_count());
                self.ui.emit(UiEvent::success(
                    "Form sent successfully. You will receive an email with the information.",
                ));

                tokio::time::sleep(self.config.reset_delay()).await;
                self.reset();

                Ok(SubmitOutcome {
                    dispatched: true,
                    ..outcome
                })
            }
            Err(e) => {
                self.ui.emit(UiEvent::Loading { active: false });
                error!("Error sending form: {}", e);
                self.ui.emit(UiEvent::error(format!("Error sending the form: {}", e)));
                Err(e)
            }
        }
    }

    /// Drop all images and clear the form fields
    pub fn reset(&mut self) {
        self.state.clear();
        self.form.reset();
        self.ui.emit(UiEvent::FormReset);
    }
}

//! # Submission Transport
//!
//! Invio one-way del payload all'endpoint configurato.
//!
//! ## Contratto:
//! - POST con `Content-Type: text/plain;charset=utf-8`, body = JSON piatto
//! - La risposta non viene mai ispezionata (né status né body): l'endpoint non
//!   può comunicare successo o fallimento al chiamante
//! - Due soli esiti osservabili: richiesta inviata senza errori di rete (`Ok`)
//!   oppure errore di rete (`UploadError::Transport`)
//! - Nessun retry automatico

use crate::config::Config;
use crate::error::UploadError;
use crate::submission::payload::SubmissionPayload;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use std::future::Future;
use tracing::{debug, info};

pub const PAYLOAD_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// One-way delivery of an assembled payload
pub trait Transport: Send + Sync {
    /// `Ok` means the request completed without a network-level error, not
    /// that the endpoint accepted it.
    fn dispatch(&self, payload: &SubmissionPayload) -> impl Future<Output = Result<(), UploadError>> + Send;
}

/// Transport over HTTP with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Transport for the configured endpoint
    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        config
            .endpoint_url
            .as_deref()
            .map(Self::new)
            .ok_or(UploadError::MissingEndpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn dispatch(&self, payload: &SubmissionPayload) -> Result<(), UploadError> {
        let body = payload
            .to_json()
            .map_err(|e| UploadError::Encode(e.to_string()))?;

        info!(
            "Sending {} fields ({} images, {} bytes) to {}",
            payload.len(),
            payload.image_count(),
            body.len(),
            self.endpoint
        );

        // Opaque response: never read.
        let _ = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, PAYLOAD_CONTENT_TYPE)
            .header(CACHE_CONTROL, "no-cache")
            .body(body)
            .send()
            .await?;

        debug!("Request to {} completed", self.endpoint);
        Ok(())
    }
}

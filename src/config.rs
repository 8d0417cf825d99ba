//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione della pipeline di upload.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i limiti e parametri di ottimizzazione
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `max_image_size`: Dimensione massima per immagine in byte (default: 5 MiB)
//! - `max_images`: Numero massimo di immagini allegate (default: 10)
//! - `target_long_edge`: Lato lungo massimo dopo il resize (default: 1200)
//! - `jpeg_quality`: Qualità JPEG su scala 0-1 (default: 0.8)
//! - `endpoint_url`: Endpoint di destinazione (obbligatorio per l'invio)
//! - `concurrency`: Immagini ottimizzate in parallelo (default: 1 = sequenziale)
//! - `resize_filter`: Filtro di ricampionamento (default: catmullrom)
//! - `reset_delay_ms`: Attesa prima del reset del form dopo l'invio (default: 3000)
//! - `dry_run`: Assembla il payload senza inviarlo (default: false)
//! - `json_output`: Eventi UI come JSON lines su stdout (default: false)
//!
//! ## Validazione:
//! - Controlla che max_images e max_image_size siano > 0
//! - Controlla che jpeg_quality sia in (0, 1]
//! - Controlla che target_long_edge e concurrency siano > 0
//! - Controlla che endpoint_url, se presente, sia un URL http(s)
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     max_images: 5,
//!     endpoint_url: Some("https://script.example.com/exec".into()),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::resize::ResizeAlgorithm;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 5 MiB
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MAX_IMAGES: usize = 10;
pub const DEFAULT_TARGET_LONG_EDGE: u32 = 1200;
pub const DEFAULT_JPEG_QUALITY: f32 = 0.8;
pub const DEFAULT_RESET_DELAY_MS: u64 = 3000;

/// Environment variable consulted when no endpoint is configured elsewhere
pub const ENDPOINT_ENV_VAR: &str = "FORM_UPLOADER_ENDPOINT";

/// Configuration for the upload pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum accepted size per image, in bytes
    pub max_image_size: u64,
    /// Maximum number of attached images
    pub max_images: usize,
    /// Longest edge (pixels) after optimization
    pub target_long_edge: u32,
    /// JPEG quality on a 0-1 scale
    pub jpeg_quality: f32,
    /// Submission endpoint
    pub endpoint_url: Option<String>,
    /// Number of images optimized at the same time
    pub concurrency: usize,
    /// Resampling filter used when downsizing
    pub resize_filter: ResizeAlgorithm,
    /// Delay before the form is reset after a dispatched submission
    pub reset_delay_ms: u64,
    /// Dry run - assemble the payload but don't send it
    pub dry_run: bool,
    /// Output UI events as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            max_images: DEFAULT_MAX_IMAGES,
            target_long_edge: DEFAULT_TARGET_LONG_EDGE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            endpoint_url: None,
            concurrency: 1,
            resize_filter: ResizeAlgorithm::default(),
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
            dry_run: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.max_images == 0 {
            return Err(anyhow::anyhow!("Maximum number of images must be greater than 0"));
        }

        if self.max_image_size == 0 {
            return Err(anyhow::anyhow!("Maximum image size must be greater than 0"));
        }

        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(anyhow::anyhow!("JPEG quality must be between 0.0 (exclusive) and 1.0"));
        }

        if self.target_long_edge == 0 {
            return Err(anyhow::anyhow!("Target long edge must be greater than 0"));
        }

        if self.concurrency == 0 {
            return Err(anyhow::anyhow!("Concurrency must be greater than 0"));
        }

        if let Some(ref url) = self.endpoint_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("Endpoint must be an http(s) URL: {}", url));
            }
        }

        Ok(())
    }

    /// JPEG quality mapped to the 1-100 scale the encoder expects
    pub fn encoder_quality(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Fill in the endpoint from `FORM_UPLOADER_ENDPOINT` if none is set
    pub fn with_env_endpoint(mut self) -> Self {
        if self.endpoint_url.is_none() {
            self.endpoint_url = std::env::var(ENDPOINT_ENV_VAR)
                .ok()
                .filter(|v| !v.trim().is_empty());
        }
        self
    }

    /// Default config file location: `<config_dir>/form-uploader/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("form-uploader").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

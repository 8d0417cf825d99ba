//! # Form Uploader - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento configurazione (file → flag CLI → variabile d'ambiente)
//! - Costruzione del form, aggiunta delle immagini e invio
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (immagini, campi, endpoint, limiti)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica e valida la configurazione
//! 4. Espande i path in candidati e li aggiunge come unico batch
//! 5. Invia il form e riporta l'esito
//!
//! ## Esempio di utilizzo:
//! ```bash
//! form-uploader foto1.jpg foto2.png --form-type contacto \
//!     --field nombre=Ana --field email=ana@example.com --required nombre \
//!     --endpoint https://script.google.com/macros/s/XXX/exec
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use form_uploader::file_manager::FileManager;
use form_uploader::notify::{ConsoleSink, JsonLinesSink};
use form_uploader::{Config, FormData, FormField, FormSession, ImageCandidate, UiSink};

#[derive(Parser)]
#[command(name = "form-uploader")]
#[command(about = "Validate, downsize and send images together with form fields")]
struct Args {
    /// Image files or directories to attach
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Submission endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Form type sent as `tipoFormulario`
    #[arg(short = 't', long, default_value = "contacto")]
    form_type: String,

    /// Form field as name=value (repeatable)
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Name of a field that must not be blank (repeatable)
    #[arg(short, long = "required")]
    required: Vec<String>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of images
    #[arg(long)]
    max_images: Option<usize>,

    /// Maximum size per image in bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// JPEG quality (0-1)
    #[arg(short, long)]
    quality: Option<f32>,

    /// Longest edge after resize, in pixels
    #[arg(long)]
    long_edge: Option<u32>,

    /// Images optimized at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Assemble the payload but don't send it
    #[arg(long)]
    dry_run: bool,

    /// Output UI events as JSON lines
    #[arg(long)]
    json: bool,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got `{}`", raw))
}

impl Args {
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint_url = Some(endpoint.clone());
        }
        if let Some(max_images) = self.max_images {
            config.max_images = max_images;
        }
        if let Some(max_size) = self.max_size {
            config.max_image_size = max_size;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if let Some(long_edge) = self.long_edge {
            config.target_long_edge = long_edge;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.dry_run |= self.dry_run;
        config.json_output |= self.json;
        config
    }

    fn form(&self) -> FormData {
        let mut form = FormData::new(self.form_type.clone());
        for (name, value) in &self.fields {
            let field = if self.required.contains(name) {
                FormField::required(name.clone(), value.clone())
            } else {
                FormField::new(name.clone(), value.clone())
            };
            form.fields.push(field);
        }
        for name in &self.required {
            if form.get(name).is_none() {
                form.fields.push(FormField::required(name.clone(), ""));
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = args.config.clone().or_else(Config::default_path);
    let file_config = match config_path {
        Some(ref path) => Config::from_file(path)
            .await
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => Config::default(),
    };

    let config = args.apply_to(file_config).with_env_endpoint();
    config.validate()?;

    if args.save_config {
        let path = config_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No configuration path available"))?;
        config.save_to_file(path).await?;
        info!("Saved configuration to {}", path.display());
    }

    if config.endpoint_url.is_none() && !config.dry_run {
        return Err(anyhow::anyhow!(
            "No endpoint configured: use --endpoint, the config file or {}",
            form_uploader::config::ENDPOINT_ENV_VAR
        ));
    }

    let ui: Arc<dyn UiSink> = if config.json_output {
        Arc::new(JsonLinesSink)
    } else {
        Arc::new(ConsoleSink::new())
    };

    let files = FileManager::expand_paths(&args.paths);
    let mut batch = Vec::with_capacity(files.len());
    for file in &files {
        match ImageCandidate::from_path(file).await {
            Ok(candidate) => batch.push(candidate),
            Err(e) => warn!("Skipping {}: {}", file.display(), e),
        }
    }

    let dry_run = config.dry_run;
    let mut session = if dry_run && config.endpoint_url.is_none() {
        // Dry runs never dispatch; any endpoint satisfies the session.
        let transport = form_uploader::HttpTransport::new("http://localhost/");
        FormSession::new(config, args.form(), transport, ui)
    } else {
        FormSession::from_config(config, args.form(), ui)?
    };

    session.add_files(batch).await?;
    let outcome = session.submit().await?;

    info!("{}", outcome.stats.format_summary());
    if !outcome.dispatched {
        info!(
            "Payload: {} fields, {} bytes as JSON",
            outcome.payload.len(),
            outcome.payload.to_json()?.len()
        );
    }

    Ok(())
}

//! # Submission Assembler
//!
//! Orchestratore optimize → encode per ogni immagine, con fallback
//! sull'originale, e merge finale con i campi del form.
//!
//! ## Strategia per candidato (indice `i`):
//! 1. `ImageOptimizer::optimize` poi `Base64Encoder::encode` → `imagen_<i>`
//! 2. Se uno dei due fallisce con `Decode`, `Encode` o `Read`: encode
//!    dell'originale non ottimizzato
//! 3. Altri errori, o fallback fallito: campo omesso, indice registrato, si prosegue
//!
//! ## Concorrenza
//! Fino a `config.concurrency` immagini in volo (`futures::stream::buffered`),
//! che restituisce i risultati nell'ordine di input: gli indici dei campi
//! seguono sempre l'ordine del `PreviewState`.

use crate::candidate::ImageCandidate;
use crate::config::Config;
use crate::encoder::Base64Encoder;
use crate::error::UploadError;
use crate::form::FormData;
use crate::image_processor::ImageOptimizer;
use crate::progress::AssemblyStats;
use crate::submission::payload::{image_field_name, SubmissionPayload};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

/// How one image ended up in the payload
#[derive(Debug)]
pub enum ImageResult {
    Optimized(String),
    /// Original sent after the optimized path failed
    Fallback { value: String, cause: UploadError },
    /// Neither path produced a value; `fallback_error` is `None` when the
    /// cause did not allow a fallback
    Omitted {
        cause: UploadError,
        fallback_error: Option<UploadError>,
    },
}

/// Output of one assembly run
#[derive(Debug)]
pub struct AssembledSubmission {
    pub payload: SubmissionPayload,
    /// Indices whose field could not be produced
    pub omitted: Vec<usize>,
    pub stats: AssemblyStats,
}

impl AssembledSubmission {
    pub fn is_complete(&self) -> bool {
        self.omitted.is_empty()
    }
}

/// Builds a `SubmissionPayload` from form fields and candidates
#[derive(Debug, Clone)]
pub struct SubmissionAssembler {
    optimizer: ImageOptimizer,
    encoder: Base64Encoder,
    concurrency: usize,
}

impl SubmissionAssembler {
    pub fn new(config: &Config) -> Self {
        Self {
            optimizer: ImageOptimizer::new(config),
            encoder: Base64Encoder::new(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Optimize and encode every candidate, then merge with the form fields.
    ///
    /// Never fails as a whole: each image either contributes `imagen_<i>` or is
    /// listed in `omitted`.
    pub async fn assemble(&self, form: &FormData, candidates: &[ImageCandidate]) -> AssembledSubmission {
        info!("Processing {} images for submission", candidates.len());

        let results: Vec<ImageResult> = stream::iter(candidates.iter().enumerate())
            .map(|(index, candidate)| self.process_one(index, candidates.len(), candidate))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut payload = SubmissionPayload::new();
        for (name, value) in form.to_fields() {
            payload.insert(name, value);
        }

        let mut omitted = Vec::new();
        let mut stats = AssemblyStats::new();
        for (index, (candidate, result)) in candidates.iter().zip(results).enumerate() {
            match result {
                ImageResult::Optimized(value) => {
                    stats.add_optimized(candidate.byte_size, value.len());
                    payload.insert(image_field_name(index), value);
                }
                ImageResult::Fallback { value, .. } => {
                    stats.add_fallback(candidate.byte_size, value.len());
                    payload.insert(image_field_name(index), value);
                }
                ImageResult::Omitted { .. } => {
                    stats.add_omitted(candidate.byte_size);
                    omitted.push(index);
                }
            }
        }

        info!("{}", stats.format_summary());
        AssembledSubmission {
            payload,
            omitted,
            stats,
        }
    }

    /// Full optimize → encode sequence for one image, with fallback
    pub async fn process_one(&self, index: usize, total: usize, candidate: &ImageCandidate) -> ImageResult {
        debug!("Processing image {}/{}: {}", index + 1, total, candidate.display_name);

        match self.optimize_and_encode(candidate).await {
            Ok(value) => {
                debug!("Image {} encoded (length: {})", index + 1, value.len());
                ImageResult::Optimized(value)
            }
            Err(cause) => self.recover(index, candidate, cause).await,
        }
    }

    /// Send the original for decode, encode and read failures; omit otherwise
    pub async fn recover(&self, index: usize, candidate: &ImageCandidate, cause: UploadError) -> ImageResult {
        if !cause.is_recoverable_by_fallback() {
            error!(
                "Image {} ({}) omitted: {}",
                index + 1,
                candidate.display_name,
                cause
            );
            return ImageResult::Omitted {
                cause,
                fallback_error: None,
            };
        }

        warn!(
            "Error processing image {} ({}): {}; sending original",
            index + 1,
            candidate.display_name,
            cause
        );

        match self.encoder.encode(candidate).await {
            Ok(value) => {
                debug!("Image {} fallback encoded (length: {})", index + 1, value.len());
                ImageResult::Fallback { value, cause }
            }
            Err(fallback_error) => {
                error!(
                    "Fallback also failed for image {} ({}): {}",
                    index + 1,
                    candidate.display_name,
                    fallback_error
                );
                ImageResult::Omitted {
                    cause,
                    fallback_error: Some(fallback_error),
                }
            }
        }
    }

    async fn optimize_and_encode(&self, candidate: &ImageCandidate) -> Result<String, UploadError> {
        let optimized = self.optimizer.optimize(candidate).await?;
        self.encoder.encode(&optimized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use crate::test_support::png_candidate;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use tempfile::TempDir;

    fn decode_field(value: &str) -> Vec<u8> {
        let (_, data) = value.split_once(";base64,").unwrap();
        STANDARD.decode(data).unwrap()
    }

    fn form() -> FormData {
        FormData::new("presupuesto").with_field(FormField::required("nombre", "Ana"))
    }

    #[tokio::test]
    async fn test_fields_follow_candidate_order() {
        let candidates = vec![
            png_candidate("first.png", 100, 50),
            png_candidate("second.png", 30, 60),
            png_candidate("third.png", 2400, 1200),
        ];

        let assembled = SubmissionAssembler::new(&Config::default())
            .assemble(&form(), &candidates)
            .await;

        assert!(assembled.is_complete());
        assert_eq!(assembled.payload.image_keys(), ["imagen_0", "imagen_1", "imagen_2"]);
        assert_eq!(assembled.payload.get("nombre"), Some("Ana"));
        assert_eq!(assembled.payload.get("tipoFormulario"), Some("presupuesto"));

        let dims: Vec<_> = assembled
            .payload
            .image_keys()
            .iter()
            .map(|key| ImageOptimizer::dimensions(&decode_field(assembled.payload.get(key).unwrap())).unwrap())
            .collect();
        assert_eq!(dims, vec![(100, 50), (30, 60), (1200, 600)]);
        assert_eq!(assembled.stats.images_optimized, 3);
    }

    #[tokio::test]
    async fn test_concurrent_processing_keeps_indices() {
        let config = Config {
            concurrency: 4,
            ..Default::default()
        };
        let candidates: Vec<_> = (1..=6)
            .map(|i| png_candidate(&format!("{}.png", i), 40 * i, 20))
            .collect();

        let assembled = SubmissionAssembler::new(&config).assemble(&form(), &candidates).await;

        assert!(assembled.is_complete());
        assert_eq!(assembled.payload.image_keys().len(), 6);
        for (index, key) in assembled.payload.image_keys().iter().enumerate() {
            let bytes = decode_field(assembled.payload.get(key).unwrap());
            let (width, _) = ImageOptimizer::dimensions(&bytes).unwrap();
            assert_eq!(width, 40 * (index as u32 + 1));
        }
    }

    #[tokio::test]
    async fn test_undecodable_image_falls_back_to_original() {
        let broken = ImageCandidate::from_bytes("broken.jpg", "image/jpeg", b"garbage".to_vec());
        let candidates = vec![png_candidate("ok.png", 10, 10), broken];

        let assembled = SubmissionAssembler::new(&Config::default())
            .assemble(&form(), &candidates)
            .await;

        assert!(assembled.is_complete());
        assert_eq!(assembled.payload.get("imagen_1"), Some("data:image/jpeg;base64,Z2FyYmFnZQ=="));
        assert_eq!(assembled.stats.images_fallback, 1);
        assert!(assembled.payload.get("imagen_0").unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_fallback_result_keeps_the_cause() {
        let broken = ImageCandidate::from_bytes("broken.png", "image/png", b"xx".to_vec());
        let result = SubmissionAssembler::new(&Config::default())
            .process_one(0, 1, &broken)
            .await;

        assert!(matches!(
            result,
            ImageResult::Fallback { cause: UploadError::Decode(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_only_codec_and_read_errors_fall_back() {
        let assembler = SubmissionAssembler::new(&Config::default());
        let candidate = png_candidate("a.png", 4, 4);

        let decode = assembler
            .recover(0, &candidate, UploadError::Decode("bad".into()))
            .await;
        assert!(matches!(decode, ImageResult::Fallback { .. }));

        let other = assembler.recover(0, &candidate, UploadError::NoImages).await;
        assert!(matches!(
            other,
            ImageResult::Omitted {
                cause: UploadError::NoImages,
                fallback_error: None
            }
        ));
    }

    #[tokio::test]
    async fn test_unreadable_image_is_omitted_and_rest_continue() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vanished.png");
        tokio::fs::write(&path, b"png").await.unwrap();
        let vanished = ImageCandidate::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        let candidates = vec![
            png_candidate("a.png", 10, 10),
            vanished,
            png_candidate("c.png", 10, 10),
        ];

        let assembled = SubmissionAssembler::new(&Config::default())
            .assemble(&form(), &candidates)
            .await;

        assert_eq!(assembled.omitted, vec![1]);
        assert_eq!(assembled.payload.image_keys(), ["imagen_0", "imagen_2"]);
        assert_eq!(assembled.stats.images_omitted, 1);
    }

    #[tokio::test]
    async fn test_no_candidates_yields_form_fields_only() {
        let assembled = SubmissionAssembler::new(&Config::default())
            .assemble(&form(), &[])
            .await;
        assert_eq!(assembled.payload.len(), 2);
        assert_eq!(assembled.payload.image_count(), 0);
    }
}

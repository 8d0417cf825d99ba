//! # Image Processing Module
//!
//! Questo modulo ottimizza le immagini prima dell'invio: decodifica, resize
//! con lato lungo limitato e re-encoding JPEG a qualità fissa.
//!
//! ## Pipeline di Ottimizzazione
//!
//! 1. **Lettura**: Byte letti dalla sorgente del candidato (`UploadError::Read` se illeggibile)
//! 2. **Decodifica**: `image::load_from_memory` (JPEG, PNG, WebP, GIF)
//! 3. **Calcolo dimensioni**: Lato lungo limitato a `target_long_edge`, mai upscaling
//! 4. **Resize**: Filtro configurabile (`ResizeAlgorithm`)
//! 5. **Re-encoding**: JPEG baseline alla qualità configurata, canale alpha scartato
//!
//! ## Error Handling
//!
//! - **Dati corrotti / formato non supportato**: `UploadError::Decode`
//! - **Encoder JPEG fallito**: `UploadError::Encode`
//! - Gli errori vengono sempre propagati al chiamante, che decide il fallback
//!
//! ## Concorrenza
//!
//! Decodifica e resize sono CPU-bound: girano su `tokio::task::spawn_blocking`
//! così l'event loop resta libero durante l'elaborazione.
//!
//! ## Esempio
//!
//! ```ignore
//! let optimizer = ImageOptimizer::new(&Config::default());
//! let optimized = optimizer.optimize(&candidate).await?;
//! assert!(optimized.width.max(optimized.height) <= 1200);
//! ```

use crate::candidate::{BinaryResource, ImageCandidate, ImageSource};
use crate::config::Config;
use crate::error::UploadError;
use crate::resize::{bound_long_edge, ResizeAlgorithm};
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use std::sync::Arc;
use tracing::debug;

pub const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Re-encoded, bounded-dimension derivative of a candidate
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub display_name: String,
    pub width: u32,
    pub height: u32,
    jpeg: Arc<[u8]>,
}

impl OptimizedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes().len() as u64
    }

    /// Turn the result back into a candidate, e.g. to optimize it again
    pub fn into_candidate(self) -> ImageCandidate {
        let size = self.byte_size();
        ImageCandidate {
            mime_type: OUTPUT_MIME_TYPE.to_string(),
            byte_size: size,
            display_name: self.display_name,
            source: ImageSource::Memory(self.jpeg),
        }
    }
}

impl BinaryResource for OptimizedImage {
    fn mime_type(&self) -> &str {
        OUTPUT_MIME_TYPE
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn source(&self) -> ImageSource {
        ImageSource::Memory(Arc::clone(&self.jpeg))
    }
}

/// Decodes, downsizes and re-encodes candidates
#[derive(Debug, Clone)]
pub struct ImageOptimizer {
    /// Longest allowed edge in pixels
    target_long_edge: u32,
    /// JPEG quality (1-100)
    quality: u8,
    algorithm: ResizeAlgorithm,
}

impl ImageOptimizer {
    pub fn new(config: &Config) -> Self {
        Self {
            target_long_edge: config.target_long_edge,
            quality: config.encoder_quality(),
            algorithm: config.resize_filter,
        }
    }

    /// Produce the optimized version of `candidate`.
    ///
    /// # Errors
    /// - `Read` if the candidate's bytes can no longer be read
    /// - `Decode` if the bytes are not a decodable image
    /// - `Encode` if JPEG encoding fails
    pub async fn optimize(&self, candidate: &ImageCandidate) -> Result<OptimizedImage, UploadError> {
        let bytes = candidate.read().await?;
        let (max_edge, quality, algorithm) = (self.target_long_edge, self.quality, self.algorithm);

        let (width, height, jpeg) =
            tokio::task::spawn_blocking(move || Self::process(&bytes, max_edge, quality, algorithm))
                .await
                .map_err(|e| UploadError::Decode(format!("image worker failed: {}", e)))??;

        debug!(
            "Optimized {}: {} -> {} bytes ({}x{})",
            candidate.display_name,
            candidate.byte_size,
            jpeg.len(),
            width,
            height
        );

        Ok(OptimizedImage {
            display_name: candidate.display_name.clone(),
            width,
            height,
            jpeg: Arc::from(jpeg),
        })
    }

    fn process(
        bytes: &[u8],
        max_edge: u32,
        quality: u8,
        algorithm: ResizeAlgorithm,
    ) -> Result<(u32, u32, Vec<u8>), UploadError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| UploadError::Decode(e.to_string()))?;
        let rgb = bound_long_edge(decoded, max_edge, algorithm).to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| UploadError::Encode(e.to_string()))?;

        Ok((rgb.width(), rgb.height(), jpeg))
    }

    /// Decode only to read pixel dimensions
    pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), UploadError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| UploadError::Decode(e.to_string()))?;
        Ok((decoded.width(), decoded.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Base64Encoder;
    use crate::test_support::{png_bytes, png_candidate, rgba_png_bytes};

    fn optimizer() -> ImageOptimizer {
        ImageOptimizer::new(&Config::default())
    }

    #[tokio::test]
    async fn test_large_image_is_bounded() {
        let optimized = optimizer().optimize(&png_candidate("big.png", 2400, 1600)).await.unwrap();

        assert_eq!((optimized.width, optimized.height), (1200, 800));
        assert_eq!(optimized.display_name, "big.png");
        assert_eq!(&optimized.bytes()[..2], &[0xFF, 0xD8]);
        assert_eq!(ImageOptimizer::dimensions(optimized.bytes()).unwrap(), (1200, 800));
    }

    #[tokio::test]
    async fn test_portrait_is_bounded_on_height() {
        let optimized = optimizer().optimize(&png_candidate("tall.png", 900, 3000)).await.unwrap();
        assert_eq!((optimized.width, optimized.height), (360, 1200));
    }

    #[tokio::test]
    async fn test_small_image_keeps_dimensions() {
        let optimized = optimizer().optimize(&png_candidate("small.png", 640, 480)).await.unwrap();
        assert_eq!((optimized.width, optimized.height), (640, 480));
        assert_eq!(optimized.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_optimized_resource_reads_back_its_jpeg() {
        let optimized = optimizer().optimize(&png_candidate("a.png", 64, 48)).await.unwrap();
        assert!(!optimized.bytes().is_empty());

        let read = optimized.source().read(optimized.display_name()).await.unwrap();
        assert_eq!(&read[..], optimized.bytes());

        let uri = Base64Encoder::new().encode(&optimized).await.unwrap();
        assert_eq!(uri, Base64Encoder::data_uri("image/jpeg", optimized.bytes()));
    }

    #[tokio::test]
    async fn test_second_pass_keeps_dimensions() {
        let first = optimizer().optimize(&png_candidate("big.png", 3000, 2000)).await.unwrap();
        let dims = (first.width, first.height);

        let second = optimizer().optimize(&first.into_candidate()).await.unwrap();
        assert_eq!((second.width, second.height), dims);
    }

    #[tokio::test]
    async fn test_alpha_channel_is_flattened() {
        let candidate = ImageCandidate::from_bytes("alpha.png", "image/png", rgba_png_bytes(50, 40));
        let optimized = optimizer().optimize(&candidate).await.unwrap();
        assert_eq!((optimized.width, optimized.height), (50, 40));
    }

    #[tokio::test]
    async fn test_corrupt_data_is_a_decode_error() {
        let candidate = ImageCandidate::from_bytes("broken.jpg", "image/jpeg", b"not an image".to_vec());
        let err = optimizer().optimize(&candidate).await.unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
    }

    #[tokio::test]
    async fn test_custom_long_edge() {
        let config = Config {
            target_long_edge: 100,
            ..Default::default()
        };
        let candidate = ImageCandidate::from_bytes("a.png", "image/png", png_bytes(400, 200));
        let optimized = ImageOptimizer::new(&config).optimize(&candidate).await.unwrap();
        assert_eq!((optimized.width, optimized.height), (100, 50));
    }
}

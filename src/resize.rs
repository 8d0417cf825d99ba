//! # Image Resize Module
//!
//! Questo modulo calcola le dimensioni di destinazione e ridimensiona il raster
//! delle immagini prima del re-encoding.
//!
//! ## Caratteristiche
//! - **Solo downscaling**: Se entrambi i lati sono ≤ del limite, le dimensioni restano invariate
//! - **Aspect ratio preservato**: Il lato lungo diventa esattamente il limite,
//!   il lato corto viene arrotondato al pixel più vicino (minimo 1)
//! - **Filtro configurabile**: Lanczos, CatmullRom (default), Triangle, Nearest
//! - **Idempotente**: Ridimensionare un'immagine già sotto il limite non cambia nulla
//!
//! ## Esempio
//! ```text
//! 4000x3000 -> 1200x900
//! 1000x2400 -> 500x1200
//!  800x600  ->  800x600
//! ```

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Algoritmi di resize disponibili
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAlgorithm {
    /// Lanczos - Migliore qualità per downscaling, più lento
    Lanczos,
    /// Catmull-Rom - Buon bilanciamento qualità/velocità
    #[default]
    CatmullRom,
    /// Triangle - Bilineare, simile al canvas del browser
    Triangle,
    /// Nearest - Pixel perfetto, nessun filtro
    Nearest,
}

impl ResizeAlgorithm {
    /// Converte l'algoritmo nel filtro della crate `image`
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeAlgorithm::Lanczos => FilterType::Lanczos3,
            ResizeAlgorithm::CatmullRom => FilterType::CatmullRom,
            ResizeAlgorithm::Triangle => FilterType::Triangle,
            ResizeAlgorithm::Nearest => FilterType::Nearest,
        }
    }
}

/// Pixel dimensions of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Compute the bounded size for a `width` x `height` raster.
///
/// When either edge exceeds `max_edge` the longer edge becomes exactly
/// `max_edge` and the other is scaled by the same ratio. Square rasters take
/// the height branch, so both edges land on `max_edge`.
pub fn target_size(width: u32, height: u32, max_edge: u32) -> TargetSize {
    if width <= max_edge && height <= max_edge {
        return TargetSize { width, height };
    }

    if width > height {
        let scaled = (height as f64 * (max_edge as f64 / width as f64)).round() as u32;
        TargetSize {
            width: max_edge,
            height: scaled.max(1),
        }
    } else {
        let scaled = (width as f64 * (max_edge as f64 / height as f64)).round() as u32;
        TargetSize {
            width: scaled.max(1),
            height: max_edge,
        }
    }
}

/// Resize `image` so its longer edge is at most `max_edge`.
///
/// Returns the input untouched when no resize is needed.
pub fn bound_long_edge(image: DynamicImage, max_edge: u32, algorithm: ResizeAlgorithm) -> DynamicImage {
    let target = target_size(image.width(), image.height(), max_edge);
    if target.width == image.width() && target.height == image.height() {
        return image;
    }

    tracing::debug!(
        "Resizing {}x{} -> {}x{} ({:?})",
        image.width(),
        image.height(),
        target.width,
        target.height,
        algorithm
    );
    image.resize_exact(target.width, target.height, algorithm.to_filter_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_small_images_are_untouched() {
        assert_eq!(target_size(800, 600, 1200), TargetSize { width: 800, height: 600 });
        assert_eq!(target_size(1200, 1200, 1200), TargetSize { width: 1200, height: 1200 });
        assert_eq!(target_size(1, 1, 1200), TargetSize { width: 1, height: 1 });
    }

    #[test]
    fn test_landscape_is_clamped_on_width() {
        let size = target_size(4000, 3000, 1200);
        assert_eq!(size, TargetSize { width: 1200, height: 900 });
    }

    #[test]
    fn test_portrait_is_clamped_on_height() {
        let size = target_size(1000, 2400, 1200);
        assert_eq!(size, TargetSize { width: 500, height: 1200 });
    }

    #[test]
    fn test_square_takes_both_edges_to_limit() {
        assert_eq!(target_size(3000, 3000, 1200), TargetSize { width: 1200, height: 1200 });
    }

    #[test]
    fn test_degenerate_strip_keeps_one_pixel() {
        let size = target_size(10_000, 3, 1200);
        assert_eq!(size, TargetSize { width: 1200, height: 1 });
    }

    #[test]
    fn test_aspect_ratio_preserved_within_rounding() {
        for (w, h) in [(1920, 1080), (4032, 3024), (1333, 2777), (2001, 1201), (5000, 17)] {
            let size = target_size(w, h, 1200);
            assert_eq!(size.long_edge(), 1200, "{}x{}", w, h);

            let original = w as f64 / h as f64;
            let resized = size.width as f64 / size.height as f64;
            // One pixel of rounding on the short edge
            let short = size.width.min(size.height) as f64;
            let tolerance = original * (1.0 / short.max(1.0)) + 1e-9;
            assert!((original - resized).abs() <= tolerance, "{}x{} -> {:?}", w, h, size);
        }
    }

    #[test]
    fn test_target_size_is_idempotent() {
        for (w, h) in [(4000, 3000), (1000, 2400), (2500, 2500), (1201, 7)] {
            let once = target_size(w, h, 1200);
            let twice = target_size(once.width, once.height, 1200);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_bound_long_edge_resizes_raster() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2400, 1600));
        let resized = bound_long_edge(image, 1200, ResizeAlgorithm::Triangle);
        assert_eq!((resized.width(), resized.height()), (1200, 800));
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(ResizeAlgorithm::Lanczos.to_filter_type(), FilterType::Lanczos3);
        assert_eq!(ResizeAlgorithm::default(), ResizeAlgorithm::CatmullRom);
    }
}

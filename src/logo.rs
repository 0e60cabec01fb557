//! # Logo Images
//!
//! An uploaded logo is carried through the pipeline as an opaque byte blob
//! ([`LogoImage`]) and only decoded to pixels inside the render path, behind
//! the async [`LogoDecoder`] seam. Decoding latency is unbounded in the
//! worst case, which is why the orchestrator token-guards everything that
//! happens after it.

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::LuceroError;
use crate::placement::Dimensions;

/// Reference to an undecoded logo raster (PNG or JPEG bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    bytes: Vec<u8>,
}

impl LogoImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True if the bytes sniff as a format the pipeline accepts.
    /// Mirrors the upload policy: only PNG and JPEG.
    pub fn has_supported_format(&self) -> bool {
        matches!(
            image::guess_format(&self.bytes),
            Ok(image::ImageFormat::Png) | Ok(image::ImageFormat::Jpeg)
        )
    }
}

/// A decoded logo: pixels plus their dimensions.
#[derive(Debug, Clone)]
pub struct DecodedLogo {
    pub pixels: RgbaImage,
}

impl DecodedLogo {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }
}

/// Capability: asynchronously decode a logo blob into pixels.
#[async_trait]
pub trait LogoDecoder: Send + Sync {
    async fn decode(&self, logo: &LogoImage) -> Result<DecodedLogo, LuceroError>;
}

/// [`LogoDecoder`] backed by the `image` crate.
///
/// Runs the decode on the blocking pool; logos can be large and the render
/// loop should stay responsive.
#[derive(Debug, Default)]
pub struct ImageLogoDecoder;

#[async_trait]
impl LogoDecoder for ImageLogoDecoder {
    async fn decode(&self, logo: &LogoImage) -> Result<DecodedLogo, LuceroError> {
        let bytes = logo.bytes.clone();
        let decoded = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|img| img.to_rgba8())
        })
        .await
        .map_err(|e| LuceroError::LogoDecode(format!("decode task failed: {}", e)))?
        .map_err(|e| LuceroError::LogoDecode(e.to_string()))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(LuceroError::LogoDecode("image has zero size".to_string()));
        }

        Ok(DecodedLogo { pixels: decoded })
    }
}

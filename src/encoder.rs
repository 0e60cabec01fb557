//! # Matrix Encoder
//!
//! Seam to the external QR symbol encoder. The core never performs data
//! segmentation, error correction or mask selection itself; it hands content
//! and options to a [`MatrixEncoder`] and gets back an opaque square
//! [`ModuleMatrix`].
//!
//! The bundled implementation is backed by the `qrcode` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LuceroError;

/// QR error-correction level, trading data capacity for resilience to
/// missing or occluded modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery; the only tier that tolerates a centered logo
    H,
}

impl EcLevel {
    /// Parse the single-letter form a form select posts.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Options handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Symbol version 1..=40; `None` lets the encoder pick the smallest
    /// version that fits.
    pub version: Option<u8>,
    pub ec_level: EcLevel,
    /// Preferred mask pattern 0..=7. Mask selection is an encoder-internal
    /// concern; encoders that pick their own mask may ignore this.
    pub mask_pattern: Option<u8>,
}

/// Square grid of dark/light modules produced by an encoder.
///
/// The core treats the contents as opaque; only `size` participates in
/// geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from row-major dark flags. Panics if `modules` is not
    /// `size * size` long.
    pub fn new(size: usize, modules: Vec<bool>) -> Self {
        assert_eq!(modules.len(), size * size, "module grid must be square");
        Self { size, modules }
    }

    /// Side length in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if the module at (x, y) is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }
}

/// Capability: encode text into a module matrix.
///
/// Encoding may be asynchronous (a single await point from the caller's
/// perspective). Failures are deterministic functions of the input, so
/// callers propagate them without retrying.
#[async_trait]
pub trait MatrixEncoder: Send + Sync {
    async fn encode(
        &self,
        content: &str,
        options: &EncoderOptions,
    ) -> Result<ModuleMatrix, LuceroError>;
}

/// [`MatrixEncoder`] backed by the `qrcode` crate.
///
/// The crate selects the mask pattern itself, so `mask_pattern` is accepted
/// but not forwarded.
#[derive(Debug, Default)]
pub struct QrMatrixEncoder;

#[async_trait]
impl MatrixEncoder for QrMatrixEncoder {
    async fn encode(
        &self,
        content: &str,
        options: &EncoderOptions,
    ) -> Result<ModuleMatrix, LuceroError> {
        let ec_level = options.ec_level.into();
        let code = match options.version {
            Some(v) => qrcode::QrCode::with_version(
                content,
                qrcode::Version::Normal(v as i16),
                ec_level,
            ),
            None => qrcode::QrCode::with_error_correction_level(content, ec_level),
        }
        .map_err(|e| LuceroError::Encoding(e.to_string()))?;

        let size = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();

        Ok(ModuleMatrix::new(size, modules))
    }
}

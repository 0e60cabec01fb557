//! # Render Orchestrator
//!
//! [`Preview`] owns the drawing surface and is the only component that
//! mutates it. Each [`Preview::request_render`] call re-encodes the module
//! matrix, draws it at pixel scale, and composites an optional logo using
//! the placement geometry.
//!
//! Renders overlap: logo decode latency is unbounded, and a newer request
//! can arrive while an older one is still awaiting its image. Every request
//! therefore takes a monotonically increasing generation token, and every
//! point that applies pixels to the surface re-checks its token under the
//! surface lock first. A request whose token is no longer current resolves
//! to [`RenderOutcome::Superseded`] and never touches the surface: prior
//! async work is allowed to finish, but its result is discarded.

use image::Rgba;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::encoder::{EncoderOptions, MatrixEncoder, ModuleMatrix, QrMatrixEncoder};
use crate::error::LuceroError;
use crate::export::{self, Export, OutputFormat};
use crate::form::RenderRequest;
use crate::logo::{ImageLogoDecoder, LogoDecoder};
use crate::placement::{self, DEFAULT_LOGO_SCALE};
use crate::surface::Surface;

/// How one render attempt resolved. One instance per attempt; a
/// superseded attempt's pixels are never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Surface updated with the freshly encoded symbol.
    Completed,
    /// Content was empty: surface cleared to blank, nothing encoded.
    /// A legitimate "no content yet" state, not an error.
    Blank,
    /// A newer request took over before this one could apply its result.
    Superseded,
}

/// Inputs a successful render leaves behind for matrix-based exports.
struct CompletedRender {
    matrix: ModuleMatrix,
    margin: u32,
    light: Rgba<u8>,
    dark: Rgba<u8>,
}

struct PreviewState {
    surface: Surface,
    completed: Option<CompletedRender>,
}

/// The live preview: one drawing surface, kept in sync with the latest
/// render request.
pub struct Preview {
    encoder: Arc<dyn MatrixEncoder>,
    decoder: Arc<dyn LogoDecoder>,
    generation: AtomicU64,
    state: Mutex<PreviewState>,
}

impl Preview {
    /// Preview backed by the bundled `qrcode` encoder and `image` decoder.
    pub fn new() -> Self {
        Self::with_backends(Arc::new(QrMatrixEncoder), Arc::new(ImageLogoDecoder))
    }

    /// Preview with injected encoder/decoder backends.
    pub fn with_backends(encoder: Arc<dyn MatrixEncoder>, decoder: Arc<dyn LogoDecoder>) -> Self {
        Self {
            encoder,
            decoder,
            generation: AtomicU64::new(0),
            state: Mutex::new(PreviewState {
                surface: Surface::new(),
                completed: None,
            }),
        }
    }

    fn is_stale(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != token
    }

    /// Render `req` onto the surface.
    ///
    /// Encoding failures propagate without retry (deterministic function of
    /// input). A logo decode failure yields [`LuceroError::LogoDecode`] but
    /// leaves the module matrix drawn: a correct QR code without its logo
    /// beats a blank surface.
    pub async fn request_render(&self, req: &RenderRequest) -> Result<RenderOutcome, LuceroError> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if req.content.is_empty() {
            let mut state = self.state.lock().unwrap();
            if self.is_stale(token) {
                return Ok(RenderOutcome::Superseded);
            }
            state.surface.clear();
            state.completed = None;
            return Ok(RenderOutcome::Blank);
        }

        let options = EncoderOptions {
            version: req.version,
            ec_level: req.ec_level,
            mask_pattern: req.mask_pattern,
        };
        let matrix = match self.encoder.encode(&req.content, &options).await {
            Ok(matrix) => matrix,
            Err(e) => {
                // A stale render's failure is as dead as its success.
                if self.is_stale(token) {
                    return Ok(RenderOutcome::Superseded);
                }
                return Err(e);
            }
        };
        let matrix_size = matrix.size();

        {
            let mut state = self.state.lock().unwrap();
            if self.is_stale(token) {
                return Ok(RenderOutcome::Superseded);
            }
            state
                .surface
                .draw_matrix(&matrix, req.scale, req.margin, req.light, req.dark);
            state.completed = Some(CompletedRender {
                matrix,
                margin: req.margin,
                light: req.light,
                dark: req.dark,
            });
        }

        if let Some(logo) = &req.logo {
            let decoded = match self.decoder.decode(logo).await {
                Ok(decoded) => decoded,
                Err(e) => {
                    if self.is_stale(token) {
                        return Ok(RenderOutcome::Superseded);
                    }
                    return Err(e);
                }
            };

            let placement = placement::center_image_with_clear_area(
                matrix_size as u32,
                decoded.dimensions(),
                DEFAULT_LOGO_SCALE,
            );
            let cleared = placement.cleared_area.to_pixel_rect(req.scale, req.margin);
            let image_area = placement.image_area.to_pixel_rect(req.scale, req.margin);

            let mut state = self.state.lock().unwrap();
            if self.is_stale(token) {
                return Ok(RenderOutcome::Superseded);
            }
            state.surface.clear_rect(cleared);
            state.surface.draw_logo(&decoded, image_area);
        }

        Ok(RenderOutcome::Completed)
    }

    /// Serialize the current surface.
    ///
    /// Fails with [`LuceroError::NotReady`] before the first successful
    /// render. Runs under the surface lock, so it reads a consistent
    /// snapshot and never interleaves with an in-flight apply.
    pub fn export(&self, format: OutputFormat) -> Result<Export, LuceroError> {
        let state = self.state.lock().unwrap();
        let completed = state.completed.as_ref().ok_or(LuceroError::NotReady)?;

        match format {
            OutputFormat::Png => Ok(Export::Binary(state.surface.to_png()?)),
            OutputFormat::Svg => Ok(Export::Text(export::to_svg_string(
                &completed.matrix,
                completed.margin,
                completed.light,
                completed.dark,
            ))),
            OutputFormat::Utf8 => Ok(Export::Text(export::to_utf8_string(
                &completed.matrix,
                completed.margin,
            ))),
        }
    }

    /// Consistent copy of the current surface (for tests and UIs that blit
    /// elsewhere).
    pub fn snapshot(&self) -> Surface {
        self.state.lock().unwrap().surface.clone()
    }
}

impl Default for Preview {
    fn default() -> Self {
        Self::new()
    }
}

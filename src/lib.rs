//! # Lucero - Live QR Code Preview
//!
//! Lucero keeps a raster preview of a QR code in sync with rapidly-changing
//! form input. It provides:
//!
//! - **Normalization**: raw form values into canonical render parameters,
//!   with per-field validation errors
//! - **Logo placement**: pure geometry for centering a logo over the module
//!   matrix and clearing the modules beneath it
//! - **Orchestration**: debounced, token-guarded asynchronous renders onto
//!   an owned drawing surface
//! - **Export**: PNG, SVG and terminal text output
//!
//! Symbol encoding itself is delegated to the `qrcode` crate behind the
//! [`MatrixEncoder`] seam.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lucero::{OutputFormat, Preview, QrForm};
//!
//! # async fn example() -> Result<(), lucero::LuceroError> {
//! let form = QrForm {
//!     input: "https://example.com".to_string(),
//!     scale: Some("8".to_string()),
//!     margin: Some("2".to_string()),
//!     light_color: Some("#FFFFFF".to_string()),
//!     dark_color: Some("#000000".to_string()),
//!     ..Default::default()
//! };
//! let request = form.normalize(None)?;
//!
//! let preview = Preview::new();
//! preview.request_render(&request).await?;
//! let png = preview.export(OutputFormat::Png)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form`] | Raw form values → [`RenderRequest`] normalization |
//! | [`placement`] | Logo centering and clear-area geometry |
//! | [`encoder`] | Module matrix encoding seam (`qrcode`-backed) |
//! | [`logo`] | Logo blobs and async decoding |
//! | [`surface`] | Owned RGBA drawing surface |
//! | [`preview`] | Render orchestrator with stale-render guard |
//! | [`debounce`] | Quiet-window coalescing and the preview loop |
//! | [`export`] | PNG/SVG/UTF-8 output |
//! | [`server`] | HTTP form boundary |
//! | [`error`] | Error types |

pub mod debounce;
pub mod encoder;
pub mod error;
pub mod export;
pub mod form;
pub mod logo;
pub mod placement;
pub mod preview;
pub mod server;
pub mod surface;

// Re-exports for convenience
pub use encoder::{EcLevel, MatrixEncoder, ModuleMatrix};
pub use error::{LuceroError, ValidationError};
pub use export::OutputFormat;
pub use form::{QrForm, RenderRequest};
pub use placement::{PlacementResult, center_image_with_clear_area};
pub use preview::{Preview, RenderOutcome};

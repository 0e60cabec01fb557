//! # Drawing Surface
//!
//! An owned RGBA raster the orchestrator draws into, playing the role of
//! the on-screen canvas. Only the [`Preview`](crate::preview::Preview)
//! mutates it; everything here is synchronous pixel work.

use image::{Rgba, RgbaImage, imageops};
use std::io::Cursor;

use crate::encoder::ModuleMatrix;
use crate::error::LuceroError;
use crate::logo::DecodedLogo;
use crate::placement::PixelRect;

const BLANK: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Square RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A zero-sized surface; nothing rendered yet.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(0, 0),
        }
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Reset to a zero-sized blank surface (the "no content yet" state).
    pub fn clear(&mut self) {
        self.image = RgbaImage::new(0, 0);
    }

    /// Draw a module matrix, replacing all surface contents.
    ///
    /// The surface is resized to `(size + 2 * margin) * scale` pixels per
    /// side: the symbol at `scale` pixels per module surrounded by a
    /// `margin`-module quiet zone filled with the light color.
    pub fn draw_matrix(
        &mut self,
        matrix: &ModuleMatrix,
        scale: u32,
        margin: u32,
        light: Rgba<u8>,
        dark: Rgba<u8>,
    ) {
        let side = (matrix.size() as u32 + 2 * margin) * scale;
        self.image = RgbaImage::from_pixel(side, side, light);

        let offset = margin * scale;
        for my in 0..matrix.size() {
            for mx in 0..matrix.size() {
                if !matrix.is_dark(mx, my) {
                    continue;
                }
                let px0 = offset + mx as u32 * scale;
                let py0 = offset + my as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.image.put_pixel(px0 + dx, py0 + dy, dark);
                    }
                }
            }
        }
    }

    /// Clear a pixel rectangle to fully-transparent, like canvas
    /// `clearRect`. Out-of-bounds portions are ignored.
    pub fn clear_rect(&mut self, rect: PixelRect) {
        let x1 = (rect.x + rect.width).min(self.image.width());
        let y1 = (rect.y + rect.height).min(self.image.height());
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                self.image.put_pixel(x, y, BLANK);
            }
        }
    }

    /// Scale a decoded logo to `rect` and composite it onto the surface,
    /// respecting the logo's own alpha.
    pub fn draw_logo(&mut self, logo: &DecodedLogo, rect: PixelRect) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let resized = imageops::resize(
            &logo.pixels,
            rect.width,
            rect.height,
            imageops::FilterType::Lanczos3,
        );
        imageops::overlay(&mut self.image, &resized, rect.x as i64, rect.y as i64);
    }

    /// Pixel at (x, y); test and export helper.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Serialize the surface to PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, LuceroError> {
        let mut buf = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| LuceroError::Image(format!("PNG serialization failed: {}", e)))?;
        Ok(buf.into_inner())
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

//! # Logo Placement Geometry
//!
//! Pure geometry for centering a logo over a QR module matrix and computing
//! the rectangle of modules that must be cleared beneath it.
//!
//! Everything here works in **module-grid coordinates** (one unit = one QR
//! module). Conversion to pixel coordinates is explicit via
//! [`Rect::to_pixel_rect`]; the two spaces are never mixed implicitly.

/// Width and height of a raster image, in its own pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Axis-aligned rectangle in module-grid coordinates.
///
/// Fields are `f64` because centering an odd-sized overlay in an even-sized
/// container (or vice versa) produces fractional offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// True if `self` fully contains `other`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x + self.width >= other.x + other.width
            && self.y + self.height >= other.y + other.height
    }

    /// Convert a module-space rectangle to pixel space.
    ///
    /// Multiplies by `scale` (pixels per module) and offsets by the quiet
    /// zone (`margin` modules). Positions and sizes are rounded to whole
    /// pixels at this boundary and nowhere else.
    pub fn to_pixel_rect(&self, scale: u32, margin: u32) -> PixelRect {
        let offset = (margin * scale) as f64;
        let scale = scale as f64;
        PixelRect {
            x: (self.x * scale + offset).round() as u32,
            y: (self.y * scale + offset).round() as u32,
            width: (self.width * scale).round() as u32,
            height: (self.height * scale).round() as u32,
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Result of [`center_image_with_clear_area`], in module space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementResult {
    /// Exact rectangle the logo image is drawn into (fractional).
    pub image_area: Rect,
    /// Whole-module rectangle cleared beneath the image. Always contains
    /// `image_area`, so no partially-covered dark module stays visible
    /// through a transparent image corner.
    pub cleared_area: Rect,
}

/// Default fraction of the matrix side a centered logo occupies.
pub const DEFAULT_LOGO_SCALE: f64 = 0.4;

/// Compute where a logo lands inside a square module matrix and which
/// modules to clear beneath it.
///
/// - `container_size`: side length of the module matrix.
/// - `image`: logo pixel dimensions (aspect ratio is preserved).
/// - `target_scale`: fraction of the container the logo's larger dimension
///   should span. Values ≥ 1 or zero-sized images are the caller's
///   responsibility to reject upstream; this is a numeric utility, not a
///   policy gate.
///
/// The target dimension is parity-corrected: when container and target have
/// different parities the target grows by one module so the overlay stays
/// symmetric around the matrix center. Without this, an asymmetric residual
/// row of cleared modules would offset the logo and damage extra data
/// modules for nothing.
///
/// Pure and deterministic: identical inputs give bit-identical outputs.
pub fn center_image_with_clear_area(
    container_size: u32,
    image: Dimensions,
    target_scale: f64,
) -> PlacementResult {
    let container = container_size as f64;
    let mut target_dimension = (container * target_scale).round();
    if container_size % 2 != (target_dimension as u32) % 2 {
        target_dimension += 1.0;
    }

    // Larger dimension takes the target; the other follows the aspect ratio.
    let aspect_ratio = image.width as f64 / image.height as f64;
    let (scaled_width, scaled_height) = if aspect_ratio > 1.0 {
        (target_dimension, target_dimension / aspect_ratio)
    } else {
        (target_dimension * aspect_ratio, target_dimension)
    };

    let x = (container - scaled_width) / 2.0;
    let y = (container - scaled_height) / 2.0;

    // Outward-rounded bounding box, inclusive on both ends.
    let left = x.floor();
    let right = (x + scaled_width - 1.0).ceil();
    let bottom = y.floor();
    let top = (y + scaled_height - 1.0).ceil();

    PlacementResult {
        image_area: Rect {
            x,
            y,
            width: scaled_width,
            height: scaled_height,
        },
        cleared_area: Rect {
            x: left,
            y: bottom,
            width: right - left + 1.0,
            height: top - bottom + 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn square(side: u32) -> Dimensions {
        Dimensions {
            width: side,
            height: side,
        }
    }

    #[test]
    fn test_square_logo_even_container() {
        let placement = center_image_with_clear_area(100, square(100), 0.4);

        assert_eq!(
            placement.image_area,
            Rect {
                x: 30.0,
                y: 30.0,
                width: 40.0,
                height: 40.0
            }
        );
        // Integer-aligned square: cleared area equals the image area.
        assert_eq!(placement.cleared_area, placement.image_area);
    }

    #[test]
    fn test_landscape_logo_odd_container() {
        let placement = center_image_with_clear_area(
            101,
            Dimensions {
                width: 200,
                height: 100,
            },
            0.4,
        );

        // Raw target 40 is even, container 101 odd: parity-adjusted to 41.
        assert_eq!(placement.image_area.width, 41.0);
        assert_eq!(placement.image_area.height, 20.5);
        assert_eq!(placement.image_area.x, 30.0);
        assert_eq!(placement.image_area.y, 40.25);

        assert_eq!(
            placement.cleared_area,
            Rect {
                x: 30.0,
                y: 40.0,
                width: 41.0,
                height: 21.0
            }
        );
    }

    #[test]
    fn test_parity_invariant() {
        for container in [21u32, 25, 57, 100, 101, 177] {
            for scale in [0.2, 0.25, 0.3, 0.4, 0.5] {
                let placement = center_image_with_clear_area(container, square(64), scale);
                let target = placement.image_area.width as u32;
                assert_eq!(
                    target % 2,
                    container % 2,
                    "container {} scale {}",
                    container,
                    scale
                );
            }
        }
    }

    #[test]
    fn test_containment_invariant() {
        let images = [
            square(100),
            Dimensions {
                width: 640,
                height: 480,
            },
            Dimensions {
                width: 33,
                height: 170,
            },
            Dimensions {
                width: 3,
                height: 7,
            },
        ];
        for container in [21u32, 29, 45, 101, 177] {
            for image in images {
                for scale in [0.15, 0.3, 0.4, 0.55] {
                    let placement = center_image_with_clear_area(container, image, scale);
                    assert!(
                        placement.cleared_area.contains(&placement.image_area),
                        "cleared {:?} does not contain image {:?}",
                        placement.cleared_area,
                        placement.image_area
                    );
                }
            }
        }
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let image = Dimensions {
            width: 640,
            height: 480,
        };
        let placement = center_image_with_clear_area(57, image, 0.4);
        let input_ratio = image.width as f64 / image.height as f64;
        let output_ratio = placement.image_area.width / placement.image_area.height;
        assert!((input_ratio - output_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let image = Dimensions {
            width: 200,
            height: 100,
        };
        let first = center_image_with_clear_area(100, image, 0.4);
        let second = center_image_with_clear_area(100, image, 0.4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_portrait_image_governed_by_height() {
        let placement = center_image_with_clear_area(
            100,
            Dimensions {
                width: 50,
                height: 100,
            },
            0.4,
        );
        assert_eq!(placement.image_area.height, 40.0);
        assert_eq!(placement.image_area.width, 20.0);
    }

    #[test]
    fn test_pixel_conversion_applies_scale_and_margin() {
        let rect = Rect {
            x: 30.0,
            y: 40.0,
            width: 41.0,
            height: 21.0,
        };
        let px = rect.to_pixel_rect(8, 2);
        assert_eq!(
            px,
            PixelRect {
                x: 30 * 8 + 16,
                y: 40 * 8 + 16,
                width: 41 * 8,
                height: 21 * 8
            }
        );
    }

    #[test]
    fn test_pixel_conversion_rounds_fractional_offsets() {
        let rect = Rect {
            x: 40.25,
            y: 40.25,
            width: 20.5,
            height: 20.5,
        };
        let px = rect.to_pixel_rect(2, 0);
        assert_eq!(
            px,
            PixelRect {
                x: 81,
                y: 81,
                width: 41,
                height: 41
            }
        );
    }
}

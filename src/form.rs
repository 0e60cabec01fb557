//! # Form Normalization
//!
//! Maps raw, possibly-partial form values (numbers as strings, checkboxes
//! as `"on"`, the way a browser posts them) into a canonical
//! [`RenderRequest`], or fails with a [`ValidationError`] listing every
//! invalid field individually so the UI can surface each violation next to
//! its input.
//!
//! Cross-field policy lives here too: attaching a logo silently forces the
//! error-correction level to H, since an occluding logo is only survivable
//! at the highest correction tier.

use image::Rgba;
use serde::Deserialize;

use crate::encoder::EcLevel;
use crate::error::ValidationError;
use crate::logo::LogoImage;

/// Canonical parameters for one render. Built fresh per render by
/// [`QrForm::normalize`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub content: String,
    /// Symbol version 1..=40, or `None` for automatic.
    pub version: Option<u8>,
    /// Always [`EcLevel::H`] when `logo` is present.
    pub ec_level: EcLevel,
    /// Preferred mask pattern 0..=7, or `None` for automatic.
    pub mask_pattern: Option<u8>,
    /// Pixels per module, ≥ 1.
    pub scale: u32,
    /// Quiet-zone width in modules, 0..=10.
    pub margin: u32,
    /// Background color; alpha 0 when the light channel is transparent.
    pub light: Rgba<u8>,
    /// Module color; alpha 0 when the dark channel is transparent.
    pub dark: Rgba<u8>,
    pub logo: Option<LogoImage>,
}

/// Raw form values, exactly as the form boundary supplies them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QrForm {
    pub input: String,
    #[serde(rename = "qVersion")]
    pub version: Option<String>,
    #[serde(rename = "errorCorrection")]
    pub error_correction: Option<String>,
    pub mask: Option<String>,
    #[serde(rename = "outputType")]
    pub output_type: Option<String>,
    #[serde(rename = "lightTransparent")]
    pub light_transparent: Option<String>,
    #[serde(rename = "darkTransparent")]
    pub dark_transparent: Option<String>,
    pub scale: Option<String>,
    pub margin: Option<String>,
    #[serde(rename = "lightColor")]
    pub light_color: Option<String>,
    #[serde(rename = "darkColor")]
    pub dark_color: Option<String>,
}

impl QrForm {
    /// Normalize raw values into a [`RenderRequest`].
    ///
    /// Out-of-range numbers fail validation rather than clamp silently.
    /// Empty `input` is allowed here: the orchestrator treats it as the
    /// legitimate "no content yet" blank state. Submission paths that
    /// require content enforce that separately.
    pub fn normalize(&self, logo: Option<LogoImage>) -> Result<RenderRequest, ValidationError> {
        let mut errors = ValidationError::default();

        let version = parse_bounded_opt(self.version.as_deref(), 1, 40)
            .unwrap_or_else(|msg| {
                errors.push("qVersion", msg);
                None
            })
            .map(|v| v as u8);

        let mask_pattern = parse_bounded_opt(self.mask.as_deref(), 0, 7)
            .unwrap_or_else(|msg| {
                errors.push("mask", msg);
                None
            })
            .map(|m| m as u8);

        // Bounded so surface sizing ((size + 2 * margin) * scale) stays far
        // from u32::MAX even at version 40.
        let scale = match parse_bounded(self.scale.as_deref(), 1, MAX_SCALE) {
            Ok(s) => s as u32,
            Err(msg) => {
                errors.push("scale", msg);
                1
            }
        };

        let margin = match parse_bounded(self.margin.as_deref(), 0, 10) {
            Ok(m) => m as u32,
            Err(msg) => {
                errors.push("margin", msg);
                0
            }
        };

        let requested_level = match self.error_correction.as_deref() {
            None | Some("") => EcLevel::M,
            Some(raw) => EcLevel::parse(raw).unwrap_or_else(|| {
                errors.push("errorCorrection", "must be one of L, M, Q, H");
                EcLevel::M
            }),
        };
        // Logos occlude modules; only the highest tier tolerates the loss.
        let ec_level = if logo.is_some() {
            EcLevel::H
        } else {
            requested_level
        };

        let light_transparent = checkbox(self.light_transparent.as_deref());
        let dark_transparent = checkbox(self.dark_transparent.as_deref());

        let light = match parse_hex_color(self.light_color.as_deref()) {
            Ok(rgb) => with_alpha(rgb, light_transparent),
            Err(msg) => {
                errors.push("lightColor", msg);
                Rgba([255, 255, 255, 255])
            }
        };
        let dark = match parse_hex_color(self.dark_color.as_deref()) {
            Ok(rgb) => with_alpha(rgb, dark_transparent),
            Err(msg) => {
                errors.push("darkColor", msg);
                Rgba([0, 0, 0, 255])
            }
        };

        if let Some(logo) = &logo
            && !logo.has_supported_format()
        {
            errors.push("logo", "Only JPG and PNG formats are allowed");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RenderRequest {
            content: self.input.clone(),
            version,
            ec_level,
            mask_pattern,
            scale,
            margin,
            light,
            dark,
            logo,
        })
    }
}

/// Largest accepted pixels-per-module value, matching the form's slider.
const MAX_SCALE: i64 = 40;

/// Error-correction options the UI should offer. With a logo attached the
/// level is forced, so only H remains selectable.
pub fn available_ec_levels(logo_present: bool) -> &'static [EcLevel] {
    if logo_present {
        &[EcLevel::H]
    } else {
        &[EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H]
    }
}

/// Checkbox semantics: present-and-"on" means checked.
fn checkbox(value: Option<&str>) -> bool {
    value == Some("on")
}

fn parse_bounded(value: Option<&str>, min: i64, max: i64) -> Result<i64, String> {
    let raw = value.unwrap_or("").trim();
    if raw.is_empty() {
        return Err("is required".to_string());
    }
    let parsed: i64 = raw
        .parse()
        .map_err(|_| format!("must be an integer between {} and {}", min, max))?;
    if parsed < min || parsed > max {
        return Err(format!("must be between {} and {}", min, max));
    }
    Ok(parsed)
}

/// Like [`parse_bounded`] but missing/empty is `None`, not an error.
fn parse_bounded_opt(value: Option<&str>, min: i64, max: i64) -> Result<Option<i64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        _ => parse_bounded(value, min, max).map(Some),
    }
}

/// Parse `#RRGGBB` into RGB channels.
fn parse_hex_color(value: Option<&str>) -> Result<[u8; 3], String> {
    let raw = value.unwrap_or("");
    let digits = raw
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| "must be a 6-digit hex color like #1A2B3C".to_string())?;

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
    Ok([channel(0), channel(2), channel(4)])
}

/// A transparent channel keeps its RGB value (the opaque-color control
/// still shows the chosen color) and zeroes only the alpha.
fn with_alpha(rgb: [u8; 3], transparent: bool) -> Rgba<u8> {
    let alpha = if transparent { 0 } else { 255 };
    Rgba([rgb[0], rgb[1], rgb[2], alpha])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_form() -> QrForm {
        QrForm {
            input: "https://example.com".to_string(),
            version: None,
            error_correction: Some("M".to_string()),
            mask: None,
            output_type: Some("png".to_string()),
            light_transparent: Some("on".to_string()),
            dark_transparent: None,
            scale: Some("8".to_string()),
            margin: Some("0".to_string()),
            light_color: Some("#FFFFFF".to_string()),
            dark_color: Some("#000000".to_string()),
        }
    }

    fn fake_logo() -> LogoImage {
        // Smallest valid PNG header is enough for format sniffing.
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0; 16]);
        LogoImage::new(bytes)
    }

    #[test]
    fn test_valid_form_normalizes() {
        let req = valid_form().normalize(None).unwrap();

        assert_eq!(req.content, "https://example.com");
        assert_eq!(req.ec_level, EcLevel::M);
        assert_eq!(req.scale, 8);
        assert_eq!(req.margin, 0);
        // Transparent light channel keeps RGB, zeroes alpha.
        assert_eq!(req.light, Rgba([255, 255, 255, 0]));
        assert_eq!(req.dark, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_logo_forces_high_error_correction() {
        for requested in ["L", "M", "Q", "H"] {
            let mut form = valid_form();
            form.error_correction = Some(requested.to_string());
            let req = form.normalize(Some(fake_logo())).unwrap();
            assert_eq!(req.ec_level, EcLevel::H, "requested {}", requested);
        }
    }

    #[test]
    fn test_each_invalid_field_reported_individually() {
        let mut form = valid_form();
        form.scale = Some("0".to_string());
        form.margin = Some("11".to_string());
        form.dark_color = Some("red".to_string());
        form.version = Some("41".to_string());

        let err = form.normalize(None).unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert!(!err.field("scale").is_empty());
        assert!(!err.field("margin").is_empty());
        assert!(!err.field("darkColor").is_empty());
        assert!(!err.field("qVersion").is_empty());
        // Valid fields stay silent.
        assert!(err.field("lightColor").is_empty());
    }

    #[test]
    fn test_out_of_range_fails_rather_than_clamps() {
        let mut form = valid_form();
        form.margin = Some("99".to_string());
        assert!(form.normalize(None).is_err());
    }

    #[test]
    fn test_oversized_scale_fails_validation() {
        // A scale this large would overflow the pixel side computation if
        // it ever reached the render path.
        let mut form = valid_form();
        form.scale = Some("999999999".to_string());
        let err = form.normalize(None).unwrap_err();
        assert_eq!(err.field("scale"), vec!["must be between 1 and 40"]);

        form.scale = Some("41".to_string());
        assert!(form.normalize(None).is_err());

        form.scale = Some("40".to_string());
        assert_eq!(form.normalize(None).unwrap().scale, 40);
    }

    #[test]
    fn test_empty_content_is_allowed() {
        let mut form = valid_form();
        form.input = String::new();
        let req = form.normalize(None).unwrap();
        assert!(req.content.is_empty());
    }

    #[test]
    fn test_unsupported_logo_format_rejected() {
        let logo = LogoImage::new(b"GIF89a...".to_vec());
        let err = valid_form().normalize(Some(logo)).unwrap_err();
        assert_eq!(err.field("logo"), vec!["Only JPG and PNG formats are allowed"]);
    }

    #[test]
    fn test_mask_and_version_bounds() {
        let mut form = valid_form();
        form.mask = Some("7".to_string());
        form.version = Some("40".to_string());
        let req = form.normalize(None).unwrap();
        assert_eq!(req.mask_pattern, Some(7));
        assert_eq!(req.version, Some(40));

        form.mask = Some("8".to_string());
        assert!(form.normalize(None).is_err());
    }

    #[test]
    fn test_ec_levels_reduced_when_logo_attached() {
        assert_eq!(available_ec_levels(false).len(), 4);
        assert_eq!(available_ec_levels(true), &[EcLevel::H]);
    }
}

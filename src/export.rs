//! # Export Formats
//!
//! Serializes a rendered QR code for download or persistence. PNG comes
//! straight off the drawing surface (and so includes a composited logo);
//! SVG and UTF-8 text are rebuilt from the module matrix, logo-free.

use image::Rgba;

use crate::encoder::ModuleMatrix;

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Utf8,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "utf8" => Some(Self::Utf8),
            _ => None,
        }
    }

    /// File extension for persisted output.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Utf8 => "utf8",
        }
    }
}

/// A serialized render: binary for raster formats, text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Binary(Vec<u8>),
    Text(String),
}

impl Export {
    /// Bytes suitable for writing to a file regardless of variant.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

fn hex(color: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Render a module matrix as an SVG document.
///
/// One `viewBox` unit per module; the margin extends the canvas on every
/// side. A transparent channel is expressed through `fill-opacity` so the
/// numeric color survives in the markup.
pub fn to_svg_string(
    matrix: &ModuleMatrix,
    margin: u32,
    light: Rgba<u8>,
    dark: Rgba<u8>,
) -> String {
    let dimension = matrix.size() as u32 + 2 * margin;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\" fill-opacity=\"{}\"/>\n",
        hex(light),
        light[3] as f64 / 255.0
    );
    result += "\t<path d=\"";
    for y in 0..matrix.size() {
        for x in 0..matrix.size() {
            if matrix.is_dark(x, y) {
                result += &format!("M{},{}h1v1h-1z ", x as u32 + margin, y as u32 + margin);
            }
        }
    }
    result = result.trim_end().to_string();
    result += &format!(
        "\" fill=\"{}\" fill-opacity=\"{}\"/>\n",
        hex(dark),
        dark[3] as f64 / 255.0
    );
    result += "</svg>\n";
    result
}

/// Render a module matrix as terminal-friendly text, two characters per
/// module so the aspect ratio survives a monospace font.
pub fn to_utf8_string(matrix: &ModuleMatrix, margin: u32) -> String {
    let size = matrix.size() as i64;
    let margin = margin as i64;
    let mut result = String::new();
    for y in -margin..size + margin {
        for x in -margin..size + margin {
            let dark = x >= 0
                && y >= 0
                && x < size
                && y < size
                && matrix.is_dark(x as usize, y as usize);
            result += if dark { "██" } else { "  " };
        }
        result += "\n";
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn single_dark() -> ModuleMatrix {
        ModuleMatrix::new(1, vec![true])
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("bmp"), None);
    }

    #[test]
    fn test_svg_structure() {
        let svg = to_svg_string(&single_dark(), 2, WHITE, BLACK);
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 5 5\""));
        // The single dark module lands inside the margin offset.
        assert!(svg.contains("M2,2h1v1h-1z"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_transparent_channel_keeps_color() {
        let svg = to_svg_string(&single_dark(), 0, Rgba([255, 0, 255, 0]), BLACK);
        assert!(svg.contains("fill=\"#FF00FF\" fill-opacity=\"0\""));
    }

    #[test]
    fn test_utf8_dimensions() {
        let text = to_utf8_string(&single_dark(), 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  ██  ");
    }
}

//! Render configuration: output format, text color and font selection.

use crate::error::{AvatarError, AvatarResult};
use image::{ImageFormat, ImageOutputFormat, Rgba};
use std::{fmt, path::PathBuf, str::FromStr};

/// Color of the initials when nothing else is configured.
pub const DEFAULT_TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// JPEG quality used when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// An encodable output format, parsed case-insensitively from names such as
/// `"PNG"`, `"jpeg"` or `"jpg"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat(ImageFormat);

impl OutputFormat {
    pub const PNG: OutputFormat = OutputFormat(ImageFormat::Png);
    pub const JPEG: OutputFormat = OutputFormat(ImageFormat::Jpeg);

    pub fn image_format(self) -> ImageFormat {
        self.0
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::PNG
    }
}

impl FromStr for OutputFormat {
    type Err = AvatarError;

    fn from_str(s: &str) -> AvatarResult<Self> {
        let name = s.trim().to_ascii_lowercase();
        let format = ImageFormat::from_extension(&name)
            .ok_or_else(|| AvatarError::encoding(format!("unknown image format: {s}")))?;

        if let ImageOutputFormat::Unsupported(msg) = ImageOutputFormat::from(format) {
            return Err(AvatarError::encoding(format!(
                "format {s} cannot be encoded: {msg}"
            )));
        }

        Ok(OutputFormat(format))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Knobs around the fixed avatar pipeline.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Fill color of the initials.
    pub text_color: Rgba<u8>,

    /// Outline font used instead of the bundled monospace font.
    pub font_path: Option<PathBuf>,

    /// Quality (1-100) for lossy JPEG output.
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            text_color: DEFAULT_TEXT_COLOR,
            font_path: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl RenderOptions {
    pub fn with_text_color(mut self, css: &str) -> AvatarResult<Self> {
        self.text_color = parse_text_color(css)?;
        Ok(self)
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> AvatarResult<Self> {
        self.jpeg_quality = quality;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> AvatarResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AvatarError::invalid_argument(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Parse a CSS color (`#fff`, `white`, `rgb(10, 20, 30)`, ...) into an opaque pixel.
pub fn parse_text_color(css: &str) -> AvatarResult<Rgba<u8>> {
    let color = css_color::Srgb::from_str(css)
        .map_err(|_| AvatarError::invalid_argument(format!("invalid CSS color: {css}")))?;

    Ok(Rgba([
        (color.red * 255.).round() as u8,
        (color.green * 255.).round() as u8,
        (color.blue * 255.).round() as u8,
        255,
    ]))
}

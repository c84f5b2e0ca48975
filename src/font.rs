use crate::error::{AvatarError, AvatarResult};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::{path::Path, sync::OnceLock};

/// Ratio between the font pixel size and the render canvas side.
pub const FONT_SIZE_RATIO: f32 = 0.4;

static BUNDLED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Something that can report the pixel extent of a line of text.
pub trait TextMeasure {
    /// Returns `(width, height)` of `text` in pixels.
    fn text_size(&self, text: &str) -> (f32, f32);
}

/// A font bound to a pixel size.
#[derive(Clone)]
pub struct ScaledFont {
    font: Font<'static>,
    px: f32,
}

impl ScaledFont {
    pub fn new(font: Font<'static>, px: f32) -> Self {
        Self { font, px }
    }

    /// Scale `font` for a canvas of side `render_size`.
    pub fn for_render_size(font: Font<'static>, render_size: u32) -> Self {
        Self::new(font, pixel_size(render_size))
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    fn scale(&self) -> Scale {
        Scale::uniform(self.px)
    }

    /// Lay out `text` with its top-left corner (ascent line) at `(left, top)`.
    pub fn layout(&self, text: &str, left: f32, top: f32) -> Vec<PositionedGlyph<'static>> {
        let ascent = self.font.v_metrics(self.scale()).ascent;
        self.font
            .layout(text, self.scale(), point(left, top + ascent))
            .collect()
    }
}

impl TextMeasure for ScaledFont {
    fn text_size(&self, text: &str) -> (f32, f32) {
        let v_metrics = self.font.v_metrics(self.scale());
        let height = v_metrics.ascent - v_metrics.descent;

        let width = self
            .layout(text, 0.0, 0.0)
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);

        (width, height)
    }
}

/// Font pixel size for a canvas of side `render_size`, rounded to whole pixels.
pub fn pixel_size(render_size: u32) -> f32 {
    (FONT_SIZE_RATIO * render_size as f32).round()
}

/// The monospace font embedded in the binary. Parsed once per process.
pub fn bundled_font() -> AvatarResult<Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();

    FONT.get_or_init(|| Font::try_from_bytes(BUNDLED_FONT_DATA))
        .clone()
        .ok_or_else(|| AvatarError::resource("bundled font could not be parsed"))
}

/// Load an outline font (TTF/OTF) from disk.
pub fn load_font(path: &Path) -> AvatarResult<Font<'static>> {
    let data = std::fs::read(path).map_err(|e| {
        AvatarError::resource(format!("failed to read font {}: {e}", path.display()))
    })?;

    Font::try_from_vec(data).ok_or_else(|| {
        AvatarError::resource(format!("{} is not a usable font file", path.display()))
    })
}

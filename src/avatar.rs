use crate::{
    error::{AvatarError, AvatarResult},
    font::{bundled_font, load_font, ScaledFont, TextMeasure},
    options::{OutputFormat, RenderOptions},
};
use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    },
    imageops::FilterType,
    ColorType, DynamicImage, ImageEncoder, ImageOutputFormat, Rgb, Rgba, RgbaImage,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rusttype::Font;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use tracing::debug;

/// Smallest canvas side the avatar is drawn on before downscaling.
pub const MIN_RENDER_SIZE: u32 = 512;

/// Largest accepted avatar side. Keeps the RGBA canvas at 64 MiB or less.
pub const MAX_AVATAR_SIZE: u32 = 4096;

/// Upper bound for `r + g + b` of a background color, so white text stays readable.
pub const MAX_BACKGROUND_BRIGHTNESS: u16 = 255 * 2;

/// Offset applied to every channel of the start color to get the gradient end color.
const GRADIENT_SHIFT: u16 = 100;

/// Divisor of the free space around the text. Tuned by eye, 2.0 would center it.
const TEXT_POSITION_DIVISOR: f32 = 2.25;

/// Renders avatars with a fixed set of options. The font is resolved once.
#[derive(Clone)]
pub struct AvatarRenderer {
    font: Font<'static>,
    options: RenderOptions,
}

impl AvatarRenderer {
    pub fn new(options: RenderOptions) -> AvatarResult<Self> {
        options.validate()?;

        let font = match &options.font_path {
            Some(path) => load_font(path)?,
            None => bundled_font()?,
        };

        Ok(Self { font, options })
    }

    /// Generate an encoded square avatar of side `size`.
    pub fn generate(
        &self,
        size: u32,
        seed_text: &str,
        initials: &str,
        format: OutputFormat,
    ) -> AvatarResult<Vec<u8>> {
        let canvas = self.render(size, seed_text, initials)?;

        let resized = image::imageops::resize(&canvas, size, size, FilterType::Lanczos3);
        let bytes = encode(resized, format, self.options.jpeg_quality)?;

        debug!(size, %format, bytes = bytes.len(), "encoded avatar");
        Ok(bytes)
    }

    /// Draw the avatar at its working resolution, before it is scaled to `size`.
    pub fn render(&self, size: u32, seed_text: &str, initials: &str) -> AvatarResult<RgbaImage> {
        validate_request(size, initials)?;

        let render_size = render_size(size);
        let color = background_color(seed_text);
        debug!(size, render_size, ?color, "rendering avatar");

        let canvas = RgbaImage::new(render_size, render_size);
        let mut canvas = apply_gradient(canvas, color);

        let font = ScaledFont::for_render_size(self.font.clone(), render_size);
        let (left, top) = text_position(render_size, initials, &font);
        debug!(px = font.px(), left, top, "placing initials");

        draw_text(&mut canvas, &font, initials, left, top, self.options.text_color);

        Ok(canvas)
    }
}

/// Generate an avatar with white initials in the bundled font.
///
/// `format` is a case-insensitive format name such as `"PNG"` or `"JPEG"`.
/// The returned bytes are the complete encoded image.
pub fn generate(size: u32, seed_text: &str, initials: &str, format: &str) -> AvatarResult<Vec<u8>> {
    let format: OutputFormat = format.parse()?;
    AvatarRenderer::new(RenderOptions::default())?.generate(size, seed_text, initials, format)
}

/// Side of the working canvas for a requested output size.
pub fn render_size(output_size: u32) -> u32 {
    output_size.max(MIN_RENDER_SIZE)
}

fn validate_request(size: u32, initials: &str) -> AvatarResult<()> {
    if size == 0 {
        return Err(AvatarError::invalid_argument("avatar size must be positive"));
    }
    if size > MAX_AVATAR_SIZE {
        return Err(AvatarError::invalid_argument(format!(
            "avatar size must be at most {MAX_AVATAR_SIZE}, got {size}"
        )));
    }
    if initials.trim().is_empty() {
        return Err(AvatarError::invalid_argument("initials must not be empty"));
    }
    Ok(())
}

/// Pick a background color from `seed_text`.
///
/// Each call owns its generator, seeded with the SHA-256 of the text, so the
/// same text always maps to the same color for a given `rand` version. Colors
/// brighter than [`MAX_BACKGROUND_BRIGHTNESS`] are drawn again.
pub fn background_color(seed_text: &str) -> Rgb<u8> {
    let seed: [u8; 32] = Sha256::digest(seed_text.as_bytes()).into();
    let mut rng = StdRng::from_seed(seed);

    loop {
        let r: u8 = rng.gen_range(0..=255);
        let g: u8 = rng.gen_range(0..=255);
        let b: u8 = rng.gen_range(0..=255);

        if u16::from(r) + u16::from(g) + u16::from(b) <= MAX_BACKGROUND_BRIGHTNESS {
            return Rgb([r, g, b]);
        }
    }
}

/// End color of the gradient: every channel `c` becomes `(255 + c - 100) mod 256`.
pub fn gradient_end_color(start: Rgb<u8>) -> Rgb<u8> {
    Rgb(start.0.map(|c| ((255 + u16::from(c) - GRADIENT_SHIFT) % 256) as u8))
}

/// Paint a diagonal gradient from `color` to [`gradient_end_color`] beneath `canvas`.
///
/// Line `i` joins `(i, 0)` and `(0, i)`, so a pixel gets the color of index `x + y`.
pub fn apply_gradient(canvas: RgbaImage, color: Rgb<u8>) -> RgbaImage {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return canvas;
    }

    let end = gradient_end_color(color);
    let steps = width.saturating_mul(2);

    let deltas: [f64; 3] =
        std::array::from_fn(|c| (f64::from(end[c]) - f64::from(color[c])) / f64::from(steps));

    let mut gradient = RgbaImage::new(width, height);

    for i in 0..steps {
        // Halves round to even.
        let [r, g, b]: [u8; 3] = std::array::from_fn(|c| {
            (f64::from(color[c]) + deltas[c] * f64::from(i)).round_ties_even() as u8
        });
        let pixel = Rgba([r, g, b, 255]);

        // Clip the part of the line that falls outside the canvas.
        let x_start = i.saturating_sub(height - 1);
        for x in x_start..=i.min(width - 1) {
            gradient.put_pixel(x, i - x, pixel);
        }
    }

    image::imageops::overlay(&mut gradient, &canvas, 0, 0);
    gradient
}

/// Load the bundled font sized for a canvas of side `render_size`.
pub fn font(render_size: u32) -> AvatarResult<ScaledFont> {
    Ok(ScaledFont::for_render_size(bundled_font()?, render_size))
}

/// Top-left drawing offset of `text`, slightly up and left of true center.
pub fn text_position(render_size: u32, text: &str, font: &impl TextMeasure) -> (f32, f32) {
    let (width, height) = font.text_size(text);
    let size = render_size as f32;

    let left = (size - width) / TEXT_POSITION_DIVISOR;
    let top = (size - height) / TEXT_POSITION_DIVISOR;
    (left, top)
}

/// Blend the glyph coverage of `text` over `canvas` in `color`.
fn draw_text(
    canvas: &mut RgbaImage,
    font: &ScaledFont,
    text: &str,
    left: f32,
    top: f32,
    color: Rgba<u8>,
) {
    let (width, height) = canvas.dimensions();

    for glyph in font.layout(text, left, top) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };

        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                return;
            }

            let coverage = coverage.clamp(0.0, 1.0);
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for c in 0..4 {
                let blended =
                    f32::from(color[c]) * coverage + f32::from(pixel[c]) * (1.0 - coverage);
                pixel[c] = blended.round() as u8;
            }
        });
    }
}

fn encode(image: RgbaImage, format: OutputFormat, jpeg_quality: u8) -> AvatarResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let mut buf = Vec::new();

    match format.image_format() {
        image::ImageFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
            encoder.write_image(image.as_raw(), width, height, ColorType::Rgba8)?;
        }
        // JPEG has no alpha channel.
        image::ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality);
            encoder.write_image(rgb.as_raw(), width, height, ColorType::Rgb8)?;
        }
        other => {
            DynamicImage::ImageRgba8(image)
                .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::from(other))?;
        }
    }

    Ok(buf)
}

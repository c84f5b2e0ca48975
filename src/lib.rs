//! Deterministic placeholder avatars: a diagonal gradient seeded from a name,
//! with the person's initials drawn on top.
//!
//! ```no_run
//! let png = avatar_gen::generate(128, "example@sysnove.fr", "PN", "PNG")?;
//! std::fs::write("avatar.png", png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod avatar;
pub mod error;
pub mod font;
pub mod options;

pub use avatar::{
    apply_gradient, background_color, font, generate, gradient_end_color, render_size,
    text_position, AvatarRenderer, MAX_AVATAR_SIZE, MIN_RENDER_SIZE,
};
pub use error::{AvatarError, AvatarResult};
pub use font::{ScaledFont, TextMeasure};
pub use options::{OutputFormat, RenderOptions};

use anyhow::{Context, Result};
use avatar_gen::{AvatarRenderer, OutputFormat, RenderOptions};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(
    name = "avatar-gen",
    about = "Generate a gradient avatar with initials from a name"
)]
struct Args {
    /// Name used to seed the background color (e.g. an email address).
    #[clap(value_name = "NAME")]
    name: String,

    /// Initials drawn on the avatar.
    #[clap(short, long, value_name = "TEXT")]
    initials: String,

    /// Side of the square avatar, in pixels.
    #[clap(short, long, default_value_t = 128)]
    size: u32,

    /// Output image format (PNG, JPEG, BMP, GIF, ...).
    #[clap(short, long, default_value = "PNG")]
    format: String,

    /// Output file.
    #[clap(short, long, value_name = "FILE", default_value = "avatar.png")]
    output: PathBuf,

    /// Color of the initials (CSS color format)
    #[clap(long, default_value = "#ffffff")]
    text_color: String,

    /// Outline font (TTF/OTF) to use instead of the bundled monospace font
    #[clap(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Quality for JPEG output (1-100)
    #[clap(long, default_value_t = 75)]
    jpeg_quality: u8,

    /// Log pipeline details
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut options = RenderOptions::default()
        .with_text_color(&args.text_color)?
        .with_jpeg_quality(args.jpeg_quality)?;
    if let Some(font) = &args.font {
        options = options.with_font_path(font);
    }

    let format: OutputFormat = args.format.parse()?;
    let renderer = AvatarRenderer::new(options)?;

    println!("Generating {}x{} avatar...", args.size, args.size);
    let bytes = renderer.generate(args.size, &args.name, &args.initials, format)?;

    std::fs::write(&args.output, bytes).context("Failed to write avatar file")?;
    println!("✓ Generated {}", args.output.display());

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

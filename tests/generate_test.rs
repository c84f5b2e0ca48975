use avatar_gen::{generate, AvatarError, AvatarRenderer, OutputFormat, RenderOptions};
use image::{GenericImageView, ImageFormat, Rgba};

/// `generate(128, "example@sysnove.fr", "PN", "PNG")` yields a decodable
/// 128×128 PNG with near-white initials on a gradient.
#[test]
fn test_png_avatar_end_to_end() {
    let bytes = generate(128, "example@sysnove.fr", "PN", "PNG").expect("Failed to generate avatar");

    assert!(!bytes.is_empty(), "Avatar stream should not be empty");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "Stream should start with PNG magic");

    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .expect("Avatar should decode as PNG");
    assert_eq!(img.dimensions(), (128, 128));

    let rgba = img.to_rgba8();
    let text_pixels = rgba
        .pixels()
        .filter(|p| p[0] >= 250 && p[1] >= 250 && p[2] >= 250)
        .count();
    assert!(text_pixels > 0, "Initials should leave white pixels behind");

    assert!(
        rgba.pixels().all(|p| p[3] == 255),
        "Gradient background should be fully opaque"
    );
    assert_ne!(rgba.get_pixel(0, 0), rgba.get_pixel(127, 127));
}

#[test]
fn test_output_size_matches_request() {
    for size in [1, 16, 32, 128, 512, 1024] {
        let bytes = generate(size, "a@b.com", "AB", "PNG").expect("Failed to generate avatar");
        let img = image::load_from_memory(&bytes).expect("Failed to decode avatar");
        assert_eq!(
            img.dimensions(),
            (size, size),
            "Avatar of size {} has wrong dimensions",
            size
        );
    }
}

#[test]
fn test_jpeg_output_decodes_as_jpeg() {
    let bytes = generate(128, "a@b.com", "AB", "JPEG").expect("Failed to generate JPEG avatar");

    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF], "Stream should start with JPEG SOI marker");
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);

    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
        .expect("Avatar should decode as JPEG");
    assert_eq!(img.dimensions(), (128, 128));
}

#[test]
fn test_same_name_gives_same_avatar() {
    let first = generate(64, "jane.doe@example.com", "JD", "PNG").unwrap();
    let second = generate(64, "jane.doe@example.com", "JD", "PNG").unwrap();
    assert_eq!(first, second);

    let other = generate(64, "john.roe@example.com", "JD", "PNG").unwrap();
    assert_ne!(first, other);
}

#[test]
fn test_other_formats_go_through_generic_encoder() {
    let bytes = generate(48, "a@b.com", "AB", "bmp").expect("Failed to generate BMP avatar");
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Bmp);
    assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (48, 48));
}

#[test]
fn test_invalid_requests_are_typed_errors() {
    assert!(matches!(
        generate(0, "a@b.com", "AB", "PNG"),
        Err(AvatarError::InvalidArgument(_))
    ));
    assert!(matches!(
        generate(avatar_gen::MAX_AVATAR_SIZE + 1, "a@b.com", "AB", "PNG"),
        Err(AvatarError::InvalidArgument(_))
    ));
    assert!(matches!(
        generate(64, "a@b.com", "", "PNG"),
        Err(AvatarError::InvalidArgument(_))
    ));
    assert!(matches!(
        generate(64, "a@b.com", "AB", "definitely-not-a-format"),
        Err(AvatarError::Encoding(_))
    ));
}

#[test]
fn test_missing_font_is_a_resource_error() {
    let options = RenderOptions::default().with_font_path("/no/such/font.otf");
    assert!(matches!(
        AvatarRenderer::new(options),
        Err(AvatarError::Resource(_))
    ));
}

#[test]
fn test_custom_text_color_is_used() {
    let options = RenderOptions::default().with_text_color("#ff0000").unwrap();
    let renderer = AvatarRenderer::new(options).unwrap();

    let canvas = renderer.render(128, "example@sysnove.fr", "PN").unwrap();
    assert!(canvas.pixels().any(|p| *p == Rgba([255, 0, 0, 255])));

    let bytes = renderer
        .generate(128, "example@sysnove.fr", "PN", OutputFormat::PNG)
        .unwrap();
    assert_eq!(image::load_from_memory(&bytes).unwrap().dimensions(), (128, 128));
}

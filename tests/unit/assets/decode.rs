use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, [100, 50, 200, 128]);

    let prepared = decode_image("px.png", &buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn content_wins_over_extension() {
    let buf = png_bytes(3, 2, [0, 0, 0, 255]);
    assert_eq!(raster_dimensions("mislabelled.jpg", &buf).unwrap(), (3, 2));
    assert!(decode_image("mislabelled.jpg", &buf).is_ok());
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image("x.png", b"definitely not an image").is_err());
    assert!(raster_dimensions("x.png", b"").is_err());
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();

    assert!(parse_svg("<svg").is_err());
}

#[test]
fn natural_size_uses_leading_integer() {
    let svg = |w: &str, h: &str| {
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"/>"#)
    };
    assert_eq!(svg_natural_size(&svg("64", "32")), (64, 32));
    assert_eq!(svg_natural_size(&svg("64px", " 40.9")), (64, 40));
    assert_eq!(svg_natural_size(&svg("0", "abc")), (120, 120));
    assert_eq!(svg_natural_size(&svg("-5", "10")), (120, 10));
    assert_eq!(svg_natural_size(&svg("100%", "50")), (100, 50));
}

#[test]
fn natural_size_defaults_when_absent_or_malformed() {
    assert_eq!(
        svg_natural_size(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"/>"#),
        (120, 120)
    );
    assert_eq!(svg_natural_size("<svg width='10'"), (120, 120));
}

#[test]
fn unpremultiply_reverses_premultiply_for_opaque_and_clear() {
    let mut px = vec![10, 20, 30, 255, 90, 80, 70, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);

    let mut half = vec![64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![128, 64, 0, 128]);
}

use super::*;

#[test]
fn srgb_components_round_to_nearest_byte() {
    for i in 0..=20 {
        let c = f64::from(i) / 20.0;
        let out = ColorSpecifier::srgb(c, c, c).to_rgba();
        let expected = (c * 255.0).round() as u8;
        assert_eq!((out.r, out.g, out.b), (expected, expected, expected));
        assert_eq!(out.a, 1.0);
    }
}

#[test]
fn extended_srgb_values_clamp_instead_of_wrapping() {
    let out: Color = "extended-srgb:1.2,-0.3,0.5,0.25"
        .parse::<ColorSpecifier>()
        .unwrap()
        .to_rgba();
    assert_eq!((out.r, out.g, out.b), (255, 0, 128));
    assert_eq!(out.a, 0.25);
}

#[test]
fn display_p3_white_and_black() {
    let white: ColorSpecifier = "display-p3:1,1,1".parse().unwrap();
    let out = white.to_rgba();
    assert_eq!((out.r, out.g, out.b), (255, 255, 255));

    let black: ColorSpecifier = "display-p3:0,0,0".parse().unwrap();
    let out = black.to_rgba();
    assert_eq!((out.r, out.g, out.b), (0, 0, 0));
}

#[test]
fn display_p3_pure_red_is_clamped() {
    let out = "display-p3:1,0,0"
        .parse::<ColorSpecifier>()
        .unwrap()
        .to_rgba();
    // 1.2249 clamps to 1; -0.0420 and -0.0197 clamp to 0.
    assert_eq!((out.r, out.g, out.b), (255, 0, 0));
}

#[test]
fn extended_gray_uses_single_component_and_alpha() {
    let out = "extended-gray:0.5,0.75"
        .parse::<ColorSpecifier>()
        .unwrap()
        .to_rgba();
    assert_eq!((out.r, out.g, out.b), (128, 128, 128));
    assert_eq!(out.a, 0.75);

    let out = "extended-gray:1"
        .parse::<ColorSpecifier>()
        .unwrap()
        .to_rgba();
    assert_eq!(out, Color::rgba(255, 255, 255, 1.0));
}

#[test]
fn extended_gray_accepts_rgb_shaped_values() {
    let out = ColorSpecifier::parse_lenient("extended-gray:0.5,0,0,0.8").to_rgba();
    assert_eq!(out, Color::rgba(128, 128, 128, 0.8));

    let out = ColorSpecifier::parse_lenient("extended-gray:0.25,0.9,0.9").to_rgba();
    assert_eq!(out, Color::rgba(64, 64, 64, 1.0));
}

#[test]
fn unknown_space_falls_back_to_srgb() {
    let spec: ColorSpecifier = "generic-cmyk:0,0.5,1".parse().unwrap();
    assert_eq!(spec.space(), ColorSpace::Unknown("generic-cmyk".to_owned()));
    assert_eq!(spec.to_rgba(), Color::rgba(0, 128, 255, 1.0));
}

#[test]
fn component_count_is_checked_on_construction() {
    assert!("extended-srgb:0.1,0.2".parse::<ColorSpecifier>().is_err());
    assert!("extended-srgb:0.1,0.2,0.3,1,1".parse::<ColorSpecifier>().is_err());
    assert!("extended-gray:0.1,0.2,0.3,1,1".parse::<ColorSpecifier>().is_err());
    assert!("extended-srgb:a,b,c".parse::<ColorSpecifier>().is_err());
    assert!("0.1,0.2,0.3".parse::<ColorSpecifier>().is_err());
    assert!(ColorSpecifier::new(ColorSpace::DisplayP3, &[0.1], 1.0).is_err());
}

#[test]
fn lenient_parse_recovers_with_black() {
    let spec = ColorSpecifier::parse_lenient("not a color");
    assert_eq!(spec.to_rgba(), Color::rgba(0, 0, 0, 1.0));
}

#[test]
fn lighten_offsets_red_and_green_only() {
    assert_eq!(
        Color::rgba(200, 200, 200, 1.0).lighten(),
        Color::rgba(255, 233, 200, 1.0)
    );
    assert_eq!(
        Color::rgba(10, 20, 30, 0.5).lighten(),
        Color::rgba(104, 53, 30, 0.5)
    );
}

#[test]
fn serde_round_trips_through_string_form() {
    let spec: ColorSpecifier = serde_json::from_str("\"display-p3:0.25,0.5,0.75,1\"").unwrap();
    assert_eq!(spec.space(), ColorSpace::DisplayP3);
    let json = serde_json::to_string(&spec).unwrap();
    assert_eq!(json, "\"display-p3:0.25,0.5,0.75,1\"");
}

#[test]
fn css_notation_matches_svg_fill_form() {
    assert_eq!(
        Color::rgba(1, 2, 3, 0.5).to_css(),
        "rgba(1, 2, 3, 0.5)"
    );
}

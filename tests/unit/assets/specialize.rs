use super::*;

const RED: Color = Color::rgba(255, 0, 0, 1.0);

fn layer(json: &str) -> Layer {
    serde_json::from_str(json).unwrap()
}

#[test]
fn solid_fill_replaces_and_inserts() {
    let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><g><path d="M0 0h10v10z" fill="#00ff00"/><rect width="2" height="2"/></g><text>t</text></svg>"##;
    let out = specialize(markup, FillOverride::Solid(RED));
    assert_eq!(
        out,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><g fill="rgba(255, 0, 0, 1)"><path d="M0 0h10v10z" fill="rgba(255, 0, 0, 1)"/><rect fill="rgba(255, 0, 0, 1)" width="2" height="2"/></g><text>t</text></svg>"##
    );
    // The result still parses.
    roxmltree::Document::parse(&out).unwrap();
}

#[test]
fn self_closing_tag_without_attributes_gets_fill() {
    let out = specialize(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><circle/></svg>"#,
        FillOverride::Solid(RED),
    );
    assert_eq!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg"><circle fill="rgba(255, 0, 0, 1)"/></svg>"#
    );
}

#[test]
fn preserve_leaves_markup_borrowed() {
    let markup = r#"<svg xmlns="http://www.w3.org/2000/svg"><path fill="blue"/></svg>"#;
    assert!(matches!(
        specialize(markup, FillOverride::Preserve),
        Cow::Borrowed(_)
    ));
}

#[test]
fn malformed_markup_is_returned_unchanged() {
    let markup = "<svg><path fill='red'></svg";
    let out = specialize(markup, FillOverride::Solid(RED));
    assert_eq!(out, markup);
}

#[test]
fn markup_without_fillable_elements_is_unchanged() {
    let markup = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>hi</text></svg>"#;
    assert!(matches!(
        specialize(markup, FillOverride::Solid(RED)),
        Cow::Borrowed(_)
    ));
}

#[test]
fn automatic_specialization_preserves_by_default() {
    let l = layer(
        r#"{"image-name":"a.svg","fill":{"solid":"extended-srgb:1,0,0,1"},
            "fill-specializations":[{"value":"automatic"}]}"#,
    );
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::Preserve),
        FillOverride::Preserve
    );
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::ForceOpaqueBlack),
        FillOverride::Solid(Color::rgba(0, 0, 0, 1.0))
    );
}

#[test]
fn none_specialization_behaves_like_automatic() {
    let l = layer(r#"{"image-name":"a.svg","fill-specializations":[{"value":"none"}]}"#);
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::Preserve),
        FillOverride::Preserve
    );
}

#[test]
fn solid_fill_applies_without_keyword_specialization() {
    let l = layer(r#"{"image-name":"a.svg","fill":{"solid":"extended-srgb:1,0,0,1"}}"#);
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::Preserve),
        FillOverride::Solid(RED)
    );

    let l = layer(
        r#"{"image-name":"a.svg","fill":{"solid":"extended-srgb:1,0,0,1"},
            "fill-specializations":[{"appearance":"dark","value":{"solid":"extended-gray:1,1"}}]}"#,
    );
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::Preserve),
        FillOverride::Solid(RED)
    );
}

#[test]
fn layer_without_fill_is_preserved() {
    let l = layer(r#"{"image-name":"a.svg","fill":"automatic"}"#);
    assert_eq!(
        FillOverride::for_layer(&l, AutomaticFillPolicy::ForceOpaqueBlack),
        FillOverride::Preserve
    );
}

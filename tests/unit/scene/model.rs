use super::*;
use crate::scene::color::ColorSpace;

#[test]
fn minimal_document_defaults_to_automatic_fill() {
    let doc = IconDocument::from_json(r#"{"groups":[]}"#).unwrap();
    assert_eq!(doc.fill, Fill::Automatic);
    assert!(doc.groups.is_empty());
}

#[test]
fn missing_groups_is_a_hard_error() {
    let err = IconDocument::from_json(r#"{"fill":"automatic"}"#).unwrap_err();
    assert!(matches!(err, IconError::Serde(_)));
    assert!(IconDocument::from_slice(b"not json").is_err());
}

#[test]
fn fill_forms_parse() {
    let f: Fill = serde_json::from_str(r#""automatic""#).unwrap();
    assert_eq!(f, Fill::Automatic);
    let f: Fill = serde_json::from_str(r#""none""#).unwrap();
    assert_eq!(f, Fill::None);
    let f: Fill =
        serde_json::from_str(r#"{"automatic-gradient":"extended-srgb:0.1,0.2,0.3,1"}"#).unwrap();
    assert!(matches!(f, Fill::AutomaticGradient(ref c) if c.space() == ColorSpace::ExtendedSrgb));
    let f: Fill = serde_json::from_str(
        r#"{"linear-gradient":["display-p3:1,0,0,1","extended-gray:0.5,1"]}"#,
    )
    .unwrap();
    match f {
        Fill::LinearGradient(stops) => {
            assert_eq!(stops.len(), 2);
            assert_eq!(stops[1].space(), ColorSpace::ExtendedGray);
        }
        other => panic!("unexpected fill {other:?}"),
    }
    let f: Fill = serde_json::from_str(r#"{"solid":"extended-srgb:1,1,1,1"}"#).unwrap();
    assert!(matches!(f, Fill::Solid(_)));
}

#[test]
fn unrecognized_fill_falls_back_to_automatic() {
    let f: Fill = serde_json::from_str(r#""sparkly""#).unwrap();
    assert_eq!(f, Fill::Automatic);
    let f: Fill = serde_json::from_str(r#"{"pattern":"x"}"#).unwrap();
    assert_eq!(f, Fill::Automatic);
}

#[test]
fn fill_serializes_back_to_json_forms() {
    assert_eq!(serde_json::to_string(&Fill::None).unwrap(), r#""none""#);
    let solid = Fill::Solid(ColorSpecifier::srgb(1.0, 0.0, 0.0));
    assert_eq!(
        serde_json::to_string(&solid).unwrap(),
        r#"{"solid":"extended-srgb:1,0,0,1"}"#
    );
}

#[test]
fn layer_fields_use_kebab_case_and_defaults() {
    let doc = IconDocument::from_json(
        r#"{
            "fill": {"solid": "extended-srgb:0,0,1,1"},
            "groups": [{
                "shadow": {"kind": "neutral"},
                "layers": [
                    {"name": "a", "image-name": "a.svg", "blend-mode": "multiply",
                     "position": {"scale": 0.5, "translation-in-points": [10, -4]},
                     "fill": {"solid": "extended-srgb:1,0,0,1"},
                     "fill-specializations": [{"value": "automatic"}]},
                    {"image-name": "b.png", "hidden": true}
                ]
            }]
        }"#,
    )
    .unwrap();
    let group = &doc.groups[0];
    assert_eq!(group.shadow.as_ref().map(ShadowSpec::opacity), Some(0.5));

    let a = &group.layers[0];
    assert_eq!(a.image_name, "a.svg");
    assert_eq!(a.blend_mode.as_deref(), Some("multiply"));
    assert_eq!(a.scale(), 0.5);
    assert_eq!(a.translation_in_points(), [10.0, -4.0]);
    assert!(a.solid_fill().is_some());
    assert_eq!(a.first_specialization_keyword(), Some("automatic"));

    let b = &group.layers[1];
    assert!(b.hidden);
    assert_eq!(b.scale(), 1.0);
    assert_eq!(b.translation_in_points(), [0.0, 0.0]);
    assert!(b.solid_fill().is_none());
    assert_eq!(b.first_specialization_keyword(), None);
}

#[test]
fn explicit_shadow_opacity_is_kept() {
    let s: ShadowSpec = serde_json::from_str(r#"{"opacity": 0.2}"#).unwrap();
    assert_eq!(s.opacity(), 0.2);
    let s: ShadowSpec = serde_json::from_str(r#"{"opacity": 0}"#).unwrap();
    assert_eq!(s.opacity(), 0.0);
}

#[test]
fn non_string_specialization_value_is_not_a_keyword() {
    let layer: Layer = serde_json::from_str(
        r#"{"image-name":"x.svg","fill-specializations":[{"value":{"solid":"extended-srgb:1,1,1,1"}}]}"#,
    )
    .unwrap();
    assert_eq!(layer.first_specialization_keyword(), None);
}

#[test]
fn zero_scale_is_treated_as_unset() {
    let layer: Layer =
        serde_json::from_str(r#"{"image-name":"x.png","position":{"scale":0}}"#).unwrap();
    assert_eq!(layer.scale(), 1.0);
}

use super::*;

#[test]
fn defaults_match_canonical_output() {
    let opts = RenderOpts::default();
    assert_eq!(opts.size, 2048);
    assert_eq!(opts.automatic_fill, AutomaticFillPolicy::Preserve);
    assert!(opts.parallel_decode);
    opts.validate().unwrap();
}

#[test]
fn corner_radius_follows_size() {
    assert_eq!(RenderOpts::default().corner_radius(), 627.0);
    assert_eq!(RenderOpts::default().with_size(64).corner_radius(), 20.0);
}

#[test]
fn builders_set_fields() {
    let opts = RenderOpts::default()
        .with_size(256)
        .with_parallel_decode(false)
        .with_automatic_fill(AutomaticFillPolicy::ForceOpaqueBlack);
    assert_eq!(opts.canvas(), Canvas::square(256));
    assert!(!opts.parallel_decode);
    assert_eq!(opts.automatic_fill, AutomaticFillPolicy::ForceOpaqueBlack);
}

#[test]
fn size_is_validated() {
    assert!(RenderOpts::default().with_size(0).validate().is_err());
    assert!(RenderOpts::default().with_size(70_000).validate().is_err());
    assert!(RenderOpts::default().with_size(65_535).validate().is_ok());
}

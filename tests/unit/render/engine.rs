use std::io::Cursor;

use super::*;
use crate::assets::store::AssetStore;

const RECT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="120"><rect width="120" height="120" fill="#000"/></svg>"##;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn doc(json: &str) -> IconDocument {
    IconDocument::from_json(json).unwrap()
}

fn engine(size: u32) -> CompositionEngine {
    CompositionEngine::new(RenderOpts::default().with_size(size)).unwrap()
}

#[test]
fn invalid_size_is_rejected_up_front() {
    assert!(CompositionEngine::new(RenderOpts::default().with_size(0)).is_err());
}

#[test]
fn empty_document_renders_automatic_background() {
    let mut e = engine(64);
    let frame = e.render(&doc(r#"{"groups":[]}"#), &AssetStore::new()).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    let top = frame.pixel(32, 0).unwrap();
    let bottom = frame.pixel(32, 63).unwrap();
    assert_eq!(top, [255, 255, 255, 255]);
    assert_eq!(bottom, [235, 235, 235, 255]);
}

#[test]
fn solid_layer_fill_recolors_vector_asset() {
    let mut store = AssetStore::new();
    store.insert_vector("glyph.svg", RECT_SVG);
    let d = doc(
        r#"{"fill":{"solid":"extended-srgb:1,1,1,1"},"groups":[{"layers":[
            {"name":"glyph","image-name":"glyph.svg","fill":{"solid":"extended-srgb:1,0,0,1"},
             "position":{"scale":0.1,"translation-in-points":[0,0]}}
        ]}]}"#,
    );
    let mut e = engine(64);
    let frame = e.render(&d, &store).unwrap();
    assert_eq!(frame.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(10, 32), Some([255, 255, 255, 255]));
}

#[test]
fn parallel_and_sequential_decode_agree() {
    let mut store = AssetStore::new();
    store.insert_vector("glyph.svg", RECT_SVG);
    store.insert_raster("dot.png", png(8, 8, [0, 128, 255, 255]));
    let d = doc(
        r#"{"groups":[{"shadow":{"kind":"neutral","opacity":0.5},"layers":[
            {"name":"dot","image-name":"dot.png","position":{"scale":2,"translation-in-points":[4,4]}},
            {"name":"glyph","image-name":"glyph.svg","blend-mode":"multiply","position":{"scale":0.15}}
        ]}]}"#,
    );

    let mut par = CompositionEngine::new(RenderOpts::default().with_size(64)).unwrap();
    let mut seq =
        CompositionEngine::new(RenderOpts::default().with_size(64).with_parallel_decode(false))
            .unwrap();
    let a = par.render(&d, &store).unwrap().clone();
    let b = seq.render(&d, &store).unwrap().clone();
    assert_eq!(a, b);
}

#[test]
fn undecodable_raster_is_skipped() {
    let mut truncated = png(4, 4, [255, 0, 0, 255]);
    truncated.truncate(40);
    let mut store = AssetStore::new();
    store.insert_raster("bad.png", truncated);
    let d = doc(
        r#"{"fill":{"solid":"extended-srgb:0,0,1,1"},"groups":[{"layers":[
            {"name":"bad","image-name":"bad.png","position":{"scale":4}}
        ]}]}"#,
    );

    let mut e = engine(64);
    let plan = e.plan(&d, &store).unwrap();
    let sources = prepare_sources(&plan, &store, false);
    assert_eq!(sources.len(), plan.sources.len());
    assert!(sources.iter().all(Option::is_none));

    let frame = e.render(&d, &store).unwrap();
    assert_eq!(frame.pixel(32, 32), Some([0, 0, 255, 255]));
}

#[test]
fn vector_layer_far_larger_than_canvas_is_drawn() {
    let mut store = AssetStore::new();
    store.insert_vector(
        "big.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="1024" height="1024"><rect width="1024" height="1024" fill="red"/></svg>"#,
    );
    let d = doc(
        r#"{"fill":{"solid":"extended-srgb:0,0,1,1"},"groups":[{"layers":[
            {"name":"big","image-name":"big.svg","position":{"scale":9}}
        ]}]}"#,
    );

    let mut e = engine(64);
    let plan = e.plan(&d, &store).unwrap();
    let sources = prepare_sources(&plan, &store, false);
    let image = sources[0].as_ref().unwrap();
    assert_eq!((image.width, image.height), (64, 64));

    let frame = e.render(&d, &store).unwrap();
    assert_eq!(frame.pixel(32, 32), Some([255, 0, 0, 255]));
}

#[test]
fn off_canvas_vector_layer_is_skipped() {
    let mut store = AssetStore::new();
    store.insert_vector("glyph.svg", RECT_SVG);
    let d = doc(
        r#"{"fill":{"solid":"extended-srgb:0,0,1,1"},"groups":[{"layers":[
            {"name":"glyph","image-name":"glyph.svg","position":{"scale":0.1,"translation-in-points":[500,0]}}
        ]}]}"#,
    );

    let mut e = engine(64);
    let plan = e.plan(&d, &store).unwrap();
    assert!(prepare_sources(&plan, &store, false)[0].is_none());
    assert_eq!(e.render(&d, &store).unwrap().pixel(32, 32), Some([0, 0, 255, 255]));
}

#[test]
fn renders_are_independent() {
    let mut store = AssetStore::new();
    store.insert_raster("dot.png", png(4, 4, [0, 0, 0, 255]));
    let with_layer = doc(
        r#"{"groups":[{"layers":[{"name":"dot","image-name":"dot.png","position":{"scale":4}}]}]}"#,
    );
    let empty = doc(r#"{"groups":[]}"#);

    let mut e = engine(64);
    let first = e.render(&empty, &store).unwrap().clone();
    e.render(&with_layer, &store).unwrap();
    let again = e.render(&empty, &store).unwrap().clone();
    assert_eq!(first, again);
}

#[test]
fn render_png_matches_export_of_frame() {
    let mut e = engine(32);
    let d = doc(r#"{"groups":[]}"#);
    let bytes = e.render_png(&d, &AssetStore::new()).unwrap();
    let frame = e.render(&d, &AssetStore::new()).unwrap().clone();
    assert_eq!(bytes, export_png(&frame, e.opts()).unwrap());
}

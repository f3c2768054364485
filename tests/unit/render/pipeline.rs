use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::{
    assets::{decode::PreparedImage, source::AssetResolver},
    foundation::core::Canvas,
    foundation::error::OverprintError,
    scene::{
        color::Color,
        model::{ImageSource, Overlay, OverlayShape},
    },
};

fn fonts() -> FontLibrary {
    let p = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans.ttf");
    let mut lib = FontLibrary::new();
    lib.insert("Arial", std::fs::read(p).unwrap()).unwrap();
    lib
}

fn solid_overlay(rgba: [u8; 4], x: f64, y: f64, w: f64, h: f64) -> Overlay {
    Overlay {
        source: ImageSource::Decoded(PreparedImage {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new(rgba.repeat(4)),
        }),
        x,
        y,
        width: w,
        height: h,
        shape: OverlayShape::Rectangle,
    }
}

#[test]
fn background_covers_the_whole_surface() {
    let scene = Scene::new(Canvas::new(4, 3).unwrap(), Color::rgb(0x1e, 0x1e, 0x1e));
    let mut r = Renderer::new(FontLibrary::new());
    let s = r
        .render_scene(&scene, &AssetResolver::default(), DecodePolicy::FailFast)
        .unwrap();
    assert!(
        s.data()
            .chunks_exact(4)
            .all(|px| px == [0x1e, 0x1e, 0x1e, 255])
    );
}

#[test]
fn text_paints_above_overlays() {
    let mut scene = Scene::new(Canvas::new(120, 60).unwrap(), Color::BLACK);
    scene
        .overlays
        .push(solid_overlay([255, 0, 0, 255], 0.0, 0.0, 120.0, 60.0));
    scene.text.content = "HI".to_owned();
    scene.text.font_size = 32.0;
    scene.text.gradient_start = Color::rgb(0, 0, 255);
    scene.text.gradient_end = Color::rgb(0, 0, 255);

    let mut r = Renderer::new(fonts());
    let s = r
        .render_scene(&scene, &AssetResolver::default(), DecodePolicy::FailFast)
        .unwrap();
    assert!(s.data().chunks_exact(4).any(|px| px == [0, 0, 255, 255]));
    assert_eq!(s.pixel(1, 1).unwrap(), [255, 0, 0, 255]);
}

#[test]
fn decode_policy_controls_failed_overlays() {
    let mut scene = Scene::new(Canvas::new(10, 10).unwrap(), Color::WHITE);
    scene
        .overlays
        .push(solid_overlay([0, 0, 0, 255], 0.0, 0.0, 10.0, 10.0));
    scene.overlays.push(Overlay {
        source: ImageSource::DataUri("data:image/png;base64,AAAA".to_owned()),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        shape: OverlayShape::Circle,
    });

    let mut r = Renderer::new(FontLibrary::new());
    let loader = AssetResolver::default();
    let s = r
        .render_scene(&scene, &loader, DecodePolicy::SkipFailed)
        .unwrap();
    assert_eq!(s.pixel(5, 5).unwrap(), [0, 0, 0, 255]);

    let err = r
        .render_scene(&scene, &loader, DecodePolicy::FailFast)
        .unwrap_err();
    assert!(matches!(err, OverprintError::Decode(_)));
}

#[test]
fn rendering_is_deterministic() {
    let mut scene = Scene::new(Canvas::new(80, 40).unwrap(), Color::rgb(10, 20, 30));
    scene
        .overlays
        .push(solid_overlay([0, 200, 0, 255], 5.5, 3.25, 30.0, 20.0));
    scene.text.content = "ab\ncd".to_owned();

    let mut r = Renderer::new(fonts());
    let resolved = prepare(&scene, &AssetResolver::default(), DecodePolicy::FailFast).unwrap();
    let a = r.render(&resolved).unwrap();
    let b = r.render(&resolved).unwrap();
    assert_eq!(a, b);
}

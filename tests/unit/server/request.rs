use std::io::Cursor;

use base64::Engine as _;

use super::*;
use crate::assets::source::AssetResolver;

fn png_data_uri(w: u32, h: u32) -> String {
    let img = image::RgbaImage::from_raw(w, h, [10, 20, 30, 255].repeat((w * h) as usize))
        .unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf)
    )
}

#[test]
fn empty_body_uses_defaults() {
    let req = GenerateRequest::from_json(b"{}").unwrap();
    let scene = req
        .to_scene(&OverprintConfig::default(), &AssetResolver::default())
        .unwrap();
    assert_eq!((scene.canvas.width, scene.canvas.height), (1080, 1080));
    assert_eq!(scene.background, Color::BLACK);
    assert_eq!(scene.text.gradient_start, Color::WHITE);
    assert_eq!(scene.text.gradient_end, Color::WHITE);
    assert_eq!(scene.text.font_size, 40.0);
    assert_eq!(scene.text.font_family, "Arial");
    assert_eq!(scene.text.baseline, TextBaseline::Middle);
    assert_eq!(scene.text.anchor, TextAnchor::CanvasCenter { offset_y: 30.0 });
    assert!(scene.text.shadow.is_none());
    assert!(scene.overlays.is_empty());
}

#[test]
fn falsy_values_fall_back_like_the_form() {
    let req = GenerateRequest::from_json(
        br#"{ "backgroundColor": "", "fontSize": 0, "fontFamily": " ", "fontColor": "red" }"#,
    )
    .unwrap();
    let scene = req
        .to_scene(&OverprintConfig::default(), &AssetResolver::default())
        .unwrap();
    assert_eq!(scene.background, Color::BLACK);
    assert_eq!(scene.text.font_size, 40.0);
    assert_eq!(scene.text.font_family, "Arial");
    assert_eq!(scene.text.gradient_start, Color::rgb(255, 0, 0));
}

#[test]
fn overlay_is_centered_above_the_text_and_capped() {
    let cfg = OverprintConfig::default();
    let req = GenerateRequest {
        overlay_image: Some(png_data_uri(300, 250)),
        ..GenerateRequest::default()
    };
    let scene = req.to_scene(&cfg, &AssetResolver::default()).unwrap();
    let o = &scene.overlays[0];
    assert_eq!((o.width, o.height), (200.0, 200.0));
    assert_eq!((o.x, o.y), (440.0, 340.0));
    assert_eq!(o.shape, OverlayShape::Circle);

    let small = GenerateRequest {
        overlay_image: Some(png_data_uri(40, 60)),
        ..GenerateRequest::default()
    };
    let scene = small.to_scene(&cfg, &AssetResolver::default()).unwrap();
    assert_eq!(scene.overlays[0].width, 40.0);
    assert_eq!(scene.overlays[0].x, 520.0);
    assert_eq!(scene.overlays[0].y, 500.0);
}

#[test]
fn bad_inputs_are_client_errors() {
    let cfg = OverprintConfig::default();
    let loader = AssetResolver::default();

    let err = GenerateRequest::from_json(b"{ nope").unwrap_err();
    assert!(err.is_client_error());

    let bad_color = GenerateRequest {
        background_color: Some("not-a-color".to_owned()),
        ..GenerateRequest::default()
    };
    assert!(bad_color.to_scene(&cfg, &loader).unwrap_err().is_client_error());

    let bad_family = GenerateRequest {
        font_family: Some("Comic Sans MS".to_owned()),
        ..GenerateRequest::default()
    };
    let err = bad_family.to_scene(&cfg, &loader).unwrap_err();
    assert!(matches!(err, OverprintError::InvalidScene(_)));

    let bad_image = GenerateRequest {
        overlay_image: Some("data:image/png;base64,AAAA".to_owned()),
        ..GenerateRequest::default()
    };
    let err = bad_image.to_scene(&cfg, &loader).unwrap_err();
    assert!(matches!(err, OverprintError::Decode(_)));
}

#[test]
fn references_are_classified_by_prefix() {
    assert!(matches!(image_reference("data:image/png;base64,x"), ImageSource::DataUri(_)));
    assert!(matches!(image_reference(" https://x/y.png "), ImageSource::Url(_)));
    assert!(matches!(image_reference("logo.png"), ImageSource::Path(_)));
}

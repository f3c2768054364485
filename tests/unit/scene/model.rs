use super::*;

fn scene_with_overlay(width: f64, height: f64) -> Scene {
    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.overlays.push(Overlay {
        source: ImageSource::Path("a.png".to_owned()),
        x: -20.0,
        y: 400.0,
        width,
        height,
        shape: OverlayShape::Circle,
    });
    scene
}

#[test]
fn default_scene_is_valid() {
    Scene::new(Canvas::EXPORT, Color::BLACK).validate().unwrap();
}

#[test]
fn lines_split_on_every_break_style_and_keep_empty_lines() {
    let text = TextBlock {
        content: "a\n\nb\r\nc\rd".to_owned(),
        ..TextBlock::default()
    };
    assert_eq!(text.lines(), vec!["a", "", "b", "c", "d"]);

    let trailing = TextBlock {
        content: "x\n".to_owned(),
        ..TextBlock::default()
    };
    assert_eq!(trailing.lines(), vec!["x", ""]);
}

#[test]
fn percent_anchor_maps_to_canvas_pixels() {
    let p = TextAnchor::Percent { x: 10.0, y: 50.0 }.origin(Canvas::PREVIEW);
    assert_eq!((p.x, p.y), (50.0, 150.0));

    let c = TextAnchor::CanvasCenter { offset_y: 30.0 }.origin(Canvas::EXPORT);
    assert_eq!((c.x, c.y), (540.0, 570.0));
}

#[test]
fn out_of_range_fields_are_rejected() {
    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.text.anchor = TextAnchor::Percent { x: 101.0, y: 0.0 };
    assert!(matches!(
        scene.validate(),
        Err(OverprintError::InvalidScene(_))
    ));

    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.text.font_size = 0.0;
    assert!(scene.validate().is_err());

    for size in [MAX_TEXT_SIZE_PX + 1.0, 1e40, f64::MAX] {
        let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
        scene.text.font_size = size;
        assert!(
            matches!(scene.validate(), Err(OverprintError::InvalidScene(_))),
            "fontSize {size}"
        );
    }
    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.text.font_size = MAX_TEXT_SIZE_PX;
    scene.validate().unwrap();

    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.text.font_family = "Comic Sans MS".to_owned();
    assert!(scene.validate().is_err());

    let mut scene = Scene::new(Canvas::PREVIEW, Color::BLACK);
    scene.text.max_width = Some(f64::NAN);
    assert!(scene.validate().is_err());

    assert!(scene_with_overlay(0.0, 10.0).validate().is_err());
}

#[test]
fn overlays_may_sit_outside_the_canvas() {
    scene_with_overlay(50.0, 80.0).validate().unwrap();
}

#[test]
fn circle_clip_uses_shorter_side() {
    let scene = scene_with_overlay(50.0, 80.0);
    let overlay = &scene.overlays[0];
    let (center, radius) = overlay.shape.clip_circle(overlay.rect()).unwrap();
    assert_eq!((center.x, center.y), (5.0, 440.0));
    assert_eq!(radius, 25.0);
    assert_eq!(OverlayShape::Rectangle.clip_circle(overlay.rect()), None);
}

#[test]
fn negative_canvas_width_in_json_is_invalid_scene() {
    let err = Scene::from_json(r#"{"canvas":{"width":-5,"height":10}}"#).unwrap_err();
    assert!(matches!(err, OverprintError::InvalidScene(_)));

    let err = Scene::from_json(r#"{"canvas":{"width":0,"height":10}}"#).unwrap_err();
    assert!(matches!(err, OverprintError::InvalidScene(_)));
}

#[test]
fn json_round_trip_keeps_overlay_order() {
    let json = r##"{
        "canvas": {"width": 200, "height": 100},
        "backgroundColor": "#112233",
        "text": {"content": "hi", "textAlign": "right", "anchor": {"kind": "percent", "x": 10, "y": 20}},
        "overlays": [
            {"imageSource": {"path": "a.png"}, "x": 0, "y": 0, "width": 10, "height": 10},
            {"imageSource": {"dataUri": "data:image/png;base64,AA=="}, "x": 5, "y": 5, "width": 10, "height": 10, "shape": "circle"}
        ]
    }"##;
    let scene = Scene::from_json(json).unwrap();
    assert_eq!(scene.background, Color::rgb(0x11, 0x22, 0x33));
    assert_eq!(scene.text.align, TextAlign::Right);
    assert!(matches!(scene.overlays[0].source, ImageSource::Path(_)));
    assert!(matches!(scene.overlays[1].source, ImageSource::DataUri(_)));
    assert_eq!(scene.overlays[1].shape, OverlayShape::Circle);

    let back = serde_json::to_string(&scene).unwrap();
    let again = Scene::from_json(&back).unwrap();
    assert!(matches!(again.overlays[0].source, ImageSource::Path(_)));
    assert_eq!(again.overlays.len(), 2);
}

#[test]
fn shadow_visibility_requires_color_and_displacement() {
    let mut s = Shadow {
        color: Color::rgba(0, 0, 0, 128),
        blur: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
    assert!(!s.is_visible());
    s.offset_x = 2.0;
    assert!(s.is_visible());
    s.color = Color::TRANSPARENT;
    assert!(!s.is_visible());
}

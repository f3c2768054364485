use super::*;
use crate::foundation::core::Canvas;

fn scene(content: &str) -> Scene {
    let mut s = Scene::new(Canvas::PREVIEW, Color::BLACK);
    s.text.content = content.to_owned();
    s
}

#[test]
fn fingerprint_is_deterministic_for_same_scene() {
    let a = scene("hello");
    assert_eq!(fingerprint_scene(&a), fingerprint_scene(&a.clone()));
}

#[test]
fn fingerprint_changes_when_scene_changes() {
    assert_ne!(
        fingerprint_scene(&scene("hello")),
        fingerprint_scene(&scene("hellO"))
    );

    let mut moved = scene("hello");
    moved.text.anchor = TextAnchor::Percent { x: 10.0, y: 50.0 };
    assert_ne!(fingerprint_scene(&scene("hello")), fingerprint_scene(&moved));
}

#[test]
fn overlay_order_is_part_of_the_fingerprint() {
    let a = Overlay {
        source: ImageSource::Path("a.png".to_owned()),
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 10.0,
        shape: OverlayShape::Rectangle,
    };
    let b = Overlay {
        source: ImageSource::Path("b.png".to_owned()),
        ..a.clone()
    };

    let mut ab = scene("");
    ab.overlays = vec![a.clone(), b.clone()];
    let mut ba = scene("");
    ba.overlays = vec![b, a];
    assert_ne!(fingerprint_scene(&ab), fingerprint_scene(&ba));
}

#[test]
fn inert_max_width_does_not_change_fingerprint() {
    let a = scene("x");
    let mut b = scene("x");
    b.text.max_width = Some(90.0);
    assert_eq!(fingerprint_scene(&a), fingerprint_scene(&b));
}

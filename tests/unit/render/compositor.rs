use super::*;
use crate::{
    foundation::core::{Canvas, Rect},
    scene::{color::Color, model::OverlayShape},
};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(rgba.repeat((w * h) as usize)),
    }
}

fn overlay(rect: Rect, rgba: [u8; 4], shape: OverlayShape) -> ResolvedOverlay {
    ResolvedOverlay {
        index: 0,
        image: solid(4, 4, rgba),
        rect,
        shape,
    }
}

fn black_surface(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(Canvas::new(w, h).unwrap()).unwrap();
    s.fill(Color::BLACK.to_premul());
    s
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn image_is_scaled_into_its_box() {
    let mut s = black_surface(40, 40);
    let o = overlay(
        Rect::new(10.0, 10.0, 30.0, 30.0),
        [255, 0, 0, 255],
        OverlayShape::Rectangle,
    );
    draw_overlay(&mut s, &o).unwrap();
    assert!(close(s.pixel(20, 20).unwrap(), [255, 0, 0, 255]));
    assert!(close(s.pixel(11, 28).unwrap(), [255, 0, 0, 255]));
    assert_eq!(s.pixel(5, 5).unwrap(), [0, 0, 0, 255]);
    assert_eq!(s.pixel(35, 20).unwrap(), [0, 0, 0, 255]);
}

#[test]
fn later_overlays_paint_over_earlier_ones() {
    let mut s = black_surface(40, 40);
    let overlays = [
        overlay(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            [255, 0, 0, 255],
            OverlayShape::Rectangle,
        ),
        overlay(
            Rect::new(5.0, 5.0, 15.0, 15.0),
            [0, 0, 255, 255],
            OverlayShape::Rectangle,
        ),
    ];
    draw_overlays(&mut s, &overlays).unwrap();
    assert!(close(s.pixel(10, 10).unwrap(), [0, 0, 255, 255]));
    assert!(close(s.pixel(2, 2).unwrap(), [255, 0, 0, 255]));
}

#[test]
fn circle_clip_leaves_box_corners_untouched() {
    let mut s = black_surface(40, 40);
    let o = overlay(
        Rect::new(0.0, 0.0, 40.0, 40.0),
        [0, 255, 0, 255],
        OverlayShape::Circle,
    );
    draw_overlay(&mut s, &o).unwrap();
    assert_eq!(s.pixel(0, 0).unwrap(), [0, 0, 0, 255]);
    assert_eq!(s.pixel(39, 39).unwrap(), [0, 0, 0, 255]);
    assert_eq!(s.pixel(2, 37).unwrap(), [0, 0, 0, 255]);
    assert!(close(s.pixel(20, 20).unwrap(), [0, 255, 0, 255]));
}

#[test]
fn offscreen_overlays_are_ignored() {
    let mut s = black_surface(10, 10);
    let before = s.clone();
    let o = overlay(
        Rect::new(-50.0, -50.0, -10.0, -10.0),
        [255, 255, 255, 255],
        OverlayShape::Rectangle,
    );
    draw_overlay(&mut s, &o).unwrap();
    assert_eq!(s, before);
}

#[test]
fn partially_offscreen_overlays_clip_at_edges() {
    let mut s = black_surface(10, 10);
    let o = overlay(
        Rect::new(-5.0, -5.0, 5.0, 5.0),
        [255, 255, 255, 255],
        OverlayShape::Rectangle,
    );
    draw_overlay(&mut s, &o).unwrap();
    assert!(close(s.pixel(1, 1).unwrap(), [255, 255, 255, 255]));
    assert_eq!(s.pixel(8, 8).unwrap(), [0, 0, 0, 255]);
}

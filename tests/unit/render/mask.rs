use super::*;

#[test]
fn from_alpha_checks_length() {
    let m = CoverageMask::from_alpha(&[1, 2, 3, 40, 5, 6, 7, 80], 2, 1).unwrap();
    assert_eq!(m.data(), &[40, 80]);
    assert!(CoverageMask::from_alpha(&[0; 7], 2, 1).is_err());
}

#[test]
fn translate_moves_and_drops_coverage() {
    let mut m = CoverageMask::new(4, 3);
    m.data_mut()[0] = 200;
    m.data_mut()[5] = 100;

    let t = m.translated(2, 1);
    assert_eq!(t.get(2, 1), 200);
    assert_eq!(t.get(3, 2), 100);
    assert_eq!(t.get(0, 0), 0);

    let back = m.translated(-1, -1);
    assert_eq!(back.get(0, 0), 100);
    assert!(m.translated(10, 0).is_empty());
}

#[test]
fn circle_coverage_is_full_inside_and_zero_outside() {
    let c = Point::new(10.0, 10.0);
    assert_eq!(circle_coverage(c, 5.0, 9, 9), 255);
    assert_eq!(circle_coverage(c, 5.0, 0, 0), 0);
    assert_eq!(circle_coverage(c, 5.0, 16, 9), 0);
    let edge = circle_coverage(c, 5.0, 14, 9);
    assert!(edge > 0 && edge < 255);
}

#[test]
fn clip_clears_corners_of_a_square_layer() {
    let (w, h) = (20u32, 20u32);
    let mut layer = vec![255u8; (w * h * 4) as usize];
    clip_layer_to_circle(&mut layer, w, h, Point::new(10.0, 10.0), 10.0).unwrap();
    let px = |x: u32, y: u32| layer[((y * w + x) * 4 + 3) as usize];
    assert_eq!(px(0, 0), 0);
    assert_eq!(px(19, 19), 0);
    assert_eq!(px(10, 10), 255);
    assert_eq!(px(10, 1), 255);
    assert!(px(10, 0) > 0);

    let mut short = vec![0u8; 12];
    assert!(clip_layer_to_circle(&mut short, 2, 2, Point::ORIGIN, 1.0).is_err());
}

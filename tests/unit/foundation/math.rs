use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn lerp_hits_endpoints_and_clamps() {
    assert_eq!(lerp_u8(10, 200, 0.0), 10);
    assert_eq!(lerp_u8(10, 200, 1.0), 200);
    assert_eq!(lerp_u8(10, 200, 7.0), 200);
    assert_eq!(lerp_u8(10, 200, f64::NAN), 10);
    assert_eq!(lerp_u8(0, 255, 0.5), 128);
}

#[test]
fn opaque_source_replaces_destination() {
    assert_eq!(
        premul_over_px([0, 0, 255, 255], [255, 0, 0, 255]),
        [255, 0, 0, 255]
    );
    assert_eq!(
        premul_over_px([1, 2, 3, 255], [0, 0, 0, 0]),
        [1, 2, 3, 255]
    );
}

#[test]
fn unpremultiply_inverts_half_alpha() {
    assert_eq!(unpremultiply_px([64, 0, 128, 128]), [128, 0, 255, 128]);
    assert_eq!(unpremultiply_px([5, 5, 5, 0]), [0, 0, 0, 0]);
}

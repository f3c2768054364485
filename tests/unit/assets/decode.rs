use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(vec![100u8, 50u8, 200u8, 128u8], 1, 1);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_decode_failures() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, OverprintError::Decode(_)));
}

#[test]
fn data_uri_round_trips_payload() {
    let buf = png_bytes(vec![1, 2, 3, 255], 1, 1);
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    let uri = format!("data:image/png;base64,{b64}");

    let (mime, bytes) = parse_data_uri(&uri).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, buf);
    decode_image(&bytes).unwrap();
}

#[test]
fn malformed_data_uris_are_rejected() {
    assert!(parse_data_uri("image/png;base64,AAAA").is_err());
    assert!(parse_data_uri("data:image/png;base64").is_err());
    assert!(parse_data_uri("data:text/plain,hello").is_err());
    assert!(parse_data_uri("data:image/png;base64,@@@").is_err());
}

#[test]
fn drawable_check_rejects_wide_or_short_buffers() {
    let wide = PreparedImage {
        width: MAX_CANVAS_EDGE + 1,
        height: 1,
        rgba8_premul: Arc::new(vec![0; (MAX_CANVAS_EDGE as usize + 1) * 4]),
    };
    assert!(matches!(wide.check_drawable(), Err(OverprintError::Decode(_))));

    let short = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 12]),
    };
    assert!(matches!(short.check_drawable(), Err(OverprintError::Decode(_))));

    let ok = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 16]),
    };
    assert!(ok.check_drawable().is_ok());
}

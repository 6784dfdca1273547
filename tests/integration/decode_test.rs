//! Decoding paths: plain files, RAW containers with embedded previews,
//! and undecodable input.

use super::common::{config, encode, solid};
use canvasfit::codec::{decode_image, extract_jpegs};
use canvasfit::compose::{ComposeError, Processor};
use image::ImageFormat;
use rstest::rstest;

/// TIFF-like header, a small thumbnail, padding and a larger preview.
fn fake_dng() -> Vec<u8> {
    let mut data = b"II*\0\x08\0\0\0DNGHEADER".to_vec();
    data.extend(encode(&solid(16, 12, [0, 255, 0]), ImageFormat::Jpeg));
    data.extend(std::iter::repeat(0u8).take(64));
    data.extend(encode(&solid(64, 48, [0, 0, 255]), ImageFormat::Jpeg));
    data.extend(b"SENSORDATA");
    data
}

#[rstest]
#[case(ImageFormat::Png, "photo.png")]
#[case(ImageFormat::Jpeg, "photo.jpg")]
#[case(ImageFormat::Png, "no_extension")]
fn test_plain_formats_decode(#[case] format: ImageFormat, #[case] name: &str) {
    let data = encode(&solid(30, 20, [120, 120, 120]), format);
    let img = decode_image(&data, name).unwrap();
    assert_eq!(img.dimensions(), (30, 20));
}

#[test]
fn test_dng_uses_largest_preview() {
    let data = fake_dng();
    assert_eq!(extract_jpegs(&data).len(), 2);

    let img = decode_image(&data, "IMG_0001.DNG").unwrap();
    assert_eq!(img.dimensions(), (64, 48));
}

#[test]
fn test_unknown_extension_falls_back_to_preview() {
    let img = decode_image(&fake_dng(), "upload.bin").unwrap();
    assert_eq!(img.dimensions(), (64, 48));
}

#[test]
fn test_dng_through_processor() {
    let processor = Processor::new(config()).unwrap();
    let out = processor
        .process_bytes(&fake_dng(), "shot.dng", "default", "")
        .unwrap();
    assert_eq!(out.original_size, (64, 48));
    assert_eq!(out.output_size, (400, 400));
}

#[rstest]
#[case(b"definitely not an image".to_vec(), "photo.jpg")]
#[case(b"II*\0 raw without previews".to_vec(), "photo.dng")]
#[case(Vec::new(), "empty.png")]
fn test_undecodable_input_is_user_error(#[case] data: Vec<u8>, #[case] name: &str) {
    let processor = Processor::new(config()).unwrap();
    let err = processor
        .process_bytes(&data, name, "default", "")
        .unwrap_err();
    assert!(matches!(err, ComposeError::DecodeFailed { .. }));
    assert_eq!(err.to_http_status(), 400);
}

#[test]
fn test_bad_profile_reported_before_decoding() {
    let processor = Processor::new(config()).unwrap();
    let err = processor
        .process_bytes(b"garbage", "photo.jpg", "missing", "")
        .unwrap_err();
    assert!(matches!(err, ComposeError::ProfileNotFound { .. }));
}

//! End-to-end composition through the public `Processor` API.
//!
//! Run with:
//!   cargo test --test integration_tests composition

use super::common::{close, config, encode, solid, split};
use canvasfit::compose::{ComposeError, Processor};
use image::{GenericImageView, ImageFormat};

fn processor() -> Processor {
    Processor::new(config()).expect("Test profiles should validate")
}

#[test]
fn test_landscape_photo_on_black_square() {
    let out = processor()
        .process(&solid(200, 100, [255, 0, 0]), "default", "")
        .unwrap();

    assert_eq!(out.image.dimensions(), (400, 400));
    assert_eq!((out.canvas.width, out.canvas.height), (400, 400));
    assert_eq!(out.jpeg_quality, 88);

    // Photo fills the width and is centered vertically
    assert!(close(*out.image.get_pixel(200, 50), [0, 0, 0], 0));
    assert!(close(*out.image.get_pixel(200, 350), [0, 0, 0], 0));
    assert!(close(*out.image.get_pixel(5, 200), [255, 0, 0], 2));
    assert!(close(*out.image.get_pixel(395, 200), [255, 0, 0], 2));
}

#[test]
fn test_padding_and_border() {
    let out = processor()
        .process(&solid(100, 100, [0, 255, 0]), "framed", "")
        .unwrap();

    // 10% padding per side leaves a 40px white margin; the 3px border sits just outside the photo
    assert!(close(*out.image.get_pixel(10, 10), [255, 255, 255], 0));
    assert!(close(*out.image.get_pixel(38, 200), [255, 0, 0], 0));
    assert!(close(*out.image.get_pixel(200, 38), [255, 0, 0], 0));
    assert!(close(*out.image.get_pixel(200, 200), [0, 255, 0], 2));
    assert!(close(*out.image.get_pixel(30, 200), [255, 255, 255], 0));
}

#[test]
fn test_auto_format_picks_closest_ratio() {
    let tall = processor()
        .process(&solid(300, 600, [10, 20, 30]), "adaptive", "")
        .unwrap();
    assert_eq!(tall.image.dimensions(), (400, 500));
    assert_eq!(tall.jpeg_quality, 70);

    let wide = processor()
        .process(&solid(800, 400, [10, 20, 30]), "adaptive", "")
        .unwrap();
    assert_eq!(wide.image.dimensions(), (400, 210));

    let square = processor()
        .process(&solid(500, 480, [10, 20, 30]), "adaptive", "")
        .unwrap();
    assert_eq!(square.image.dimensions(), (400, 400));
}

#[test]
fn test_average_background_matches_flat_photo() {
    let out = processor()
        .process(&solid(100, 100, [40, 80, 120]), "mean", "")
        .unwrap();

    assert_eq!(out.image.dimensions(), (400, 500));
    // Margin above the photo carries the photo's mean color
    assert!(close(*out.image.get_pixel(200, 10), [40, 80, 120], 3));
    assert!(close(*out.image.get_pixel(200, 490), [40, 80, 120], 3));
}

#[test]
fn test_stretch_extends_photo_edges() {
    let out = processor()
        .process(&split(200, 100), "stretched", "")
        .unwrap();

    // Photo occupies rows 100..300; the margins repeat its first and last rows
    assert!(close(*out.image.get_pixel(50, 20), [255, 0, 0], 8));
    assert!(close(*out.image.get_pixel(350, 20), [0, 0, 255], 8));
    assert!(close(*out.image.get_pixel(50, 380), [255, 0, 0], 8));
    assert!(close(*out.image.get_pixel(350, 380), [0, 0, 255], 8));
}

#[test]
fn test_no_upscale_keeps_native_size() {
    let out = processor()
        .process(&solid(100, 50, [200, 100, 50]), "small", "")
        .unwrap();

    // 100x50 centered on 400x400: x 150..250, y 175..225
    assert_eq!(*out.image.get_pixel(150, 175), image::Rgba([200, 100, 50, 255]));
    assert_eq!(*out.image.get_pixel(249, 224), image::Rgba([200, 100, 50, 255]));
    assert_eq!(*out.image.get_pixel(149, 200), image::Rgba([0, 0, 0, 255]));
    assert_eq!(*out.image.get_pixel(200, 225), image::Rgba([0, 0, 0, 255]));
}

#[test]
fn test_watermark_without_style_is_user_error() {
    let err = processor()
        .process(&solid(10, 10, [0, 0, 0]), "default", "© someone")
        .unwrap_err();
    assert!(matches!(err, ComposeError::WatermarkStyleMissing { .. }));
    assert!(err.is_user_error());
    assert_eq!(err.to_http_status(), 400);
}

#[test]
fn test_unknown_profile_is_user_error() {
    let err = processor()
        .process(&solid(10, 10, [0, 0, 0]), "nope", "")
        .unwrap_err();
    assert!(matches!(err, ComposeError::ProfileNotFound { .. }));
    assert_eq!(err.to_http_status(), 400);
}

#[test]
fn test_missing_font_is_internal_error() {
    let processor = processor();
    let src = solid(120, 80, [0, 0, 0]);

    let err = processor.process(&src, "signed", "© someone").unwrap_err();
    assert!(matches!(err, ComposeError::FontLoad { .. }));
    assert_eq!(err.to_http_status(), 500);

    // Same profile without text never touches the font
    assert!(processor.process(&src, "signed", "").is_ok());
}

#[test]
fn test_process_bytes_produces_jpeg() {
    let input = encode(&solid(320, 240, [90, 60, 30]), ImageFormat::Png);
    let out = processor()
        .process_bytes(&input, "photo.png", "default", "")
        .unwrap();

    assert_eq!(out.original_size, (320, 240));
    assert_eq!(out.output_size, (400, 400));
    assert_eq!(out.jpeg_quality, 88);
    assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::Jpeg);

    let decoded = image::load_from_memory(&out.data).unwrap();
    assert_eq!(decoded.dimensions(), (400, 400));
    assert!(close(decoded.to_rgba8().get_pixel(200, 200).to_owned(), [90, 60, 30], 6));
}

#[test]
fn test_processing_is_deterministic() {
    let processor = processor();
    let input = encode(&split(150, 90), ImageFormat::Png);

    let first = processor
        .process_bytes(&input, "a.png", "stretched", "")
        .unwrap();
    let second = processor
        .process_bytes(&input, "a.png", "stretched", "")
        .unwrap();
    assert_eq!(first.data, second.data);
}

#[test]
fn test_processor_shared_across_threads() {
    let processor = processor();
    let src = solid(64, 48, [1, 2, 3]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = ["default", "framed", "mean", "stretched"]
            .into_iter()
            .map(|profile| {
                let processor = &processor;
                let src = &src;
                scope.spawn(move || processor.process(src, profile, "").map(|c| c.canvas))
            })
            .collect();
        for handle in handles {
            let canvas = handle.join().unwrap().unwrap();
            assert!(!canvas.is_empty());
        }
    });
}

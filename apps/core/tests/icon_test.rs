use tcode_helper_core::icon::{load_icon, IconError, IconImage};

#[test]
fn loads_png_as_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]))
        .save(&path)
        .unwrap();

    let icon = load_icon(&path).unwrap();

    assert_eq!((icon.width, icon.height), (4, 3));
    assert_eq!(icon.rgba.len(), 4 * 3 * 4);
    assert_eq!(&icon.rgba[..4], &[10, 20, 30, 255]);
}

#[test]
fn missing_icon_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_icon(&dir.path().join("logo.png"));
    assert!(matches!(result, Err(IconError::Io { .. })));
}

#[test]
fn unreadable_image_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    assert!(matches!(load_icon(&path), Err(IconError::Decode { .. })));
}

#[test]
fn native_pixels_are_bgra_with_alpha_mask() {
    let icon = IconImage {
        rgba: vec![10, 20, 30, 255, 1, 2, 3, 0],
        width: 2,
        height: 1,
    };

    let (mask, bgra) = icon.to_bgra_with_mask();

    assert_eq!(bgra, vec![30, 20, 10, 255, 3, 2, 1, 0]);
    assert_eq!(mask, vec![0, 1]);
}

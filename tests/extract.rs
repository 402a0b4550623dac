use std::io::Cursor;

use dominant_colors::{
    ColorTable, ExtractError, KmeansConfig, MAX_CLUSTERS, MIN_CLUSTERS, NamedColor, PaletteOptions,
    extract_palette, extract_palette_with,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

fn png(img: RgbImage) -> Vec<u8> {
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Smooth gradient with plenty of distinct colors.
fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            (x * 255 / w.max(1)) as u8,
            (y * 255 / h.max(1)) as u8,
            ((x + y) * 127 / (w + h)) as u8,
        ])
    })
}

fn is_lower_hex(hex: &str) -> bool {
    hex.len() == 7
        && hex.starts_with('#')
        && hex[1..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[test]
fn two_by_two_red_and_blue() {
    let img = RgbImage::from_fn(2, 2, |x, _| {
        if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
    });
    let colors = extract_palette(&png(img), 2).unwrap();

    assert_eq!(colors.len(), 2);
    // Equal weights: ties go to the lower RGB triple.
    assert_eq!(colors[0].rgb, [0, 0, 255]);
    assert_eq!(colors[0].hex, "#0000ff");
    assert_eq!(colors[0].name, "Blue");
    assert_eq!(colors[1].rgb, [255, 0, 0]);
    assert_eq!(colors[1].hex, "#ff0000");
    assert_eq!(colors[1].name, "Red");
    assert!(colors.iter().all(|c| (c.weight - 0.5).abs() < 1e-6));
}

#[test]
fn every_valid_count_returns_that_many_entries() {
    let bytes = png(gradient(64, 48));
    for k in MIN_CLUSTERS..=MAX_CLUSTERS {
        let colors = extract_palette(&bytes, k).unwrap();
        assert_eq!(colors.len(), k, "k = {k}");
        assert!(colors.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert!(colors.iter().all(|c| is_lower_hex(&c.hex)));
        let total: f32 = colors.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-4);
    }
}

#[test]
fn hex_matches_rgb() {
    let colors = extract_palette(&png(gradient(32, 32)), 6).unwrap();
    for c in colors {
        let [r, g, b] = c.rgb;
        assert_eq!(c.hex, format!("#{r:02x}{g:02x}{b:02x}"));
    }
}

#[test]
fn solid_image_fills_all_slots_with_same_color() {
    let bytes = png(RgbImage::from_pixel(37, 11, Rgb([0, 128, 0])));
    let colors = extract_palette(&bytes, 3).unwrap();

    assert_eq!(colors.len(), 3);
    assert!(colors.iter().all(|c| c.name == "Green" && c.rgb == [0, 128, 0]));
    let total: f32 = colors.iter().map(|c| c.weight).sum();
    assert!((total - 1.0).abs() < 1e-6);
}

#[test]
fn fixed_seed_is_deterministic() {
    let bytes = png(gradient(80, 60));
    let options = PaletteOptions {
        seed: 1234,
        ..PaletteOptions::default()
    };
    let first = extract_palette_with(&bytes, 7, &options, ColorTable::css3()).unwrap();
    let second = extract_palette_with(&bytes, 7, &options, ColorTable::css3()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn out_of_range_counts_are_rejected() {
    let bytes = png(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])));
    for k in [0, 11] {
        assert!(matches!(
            extract_palette(&bytes, k),
            Err(ExtractError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn zero_bytes_are_a_decode_error() {
    assert!(matches!(extract_palette(&[], 5), Err(ExtractError::Decode(_))));
}

#[test]
fn corrupt_bytes_are_a_decode_error() {
    let mut bytes = png(gradient(16, 16));
    bytes.truncate(40);
    assert!(matches!(extract_palette(&bytes, 5), Err(ExtractError::Decode(_))));
}

#[test]
fn jpeg_input_is_supported() {
    let bytes = encode(DynamicImage::ImageRgb8(gradient(64, 64)), ImageFormat::Jpeg);
    let colors = extract_palette(&bytes, 4).unwrap();
    assert_eq!(colors.len(), 4);
}

#[test]
fn transparent_pixels_keep_their_color() {
    let img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 0, 0]));
    let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
    let colors = extract_palette(&bytes, 1).unwrap();
    assert_eq!(colors[0].name, "Yellow");
}

#[test]
fn large_image_is_downscaled_without_changing_proportions() {
    // Left quarter black, rest white.
    let img = RgbImage::from_fn(1024, 512, |x, _| {
        if x < 256 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    let colors = extract_palette(&png(img), 2).unwrap();
    assert_eq!(colors[0].name, "White");
    assert_eq!(colors[1].name, "Black");
    assert!((colors[0].weight - 0.75).abs() < 0.01);
}

#[test]
fn custom_table_and_options() {
    let table = ColorTable::new(vec![
        NamedColor::new("warm", [200, 60, 40]),
        NamedColor::new("cool", [40, 60, 200]),
    ])
    .unwrap();
    let options = PaletteOptions {
        max_dimension: None,
        seed: 7,
        kmeans: KmeansConfig {
            runs: 3,
            ..KmeansConfig::default()
        },
    };
    let img = RgbImage::from_fn(10, 10, |x, y| {
        let v = ((x + y) % 5) as u8;
        if y < 7 { Rgb([230 + v, 20, 10]) } else { Rgb([10, 20, 230 + v]) }
    });
    let colors = extract_palette_with(&png(img), 2, &options, &table).unwrap();
    assert_eq!(colors[0].name, "Warm");
    assert_eq!(colors[1].name, "Cool");
    assert!((colors[0].weight - 0.7).abs() < 1e-6);
}

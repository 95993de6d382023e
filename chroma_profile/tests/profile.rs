use chroma_profile::{
    ColorCategory, ParallelProfileBuilder, ProfileBuilder, ProfileConfig, ProfileError,
    QuantizedColor, analyze,
};

const SIMILARITY: f64 = 40.0;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    rgba.repeat((width * height) as usize)
}

/// A deterministic pseudo-random RGBA buffer with roughly 1 in 9 pixels transparent.
fn noise(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let mut buffer = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, a] = state.to_le_bytes();
        let alpha = if a % 9 == 0 { a / 2 } else { 255 };
        buffer.extend_from_slice(&[r, g, b, alpha]);
    }
    buffer
}

#[test]
fn single_color_image() {
    let buffer = solid(10, 10, [200, 30, 30, 255]);
    let profile = analyze(&buffer, 10, 10).unwrap();

    assert_eq!(profile.dominant_colors.len(), 1);
    assert_eq!(profile.dominant_colors[0].color, QuantizedColor::new(192, 0, 0));
    assert_eq!(profile.dominant_colors[0].percentage, 100.0);
    assert_eq!(profile.dominant_colors[0].hex(), "#c00000");

    for (category, percentage) in profile.category_distribution.iter() {
        let expected = if category == ColorCategory::Reds { 100.0 } else { 0.0 };
        assert_eq!(percentage, expected, "{category}");
    }

    let histogram = &profile.hue_histogram;
    assert_eq!(histogram.len(), 360);
    let nonzero: Vec<usize> = histogram
        .bins()
        .iter()
        .enumerate()
        .filter(|(_, bin)| bin.count > 0)
        .map(|(hue, _)| hue)
        .collect();
    assert_eq!(nonzero, vec![0]);
    let bin = histogram.bin(0).unwrap();
    assert_eq!(bin.count, 100);
    assert!((bin.saturation - 74.0).abs() < 1e-9);
    assert!((bin.lightness - 45.0).abs() < 1e-9);
}

#[test]
fn fully_transparent_image_yields_empty_profile() {
    let buffer = solid(8, 8, [12, 200, 99, 0]);
    let profile = analyze(&buffer, 8, 8).unwrap();

    assert!(profile.is_empty());
    assert!(profile.dominant_colors.is_empty());
    assert!(profile.category_distribution.is_empty());
    assert_eq!(profile.category_distribution.total(), 0.0);
    assert_eq!(profile.hue_histogram.len(), 360);
    assert_eq!(profile.hue_histogram.max_count(), 0);
    assert_eq!(profile.total_pixels, 64);
}

#[test]
fn bad_buffer_length_fails_without_profile() {
    let buffer = vec![255u8; 10 * 10 * 4 + 4];
    let error = analyze(&buffer, 10, 10).unwrap_err();
    assert!(matches!(error, ProfileError::InputShape { expected: 400, len: 404, .. }));
    assert!(error.to_string().contains("10x10"));
}

#[test]
fn overflowing_dimensions_are_reported() {
    let error = analyze(&[], u32::MAX, u32::MAX).unwrap_err();
    assert!(matches!(error, ProfileError::DimensionOverflow { .. }));
}

#[test]
fn distribution_sums_to_one_hundred_percent() {
    for seed in 0..20 {
        let buffer = noise(31, 17, seed);
        let profile = analyze(&buffer, 31, 17).unwrap();
        assert!(!profile.is_empty());
        let total = profile.category_distribution.total();
        assert!((total - 100.0).abs() < 1e-6, "seed {seed}: {total}");
        assert_eq!(profile.hue_histogram.total_count(), profile.opaque_pixels);
    }
}

#[test]
fn dominant_colors_are_capped_and_distinct() {
    for seed in 0..20 {
        let buffer = noise(40, 40, seed);
        let profile = analyze(&buffer, 40, 40).unwrap();
        let colors = &profile.dominant_colors;
        assert!(colors.len() <= 8);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert!(a.color.distance(&b.color) >= SIMILARITY);
                assert!(a.count >= b.count);
            }
        }
    }
}

#[test]
fn analysis_is_repeatable() {
    let buffer = noise(25, 25, 7);
    let first = analyze(&buffer, 25, 25).unwrap();
    let second = analyze(&buffer, 25, 25).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mixed_image_splits_categories() {
    // Four quadrants: red, blue, white, dark brown.
    let (width, height) = (4, 4);
    let mut buffer = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let rgba = match (x < 2, y < 2) {
                (true, true) => [230, 20, 20, 255],
                (false, true) => [20, 160, 230, 255],
                (true, false) => [250, 250, 250, 255],
                (false, false) => [100, 60, 20, 255],
            };
            buffer.extend_from_slice(&rgba);
        }
    }
    let profile = analyze(&buffer, width, height).unwrap();
    let distribution = &profile.category_distribution;
    assert_eq!(distribution.percentage(ColorCategory::Reds), 25.0);
    assert_eq!(distribution.percentage(ColorCategory::Blues), 25.0);
    assert_eq!(distribution.percentage(ColorCategory::Whites), 25.0);
    assert_eq!(distribution.percentage(ColorCategory::Browns), 25.0);
    assert_eq!(distribution.percentage(ColorCategory::Oranges), 0.0);
    assert_eq!(profile.dominant_colors.len(), 4);
}

#[test]
fn custom_palette_limit() {
    let builder = ProfileBuilder::new(ProfileConfig {
        max_dominant_colors: 2,
        ..ProfileConfig::default()
    });
    let buffer = noise(32, 32, 3);
    let profile = builder.analyze(&buffer, 32, 32).unwrap();
    assert_eq!(profile.dominant_colors.len(), 2);
}

#[tokio::test]
async fn parallel_builder_agrees_with_sequential() {
    let buffer = noise(128, 96, 11);
    let sequential = analyze(&buffer, 128, 96).unwrap();
    let parallel = ParallelProfileBuilder::default()
        .with_workers(3)
        .with_min_shard_pixels(1000)
        .analyze(buffer, 128, 96)
        .await
        .unwrap();

    assert_eq!(parallel.dominant_colors, sequential.dominant_colors);
    assert_eq!(parallel.category_distribution, sequential.category_distribution);
    assert_eq!(parallel.opaque_pixels, sequential.opaque_pixels);
}

#[tokio::test]
async fn parallel_builder_handles_transparent_image() {
    let buffer = solid(300, 300, [0, 0, 0, 0]);
    let profile = ParallelProfileBuilder::default()
        .with_workers(4)
        .analyze(buffer, 300, 300)
        .await
        .unwrap();
    assert!(profile.is_empty());
    assert_eq!(profile.total_pixels, 90_000);
}

// THEORY:
// The `profile` module is the top-level API of the profiling engine. It encapsulates the
// whole single-pass pipeline behind one call: hand it an RGBA buffer, get back a
// `ColorProfile`.
//
// Stages:
// 1.  **Shape Check**: the buffer must hold exactly width x height RGBA samples. A
//     mismatch fails fast; nothing is silently truncated.
// 2.  **Single Pass**: every opaque pixel is quantized (frequency table), converted to
//     HSL (hue histogram) and classified (category tally), all inside one
//     `PixelAccumulator`.
// 3.  **Reduction**: tallies become percentages over the opaque pixel count, the
//     frequency table is reduced to the dominant palette, and the histogram is moved
//     into the output.
//
// A buffer with no opaque pixels is not an error. It yields an empty profile, which
// callers can detect with `ColorProfile::is_empty`.

use crate::core_modules::category::{CategoryDistribution, CategoryTally, classify_hsl};
use crate::core_modules::dominant::{
    ColorFrequency, DEFAULT_MAX_DOMINANT_COLORS, DEFAULT_SIMILARITY_THRESHOLD,
    DominantColorEntry, select_dominant_colors,
};
use crate::core_modules::hue_histogram::HueHistogram;
use crate::core_modules::pixel::{CHANNELS, Pixel, pixels};
use crate::core_modules::quantizer::DEFAULT_QUANTIZATION_STEP;
use crate::error::ProfileError;
use image::RgbaImage;

pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Configuration for the ProfileBuilder, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    /// Pixels with alpha below this value are ignored entirely.
    pub alpha_threshold: u8,
    /// Channel bucket width used to build the frequency table.
    pub quantization_step: u8,
    /// Two palette colors closer than this (Euclidean RGB) are considered the same.
    pub similarity_threshold: f64,
    /// Upper bound on the number of dominant colors reported.
    pub max_dominant_colors: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            quantization_step: DEFAULT_QUANTIZATION_STEP,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_dominant_colors: DEFAULT_MAX_DOMINANT_COLORS,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.quantization_step == 0 {
            return Err(ProfileError::InvalidConfig(
                "quantization_step must be at least 1".to_string(),
            ));
        }
        if self.max_dominant_colors == 0 {
            return Err(ProfileError::InvalidConfig(
                "max_dominant_colors must be at least 1".to_string(),
            ));
        }
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(ProfileError::InvalidConfig(format!(
                "similarity_threshold must be a non-negative number, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// The primary output of the profiler for a single image.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorProfile {
    /// At most `max_dominant_colors` mutually distinct colors, most frequent first.
    pub dominant_colors: Vec<DominantColorEntry>,
    /// Percentage of opaque pixels per color family.
    pub category_distribution: CategoryDistribution,
    /// 360 per-degree bins.
    pub hue_histogram: HueHistogram,
    /// Pixels that passed the alpha threshold; the denominator of every percentage.
    pub opaque_pixels: u64,
    /// All pixels in the buffer, transparent ones included.
    pub total_pixels: u64,
}

impl ColorProfile {
    /// A profile for an image with no opaque pixels.
    pub fn empty(total_pixels: u64) -> Self {
        Self {
            dominant_colors: Vec::new(),
            category_distribution: CategoryDistribution::default(),
            hue_histogram: HueHistogram::new(),
            opaque_pixels: 0,
            total_pixels,
        }
    }

    /// True when the image had no opaque pixels to analyze.
    pub fn is_empty(&self) -> bool {
        self.opaque_pixels == 0
    }
}

/// Partial aggregates over a set of pixels. Two accumulators over disjoint pixel sets
/// merge into the accumulator of their union.
#[derive(Debug, Clone, Default)]
pub struct PixelAccumulator {
    pub frequency: ColorFrequency,
    pub hue_histogram: HueHistogram,
    pub category_tally: CategoryTally,
    pub opaque_pixels: u64,
    pub total_pixels: u64,
}

impl PixelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one pixel into every aggregate. Transparent pixels only bump `total_pixels`.
    #[inline]
    pub fn ingest(&mut self, pixel: Pixel, config: &ProfileConfig) {
        self.total_pixels += 1;
        if !pixel.is_opaque(config.alpha_threshold) {
            return;
        }
        self.opaque_pixels += 1;

        self.frequency.record(pixel.quantized(config.quantization_step));

        let hsl = pixel.hsl();
        self.hue_histogram.record(hsl.hue, hsl.saturation, hsl.lightness);
        self.category_tally.record(classify_hsl(hsl));
    }

    /// Accumulates every complete pixel in `buffer`.
    pub fn ingest_buffer(&mut self, buffer: &[u8], config: &ProfileConfig) {
        for pixel in pixels(buffer) {
            self.ingest(pixel, config);
        }
    }

    pub fn merge(&mut self, other: &PixelAccumulator) {
        self.frequency.merge(&other.frequency);
        self.hue_histogram.merge(&other.hue_histogram);
        self.category_tally.merge(&other.category_tally);
        self.opaque_pixels += other.opaque_pixels;
        self.total_pixels += other.total_pixels;
    }

    /// Reduces the aggregates into the final profile.
    pub fn finish(self, config: &ProfileConfig) -> ColorProfile {
        if self.opaque_pixels == 0 {
            log::debug!(
                "no opaque pixels among {} total, returning empty profile",
                self.total_pixels
            );
            return ColorProfile::empty(self.total_pixels);
        }

        let dominant_colors = select_dominant_colors(
            &self.frequency,
            self.opaque_pixels,
            config.max_dominant_colors,
            config.similarity_threshold,
        );
        log::debug!(
            "profiled {} opaque of {} pixels: {} quantized colors, {} dominant",
            self.opaque_pixels,
            self.total_pixels,
            self.frequency.len(),
            dominant_colors.len()
        );

        ColorProfile {
            dominant_colors,
            category_distribution: self.category_tally.to_distribution(self.opaque_pixels),
            hue_histogram: self.hue_histogram,
            opaque_pixels: self.opaque_pixels,
            total_pixels: self.total_pixels,
        }
    }
}

/// Checks that `buffer_len` is exactly `width * height` RGBA samples.
pub fn validate_shape(buffer_len: usize, width: u32, height: u32) -> Result<(), ProfileError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(ProfileError::DimensionOverflow { width, height })?;
    if buffer_len != expected {
        return Err(ProfileError::InputShape {
            len: buffer_len,
            width,
            height,
            expected,
        });
    }
    Ok(())
}

/// The main, top-level struct for the profiling engine.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    config: ProfileConfig,
}

impl ProfileBuilder {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Profiles a row-major RGBA buffer of `width` x `height` pixels.
    pub fn analyze(
        &self,
        buffer: &[u8],
        width: u32,
        height: u32,
    ) -> Result<ColorProfile, ProfileError> {
        self.config.validate()?;
        validate_shape(buffer.len(), width, height)?;

        let mut accumulator = PixelAccumulator::new();
        accumulator.ingest_buffer(buffer, &self.config);
        Ok(accumulator.finish(&self.config))
    }

    /// Profiles an image already decoded by the `image` crate.
    pub fn analyze_image(&self, image: &RgbaImage) -> Result<ColorProfile, ProfileError> {
        self.analyze(image.as_raw(), image.width(), image.height())
    }
}

/// Profiles a buffer with the default configuration.
pub fn analyze(buffer: &[u8], width: u32, height: u32) -> Result<ColorProfile, ProfileError> {
    ProfileBuilder::default().analyze(buffer, width, height)
}

// THEORY:
// The `dominant` module reduces the quantized-color frequency table to a short palette.
//
// Frequency ranking alone is not enough: neighbouring quantization buckets of the same
// perceptual color crowd the top of the list. Instead of running a full clustering
// algorithm, the selector walks the ranked list once and keeps an entry only if it is
// not "similar" (Euclidean RGB distance below a threshold) to anything already kept.
// The result is visually distinct, capped in length, and fully deterministic.

use crate::core_modules::quantizer::QuantizedColor;
use std::collections::HashMap;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 40.0;
pub const DEFAULT_MAX_DOMINANT_COLORS: usize = 8;

/// Occurrence count per quantized color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFrequency {
    counts: HashMap<QuantizedColor, u64>,
}

impl ColorFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, color: QuantizedColor) {
        *self.counts.entry(color).or_insert(0) += 1;
    }

    pub fn count(&self, color: &QuantizedColor) -> u64 {
        self.counts.get(color).copied().unwrap_or(0)
    }

    /// Number of distinct quantized colors seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: &ColorFrequency) {
        for (color, count) in &other.counts {
            *self.counts.entry(*color).or_insert(0) += count;
        }
    }

    /// Entries sorted by descending count, ties broken by ascending (red, green, blue).
    pub fn ranked(&self) -> Vec<(QuantizedColor, u64)> {
        let mut ranked: Vec<(QuantizedColor, u64)> =
            self.counts.iter().map(|(color, count)| (*color, *count)).collect();
        ranked.sort_unstable_by(|(color_a, count_a), (color_b, count_b)| {
            count_b.cmp(count_a).then_with(|| color_a.cmp(color_b))
        });
        ranked
    }
}

/// One color of the final palette.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DominantColorEntry {
    pub color: QuantizedColor,
    /// Number of opaque pixels that quantized to `color`.
    pub count: u64,
    /// Share of opaque pixels, in percent.
    pub percentage: f64,
}

impl DominantColorEntry {
    pub fn hex(&self) -> String {
        self.color.hex()
    }
}

/// True when the two colors are closer than `threshold` in RGB space.
#[inline]
pub fn is_similar_color(a: &QuantizedColor, b: &QuantizedColor, threshold: f64) -> bool {
    a.distance(b) < threshold
}

/// Greedily picks up to `max_colors` mutually dissimilar colors, most frequent first.
///
/// Percentages are relative to `opaque_pixels`; with no opaque pixels the palette is
/// empty.
pub fn select_dominant_colors(
    frequency: &ColorFrequency,
    opaque_pixels: u64,
    max_colors: usize,
    similarity_threshold: f64,
) -> Vec<DominantColorEntry> {
    let mut selected: Vec<DominantColorEntry> = Vec::with_capacity(max_colors);
    if opaque_pixels == 0 || max_colors == 0 {
        return selected;
    }

    for (color, count) in frequency.ranked() {
        if selected.len() >= max_colors {
            break;
        }
        let too_close = selected
            .iter()
            .any(|entry| is_similar_color(&entry.color, &color, similarity_threshold));
        if too_close {
            continue;
        }
        selected.push(DominantColorEntry {
            color,
            count,
            percentage: count as f64 / opaque_pixels as f64 * 100.0,
        });
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(red: u8, green: u8, blue: u8) -> QuantizedColor {
        QuantizedColor::new(red, green, blue)
    }

    fn frequency(entries: &[(QuantizedColor, u64)]) -> ColorFrequency {
        let mut frequency = ColorFrequency::new();
        for &(color, count) in entries {
            for _ in 0..count {
                frequency.record(color);
            }
        }
        frequency
    }

    #[test]
    fn similarity_rule() {
        let black = color(0, 0, 0);
        assert!(is_similar_color(&black, &black, DEFAULT_SIMILARITY_THRESHOLD));
        assert!(!is_similar_color(&black, &color(255, 255, 255), DEFAULT_SIMILARITY_THRESHOLD));
        // One quantization step on one channel is 32 < 40.
        assert!(is_similar_color(&black, &color(32, 0, 0), DEFAULT_SIMILARITY_THRESHOLD));
        // Two steps on one channel is 64 >= 40.
        assert!(!is_similar_color(&black, &color(64, 0, 0), DEFAULT_SIMILARITY_THRESHOLD));
    }

    #[test]
    fn ranking_breaks_ties_lexicographically() {
        let table = frequency(&[
            (color(64, 0, 0), 3),
            (color(0, 64, 0), 3),
            (color(0, 0, 64), 5),
        ]);
        let ranked: Vec<QuantizedColor> = table.ranked().into_iter().map(|(c, _)| c).collect();
        assert_eq!(ranked, vec![color(0, 0, 64), color(0, 64, 0), color(64, 0, 0)]);
    }

    #[test]
    fn near_duplicates_are_dropped() {
        let table = frequency(&[
            (color(192, 0, 0), 10),
            (color(224, 0, 0), 8),
            (color(0, 0, 192), 5),
        ]);
        let palette = select_dominant_colors(&table, 23, 8, DEFAULT_SIMILARITY_THRESHOLD);
        let colors: Vec<QuantizedColor> = palette.iter().map(|entry| entry.color).collect();
        assert_eq!(colors, vec![color(192, 0, 0), color(0, 0, 192)]);
        assert!((palette[0].percentage - 10.0 / 23.0 * 100.0).abs() < 1e-9);
        assert_eq!(palette[1].count, 5);
    }

    #[test]
    fn palette_is_capped_and_pairwise_distinct() {
        let mut table = ColorFrequency::new();
        for red in (0..=224u16).step_by(32) {
            for green in (0..=224u16).step_by(32) {
                for blue in (0..=224u16).step_by(32) {
                    let c = color(red as u8, green as u8, blue as u8);
                    for _ in 0..((red + green * 3 + blue * 7) % 11 + 1) {
                        table.record(c);
                    }
                }
            }
        }
        assert_eq!(table.len(), 512);

        let palette = select_dominant_colors(&table, 10_000, 8, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert!(a.color.distance(&b.color) >= DEFAULT_SIMILARITY_THRESHOLD);
            }
        }
        for pair in palette.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn empty_input_yields_empty_palette() {
        assert!(select_dominant_colors(&ColorFrequency::new(), 0, 8, 40.0).is_empty());
        let table = frequency(&[(color(0, 0, 0), 1)]);
        assert!(select_dominant_colors(&table, 1, 0, 40.0).is_empty());
    }

    #[test]
    fn merge_adds_counts() {
        let mut left = frequency(&[(color(0, 0, 0), 2), (color(32, 32, 32), 1)]);
        let right = frequency(&[(color(0, 0, 0), 3)]);
        left.merge(&right);
        assert_eq!(left.count(&color(0, 0, 0)), 5);
        assert_eq!(left.count(&color(32, 32, 32)), 1);
        assert_eq!(left.count(&color(64, 64, 64)), 0);
    }
}

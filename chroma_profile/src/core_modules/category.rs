// THEORY:
// The `category` module turns an HSL sample into one of eleven human-named color
// families. It is deliberately coarse: the output drives a bar chart, not a color-science
// report.
//
// Classification is two-stage:
// 1.  **Primary rule** (first match wins): very dark -> blacks, very light -> whites,
//     nearly unsaturated -> grays, otherwise a fixed hue range picks the family.
// 2.  **Brown correction**: dark, saturated warm hues ([20, 70) degrees, lightness < 40)
//     are re-labelled as browns. The correction *replaces* the primary hue family, so
//     each pixel lands in exactly one family and the tally always sums to the number of
//     classified pixels. This includes the reds sliver at [20, 30).
//
// `classify_hsl` is pure and returns both stages; `CategoryTally` only ever sees the
// final answer.

use crate::core_modules::color_space::{Hsl, rgb_to_hsl};
use std::collections::BTreeMap;

pub const CATEGORY_COUNT: usize = 11;

const BLACK_LIGHTNESS_BELOW: u8 = 10;
const WHITE_LIGHTNESS_ABOVE: u8 = 90;
const GRAY_SATURATION_BELOW: u8 = 10;
const BROWN_HUE_START: u16 = 20;
const BROWN_HUE_END: u16 = 70;
const BROWN_SATURATION_ABOVE: u8 = 10;
const BROWN_LIGHTNESS_BELOW: u8 = 40;

/// A named color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorCategory {
    Reds,
    Oranges,
    Yellows,
    Greens,
    Blues,
    Purples,
    Pinks,
    Browns,
    Whites,
    Grays,
    Blacks,
}

impl ColorCategory {
    /// Every category in canonical display order.
    pub const ALL: [ColorCategory; CATEGORY_COUNT] = [
        ColorCategory::Reds,
        ColorCategory::Oranges,
        ColorCategory::Yellows,
        ColorCategory::Greens,
        ColorCategory::Blues,
        ColorCategory::Purples,
        ColorCategory::Pinks,
        ColorCategory::Browns,
        ColorCategory::Whites,
        ColorCategory::Grays,
        ColorCategory::Blacks,
    ];

    /// Position in `ALL`; also the slot in `CategoryTally`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase plural name, e.g. `"reds"`.
    pub fn name(self) -> &'static str {
        match self {
            ColorCategory::Reds => "reds",
            ColorCategory::Oranges => "oranges",
            ColorCategory::Yellows => "yellows",
            ColorCategory::Greens => "greens",
            ColorCategory::Blues => "blues",
            ColorCategory::Purples => "purples",
            ColorCategory::Pinks => "pinks",
            ColorCategory::Browns => "browns",
            ColorCategory::Whites => "whites",
            ColorCategory::Grays => "grays",
            ColorCategory::Blacks => "blacks",
        }
    }

    /// The hue family for a chromatic pixel. Ranges are half-open; [330, 360) wraps
    /// back to reds.
    pub fn from_hue(hue: u16) -> ColorCategory {
        match hue {
            0..30 => ColorCategory::Reds,
            30..45 => ColorCategory::Oranges,
            45..70 => ColorCategory::Yellows,
            70..150 => ColorCategory::Greens,
            150..210 => ColorCategory::Blues,
            210..280 => ColorCategory::Purples,
            280..330 => ColorCategory::Pinks,
            _ => ColorCategory::Reds,
        }
    }
}

impl std::fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The outcome of classifying one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Category chosen by the primary lightness/saturation/hue rule.
    pub primary: ColorCategory,
    /// Set when the brown correction overrides `primary`.
    pub brown_override: bool,
}

impl Classification {
    /// The category the pixel is finally counted under.
    pub fn category(&self) -> ColorCategory {
        if self.brown_override {
            ColorCategory::Browns
        } else {
            self.primary
        }
    }
}

pub fn classify_hsl(hsl: Hsl) -> Classification {
    let Hsl {
        hue,
        saturation,
        lightness,
    } = hsl;

    let primary = if lightness < BLACK_LIGHTNESS_BELOW {
        ColorCategory::Blacks
    } else if lightness > WHITE_LIGHTNESS_ABOVE {
        ColorCategory::Whites
    } else if saturation < GRAY_SATURATION_BELOW {
        ColorCategory::Grays
    } else {
        ColorCategory::from_hue(hue)
    };

    // Only chromatic pixels are eligible; the achromatic families already won above.
    let is_chromatic = !matches!(
        primary,
        ColorCategory::Blacks | ColorCategory::Whites | ColorCategory::Grays
    );
    let brown_override = is_chromatic
        && (BROWN_HUE_START..BROWN_HUE_END).contains(&hue)
        && saturation > BROWN_SATURATION_ABOVE
        && lightness < BROWN_LIGHTNESS_BELOW;

    Classification {
        primary,
        brown_override,
    }
}

pub fn classify(red: u8, green: u8, blue: u8) -> ColorCategory {
    classify_hsl(rgb_to_hsl(red, green, blue)).category()
}

/// Pixel counts per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTally {
    counts: [u64; CATEGORY_COUNT],
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, classification: Classification) {
        self.counts[classification.category().index()] += 1;
    }

    pub fn count(&self, category: ColorCategory) -> u64 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn merge(&mut self, other: &CategoryTally) {
        for (count, other_count) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other_count;
        }
    }

    /// Normalizes counts against `denominator`. A zero denominator yields an all-zero
    /// distribution rather than NaN.
    pub fn to_distribution(&self, denominator: u64) -> CategoryDistribution {
        let mut percentages = [0.0; CATEGORY_COUNT];
        if denominator > 0 {
            for (percentage, &count) in percentages.iter_mut().zip(self.counts.iter()) {
                *percentage = count as f64 / denominator as f64 * 100.0;
            }
        }
        CategoryDistribution { percentages }
    }
}

/// Share of opaque pixels per category, in percent.
///
/// Serializes as a `{"reds": 12.5, ...}` map with every category present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "BTreeMap<ColorCategory, f64>",
        into = "BTreeMap<ColorCategory, f64>"
    )
)]
pub struct CategoryDistribution {
    percentages: [f64; CATEGORY_COUNT],
}

impl CategoryDistribution {
    pub fn percentage(&self, category: ColorCategory) -> f64 {
        self.percentages[category.index()]
    }

    /// `(category, percentage)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorCategory, f64)> + '_ {
        ColorCategory::ALL
            .iter()
            .map(move |&category| (category, self.percentage(category)))
    }

    pub fn total(&self) -> f64 {
        self.percentages.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.iter().all(|&percentage| percentage == 0.0)
    }
}

impl From<CategoryDistribution> for BTreeMap<ColorCategory, f64> {
    fn from(distribution: CategoryDistribution) -> Self {
        distribution.iter().collect()
    }
}

impl From<BTreeMap<ColorCategory, f64>> for CategoryDistribution {
    fn from(map: BTreeMap<ColorCategory, f64>) -> Self {
        let mut percentages = [0.0; CATEGORY_COUNT];
        for (category, percentage) in map {
            percentages[category.index()] = percentage;
        }
        CategoryDistribution { percentages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsl(hue: u16, saturation: u8, lightness: u8) -> Hsl {
        Hsl::new(hue, saturation, lightness)
    }

    #[test]
    fn lightness_and_saturation_rules_take_priority() {
        assert_eq!(classify_hsl(hsl(120, 100, 9)).category(), ColorCategory::Blacks);
        assert_eq!(classify_hsl(hsl(120, 100, 91)).category(), ColorCategory::Whites);
        assert_eq!(classify_hsl(hsl(120, 9, 50)).category(), ColorCategory::Grays);
        assert_eq!(classify_hsl(hsl(120, 10, 50)).category(), ColorCategory::Greens);
        assert_eq!(classify_hsl(hsl(120, 50, 10)).category(), ColorCategory::Greens);
        assert_eq!(classify_hsl(hsl(120, 50, 90)).category(), ColorCategory::Greens);
    }

    #[test]
    fn hue_ranges_are_half_open() {
        let cases = [
            (0, ColorCategory::Reds),
            (29, ColorCategory::Reds),
            (30, ColorCategory::Oranges),
            (44, ColorCategory::Oranges),
            (45, ColorCategory::Yellows),
            (69, ColorCategory::Yellows),
            (70, ColorCategory::Greens),
            (149, ColorCategory::Greens),
            (150, ColorCategory::Blues),
            (209, ColorCategory::Blues),
            (210, ColorCategory::Purples),
            (279, ColorCategory::Purples),
            (280, ColorCategory::Pinks),
            (329, ColorCategory::Pinks),
            (330, ColorCategory::Reds),
            (359, ColorCategory::Reds),
        ];
        for (hue, expected) in cases {
            assert_eq!(classify_hsl(hsl(hue, 80, 50)).category(), expected, "hue {hue}");
        }
    }

    #[test]
    fn dark_warm_hues_become_browns() {
        let orange = classify_hsl(hsl(35, 60, 30));
        assert_eq!(orange.primary, ColorCategory::Oranges);
        assert!(orange.brown_override);
        assert_eq!(orange.category(), ColorCategory::Browns);

        let yellow = classify_hsl(hsl(60, 60, 39));
        assert_eq!(yellow.primary, ColorCategory::Yellows);
        assert_eq!(yellow.category(), ColorCategory::Browns);

        assert_eq!(classify_hsl(hsl(60, 60, 40)).category(), ColorCategory::Yellows);
        assert_eq!(classify_hsl(hsl(60, 10, 30)).category(), ColorCategory::Yellows);
        assert_eq!(classify_hsl(hsl(70, 60, 30)).category(), ColorCategory::Greens);
    }

    #[test]
    fn dark_red_orange_sliver_moves_to_browns_without_double_counting() {
        let sliver = classify_hsl(hsl(25, 60, 30));
        assert_eq!(sliver.primary, ColorCategory::Reds);
        assert!(sliver.brown_override);

        let mut tally = CategoryTally::new();
        tally.record(sliver);
        assert_eq!(tally.count(ColorCategory::Browns), 1);
        assert_eq!(tally.count(ColorCategory::Reds), 0);
        assert_eq!(tally.total(), 1);

        assert_eq!(classify_hsl(hsl(19, 60, 30)).category(), ColorCategory::Reds);
    }

    #[test]
    fn achromatic_pixels_never_turn_brown() {
        let dark = classify_hsl(hsl(30, 50, 5));
        assert_eq!(dark.category(), ColorCategory::Blacks);
        assert!(!dark.brown_override);
    }

    #[test]
    fn classify_from_rgb() {
        assert_eq!(classify(200, 30, 30), ColorCategory::Reds);
        assert_eq!(classify(0, 0, 0), ColorCategory::Blacks);
        assert_eq!(classify(255, 255, 255), ColorCategory::Whites);
        assert_eq!(classify(128, 128, 128), ColorCategory::Grays);
        assert_eq!(classify(30, 120, 200), ColorCategory::Blues);
        // (120, 70, 20): hue 30, saturation 71, lightness 27.
        assert_eq!(classify(120, 70, 20), ColorCategory::Browns);
    }

    #[test]
    fn tally_normalizes_and_merges() {
        let mut left = CategoryTally::new();
        let mut right = CategoryTally::new();
        left.record(classify_hsl(hsl(0, 80, 50)));
        left.record(classify_hsl(hsl(0, 80, 50)));
        right.record(classify_hsl(hsl(200, 80, 50)));
        right.record(classify_hsl(hsl(0, 0, 100)));
        left.merge(&right);

        let distribution = left.to_distribution(4);
        assert_eq!(distribution.percentage(ColorCategory::Reds), 50.0);
        assert_eq!(distribution.percentage(ColorCategory::Blues), 25.0);
        assert_eq!(distribution.percentage(ColorCategory::Whites), 25.0);
        assert!((distribution.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn distribution_map_conversion_keeps_every_category() {
        let mut tally = CategoryTally::new();
        tally.record(classify_hsl(hsl(100, 80, 50)));
        let distribution = tally.to_distribution(1);

        let map: BTreeMap<ColorCategory, f64> = distribution.into();
        assert_eq!(map.len(), CATEGORY_COUNT);
        assert_eq!(map[&ColorCategory::Greens], 100.0);
        assert_eq!(CategoryDistribution::from(map), distribution);
    }

    #[test]
    fn zero_denominator_gives_empty_distribution() {
        let distribution = CategoryTally::new().to_distribution(0);
        assert!(distribution.is_empty());
        assert_eq!(distribution.iter().count(), CATEGORY_COUNT);
    }
}

// Rendering adapters for `ColorProfile`.
//
// Nothing here draws. Each adapter maps the profile to the plain data a chart or canvas
// toolkit needs (labels, colors, radii, angles), so any front end can render it without
// re-deriving analysis results.

use chroma_profile::{
    CategoryDistribution, ColorCategory, ColorProfile, DominantColorEntry, HueHistogram,
    hsl_to_rgb,
};
use std::f64::consts::PI;

/// Categories at or below this share are left out of the bar chart.
pub const BAR_CHART_MIN_PERCENT: f64 = 0.5;

const BAR_FILL_ALPHA: f32 = 0.7;
const WHEEL_MARGIN: f64 = 10.0;
const WHEEL_INNER_RATIO: f64 = 0.4;
/// A bin reaches the outer rim once it holds this fraction of the busiest bin's count.
const WHEEL_SATURATION_FRACTION: f64 = 0.25;
const WHEEL_MIN_LIGHTNESS: f64 = 20.0;
const WHEEL_MAX_LIGHTNESS: f64 = 80.0;
const WHEEL_MARKER_INSET: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl DisplayColor {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// CSS `rgba(..)` notation.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.red, self.green, self.blue, self.alpha)
    }
}

/// The bar color used for each category.
pub fn category_color(category: ColorCategory) -> DisplayColor {
    let (red, green, blue) = match category {
        ColorCategory::Reds => (255, 99, 132),
        ColorCategory::Oranges => (255, 159, 64),
        ColorCategory::Yellows => (255, 205, 86),
        ColorCategory::Greens => (75, 192, 192),
        ColorCategory::Blues => (54, 162, 235),
        ColorCategory::Purples => (153, 102, 255),
        ColorCategory::Pinks => (255, 153, 204),
        ColorCategory::Browns => (139, 69, 19),
        ColorCategory::Whites => (240, 240, 240),
        ColorCategory::Grays => (128, 128, 128),
        ColorCategory::Blacks => (0, 0, 0),
    };
    DisplayColor::new(red, green, blue, BAR_FILL_ALPHA)
}

/// Capitalized label, e.g. `"Reds"`.
pub fn category_label(category: ColorCategory) -> String {
    let name = category.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize, serde::Deserialize))]
pub struct BarChartEntry {
    pub category: ColorCategory,
    pub label: String,
    pub percentage: f64,
    pub fill: DisplayColor,
    pub border: DisplayColor,
}

/// One bar per category above `BAR_CHART_MIN_PERCENT`, in canonical category order.
pub fn bar_chart(distribution: &CategoryDistribution) -> Vec<BarChartEntry> {
    distribution
        .iter()
        .filter(|&(_, percentage)| percentage > BAR_CHART_MIN_PERCENT)
        .map(|(category, percentage)| {
            let fill = category_color(category);
            BarChartEntry {
                category,
                label: category_label(category),
                percentage,
                fill,
                border: fill.with_alpha(1.0),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    pub hex: String,
    pub rgb: (u8, u8, u8),
    pub percentage: f64,
    /// `"#rrggbb 12.3%"`.
    pub label: String,
}

pub fn swatches(colors: &[DominantColorEntry]) -> Vec<Swatch> {
    colors
        .iter()
        .map(|entry| {
            let hex = entry.hex();
            Swatch {
                label: format!("{hex} {:.1}%", entry.percentage),
                hex,
                rgb: entry.color.rgb(),
                percentage: entry.percentage,
            }
        })
        .collect()
}

/// A filled annular sector for one degree of hue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelSegment {
    pub hue: u16,
    pub count: u64,
    /// Radians, clockwise from the positive x axis (canvas convention).
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub saturation: f64,
    /// Bin lightness clamped into a visible range.
    pub lightness: f64,
    pub fill: (u8, u8, u8),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "web", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelMarker {
    pub hue: u16,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

const WHEEL_MARKERS: [(u16, &str); 6] = [
    (0, "Red"),
    (60, "Yellow"),
    (120, "Green"),
    (180, "Cyan"),
    (240, "Blue"),
    (300, "Magenta"),
];

/// Donut-shaped hue wheel geometry for a canvas of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorWheel {
    pub center_x: f64,
    pub center_y: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
}

impl ColorWheel {
    pub fn new(width: u32, height: u32) -> Self {
        let outer_radius = (width.min(height) as f64 / 2.0 - WHEEL_MARGIN).max(0.0);
        Self {
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
            outer_radius,
            inner_radius: outer_radius * WHEEL_INNER_RATIO,
        }
    }

    /// One segment per non-empty hue. Segment length is normalized against the busiest
    /// bin and saturates at `WHEEL_SATURATION_FRACTION` of its count.
    pub fn segments(&self, histogram: &HueHistogram) -> Vec<WheelSegment> {
        let max_count = histogram.max_count();
        if max_count == 0 {
            return Vec::new();
        }
        let full_scale = max_count as f64 * WHEEL_SATURATION_FRACTION;
        let span = self.outer_radius - self.inner_radius;

        histogram
            .bins()
            .iter()
            .enumerate()
            .filter(|(_, bin)| !bin.is_empty())
            .map(|(hue, bin)| {
                let hue = hue as u16;
                let lightness = bin.lightness.clamp(WHEEL_MIN_LIGHTNESS, WHEEL_MAX_LIGHTNESS);
                WheelSegment {
                    hue,
                    count: bin.count,
                    start_angle: (hue as f64 - 0.5).to_radians(),
                    end_angle: (hue as f64 + 0.5).to_radians(),
                    inner_radius: self.inner_radius,
                    outer_radius: self.inner_radius + span * (bin.count as f64 / full_scale).min(1.0),
                    saturation: bin.saturation,
                    lightness,
                    fill: hsl_to_rgb(hue as f64, bin.saturation, lightness),
                }
            })
            .collect()
    }

    /// Primary and secondary hue labels, placed just inside the inner ring.
    pub fn markers(&self) -> Vec<WheelMarker> {
        let radius = self.inner_radius - WHEEL_MARKER_INSET;
        WHEEL_MARKERS
            .iter()
            .map(|&(hue, label)| {
                let angle = hue as f64 * PI / 180.0;
                WheelMarker {
                    hue,
                    label: label.to_string(),
                    x: self.center_x + radius * angle.cos(),
                    y: self.center_y + radius * angle.sin(),
                }
            })
            .collect()
    }
}

/// The bar chart currently on screen. Owned by whichever view renders it; showing a new
/// profile tears down the previous chart.
#[derive(Debug, Default)]
pub struct ChartHandle {
    entries: Option<Vec<BarChartEntry>>,
}

impl ChartHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, profile: &ColorProfile) -> &[BarChartEntry] {
        self.clear();
        self.entries
            .insert(bar_chart(&profile.category_distribution))
            .as_slice()
    }

    pub fn clear(&mut self) {
        self.entries = None;
    }

    pub fn is_showing(&self) -> bool {
        self.entries.is_some()
    }

    pub fn entries(&self) -> &[BarChartEntry] {
        self.entries.as_deref().unwrap_or(&[])
    }
}

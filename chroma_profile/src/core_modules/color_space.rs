// THEORY:
// The `color_space` module is the mathematical floor of the profiling engine. Every
// other component speaks either raw 8-bit RGB (quantization, similarity) or integer HSL
// (hue histogram, category classification); this module is the only place where one
// becomes the other.
//
// Key architectural principles:
// 1.  **Pure Functions**: No state, no allocation (except `rgb_to_hex`), no failure modes.
//     Every 8-bit triple has exactly one HSL answer.
// 2.  **Integer Output**: Hue is reported in whole degrees and saturation/lightness in
//     whole percent. Downstream consumers bin and threshold on these integers, so the
//     rounding happens once, here, and nowhere else.
// 3.  **sRGB, Not Colorimetry**: Channels are normalized but never linearized. The
//     profile is a visual summary, and the category thresholds were tuned against the
//     gamma-encoded values a browser canvas would hand us.

pub type Hue = u16;
pub type Saturation = u8;
pub type Lightness = u8;

/// Number of whole hue degrees on the color wheel.
pub const HUE_DEGREES: Hue = 360;

/// A color in integer HSL form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsl {
    /// Hue angle in whole degrees, always in [0, 360).
    pub hue: Hue,
    /// Saturation in whole percent [0, 100].
    pub saturation: Saturation,
    /// Lightness in whole percent [0, 100].
    pub lightness: Lightness,
}

impl Hsl {
    pub fn new(hue: Hue, saturation: Saturation, lightness: Lightness) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn is_achromatic(&self) -> bool {
        self.saturation == 0
    }
}

/// Converts an 8-bit RGB triple into integer HSL.
///
/// - Achromatic input (all channels equal) yields hue 0 and saturation 0.
/// - Hue uses the six-sector max-channel formula. When rounding lands exactly on
///   360 degrees (e.g. `(255, 0, 1)`), it is wrapped back to 0.
pub fn rgb_to_hsl(red: u8, green: u8, blue: u8) -> Hsl {
    let red_normalized = red as f64 / 255.0;
    let green_normalized = green as f64 / 255.0;
    let blue_normalized = blue as f64 / 255.0;

    let maximum_channel = red.max(green).max(blue);
    let minimum_channel = red.min(green).min(blue);
    let maximum = maximum_channel as f64 / 255.0;
    let minimum = minimum_channel as f64 / 255.0;

    let lightness = (maximum + minimum) / 2.0;

    if maximum_channel == minimum_channel {
        return Hsl::new(0, 0, to_percent(lightness));
    }

    let delta = maximum - minimum;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - maximum - minimum)
    } else {
        delta / (maximum + minimum)
    };

    let sector = if maximum_channel == red {
        let offset = if green < blue { 6.0 } else { 0.0 };
        (green_normalized - blue_normalized) / delta + offset
    } else if maximum_channel == green {
        (blue_normalized - red_normalized) / delta + 2.0
    } else {
        (red_normalized - green_normalized) / delta + 4.0
    };

    let hue = ((sector * 60.0).round() as Hue) % HUE_DEGREES;

    Hsl::new(hue, to_percent(saturation), to_percent(lightness))
}

#[inline]
fn to_percent(unit: f64) -> u8 {
    (unit * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Converts HSL back to 8-bit RGB.
///
/// Takes fractional inputs so averaged histogram values can be rendered without a
/// second rounding step: `hue` in degrees (wrapped into [0, 360)), `saturation` and
/// `lightness` in percent (clamped to [0, 100]).
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(360.0) / 360.0;
    let saturation = (saturation / 100.0).clamp(0.0, 1.0);
    let lightness = (lightness / 100.0).clamp(0.0, 1.0);

    if saturation <= 0.0 {
        let gray = to_byte(lightness);
        return (gray, gray, gray);
    }

    let upper = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let lower = 2.0 * lightness - upper;

    (
        to_byte(hue_to_channel(lower, upper, hue + 1.0 / 3.0)),
        to_byte(hue_to_channel(lower, upper, hue)),
        to_byte(hue_to_channel(lower, upper, hue - 1.0 / 3.0)),
    )
}

fn hue_to_channel(lower: f64, upper: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        lower + (upper - lower) * 6.0 * t
    } else if t < 0.5 {
        upper
    } else if t < 2.0 / 3.0 {
        lower + (upper - lower) * (2.0 / 3.0 - t) * 6.0
    } else {
        lower
    }
}

#[inline]
fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Formats an RGB triple as a lowercase `#rrggbb` string.
pub fn rgb_to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}

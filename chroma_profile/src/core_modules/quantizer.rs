// THEORY:
// The `quantizer` keeps the frequency table tractable. A 24-bit image can contain
// millions of distinct colors; flooring each channel to a multiple of `step` collapses
// them into at most (256 / step)^3 buckets (512 at the default step of 32). The bucket's
// lower corner doubles as its representative color.

use crate::core_modules::color_space::rgb_to_hex;

pub const DEFAULT_QUANTIZATION_STEP: u8 = 32;

/// A coarse RGB bucket, used as the key of the color frequency table.
///
/// Field order gives the lexicographic (red, green, blue) ordering used to break ties
/// between equally frequent colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl QuantizedColor {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &QuantizedColor) -> f64 {
        let red_delta = self.red as f64 - other.red as f64;
        let green_delta = self.green as f64 - other.green as f64;
        let blue_delta = self.blue as f64 - other.blue as f64;
        (red_delta * red_delta + green_delta * green_delta + blue_delta * blue_delta).sqrt()
    }

    pub fn hex(&self) -> String {
        rgb_to_hex(self.red, self.green, self.blue)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }
}

/// Floors each channel to a multiple of `step`. A `step` of 0 is treated as 1 (no
/// quantization); `ProfileConfig::validate` rejects it before analysis starts.
#[inline]
pub fn quantize(red: u8, green: u8, blue: u8, step: u8) -> QuantizedColor {
    let step = step.max(1);
    QuantizedColor::new(
        red / step * step,
        green / step * step,
        blue / step * step,
    )
}

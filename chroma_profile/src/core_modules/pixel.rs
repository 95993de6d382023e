// THEORY (Single-Pixel Facts):
// The `Pixel` module is the most fundamental unit of the profiler. It is a "dumb" data
// container for one RGBA sample plus the handful of facts that can be derived from that
// sample alone: whether it is opaque enough to count, what coarse bucket it falls into,
// and where it sits in HSL space.
//
// Anything that needs more than one pixel (frequency, averages, similarity between
// colors) lives in the aggregating modules (`hue_histogram`, `dominant`, `category`).

use crate::core_modules::color_space::{Hsl, rgb_to_hsl};
use crate::core_modules::quantizer::{QuantizedColor, quantize};

pub type Byte = u8;
pub type Channel = Byte;

/// Bytes per RGBA sample in a row-major pixel buffer.
pub const CHANNELS: usize = 4;

/// A "dumb" data container representing a single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    /// The red channel value (0-255).
    pub red: Channel,
    /// The green channel value (0-255).
    pub green: Channel,
    /// The blue channel value (0-255).
    pub blue: Channel,
    /// The alpha (transparency) channel value (0-255).
    pub alpha: Channel,
}

impl Pixel {
    pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// True when the pixel's alpha reaches `alpha_threshold`.
    #[inline]
    pub fn is_opaque(&self, alpha_threshold: Channel) -> bool {
        self.alpha >= alpha_threshold
    }

    #[inline]
    pub fn hsl(&self) -> Hsl {
        rgb_to_hsl(self.red, self.green, self.blue)
    }

    #[inline]
    pub fn quantized(&self, step: u8) -> QuantizedColor {
        quantize(self.red, self.green, self.blue, step)
    }
}

impl From<[Byte; CHANNELS]> for Pixel {
    fn from(bytes: [Byte; CHANNELS]) -> Self {
        Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl From<Pixel> for [Byte; CHANNELS] {
    fn from(pixel: Pixel) -> Self {
        [pixel.red, pixel.green, pixel.blue, pixel.alpha]
    }
}

/// Iterates a row-major RGBA buffer as pixels. Trailing bytes that do not form a
/// complete pixel are ignored; callers validate the buffer shape beforehand.
pub fn pixels(buffer: &[Byte]) -> impl Iterator<Item = Pixel> + '_ {
    buffer
        .chunks_exact(CHANNELS)
        .map(|bytes| Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3]))
}

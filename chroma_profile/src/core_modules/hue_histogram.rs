// THEORY:
// The `HueHistogram` is the data source for radial (color wheel) visualization. It
// answers "how much of the image sits at each degree of hue, and what does that hue
// typically look like there?"
//
// Key architectural principles:
// 1.  **Fixed Shape**: Exactly 360 bins, one per whole degree, always present even when
//     empty. Renderers can index by hue without bounds juggling.
// 2.  **Constant Memory**: Each bin keeps a running count plus running averages of
//     saturation and lightness. No per-pixel lists are stored, so memory is O(360)
//     regardless of image size.
// 3.  **Mergeable**: Two partial histograms built over disjoint pixel sets merge into the
//     histogram of the union by count-weighting the averages. This is what lets the
//     parallel builder shard an image.

use crate::core_modules::color_space::{HUE_DEGREES, Hue, Lightness, Saturation};

pub const HUE_BINS: usize = HUE_DEGREES as usize;

/// One degree of the color wheel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HueBin {
    /// Number of opaque pixels whose hue rounds to this degree.
    pub count: u64,
    /// Count-weighted average saturation (percent) of those pixels.
    pub saturation: f64,
    /// Count-weighted average lightness (percent) of those pixels.
    pub lightness: f64,
}

impl HueBin {
    #[inline]
    fn record(&mut self, saturation: f64, lightness: f64) {
        let previous_count = self.count as f64;
        self.count += 1;
        let count = self.count as f64;
        self.saturation = (self.saturation * previous_count + saturation) / count;
        self.lightness = (self.lightness * previous_count + lightness) / count;
    }

    fn merge(&mut self, other: &HueBin) {
        if other.count == 0 {
            return;
        }
        let own_weight = self.count as f64;
        let other_weight = other.count as f64;
        self.count += other.count;
        let count = self.count as f64;
        self.saturation = (self.saturation * own_weight + other.saturation * other_weight) / count;
        self.lightness = (self.lightness * own_weight + other.lightness * other_weight) / count;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Per-degree pixel counts with running-average saturation and lightness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HueHistogram {
    bins: Vec<HueBin>,
}

impl Default for HueHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl HueHistogram {
    pub fn new() -> Self {
        Self {
            bins: vec![HueBin::default(); HUE_BINS],
        }
    }

    /// Adds one pixel to the bin for `hue`. Returns `false` (and records nothing) when
    /// `hue` falls outside [0, 360).
    pub fn record(&mut self, hue: Hue, saturation: Saturation, lightness: Lightness) -> bool {
        match self.bins.get_mut(hue as usize) {
            Some(bin) => {
                bin.record(saturation as f64, lightness as f64);
                true
            }
            None => {
                log::warn!("skipping out-of-range hue {hue}");
                false
            }
        }
    }

    /// Folds `other` into this histogram bin by bin.
    pub fn merge(&mut self, other: &HueHistogram) {
        for (bin, other_bin) in self.bins.iter_mut().zip(other.bins.iter()) {
            bin.merge(other_bin);
        }
    }

    pub fn bins(&self) -> &[HueBin] {
        &self.bins
    }

    pub fn bin(&self, hue: Hue) -> Option<&HueBin> {
        self.bins.get(hue as usize)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(HueBin::is_empty)
    }

    /// Largest count of any bin; the normalization reference for wheel renderers.
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

// THEORY:
// This file is the main entry point for the `chroma_profile` library crate. It defines
// the public API exposed to external consumers (the `profile_tester` CLI and the
// `chroma_profile_visualizer` adapters).
//
// The primary goal is to export `ProfileBuilder`, `ParallelProfileBuilder` and the
// `ColorProfile` they produce as the high-level interface to the engine. The leaf
// components in `core_modules` stay public for callers that need a single piece (for
// example HSL conversion or category lookup), but nothing in them depends on decoding,
// rendering or any UI state.

pub mod core_modules;
pub mod error;
pub mod parallel_profile;
pub mod profile;

pub use core_modules::category::{CategoryDistribution, ColorCategory};
pub use core_modules::color_space::{Hsl, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
pub use core_modules::dominant::{DominantColorEntry, is_similar_color};
pub use core_modules::hue_histogram::{HueBin, HueHistogram};
pub use core_modules::quantizer::{QuantizedColor, quantize};
pub use error::ProfileError;
pub use parallel_profile::ParallelProfileBuilder;
pub use profile::{ColorProfile, ProfileBuilder, ProfileConfig, analyze};

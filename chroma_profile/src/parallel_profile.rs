// THEORY:
// Pixels are independent until the final reduction, so the single pass shards cleanly.
// The `ParallelProfileBuilder` splits the buffer on pixel boundaries, accumulates each
// shard on tokio's blocking pool, and merges the partial accumulators in shard order
// before running the same reduction as the sequential `ProfileBuilder`.
//
// Counts (frequency table, category tally, histogram bin counts) are identical to the
// sequential result. Histogram averages are merged by count weighting and can differ
// from the sequential running average only by floating-point rounding.

use crate::core_modules::pixel::CHANNELS;
use crate::error::ProfileError;
use crate::profile::{ColorProfile, PixelAccumulator, ProfileConfig, validate_shape};
use futures::future::try_join_all;
use std::ops::Range;
use std::sync::Arc;

/// Below this many pixels per shard, spawning costs more than it saves.
const DEFAULT_MIN_SHARD_PIXELS: usize = 64 * 1024;

pub struct ParallelProfileBuilder {
    config: ProfileConfig,
    workers: usize,
    min_shard_pixels: usize,
}

impl ParallelProfileBuilder {
    pub fn new(config: ProfileConfig) -> Self {
        Self {
            config,
            workers: num_cpus::get().max(1),
            min_shard_pixels: DEFAULT_MIN_SHARD_PIXELS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_min_shard_pixels(mut self, min_shard_pixels: usize) -> Self {
        self.min_shard_pixels = min_shard_pixels.max(1);
        self
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Profiles a row-major RGBA buffer across the worker pool.
    pub async fn analyze(
        &self,
        buffer: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
    ) -> Result<ColorProfile, ProfileError> {
        let buffer: Arc<[u8]> = buffer.into();
        self.config.validate()?;
        validate_shape(buffer.len(), width, height)?;

        let ranges = self.shard_ranges(buffer.len() / CHANNELS);
        log::debug!(
            "profiling {}x{} image in {} shard(s) on up to {} worker(s)",
            width,
            height,
            ranges.len(),
            self.workers
        );

        let handles = ranges.into_iter().map(|range| {
            let buffer = Arc::clone(&buffer);
            let config = self.config.clone();
            tokio::task::spawn_blocking(move || {
                let mut accumulator = PixelAccumulator::new();
                accumulator.ingest_buffer(&buffer[range], &config);
                accumulator
            })
        });

        let partials = try_join_all(handles)
            .await
            .map_err(|error| ProfileError::Worker(error.to_string()))?;

        let mut merged = PixelAccumulator::new();
        for partial in &partials {
            merged.merge(partial);
        }
        Ok(merged.finish(&self.config))
    }

    /// Byte ranges covering `pixel_count` pixels, each aligned to a pixel boundary.
    fn shard_ranges(&self, pixel_count: usize) -> Vec<Range<usize>> {
        if pixel_count == 0 {
            return vec![0..0];
        }
        let shards = pixel_count
            .div_ceil(self.min_shard_pixels)
            .clamp(1, self.workers);
        let pixels_per_shard = pixel_count.div_ceil(shards);

        (0..pixel_count)
            .step_by(pixels_per_shard)
            .map(|start| {
                let end = (start + pixels_per_shard).min(pixel_count);
                start * CHANNELS..end * CHANNELS
            })
            .collect()
    }
}

impl Default for ParallelProfileBuilder {
    fn default() -> Self {
        Self::new(ProfileConfig::default())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("pixel buffer length {len} does not match dimensions {width}x{height} (expected {expected} bytes)")]
    InputShape {
        len: usize,
        width: u32,
        height: u32,
        expected: usize,
    },

    #[error("image dimensions {width}x{height} overflow the addressable buffer size")]
    DimensionOverflow { width: u32, height: u32 },

    #[error("invalid profile configuration: {0}")]
    InvalidConfig(String),

    #[error("analysis worker failed: {0}")]
    Worker(String),
}

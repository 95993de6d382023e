pub mod category;
pub mod color_space;
pub mod dominant;
pub mod hue_histogram;
pub mod pixel;
pub mod quantizer;

//! # Constants with reserved meanings in Skewer

/// Side length, in pixels, of the square images the downstream model expects.
/// The model's input layer is `IMAGE_SIZE x IMAGE_SIZE x CHANNELS`.
pub const IMAGE_SIZE: usize = 32;

/// Colour channels emitted per pixel, interleaved as red, green, blue
pub const CHANNELS: usize = 3;

/// Mask selecting the lowest byte of a packed pixel
pub const LOWER_BYTE_MASK: u32 = 0xFF;

/// Default number of manifest entries between two progress log lines
pub const PROGRESS_INTERVAL: usize = 500;

/// Number of participant partitions the manifests are split into
pub const PARTITIONS: usize = 10;

/// Root segment manifest lines are labeled under, whatever directory the
/// assets are actually served from
pub const LABEL_ROOT: &str = "data";

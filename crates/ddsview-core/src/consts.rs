/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Slice index restored by a reset.
pub const DEFAULT_SLICE_INDEX: f32 = 0.0;

/// Scale restored by a reset.
pub const DEFAULT_SCALE: f32 = 1.0;

/// Bias restored by a reset.
pub const DEFAULT_BIAS: f32 = 0.0;

/// Factor applied by one scale step (A multiplies, S divides).
pub const DEFAULT_SCALE_FACTOR: f32 = 2.0;

/// Amount added by one bias step (Q adds, W subtracts).
pub const DEFAULT_BIAS_STEP: f32 = 0.05;

/// PageUp/PageDown move by `file_count / PAGE_STEP_DIVISOR` files, at least `PAGE_STEP_MIN`.
pub const PAGE_STEP_DIVISOR: usize = 40;
pub const PAGE_STEP_MIN: usize = 4;

/// Home/End move by `file_count / JUMP_STEP_DIVISOR` files, at least `JUMP_STEP_MIN`.
pub const JUMP_STEP_DIVISOR: usize = 10;
pub const JUMP_STEP_MIN: usize = 20;

/// Pixels kept free around the suggested window on each screen axis.
pub const SCREEN_MARGIN: u32 = 100;

/// Smallest suggested width for landscape images.
pub const MIN_SUGGESTED_WIDTH: u32 = 640;

/// Smallest suggested height for portrait images.
pub const MIN_SUGGESTED_HEIGHT: u32 = 480;

/// Screen size assumed when the host cannot report one.
pub const FALLBACK_SCREEN_SIZE: [u32; 2] = [1920, 1080];

/// Extension of files picked up by directory navigation.
pub const DDS_EXTENSION: &str = "dds";

/// "DDS " little-endian magic.
pub const DDS_MAGIC: u32 = 0x2053_4444;

/// Size in bytes of the legacy DDS header (excluding the magic).
pub const DDS_HEADER_SIZE: usize = 124;

/// Size in bytes of the DX10 extension header.
pub const DDS_DX10_HEADER_SIZE: usize = 20;

/// Size in bytes of the embedded pixel format block.
pub const DDS_PIXEL_FORMAT_SIZE: usize = 32;

pub mod dds;
pub mod image_set;

pub use dds::{read_metadata, DdsReader};
pub use image_set::ImageSet;

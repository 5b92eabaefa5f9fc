pub mod config;
pub mod consts;
pub mod decode;
pub mod error;
pub mod format;
pub mod inspector;
pub mod io;
pub mod scratch;
pub mod shading;
pub mod texture;

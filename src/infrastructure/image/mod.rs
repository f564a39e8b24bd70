//! Image file adapters

pub mod file_encoder;

pub use file_encoder::FileImageEncoder;

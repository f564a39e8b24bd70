//! Media value objects: recordings in, images in, audio out

mod audio;
mod image;

pub use audio::{AudioMimeType, AudioRecording};
pub use image::{EncodedImage, ImageMimeType};

//! Media handling for the receipt pipeline: image detection, download,
//! and re-hosting.

pub mod fetch;
pub mod host;
pub mod mime_detect;

pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use host::{HttpImageHost, ImageHost};
pub use mime_detect::{has_image_extension, is_image, mime_for_filename};

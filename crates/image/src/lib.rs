//! Still-image handling for the timelapse workspace.
//!
//! Camera frames arrive as JPEG (MJPG devices), packed YUYV or RGB. Everything
//! that ends up on disk is JPEG, so this crate only needs to convert raw
//! formats to RGB and encode RGB as JPEG.

mod convert;
pub use convert::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod pixelformat;
pub use pixelformat::*;

//! Camera capability for the timelapse workspace.
//!
//! A [`Camera`] is opened once through a [`CameraHandle`], which closes it
//! again when dropped. Frames come back as [`VideoFrame`]s wrapping an
//! [`image::Image`] in whatever format the device delivers.

mod camera;
pub use camera::*;

mod error;
pub use error::*;

mod platform;
pub use platform::*;

mod videoframe;
pub use videoframe::*;

#[cfg(all(feature = "v4l2", target_os = "linux"))]
pub mod v4l2;

#[cfg(all(feature = "v4l2", target_os = "linux"))]
pub use v4l2::V4l2Camera;

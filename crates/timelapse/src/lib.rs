//! Interval still capture with optional video compilation.
//!
//! A session is three steps run one after the other: validate a
//! [`CaptureConfig`], [`capture::run`] until the limit or a stop request, then
//! optionally [`compile`] the saved frames with an external encoder.

pub mod capture;
pub use capture::{CaptureOutcome, CaptureState, TerminalState};

mod compile;
pub use compile::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod sequence;
pub use sequence::*;

mod stop;
pub use stop::*;

//! Shared plumbing for the timelapse workspace.
//!
//! Right now that is only logging: a stdout logger, a date-rolled file logger
//! and a tee of the two, all behind the `log` facade.

pub mod logging;

pub use logging::{
    FileLogger, StdoutLogger, TeeLogger, format_timestamp, format_today, init_file_logger,
    init_stdout_logger,
};

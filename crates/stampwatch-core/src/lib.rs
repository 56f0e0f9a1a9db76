//! Stampwatch Core Library
//!
//! Append-only timestamp log writer driven by a start/mark/stop stopwatch.
//!
//! # Example
//!
//! ```no_run
//! use stampwatch_core::{CoreResult, DirectoryPicker, SessionRecorder};
//!
//! use std::{path::Path, thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut recorder = SessionRecorder::new();
//!     recorder.select_target(&DirectoryPicker, Some(Path::new("logs")))?;
//!
//!     recorder.start()?;
//!     sleep(Duration::from_secs(3));
//!     if let Some(elapsed) = recorder.mark()? {
//!         println!("Marked at {}", elapsed);
//!     }
//!     recorder.stop()?;
//!
//!     println!("{}", recorder.read_all()?);
//!     Ok(())
//! }
//! ```

mod error;
mod recorder;

pub use {
    error::RecorderError,
    error::Result as CoreResult,
    recorder::{
        Clock, DirectoryPicker, RecordingState, SessionRecorder, SystemClock, TargetPicker, format,
    },
};

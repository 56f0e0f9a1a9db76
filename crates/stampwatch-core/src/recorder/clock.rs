use std::time::Instant;

use chrono::{DateTime, Local};

/// Time source for the recorder.
///
/// Wall-clock time stamps headers, shorts and file names; the monotonic
/// instant measures elapsed time between start and each mark.
pub trait Clock {
    /// Current local date and time.
    fn now(&self) -> DateTime<Local>;

    /// Current monotonic instant.
    fn instant(&self) -> Instant;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

//! Literal log line formats.
//!
//! Spacing, newline counts and the separator width are a compatibility
//! contract with existing logs. Do not change them.

use std::time::Duration;

use chrono::{DateTime, TimeZone};

/// Default file name pattern offered when selecting a target.
const FILE_NAME_FORMAT: &str = "[%d-%m-%Y][%H-%M-%S] - WRITE HERE.txt";

/// Date/time stamp used by section headers and shorts.
const STAMP_FORMAT: &str = "[%d-%m][%H-%M-%S]";

/// Width of the underscore line written when a recording stops.
pub const SEPARATOR_WIDTH: usize = 46;

/// Literal marker appended for a voice note.
pub const VOICE_NOTE_MARKER: &str = "*VOICE NOTE*";

/// Default target file name, e.g. `[19-10-2026][14-05-09] - WRITE HERE.txt`.
pub fn default_file_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(FILE_NAME_FORMAT).to_string()
}

/// Header written when a recording starts: `\n0 - [DD-MM][HH-MM-SS] -\n\n`.
pub fn section_header<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("\n0 - {} -\n\n", now.format(STAMP_FORMAT))
}

/// Mark line: `\n{ordinal} - [HH:MM:SS] -`.
pub fn mark_line(ordinal: u32, elapsed: &str) -> String {
    format!("\n{ordinal} - [{elapsed}] -")
}

/// Separator written when a recording stops.
pub fn separator_line() -> String {
    format!("\n{}\n", "_".repeat(SEPARATOR_WIDTH))
}

/// Short line: `\nSHORT-[DD-MM][HH-MM-SS] -\n\n`.
pub fn short_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("\nSHORT-{} -\n\n", now.format(STAMP_FORMAT))
}

/// Formats elapsed time as `HH:MM:SS`.
///
/// Hours never wrap at 24; they keep growing with a two-digit minimum
/// (`25:00:00`, `100:00:00`). Sub-second precision is truncated.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

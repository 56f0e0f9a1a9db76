use super::{CancelPicker, FixedPicker, ManualClock};
use crate::{DirectoryPicker, RecorderError, RecordingState, SessionRecorder};

use std::{fs, path::PathBuf, time::Duration};

use tempfile::TempDir;

const SEPARATOR: &str = "______________________________________________";

#[allow(clippy::unwrap_used)]
fn recorder_with_target() -> (TempDir, PathBuf, SessionRecorder<ManualClock>, ManualClock) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.txt");
    let clock = ManualClock::new();
    let mut recorder = SessionRecorder::with_clock(clock.clone());
    recorder
        .select_target(&FixedPicker(path.clone()), None)
        .unwrap();
    (dir, path, recorder, clock)
}

/// WHAT: Every write operation is refused without a target
/// WHY: Hotkeys may fire before a file has been created
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_target_when_invoking_operations_then_all_refused() {
    // Given: A fresh recorder
    let mut recorder = SessionRecorder::with_clock(ManualClock::new());

    // When/Then: Every operation reports a failed precondition
    assert!(!recorder.start().unwrap());
    assert_eq!(recorder.mark().unwrap(), None);
    assert!(!recorder.stop().unwrap());
    assert!(!recorder.save_short().unwrap());
    assert!(!recorder.mark_voice_note().unwrap());
    assert!(!recorder.overwrite("text").unwrap());
    assert_eq!(recorder.read_all().unwrap(), "");
    assert!(!recorder.is_recording());
    assert_eq!(recorder.target(), None);
}

/// WHAT: Selecting a target creates an empty file in the hinted directory
/// WHY: The file must exist before the first append
#[test]
#[allow(clippy::unwrap_used)]
fn given_directory_hint_when_selecting_target_then_dated_file_created() {
    // Given: A recorder and an output directory
    let dir = TempDir::new().unwrap();
    let mut recorder = SessionRecorder::with_clock(ManualClock::new());

    // When: Selecting a target with the directory picker
    let path = recorder
        .select_target(&DirectoryPicker, Some(dir.path()))
        .unwrap()
        .unwrap();

    // Then: File exists, is empty and carries the dated default name
    assert_eq!(
        path,
        dir.path().join("[07-03-2026][09-04-02] - WRITE HERE.txt")
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    assert_eq!(recorder.target(), Some(path.as_path()));
}

/// WHAT: Selecting an existing file keeps its content
/// WHY: Picking an old log must not erase it
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_file_when_selecting_target_then_content_kept() {
    // Given: A file with prior content
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.txt");
    fs::write(&path, "earlier notes").unwrap();
    let mut recorder = SessionRecorder::with_clock(ManualClock::new());

    // When: Selecting it
    recorder
        .select_target(&FixedPicker(path.clone()), None)
        .unwrap();

    // Then: Content is untouched
    assert_eq!(recorder.read_all().unwrap(), "earlier notes");
}

/// WHAT: A cancelled selection keeps the previous session
/// WHY: Closing the dialog must not lose the active log
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_selection_cancelled_then_session_unchanged() {
    // Given: A recording in progress
    let (_dir, path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();

    // When: The picker cancels
    let result = recorder.select_target(&CancelPicker, None).unwrap();

    // Then: Same target, still recording
    assert_eq!(result, None);
    assert_eq!(recorder.target(), Some(path.as_path()));
    assert!(recorder.is_recording());
}

/// WHAT: A new target resets the session to idle
/// WHY: No session spans multiple files
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_new_target_selected_then_idle() {
    // Given: A recording with marks
    let (dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();
    recorder.mark().unwrap();

    // When: Selecting another file
    let other = dir.path().join("other.txt");
    recorder
        .select_target(&FixedPicker(other.clone()), None)
        .unwrap();

    // Then: Idle on the new target, nothing written there
    assert_eq!(recorder.state(), RecordingState::Idle);
    assert_eq!(recorder.mark_count(), 0);
    assert_eq!(recorder.mark().unwrap(), None);
    assert_eq!(fs::read_to_string(&other).unwrap(), "");
}

/// WHAT: Start writes the section header and activates the stopwatch
/// WHY: Header anchors the marks that follow
#[test]
#[allow(clippy::unwrap_used)]
fn given_target_when_starting_then_header_written() {
    // Given: An idle recorder with a target
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();

    // When: Starting
    let started = recorder.start().unwrap();

    // Then: Header appended and state is active with no marks
    assert!(started);
    assert!(recorder.is_recording());
    assert_eq!(recorder.mark_count(), 0);
    assert_eq!(recorder.read_all().unwrap(), "\n0 - [07-03][09-04-02] -\n\n");
}

/// WHAT: Starting twice is refused
/// WHY: A second header would break the section structure
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_starting_again_then_refused_without_write() {
    // Given: An active recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();
    let before = recorder.read_all().unwrap();

    // When: Starting again
    let started = recorder.start().unwrap();

    // Then: Refused and file unchanged
    assert!(!started);
    assert_eq!(recorder.read_all().unwrap(), before);
}

/// WHAT: Mark is refused while idle
/// WHY: Elapsed time has no origin before start
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_marking_then_none() {
    // Given: A target but no recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();

    // When: Marking
    let marked = recorder.mark().unwrap();

    // Then: Nothing returned or written
    assert_eq!(marked, None);
    assert_eq!(recorder.read_all().unwrap(), "");
}

/// WHAT: Marks carry elapsed time and a running ordinal
/// WHY: The ordinal must equal the number of marks since start
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_marking_then_elapsed_and_ordinal_written() {
    // Given: An active recording
    let (_dir, _path, mut recorder, clock) = recorder_with_target();
    recorder.start().unwrap();

    // When: Marking after 65s and again after 3h
    clock.advance(Duration::from_secs(65));
    let first = recorder.mark().unwrap();
    clock.advance(Duration::from_secs(3 * 3600));
    let second = recorder.mark().unwrap();

    // Then: Elapsed strings and lines match, counter is 2
    assert_eq!(first.as_deref(), Some("00:01:05"));
    assert_eq!(second.as_deref(), Some("03:01:05"));
    assert_eq!(recorder.mark_count(), 2);
    assert!(
        recorder
            .read_all()
            .unwrap()
            .ends_with("\n1 - [00:01:05] -\n2 - [03:01:05] -")
    );
}

/// WHAT: Counter equals N after N marks and resets on stop and start
/// WHY: Each recording numbers its marks from 1
#[test]
#[allow(clippy::unwrap_used)]
fn given_n_marks_when_stopping_and_restarting_then_counter_resets() {
    // Given: An active recording with five marks
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();
    for _ in 0..5 {
        recorder.mark().unwrap();
    }
    assert_eq!(recorder.mark_count(), 5);

    // When: Stopping
    recorder.stop().unwrap();

    // Then: Counter is 0, and the next recording starts at mark 1
    assert_eq!(recorder.mark_count(), 0);
    recorder.start().unwrap();
    assert_eq!(recorder.mark_count(), 0);
    recorder.mark().unwrap();
    assert_eq!(recorder.mark_count(), 1);
    assert!(recorder.read_all().unwrap().ends_with("\n1 - [00:00:00] -"));
}

/// WHAT: Full session produces header, numbered marks and separator in order
/// WHY: This is the canonical layout of a recorded section
#[test]
#[allow(clippy::unwrap_used)]
fn given_target_when_start_mark_mark_stop_then_section_in_order() {
    // Given: A fresh target
    let (_dir, _path, mut recorder, clock) = recorder_with_target();

    // When: Start, mark twice, stop
    assert!(recorder.start().unwrap());
    clock.advance(Duration::from_secs(1));
    recorder.mark().unwrap();
    clock.advance(Duration::from_secs(1));
    recorder.mark().unwrap();
    assert!(recorder.stop().unwrap());

    // Then: Exact file content
    let expected = format!(
        "\n0 - [07-03][09-04-02] -\n\n\n1 - [00:00:01] -\n2 - [00:00:02] -\n{SEPARATOR}\n"
    );
    let content = recorder.read_all().unwrap();
    assert_eq!(content, expected);
    assert_eq!(content.matches("0 - [").count(), 1);
    assert_eq!(content.matches(SEPARATOR).count(), 1);
    assert!(!recorder.is_recording());
}

/// WHAT: Stop is refused while idle
/// WHY: A separator without a section is noise
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_stopping_then_refused() {
    // Given: A target but no recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();

    // When: Stopping
    let stopped = recorder.stop().unwrap();

    // Then: Refused, nothing written
    assert!(!stopped);
    assert_eq!(recorder.read_all().unwrap(), "");
}

/// WHAT: Shorts are written while idle without touching state
/// WHY: Shorts are independent of the stopwatch
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_saving_short_then_line_appended_and_state_kept() {
    // Given: A target, no recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();

    // When: Saving a short
    let saved = recorder.save_short().unwrap();

    // Then: SHORT line written, still idle with no marks
    assert!(saved);
    assert_eq!(
        recorder.read_all().unwrap(),
        "\nSHORT-[07-03][09-04-02] -\n\n"
    );
    assert_eq!(recorder.state(), RecordingState::Idle);
    assert_eq!(recorder.mark_count(), 0);
}

/// WHAT: Shorts during a recording leave the counter alone
/// WHY: Only marks advance the ordinal
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_saving_short_then_counter_unchanged() {
    // Given: A recording with one mark
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();
    recorder.mark().unwrap();

    // When: Saving a short
    recorder.save_short().unwrap();

    // Then: Still recording with one mark
    assert!(recorder.is_recording());
    assert_eq!(recorder.mark_count(), 1);
}

/// WHAT: Voice note while idle writes nothing
/// WHY: Voice notes belong to a running recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_marking_voice_note_then_refused_without_write() {
    // Given: A target, no recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();

    // When: Marking a voice note
    let marked = recorder.mark_voice_note().unwrap();

    // Then: Refused, file empty
    assert!(!marked);
    assert_eq!(recorder.read_all().unwrap(), "");
}

/// WHAT: Voice note appends the bare marker without a mark of its own
/// WHY: Callers compose mark + voice note themselves
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_mark_then_voice_note_then_marker_follows_mark() {
    // Given: An active recording
    let (_dir, _path, mut recorder, clock) = recorder_with_target();
    recorder.start().unwrap();
    clock.advance(Duration::from_secs(42));

    // When: Marking then adding a voice note
    recorder.mark().unwrap();
    let marked = recorder.mark_voice_note().unwrap();

    // Then: Marker directly follows the mark line, counter stays 1
    assert!(marked);
    assert_eq!(recorder.mark_count(), 1);
    assert!(
        recorder
            .read_all()
            .unwrap()
            .ends_with("\n1 - [00:00:42] -*VOICE NOTE*")
    );
}

/// WHAT: Overwrite replaces content with trimmed text
/// WHY: The editor buffer is saved back verbatim minus outer whitespace
#[test]
#[allow(clippy::unwrap_used)]
fn given_content_when_overwriting_then_read_returns_trimmed_content() {
    // Given: A target with existing content
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.save_short().unwrap();
    let content = "\n\n  edited line one\n\nline two  \n\t\n";

    // When: Overwriting twice with the same text
    assert!(recorder.overwrite(content).unwrap());
    let first = recorder.read_all().unwrap();
    assert!(recorder.overwrite(content).unwrap());

    // Then: Read returns the trimmed text, stable across repeats
    assert_eq!(first, "edited line one\n\nline two");
    assert_eq!(recorder.read_all().unwrap(), first);
}

/// WHAT: Overwrite works while recording and keeps the state
/// WHY: Autosave runs regardless of the stopwatch
#[test]
#[allow(clippy::unwrap_used)]
fn given_active_session_when_overwriting_then_recording_continues() {
    // Given: An active recording
    let (_dir, _path, mut recorder, _clock) = recorder_with_target();
    recorder.start().unwrap();
    recorder.mark().unwrap();

    // When: Overwriting
    recorder.overwrite("kept").unwrap();

    // Then: Still recording, the next mark is appended after the new content
    assert!(recorder.is_recording());
    recorder.mark().unwrap();
    assert_eq!(recorder.read_all().unwrap(), "kept\n2 - [00:00:00] -");
}

/// WHAT: A target deleted externally reads as empty
/// WHY: Missing files are not errors
#[test]
#[allow(clippy::unwrap_used)]
fn given_deleted_target_when_reading_then_empty_string() {
    // Given: A target whose file was removed
    let (_dir, path, recorder, _clock) = recorder_with_target();
    fs::remove_file(&path).unwrap();

    // When: Reading
    let content = recorder.read_all().unwrap();

    // Then: Empty
    assert_eq!(content, "");
}

/// WHAT: Appends recreate a deleted target
/// WHY: Append mode creates the file on demand
#[test]
#[allow(clippy::unwrap_used)]
fn given_deleted_target_when_saving_short_then_file_recreated() {
    // Given: A target whose file was removed
    let (_dir, path, mut recorder, _clock) = recorder_with_target();
    fs::remove_file(&path).unwrap();

    // When: Saving a short
    recorder.save_short().unwrap();

    // Then: File exists again with the short line
    assert!(path.exists());
    assert!(recorder.read_all().unwrap().contains("SHORT-"));
}

/// WHAT: IO failures surface as Io errors and do not change state
/// WHY: Only preconditions are silent; real failures must propagate
#[test]
#[allow(clippy::unwrap_used)]
fn given_unwritable_target_when_starting_then_io_error_and_still_idle() {
    // Given: A target whose parent directory has been removed
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("gone");
    fs::create_dir(&sub).unwrap();
    let path = sub.join("session.txt");
    let mut recorder = SessionRecorder::with_clock(ManualClock::new());
    recorder
        .select_target(&FixedPicker(path.clone()), None)
        .unwrap();
    fs::remove_dir_all(&sub).unwrap();

    // When: Starting
    let result = recorder.start();

    // Then: Io error for that path and recording did not begin
    assert!(matches!(result, Err(RecorderError::Io { path: ref p, .. }) if *p == path));
    assert!(!recorder.is_recording());
}

//! Render timing and the render debug log.
//!
//! `--perf` turns on per-scope timings, emitted as `tracing` debug events.
//! `--render-debug-log PATH` appends one line per editor, preview and event
//! loop event to a file, stamped with milliseconds since the log opened.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static TIMING: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: Mutex<Option<EventLog>> = Mutex::new(None);

struct EventLog {
    opened: Instant,
    out: BufWriter<File>,
}

fn event_log() -> MutexGuard<'static, Option<EventLog>> {
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Times a named stretch of work until dropped. Inert unless `--perf` is on.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    started: Option<Instant>,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let Some(started) = self.started else {
            return;
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: "markpad::perf", scope = self.name, elapsed_ms, "perf");
        log_event(self.name, format!("{elapsed_ms:.2} ms"));
    }
}

pub fn set_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        started: is_enabled().then(Instant::now),
    }
}

/// Open the render debug log at `path`, or close it with `None`.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let next = match path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            writeln!(out, "markpad render debug log start")?;
            out.flush()?;
            Some(EventLog {
                opened: Instant::now(),
                out,
            })
        }
        None => None,
    };
    *event_log() = next;
    Ok(())
}

/// Append `name: detail` to the render debug log when it is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut guard = event_log();
    let Some(log) = guard.as_mut() else {
        return;
    };
    let at_ms = log.opened.elapsed().as_secs_f64() * 1000.0;
    // A failing debug log must not disturb editing.
    let _ = writeln!(log.out, "[{at_ms:>10.3} ms] {name}: {}", detail.as_ref())
        .and_then(|()| log.out.flush());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_scope_only_times_when_enabled() {
        set_enabled(false);
        assert!(scope("idle").started.is_none());

        set_enabled(true);
        assert!(is_enabled());
        assert!(scope("busy").started.is_some());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_records_events_until_closed() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        log_event("editor.dispatch", "bold");
        set_debug_log_path(None).unwrap();
        log_event("editor.dispatch", "after-close");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("markpad render debug log start"));
        assert!(content.contains("editor.dispatch: bold"));
        assert!(!content.contains("after-close"));
    }
}

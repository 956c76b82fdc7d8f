//! Lightweight performance instrumentation.
//!
//! `--perf` turns on timing scopes, reported through `tracing` at debug
//! level. `--debug-log PATH` additionally appends timestamped editor events
//! to a plain file that survives the alternate screen.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: Mutex<Option<EventLog>> = Mutex::new(None);

/// Times the enclosing block while `--perf` is on.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(target: "htmlpad::perf", scope = self.name, elapsed_ms, "perf scope");
        log_event(self.name, format!("{elapsed_ms:.2} ms"));
    }
}

/// Open debug log; timestamps are relative to when it was opened.
#[derive(Debug)]
struct EventLog {
    opened: Instant,
    out: BufWriter<File>,
}

impl EventLog {
    fn create(path: &Path) -> io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "htmlpad debug log start")?;
        out.flush()?;
        Ok(Self {
            opened: Instant::now(),
            out,
        })
    }

    fn append(&mut self, name: &str, detail: &str) -> io::Result<()> {
        let at_ms = self.opened.elapsed().as_secs_f64() * 1000.0;
        writeln!(self.out, "[{at_ms:>10.3} ms] {name}: {detail}")?;
        self.out.flush()
    }
}

fn event_log() -> MutexGuard<'static, Option<EventLog>> {
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start writing events to `path`, or stop logging with `None`.
pub fn set_debug_log_path(path: Option<&Path>) -> io::Result<()> {
    let log = path.map(EventLog::create).transpose()?;
    *event_log() = log;
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    event_log().is_some()
}

/// Append one event line. Write failures are dropped.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    if let Some(log) = event_log().as_mut()
        && let Err(err) = log.append(name, detail.as_ref())
    {
        tracing::trace!(%err, "debug log write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_records_events_until_closed() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("session.apply", "insertTag");
        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());
        log_event("session.apply", "after close");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("htmlpad debug log start"));
        assert!(content.contains("session.apply: insertTag"));
        assert!(!content.contains("after close"));
    }

    #[test]
    fn test_debug_log_rejects_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("debug.log");
        assert!(set_debug_log_path(Some(&path)).is_err());
    }
}

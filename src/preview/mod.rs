//! Debounced preview synchronization.
//!
//! The preview collaborator is a plain file (`--preview PATH`) that a
//! browser or static server can reload. Edits only move the deadline; the
//! buffer is written once the editor has been quiet for the configured
//! delay, so a burst of keystrokes costs a single write.

use std::io;
use std::path::{Path, PathBuf};

/// Coalesces change notifications into one ready signal per quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDebouncer {
    delay_ms: u64,
    pending: Option<u64>,
}

impl PreviewDebouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Note a change at `now_ms`; a later change supersedes this one.
    pub const fn queue(&mut self, now_ms: u64) {
        self.pending = Some(now_ms);
    }

    /// `true` once, after the delay has elapsed since the last change.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.pending else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub const fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Writes buffer snapshots to the preview file.
#[derive(Debug)]
pub struct PreviewSync {
    path: PathBuf,
    debouncer: PreviewDebouncer,
    last_written: Option<String>,
}

impl PreviewSync {
    pub const fn new(path: PathBuf, delay_ms: u64) -> Self {
        Self {
            path,
            debouncer: PreviewDebouncer::new(delay_ms),
            last_written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record that the buffer changed.
    pub const fn notify(&mut self, now_ms: u64) {
        self.debouncer.queue(now_ms);
    }

    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Write `text` if a change has settled. Returns whether a write
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from writing the preview file.
    pub fn poll(&mut self, now_ms: u64, text: impl FnOnce() -> String) -> io::Result<bool> {
        if !self.debouncer.take_ready(now_ms) {
            return Ok(false);
        }
        self.write(text())
    }

    /// Write immediately, skipping the write when the content is unchanged.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from writing the preview file.
    pub fn write(&mut self, text: String) -> io::Result<bool> {
        if self.last_written.as_deref() == Some(text.as_str()) {
            return Ok(false);
        }
        let _scope = crate::perf::scope("preview.write");
        write_atomically(&self.path, text.as_bytes())?;
        crate::perf::log_event(
            "preview.write",
            format!("path={} bytes={}", self.path.display(), text.len()),
        );
        self.last_written = Some(text);
        Ok(true)
    }
}

/// Write through a sibling temp file so readers never see a torn file.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}

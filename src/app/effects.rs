use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use base64::Engine;

use crate::app::model::HostEffect;
use crate::app::{App, Model, ToastLevel};

impl App {
    /// Run the file and clipboard work queued by `update`.
    pub(super) fn handle_pending_io(model: &mut Model) {
        for effect in model.take_pending_io() {
            match effect {
                HostEffect::CopyToTerminal(text) => {
                    if let Err(err) = copy_to_terminal_clipboard(&text) {
                        tracing::warn!(%err, "terminal clipboard write failed");
                        model.show_toast(
                            ToastLevel::Warning,
                            format!("Copied inside htmlpad only: {err}"),
                        );
                    }
                }
                HostEffect::Save(path) => save_document(model, path),
                HostEffect::Open(path) => open_document(model, path),
            }
        }
    }
}

/// Write the buffer to `path`; on success `path` becomes the current file.
pub(super) fn save_document(model: &mut Model, path: PathBuf) {
    let _scope = crate::perf::scope("app.save");
    let text = model.session.text();
    match std::fs::write(&path, &text) {
        Ok(()) => {
            model.session.mark_saved();
            crate::perf::log_event(
                "file.save",
                format!("path={} bytes={}", path.display(), text.len()),
            );
            model.file_path = Some(path);
            let name = model.display_name();
            model.show_toast(ToastLevel::Info, format!("Saved: {name}"));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "save failed");
            model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
        }
    }
}

/// Replace the buffer with the contents of `path`.
pub(super) fn open_document(model: &mut Model, path: PathBuf) {
    let _scope = crate::perf::scope("app.open");
    match read_document(&path) {
        Ok(text) => {
            model.load_document(path, &text);
            let name = model.display_name();
            model.show_toast(ToastLevel::Info, format!("Opened: {name}"));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "open failed");
            model.show_toast(ToastLevel::Error, format!("Open failed: {err}"));
        }
    }
}

/// Read a document, replacing invalid UTF-8 rather than refusing the file.
pub fn read_document(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

fn copy_to_terminal_clipboard(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

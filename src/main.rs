//! htmlpad - A terminal HTML editor with live highlighting.
//!
//! # Usage
//!
//! ```bash
//! htmlpad index.html
//! htmlpad --preview /tmp/preview.html index.html
//! htmlpad --history-limit 200 --theme light page.html
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use htmlpad::app::{App, read_document};
use htmlpad::command::snippets::DEFAULT_DOCUMENT;
use htmlpad::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use htmlpad::highlight::{HighlightBackground, set_background_mode};
use htmlpad::perf;

/// A terminal HTML editor with live highlighting and preview sync
#[derive(Parser, Debug)]
#[command(name = "htmlpad", version, about, long_about = None)]
struct Cli {
    /// HTML file to edit; a starter document is used when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keep a copy of the buffer in this file for a browser to reload
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Milliseconds of quiet before the preview file is rewritten
    #[arg(long, value_name = "MS")]
    preview_delay: Option<u64>,

    /// Number of undo snapshots to keep
    #[arg(long, value_name = "N")]
    history_limit: Option<usize>,

    /// Force highlight colors for a light or dark terminal
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed editor events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

// Query the terminal background using OSC 11 on /dev/tty so the reply
// arrives even when stdout is piped. Other platforms keep the default.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::{Read, Write};
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();
    let mut tty = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let mut reader = tty.try_clone()?;

    tty.write_all(b"\x1b]11;?\x07")?;
    tty.flush()?;

    std::thread::spawn(move || {
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        while let Ok(n) = reader.read(&mut buf) {
            collected.extend_from_slice(&buf[..n]);
            if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\") {
                let _ = tx.send(collected);
                break;
            }
        }
    });

    let reply = rx.recv_timeout(Duration::from_millis(75)).unwrap_or_default();
    Ok(parse_osc11_reply(&String::from_utf8_lossy(&reply)))
}

fn background_from_rgb((r, g, b): (u8, u8, u8)) -> HighlightBackground {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        HighlightBackground::Light
    } else {
        HighlightBackground::Dark
    }
}

fn detect_background() -> Option<HighlightBackground> {
    let _raw = enable_raw_mode();
    let result = query_terminal_background();
    let _ = disable_raw_mode();
    result.ok().flatten().map(background_from_rgb)
}

/// `ESC ] 11 ; rgb:RRRR/GGGG/BBBB` terminated by BEL or ST.
fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")?;
    let mut parts = reply[start + 4..].split(['/', '\x07', '\x1b']);
    let r = parse_osc_component(parts.next()?)?;
    let g = parse_osc_component(parts.next()?)?;
    let b = parse_osc_component(parts.next()?)?;
    Some((r, g, b))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    match hex.len() {
        2 => u8::from_str_radix(hex, 16).ok(),
        n if n >= 4 => {
            let v = u16::from_str_radix(hex.get(..4)?, 16).ok()?;
            u8::try_from(v >> 8).ok()
        }
        _ => None,
    }
}

/// Text to start editing, plus a notice for the first frame.
fn initial_document(file: Option<&PathBuf>) -> Result<(String, Option<String>)> {
    let Some(path) = file else {
        return Ok((DEFAULT_DOCUMENT.to_string(), None));
    };
    match read_document(path) {
        Ok(text) => Ok((text, None)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok((
            String::new(),
            Some("File not found. Starting with empty editor.".to_string()),
        )),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn main() -> Result<()> {
    // Logs go to stderr, which the alternate screen hides until exit.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "resolved configuration");

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("HTMLPAD_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?debug_log_path,
            %err,
            "failed to initialize debug log"
        );
    }

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(detect_background()),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let (text, notice) = initial_document(cli.file.as_ref())?;

    let mut app = App::new(cli.file, text)
        .with_history_limit(effective.history_limit())
        .with_preview(effective.preview.clone(), effective.preview_delay())
        .with_startup_notice(notice);

    app.run().context("Application error")
}

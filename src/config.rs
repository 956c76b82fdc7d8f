use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Preview debounce when no `--preview-delay` is given.
pub const DEFAULT_PREVIEW_DELAY_MS: u64 = 150;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub preview: Option<PathBuf>,
    pub preview_delay_ms: Option<u64>,
    pub history_limit: Option<usize>,
    pub theme: Option<ThemeMode>,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are OR'ed, options from `other`
    /// win when present.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            preview: other.preview.clone().or_else(|| self.preview.clone()),
            preview_delay_ms: other.preview_delay_ms.or(self.preview_delay_ms),
            history_limit: other.history_limit.or(self.history_limit),
            theme: other.theme.or(self.theme),
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    pub fn preview_delay(&self) -> u64 {
        self.preview_delay_ms.unwrap_or(DEFAULT_PREVIEW_DELAY_MS)
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
            .unwrap_or(crate::editor::DEFAULT_HISTORY_LIMIT)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("htmlpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("htmlpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("htmlpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("htmlpad")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".htmlpadrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# htmlpad defaults (saved with --save)".to_string()];
    if let Some(preview) = &flags.preview {
        lines.push(format!("--preview {}", preview.display()));
    }
    if let Some(delay) = flags.preview_delay_ms {
        lines.push(format!("--preview-delay {delay}"));
    }
    if let Some(limit) = flags.history_limit {
        lines.push(format!("--history-limit {limit}"));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list. Unknown tokens and malformed
/// values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--preview" | "--preview-delay" | "--history-limit" | "--theme" | "--debug-log"
        );
        let value = if takes_value && inline.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline
        };
        match (name, value) {
            ("--perf", _) => flags.perf = true,
            ("--preview", Some(v)) => flags.preview = Some(PathBuf::from(v)),
            ("--preview-delay", Some(v)) => {
                flags.preview_delay_ms = v.parse().ok().or(flags.preview_delay_ms);
            }
            ("--history-limit", Some(v)) => {
                flags.history_limit = v.parse().ok().or(flags.history_limit);
            }
            ("--theme", Some(v)) => flags.theme = parse_theme(v),
            ("--debug-log", Some(v)) => flags.debug_log = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

//! The closed table of editor actions.
//!
//! Menus, the find panel and keyboard shortcuts all speak in
//! `(action_id, payload)` pairs. [`Command::parse`] turns such a pair into a
//! typed [`Command`]; anything outside the table is a [`CommandError`].

pub mod snippets;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Action {action} requires a payload")]
    MissingPayload { action: &'static str },
    #[error("Invalid payload for {action}: {payload:?}")]
    InvalidPayload {
        action: &'static str,
        payload: String,
    },
}

/// `type` attribute of an inserted `<input>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Password,
    Checkbox,
    Radio,
    Hidden,
}

impl InputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Hidden => "hidden",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "password" => Some(Self::Password),
            "checkbox" => Some(Self::Checkbox),
            "radio" => Some(Self::Radio),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Description,
    Author,
}

impl MetaKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Author => "author",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "description" => Some(Self::Description),
            "author" => Some(Self::Author),
            _ => None,
        }
    }
}

/// A key from the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualKey {
    Char(char),
    Space,
    Enter,
    Tab,
    Backspace,
}

impl VirtualKey {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "Space" => Some(Self::Space),
            "Enter" => Some(Self::Enter),
            "Tab" => Some(Self::Tab),
            "Backspace" => Some(Self::Backspace),
            _ => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Some(Self::Char(ch)),
                    _ => None,
                }
            }
        }
    }

    fn payload(self) -> String {
        match self {
            Self::Char(ch) => ch.to_string(),
            Self::Space => "Space".to_string(),
            Self::Enter => "Enter".to_string(),
            Self::Tab => "Tab".to_string(),
            Self::Backspace => "Backspace".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewFile,
    OpenFile,
    SaveFile,
    SaveAsFile,
    ExitApp,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    FindReplace,
    InsertDate,
    /// Wrap with a tag; default content `Content`, or `Item` for `dt`/`dd`.
    InsertTag(String),
    /// Wrap with a tag; default content `text`.
    WrapSelection(String),
    InsertForm,
    InsertInput(InputKind),
    InsertSelect,
    InsertOption,
    InsertTextarea,
    InsertVideo,
    InsertAudio,
    InsertMeta(MetaKind),
    ShowAbout,
    ShowDocs,
    Clear,
    Find,
    FindNext,
    Replace,
    ReplaceAll,
    SetFindText(String),
    SetReplaceText(String),
    ToggleCaseSensitive,
    ToggleWholeWord,
    KeyboardKey(VirtualKey),
}

impl Command {
    /// Look up an action id, validating its payload.
    pub fn parse(action: &str, payload: Option<&str>) -> Result<Self, CommandError> {
        let command = match action {
            "newFile" => Self::NewFile,
            "openFile" => Self::OpenFile,
            "saveFile" => Self::SaveFile,
            "saveAsFile" => Self::SaveAsFile,
            "exitApp" => Self::ExitApp,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "cut" => Self::Cut,
            "copy" => Self::Copy,
            "paste" => Self::Paste,
            "findReplace" => Self::FindReplace,
            "insertDate" => Self::InsertDate,
            "insertTag" => Self::InsertTag(tag_name("insertTag", payload)?),
            "wrapSelection" => Self::WrapSelection(tag_name("wrapSelection", payload)?),
            "insertForm" => Self::InsertForm,
            "insertInput" => {
                let value = required("insertInput", payload)?;
                Self::InsertInput(
                    InputKind::parse(value).ok_or_else(|| invalid("insertInput", value))?,
                )
            }
            "insertSelect" => Self::InsertSelect,
            "insertOption" => Self::InsertOption,
            "insertTextarea" => Self::InsertTextarea,
            "insertVideo" => Self::InsertVideo,
            "insertAudio" => Self::InsertAudio,
            "insertMeta" => {
                let value = required("insertMeta", payload)?;
                Self::InsertMeta(
                    MetaKind::parse(value).ok_or_else(|| invalid("insertMeta", value))?,
                )
            }
            "showAbout" => Self::ShowAbout,
            "showDocs" => Self::ShowDocs,
            "clear" => Self::Clear,
            "find" => Self::Find,
            "findNext" => Self::FindNext,
            "replace" => Self::Replace,
            "replaceAll" => Self::ReplaceAll,
            "setFindText" => Self::SetFindText(payload.unwrap_or_default().to_string()),
            "setReplaceText" => Self::SetReplaceText(payload.unwrap_or_default().to_string()),
            "toggleCaseSensitive" => Self::ToggleCaseSensitive,
            "toggleWholeWord" => Self::ToggleWholeWord,
            "keyboardKey" => {
                let value = required("keyboardKey", payload)?;
                Self::KeyboardKey(
                    VirtualKey::parse(value).ok_or_else(|| invalid("keyboardKey", value))?,
                )
            }
            other => return Err(CommandError::UnknownAction(other.to_string())),
        };
        Ok(command)
    }

    /// The action id this command was parsed from.
    pub const fn action_id(&self) -> &'static str {
        match self {
            Self::NewFile => "newFile",
            Self::OpenFile => "openFile",
            Self::SaveFile => "saveFile",
            Self::SaveAsFile => "saveAsFile",
            Self::ExitApp => "exitApp",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::FindReplace => "findReplace",
            Self::InsertDate => "insertDate",
            Self::InsertTag(_) => "insertTag",
            Self::WrapSelection(_) => "wrapSelection",
            Self::InsertForm => "insertForm",
            Self::InsertInput(_) => "insertInput",
            Self::InsertSelect => "insertSelect",
            Self::InsertOption => "insertOption",
            Self::InsertTextarea => "insertTextarea",
            Self::InsertVideo => "insertVideo",
            Self::InsertAudio => "insertAudio",
            Self::InsertMeta(_) => "insertMeta",
            Self::ShowAbout => "showAbout",
            Self::ShowDocs => "showDocs",
            Self::Clear => "clear",
            Self::Find => "find",
            Self::FindNext => "findNext",
            Self::Replace => "replace",
            Self::ReplaceAll => "replaceAll",
            Self::SetFindText(_) => "setFindText",
            Self::SetReplaceText(_) => "setReplaceText",
            Self::ToggleCaseSensitive => "toggleCaseSensitive",
            Self::ToggleWholeWord => "toggleWholeWord",
            Self::KeyboardKey(_) => "keyboardKey",
        }
    }

    /// The payload that parses back into this command, if it takes one.
    pub fn payload(&self) -> Option<String> {
        match self {
            Self::InsertTag(tag) | Self::WrapSelection(tag) => Some(tag.clone()),
            Self::SetFindText(text) | Self::SetReplaceText(text) => Some(text.clone()),
            Self::InsertInput(kind) => Some(kind.as_str().to_string()),
            Self::InsertMeta(kind) => Some(kind.as_str().to_string()),
            Self::KeyboardKey(key) => Some(key.payload()),
            _ => None,
        }
    }
}

fn required<'a>(action: &'static str, payload: Option<&'a str>) -> Result<&'a str, CommandError> {
    match payload {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CommandError::MissingPayload { action }),
    }
}

fn invalid(action: &'static str, payload: &str) -> CommandError {
    CommandError::InvalidPayload {
        action,
        payload: payload.to_string(),
    }
}

/// Tag names are ASCII alphanumerics and `-`, starting with a letter.
fn tag_name(action: &'static str, payload: Option<&str>) -> Result<String, CommandError> {
    let value = required(action, payload)?;
    let valid = value.starts_with(|c: char| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(value.to_string())
    } else {
        Err(invalid(action, value))
    }
}

use crate::domain::TaskError;
use crate::persistence::files::read_optional;
use crate::report::WorkCalendar;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User settings stored in config.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Editor command for `note edit`
    pub editor: Option<String>,
    pub calendar: WorkCalendar,
}

impl Settings {
    /// Editor from settings, then $EDITOR, then a platform default
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }
}

/// Load settings from config.json, defaults when the file is absent
pub fn load_settings(path: &Path) -> Result<Settings, TaskError> {
    let content = read_optional(path).map_err(|source| TaskError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = match content {
        Some(content) if !content.trim().is_empty() => {
            serde_json::from_str(&content).map_err(|source| TaskError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => Settings::default(),
    };

    settings.calendar.validate()?;
    Ok(settings)
}

//! Tracker configuration parsed from environment variables.

use std::path::PathBuf;

use time::UtcOffset;

use crate::error::ConfigError;

pub const DEFAULT_EXPORT_DIR: &str = ".";
pub const DEFAULT_DISPLAY_UTC_OFFSET_MINUTES: i32 = 0;

/// Who may read the visible record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordListAccess {
    /// Only an unlocked admin session may list records.
    #[default]
    AdminOnly,
    /// Anyone may list records; writes and exports stay gated.
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub list_access: RecordListAccess,
    pub export_dir: PathBuf,
    pub display_offset: UtcOffset,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            list_access: RecordListAccess::AdminOnly,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            display_offset: UtcOffset::UTC,
        }
    }
}

impl TrackerConfig {
    /// Build typed tracker config from environment variables.
    ///
    /// Optional:
    /// - `VISITOR_LIST_ACCESS`: `admin` (default) or `open`
    /// - `VISITOR_EXPORT_DIR`: directory for exported files, default `.`
    /// - `VISITOR_DISPLAY_UTC_OFFSET_MINUTES`: timestamp display offset, default 0
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let list_access = parse_list_access(env_var("VISITOR_LIST_ACCESS").as_deref())?;
        let export_dir = env_var("VISITOR_EXPORT_DIR").map_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR), PathBuf::from);
        let display_offset = parse_offset_minutes(env_var("VISITOR_DISPLAY_UTC_OFFSET_MINUTES").as_deref())?;

        Ok(Self { list_access, export_dir, display_offset })
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_owned()),
        _ => None,
    }
}

fn parse_list_access(raw: Option<&str>) -> Result<RecordListAccess, ConfigError> {
    match raw.unwrap_or("admin") {
        "admin" => Ok(RecordListAccess::AdminOnly),
        "open" => Ok(RecordListAccess::Open),
        other => Err(ConfigError::Parse(format!(
            "unknown VISITOR_LIST_ACCESS '{other}' (expected 'admin' or 'open')"
        ))),
    }
}

fn parse_offset_minutes(raw: Option<&str>) -> Result<UtcOffset, ConfigError> {
    let minutes = match raw {
        None => DEFAULT_DISPLAY_UTC_OFFSET_MINUTES,
        Some(value) => value
            .parse::<i32>()
            .map_err(|e| ConfigError::Parse(format!("VISITOR_DISPLAY_UTC_OFFSET_MINUTES '{value}': {e}")))?,
    };
    UtcOffset::from_whole_seconds(minutes.saturating_mul(60))
        .map_err(|e| ConfigError::Parse(format!("VISITOR_DISPLAY_UTC_OFFSET_MINUTES {minutes}: {e}")))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Editor configuration.
//!
//! [`EditorConfig`] carries the knobs of an [`EditorContext`](crate::EditorContext):
//! terminal geometry, line capacity and history policy. Values can be set
//! with the `with_*` builders, overlaid from the environment with
//! [`EditorConfig::from_env`], or (with the `serde` feature) deserialized.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Screen widths must be strictly greater than this.
pub const MIN_SCREEN_WIDTH: usize = 20;
pub const DEFAULT_SCREEN_WIDTH: usize = 80;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;
pub const DEFAULT_HISTORY_CAPACITY: usize = 512;

const MIN_LINE_LENGTH: usize = 3;
const MIN_HISTORY_CAPACITY: usize = 2;

pub const ENV_SCREEN_WIDTH: &str = "LINEKIT_SCREEN_WIDTH";
pub const ENV_HISTORY_SIZE: &str = "LINEKIT_HISTORY_SIZE";
pub const ENV_HISTORY_DEDUP: &str = "LINEKIT_HISTORY_DEDUP";
pub const ENV_BELL: &str = "LINEKIT_BELL";
const ENV_COLUMNS: &str = "COLUMNS";

/// Line editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EditorConfig {
    /// Terminal width in columns.
    pub screen_width: usize,
    /// Horizontal scroll step; `None` means a third of the screen width.
    pub scroll_span: Option<usize>,
    /// Buffer capacity. Lines hold at most `max_line_length - 2` characters.
    pub max_line_length: usize,
    /// Number of history slots, including the empty live-line slot.
    pub history_capacity: usize,
    /// Skip a history entry equal to the one just before it.
    pub history_dedup: bool,
    /// Ring the terminal bell on rejected commands.
    pub bell: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            scroll_span: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_dedup: false,
            bell: true,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_screen_width(mut self, width: usize) -> Self {
        self.screen_width = width;
        self
    }

    pub fn with_scroll_span(mut self, span: usize) -> Self {
        self.scroll_span = Some(span);
        self
    }

    pub fn with_max_line_length(mut self, length: usize) -> Self {
        self.max_line_length = length;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_history_dedup(mut self, dedup: bool) -> Self {
        self.history_dedup = dedup;
        self
    }

    pub fn with_bell(mut self, bell: bool) -> Self {
        self.bell = bell;
        self
    }

    /// The scroll step actually in force.
    pub fn effective_scroll_span(&self) -> usize {
        self.scroll_span.unwrap_or(self.screen_width / 3)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_screen_width(self.screen_width)?;

        let span = self.effective_scroll_span();
        if span == 0 || span > self.screen_width / 3 {
            return Err(ConfigError::InvalidScrollSpan {
                span,
                screen_width: self.screen_width,
            });
        }

        if self.max_line_length < MIN_LINE_LENGTH {
            return Err(ConfigError::LineLengthTooSmall {
                length: self.max_line_length,
                min: MIN_LINE_LENGTH,
            });
        }

        if self.history_capacity < MIN_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryCapacityTooSmall {
                capacity: self.history_capacity,
                min: MIN_HISTORY_CAPACITY,
            });
        }

        Ok(())
    }

    /// Defaults overlaid with the process environment, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env(|name| std::env::var(name).ok())
    }

    /// Overlay values from `lookup`, which maps variable names to values.
    ///
    /// `COLUMNS` is honoured when it parses to a usable width and ignored
    /// otherwise; the `LINEKIT_*` variables must be well formed.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(columns) = lookup(ENV_COLUMNS).and_then(|v| v.trim().parse::<usize>().ok()) {
            if columns > MIN_SCREEN_WIDTH {
                self.screen_width = columns;
            }
        }
        if let Some(value) = lookup(ENV_SCREEN_WIDTH) {
            self.screen_width = parse_number(ENV_SCREEN_WIDTH, &value)?;
        }
        if let Some(value) = lookup(ENV_HISTORY_SIZE) {
            self.history_capacity = parse_number(ENV_HISTORY_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_HISTORY_DEDUP) {
            self.history_dedup = parse_flag(ENV_HISTORY_DEDUP, &value)?;
        }
        if let Some(value) = lookup(ENV_BELL) {
            self.bell = parse_flag(ENV_BELL, &value)?;
        }

        self.validate()?;
        Ok(self)
    }
}

pub(crate) fn validate_screen_width(width: usize) -> Result<(), ConfigError> {
    if width <= MIN_SCREEN_WIDTH {
        return Err(ConfigError::ScreenWidthTooSmall {
            width,
            min: MIN_SCREEN_WIDTH,
        });
    }
    Ok(())
}

fn parse_number(name: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvironment {
            name: name.to_string(),
            value: value.to_string(),
        })
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnvironment {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_scroll_span(), 26);
        assert!(!config.history_dedup);
    }

    #[test]
    fn test_narrow_screen_rejected() {
        let err = EditorConfig::new().with_screen_width(20).validate().unwrap_err();
        assert_eq!(err, ConfigError::ScreenWidthTooSmall { width: 20, min: 20 });
        assert!(EditorConfig::new().with_screen_width(21).validate().is_ok());
    }

    #[test]
    fn test_scroll_span_bounds() {
        assert!(EditorConfig::new().with_scroll_span(0).validate().is_err());
        assert!(EditorConfig::new().with_scroll_span(27).validate().is_err());
        assert!(EditorConfig::new().with_scroll_span(10).validate().is_ok());
    }

    #[test]
    fn test_small_limits_rejected() {
        assert!(EditorConfig::new().with_max_line_length(2).validate().is_err());
        assert!(EditorConfig::new().with_history_capacity(1).validate().is_err());
    }

    #[test]
    fn test_env_overlay() {
        let config = EditorConfig::new()
            .merge_env(env(&[
                ("COLUMNS", "120"),
                (ENV_HISTORY_SIZE, "64"),
                (ENV_HISTORY_DEDUP, "yes"),
                (ENV_BELL, "off"),
            ]))
            .unwrap();
        assert_eq!(config.screen_width, 120);
        assert_eq!(config.history_capacity, 64);
        assert!(config.history_dedup);
        assert!(!config.bell);
    }

    #[test]
    fn test_env_width_overrides_columns() {
        let config = EditorConfig::new()
            .merge_env(env(&[("COLUMNS", "120"), (ENV_SCREEN_WIDTH, "60")]))
            .unwrap();
        assert_eq!(config.screen_width, 60);
    }

    #[test]
    fn test_bad_columns_ignored_but_bad_linekit_value_rejected() {
        let config = EditorConfig::new()
            .merge_env(env(&[("COLUMNS", "wide")]))
            .unwrap();
        assert_eq!(config.screen_width, DEFAULT_SCREEN_WIDTH);

        let err = EditorConfig::new()
            .merge_env(env(&[(ENV_HISTORY_DEDUP, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvironment { .. }));
    }
}

//! Table options and registry configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Punctuation accepted in table names besides letters, digits and spaces.
const NAME_PUNCTUATION: &str = "!@#$()-_=+;:,.?'";

/// Longest time bank or per-turn bonus a table may be configured with.
pub const MAX_CLOCK: Duration = Duration::from_secs(24 * 60 * 60);

/// Check a table name against the allowed character set
///
/// Names must be non-empty and consist only of ASCII letters, digits,
/// spaces and the characters in `NAME_PUNCTUATION`.
pub fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || NAME_PUNCTUATION.contains(c))
}

/// Per-table game options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    /// Whether players are on a clock
    pub timed: bool,

    /// Starting time bank for every player (default: 2 minutes)
    pub time_base: Duration,

    /// Time credited to a player after each turn they complete (default: 20 seconds)
    pub time_per_turn: Duration,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            timed: false,
            time_base: Duration::from_secs(120),
            time_per_turn: Duration::from_secs(20),
        }
    }
}

impl TableOptions {
    /// Options for a timed table with the given clock
    pub fn timed(time_base: Duration, time_per_turn: Duration) -> Self {
        Self {
            timed: true,
            time_base,
            time_per_turn,
        }
    }

    /// Validate options
    pub fn validate(&self) -> Result<(), String> {
        if self.timed && self.time_base.is_zero() {
            return Err("Timed tables need a time base greater than zero".to_string());
        }

        if self.time_base > MAX_CLOCK {
            return Err(format!("Time base must be at most {:?}", MAX_CLOCK));
        }

        if self.time_per_turn > MAX_CLOCK {
            return Err(format!("Time per turn must be at most {:?}", MAX_CLOCK));
        }

        Ok(())
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Capacity of the request inbox (default: 100)
    pub inbox_capacity: usize,

    /// Options used when a table is created without explicit options
    pub default_options: TableOptions,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: 100,
            default_options: TableOptions::default(),
        }
    }
}

impl RegistryConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be at least 1".to_string());
        }

        self.default_options.validate()
    }
}

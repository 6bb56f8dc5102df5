//! Serialization and coercion policy.
//!
//! A [`JsonConfig`] bundles four independently toggleable sub-configs, each
//! with an `open` flag. Containers hold a shared [`ConfigRef`] and stamp it
//! onto children when they are retrieved (propagate-on-read): replacing a
//! container's config affects values fetched afterwards, never values that
//! were already materialized. Shared containers are not synchronized;
//! concurrent mutation requires external locking.

use std::sync::Arc;

pub use json_mill_util::RoundingMode;

/// Shared handle to a [`JsonConfig`].
pub type ConfigRef = Arc<JsonConfig>;

/// Null rendering policy.
///
/// Closed (default): a null renders as the per-kind zero value (`0` for
/// numbers, `""` for strings and temporals, `false` for booleans, `[]`/`{}`
/// for containers). Open: a null renders as the quoted `placeholder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullConfig {
    pub open: bool,
    pub placeholder: String,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            open: false,
            placeholder: String::new(),
        }
    }
}

/// Number rendering policy.
///
/// Closed (default): natural precision. Open: integers rendered with
/// `int_digits` zero-padded decimal places, floats rounded to
/// `decimal_digits` with `rounding` and zero-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberConfig {
    pub int_digits: u32,
    pub decimal_digits: u32,
    pub rounding: RoundingMode,
    pub open: bool,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            int_digits: 0,
            decimal_digits: 2,
            rounding: RoundingMode::HalfUp,
            open: false,
        }
    }
}

/// Temporal rendering policy, one pattern per temporal kind.
///
/// Patterns are `time` format descriptions. Closed (default): the value's
/// natural textual form. Open: the configured pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatConfig {
    pub date_time_format: String,
    pub date_format: String,
    pub time_format: String,
    pub open: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_time_format: "[year]-[month]-[day] [hour]:[minute]:[second]".to_string(),
            date_format: "[year]-[month]-[day]".to_string(),
            time_format: "[hour]:[minute]:[second]".to_string(),
            open: false,
        }
    }
}

/// String escaping policy.
///
/// Open (default): backslash and double quote are escaped on serialization
/// and unescaped on parse. Closed: strings pass through verbatim — the
/// output is not safe to re-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialCharacterConfig {
    pub open: bool,
}

impl Default for SpecialCharacterConfig {
    fn default() -> Self {
        Self { open: true }
    }
}

/// The full policy bundle passed by reference to every engine component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonConfig {
    pub null: NullConfig,
    pub number: NumberConfig,
    pub date: DateFormatConfig,
    pub special: SpecialCharacterConfig,
}

impl JsonConfig {
    /// Wraps the config into a shareable [`ConfigRef`].
    pub fn into_ref(self) -> ConfigRef {
        Arc::new(self)
    }

    /// A fresh default config handle.
    pub fn default_ref() -> ConfigRef {
        Arc::new(Self::default())
    }
}

//! Menu model errors.

use crate::menu::entry::{EntryKey, ItemId};
use thiserror::Error;

/// Errors that can occur while mutating a menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// An entry with this id is already live in the menu.
    #[error("Menu entry id {0} is already in use")]
    DuplicateId(ItemId),

    /// No entry is registered under this key.
    #[error("Unknown menu entry: {0}")]
    UnknownEntry(EntryKey),

    /// An action strip failed to remove one of its surrogates.
    #[error("Action strip failed to remove surrogate: {0}")]
    StripRemoval(String),
}

/// Errors that can occur when parsing menu configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse a TOML menu configuration.
    #[error("Failed to parse menu config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside of its accepted range.
    #[error("Invalid menu config value for `{0}`: {1}")]
    InvalidValue(&'static str, String),
}

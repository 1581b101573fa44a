//! The path model: where a configuration value lives.
//!
//! A [`ConfigurationPath`] addresses one node of the System →
//! Organization → Event → TicketCategory hierarchy and always knows its
//! own [`PathLevel`]. A [`PathKey`] pairs a path with a catalog key and
//! is the unit of lookup and of a single write.

use serde::{Deserialize, Serialize};

use crate::keys::ConfigurationKey;

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;

/// Hierarchy level, totally ordered by specificity.
///
/// The derived `Ord` (`System < Organization < Event < TicketCategory`)
/// is the single invariant the whole engine depends on: a more specific
/// value beats a less specific one wherever a conflict is resolved.
///
/// # Examples
///
/// ```
/// use settings_manager::PathLevel;
///
/// assert!(PathLevel::System < PathLevel::Organization);
/// assert!(PathLevel::Event < PathLevel::TicketCategory);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathLevel {
    System,
    Organization,
    Event,
    TicketCategory,
}

/// Addresses the storage scope of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationPath {
    System,
    Organization {
        organization_id: i32,
    },
    Event {
        organization_id: i32,
        event_id: i32,
    },
    TicketCategory {
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
    },
}

impl ConfigurationPath {
    pub fn system() -> Self {
        Self::System
    }

    pub fn organization(organization_id: i32) -> Self {
        Self::Organization { organization_id }
    }

    pub fn event(organization_id: i32, event_id: i32) -> Self {
        Self::Event {
            organization_id,
            event_id,
        }
    }

    pub fn ticket_category(organization_id: i32, event_id: i32, ticket_category_id: i32) -> Self {
        Self::TicketCategory {
            organization_id,
            event_id,
            ticket_category_id,
        }
    }

    /// The level this path addresses.
    pub fn level(&self) -> PathLevel {
        match self {
            Self::System => PathLevel::System,
            Self::Organization { .. } => PathLevel::Organization,
            Self::Event { .. } => PathLevel::Event,
            Self::TicketCategory { .. } => PathLevel::TicketCategory,
        }
    }
}

/// A (path, key) pair: the addressable unit for reads and single writes.
///
/// # Examples
///
/// ```
/// use settings_manager::{ConfigurationKey, PathKey, PathLevel};
///
/// let path_key = PathKey::event(42, 7, ConfigurationKey::SmtpHost);
/// assert_eq!(path_key.path().level(), PathLevel::Event);
/// assert_eq!(path_key.key(), ConfigurationKey::SmtpHost);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathKey {
    path: ConfigurationPath,
    key: ConfigurationKey,
}

impl PathKey {
    pub fn new(path: ConfigurationPath, key: ConfigurationKey) -> Self {
        Self { path, key }
    }

    pub fn system(key: ConfigurationKey) -> Self {
        Self::new(ConfigurationPath::system(), key)
    }

    pub fn organization(organization_id: i32, key: ConfigurationKey) -> Self {
        Self::new(ConfigurationPath::organization(organization_id), key)
    }

    pub fn event(organization_id: i32, event_id: i32, key: ConfigurationKey) -> Self {
        Self::new(ConfigurationPath::event(organization_id, event_id), key)
    }

    pub fn ticket_category(
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: ConfigurationKey,
    ) -> Self {
        Self::new(
            ConfigurationPath::ticket_category(organization_id, event_id, ticket_category_id),
            key,
        )
    }

    pub fn path(&self) -> &ConfigurationPath {
        &self.path
    }

    pub fn key(&self) -> ConfigurationKey {
        self.key
    }
}

/// A stored or potential configuration value.
///
/// Rows loaded from storage carry their database id; synthetic
/// placeholders representing a settable-but-unset key carry id `-1` and
/// no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub id: i64,
    pub key: String,
    pub value: Option<String>,
    pub description: String,
    pub path_level: PathLevel,
}

impl ConfigurationEntry {
    pub fn new(
        id: i64,
        key: impl Into<String>,
        value: Option<String>,
        description: impl Into<String>,
        path_level: PathLevel,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            value,
            description: description.into(),
            path_level,
        }
    }

    /// A synthetic entry for a key that could be set at `level` but has
    /// no stored row yet.
    pub fn placeholder(key: ConfigurationKey, level: PathLevel) -> Self {
        Self::new(-1, key.value(), None, key.description(), level)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id < 0
    }

    /// The catalog key for this row, if its token is known.
    pub fn configuration_key(&self) -> Option<ConfigurationKey> {
        self.key.parse().ok()
    }
}

/// A single element of a bulk save request: an optional existing row id,
/// the key token and the raw value as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationModification {
    pub id: Option<i64>,
    pub key: String,
    pub value: Option<String>,
}

impl ConfigurationModification {
    pub fn new(id: Option<i64>, key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id,
            key: key.into(),
            value,
        }
    }

    /// Whether a bulk save should act on this element: it either edits an
    /// existing row (non-negative id) or introduces a non-blank value.
    /// Untouched form fields (blank value, no id) are skipped so they
    /// never create empty rows.
    pub fn should_be_saved(&self) -> bool {
        self.id.unwrap_or(-1) >= 0
            || self
                .value
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty())
    }
}

/// Three-state domain of a boolean-typed key.
///
/// `Unset` is distinct from `False`: an unset key falls through to a
/// broader level or to the caller-supplied default, while an explicit
/// `false` stops the fallthrough.
///
/// # Examples
///
/// ```
/// use settings_manager::TriState;
///
/// assert_eq!(TriState::from_raw(Some("  ")), TriState::Unset);
/// assert_eq!(TriState::from_raw(Some("TRUE")), TriState::True);
/// assert_eq!(TriState::from_raw(Some("no")), TriState::False);
/// assert_eq!(TriState::Unset.unwrap_or(true), true);
/// assert_eq!(TriState::False.unwrap_or(true), false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Unset,
    True,
    False,
}

impl TriState {
    /// Parses a raw stored or submitted value. Whitespace is trimmed; an
    /// empty result is `Unset`, `"true"` (any casing) is `True`, any
    /// other text is `False`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Unset,
            Some(v) if v.eq_ignore_ascii_case("true") => Self::True,
            Some(_) => Self::False,
        }
    }

    /// The canonical stored representation, `None` when unset.
    pub fn canonical(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::True => Some("true"),
            Self::False => Some("false"),
        }
    }

    pub fn unwrap_or(self, default: bool) -> bool {
        match self {
            Self::Unset => default,
            Self::True => true,
            Self::False => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::True => Some(true),
            Self::False => Some(false),
        }
    }
}

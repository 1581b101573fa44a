//! Hierarchical settings engine for the ticketing platform.
//!
//! Configuration values live on a four-level hierarchy (System →
//! Organization → Event → TicketCategory); a value set at a more
//! specific level overrides the same key defined at a broader one.
//! Administrators configure global defaults, organization owners
//! override them per organization, and further overrides cascade down to
//! individual events and ticket categories.
//!
//! # Architecture
//!
//! - [`keys`]: the immutable key catalog (token, category, value kind,
//!   minimum level, visibility flags).
//! - [`path`]: the path model describing where a value lives, plus the
//!   three-state boolean domain.
//! - [`strategy`] and the four per-level strategy modules: lookup and
//!   persistence at one level each, including authorization.
//! - [`resolution`]: the level-agnostic precedence and merge
//!   algorithms.
//! - [`visibility`]: role- and feature-driven view filtering.
//! - [`manager`]: the [`ConfigurationManager`] facade tying it all
//!   together.
//!
//! Durable storage, user/role lookup and event lookup are external
//! collaborators consumed through the [`ConfigurationRepository`],
//! [`UserManager`] and [`EventRepository`] traits.

pub mod errors;
pub mod events;
pub mod keys;
pub mod path;
pub mod repository;
pub mod resolution;
pub mod users;
pub mod visibility;

pub mod strategy;

pub mod event_strategy;
pub mod organization_strategy;
pub mod system_strategy;
pub mod ticket_category_strategy;

pub mod manager;

#[cfg(test)]
pub(crate) mod test_support;

// Integration tests exercising the whole engine against in-memory
// collaborators.
#[cfg(test)]
mod integration_tests;

// Re-export for convenient access
pub use errors::{SettingsError, SettingsResult};
pub use events::{Event, EventRepository};
pub use keys::{ComponentType, ConfigurationKey, KeyDescriptor, SettingCategory};
pub use manager::ConfigurationManager;
pub use path::{
    ConfigurationEntry, ConfigurationModification, ConfigurationPath, PathKey, PathLevel, TriState,
};
pub use repository::ConfigurationRepository;
pub use resolution::SettingsView;
pub use strategy::PathStrategy;
pub use users::{User, UserManager};
pub use visibility::PaymentMethod;

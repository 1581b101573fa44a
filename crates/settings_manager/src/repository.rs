//! Storage collaborator contract.
//!
//! The engine never touches a database directly; it consumes this trait.
//! Implementations are expected to run each engine operation inside a
//! single transactional scope so bulk saves commit all-or-nothing; the
//! engine guarantees on its side that authorization is validated before
//! the first write of a batch.

use async_trait::async_trait;

use crate::errors::SettingsResult;
use crate::path::ConfigurationEntry;

/// CRUD over configuration rows, scoped per hierarchy level.
///
/// The `find_by_*_and_key` chain lookups may return rows from the
/// requested level *and* from broader fallback levels (an event lookup
/// may surface organization- and system-level rows); the engine
/// disambiguates by specificity. The `find_at_*_level` lookups are
/// scoped to exactly one level. Deleting a row that does not exist is a
/// no-op, never an error.
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    // -- chain lookups (most specific level first is not required) --

    async fn find_system_by_key(&self, key: &str) -> SettingsResult<Option<ConfigurationEntry>>;

    async fn find_by_organization_and_key(
        &self,
        organization_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    async fn find_by_event_and_key(
        &self,
        organization_id: i32,
        event_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    async fn find_by_ticket_category_and_key(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    // -- exact-level lookups --

    async fn find_at_organization_level(
        &self,
        organization_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>>;

    async fn find_at_event_level(
        &self,
        event_id: i32,
        organization_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>>;

    async fn find_at_ticket_category_level(
        &self,
        event_id: i32,
        organization_id: i32,
        ticket_category_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>>;

    // -- per-level scans --

    async fn find_system_configuration(&self) -> SettingsResult<Vec<ConfigurationEntry>>;

    async fn find_organization_configuration(
        &self,
        organization_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    async fn find_event_configuration(
        &self,
        organization_id: i32,
        event_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    async fn find_ticket_category_configuration(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>>;

    // -- system level writes --

    async fn insert_system(&self, key: &str, value: &str, description: &str)
        -> SettingsResult<()>;

    async fn update_system(&self, key: &str, value: &str) -> SettingsResult<()>;

    async fn delete_system_by_key(&self, key: &str) -> SettingsResult<()>;

    // -- organization level writes --

    async fn insert_organization_level(
        &self,
        organization_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()>;

    async fn update_organization_level(
        &self,
        organization_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()>;

    async fn delete_organization_level_by_key(
        &self,
        key: &str,
        organization_id: i32,
    ) -> SettingsResult<()>;

    // -- event level writes --

    async fn insert_event_level(
        &self,
        organization_id: i32,
        event_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()>;

    async fn update_event_level(
        &self,
        event_id: i32,
        organization_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()>;

    async fn delete_event_level_by_key(&self, key: &str, event_id: i32) -> SettingsResult<()>;

    // -- ticket category level writes --

    async fn insert_ticket_category_level(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()>;

    async fn update_ticket_category_level(
        &self,
        event_id: i32,
        organization_id: i32,
        ticket_category_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()>;

    async fn delete_ticket_category_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        ticket_category_id: i32,
    ) -> SettingsResult<()>;
}

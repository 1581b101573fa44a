//! Storage collaborator contracts for plugin data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use settings_manager::{ComponentType, SettingsResult};

use crate::types::{PluginConfigOption, PluginLogKind};

/// CRUD over per-plugin configuration options.
#[async_trait]
pub trait PluginConfigurationRepository: Send + Sync {
    async fn load_single_option(
        &self,
        plugin_id: &str,
        event_id: i32,
        name: &str,
    ) -> SettingsResult<Option<PluginConfigOption>>;

    async fn insert(
        &self,
        plugin_id: &str,
        event_id: i32,
        name: &str,
        value: &str,
        description: &str,
        component_type: ComponentType,
    ) -> SettingsResult<()>;
}

/// Append-only plugin event log.
#[async_trait]
pub trait PluginLogRepository: Send + Sync {
    async fn insert_event(
        &self,
        plugin_id: &str,
        event_id: i32,
        description: &str,
        kind: PluginLogKind,
        timestamp: DateTime<Utc>,
    ) -> SettingsResult<()>;
}

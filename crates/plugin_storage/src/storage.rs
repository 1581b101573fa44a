//! The per-plugin storage handle and its provider.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use settings_manager::{ComponentType, Event, EventRepository, SettingsResult};

use crate::repository::{PluginConfigurationRepository, PluginLogRepository};
use crate::types::PluginLogKind;

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;

/// Storage handle scoped to one plugin id.
///
/// Everything a plugin persists goes through its own handle, so a plugin
/// can never read or overwrite another plugin's options.
pub struct PluginDataStorage {
    plugin_id: String,
    configuration_repository: Arc<dyn PluginConfigurationRepository>,
    log_repository: Arc<dyn PluginLogRepository>,
    event_repository: Arc<dyn EventRepository>,
}

impl PluginDataStorage {
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub async fn event_by_id(&self, event_id: i32) -> SettingsResult<Option<Event>> {
        self.event_repository.find_event_by_id(event_id).await
    }

    /// The stored value of one option for an event, if set.
    pub async fn config_value(&self, name: &str, event_id: i32) -> SettingsResult<Option<String>> {
        Ok(self
            .configuration_repository
            .load_single_option(&self.plugin_id, event_id, name)
            .await?
            .and_then(|option| option.option_value))
    }

    pub async fn insert_config_value(
        &self,
        event_id: i32,
        name: &str,
        value: &str,
        description: &str,
        component_type: ComponentType,
    ) -> SettingsResult<()> {
        self.configuration_repository
            .insert(
                &self.plugin_id,
                event_id,
                name,
                value,
                description,
                component_type,
            )
            .await
    }

    pub async fn register_success(&self, description: &str, event_id: i32) -> SettingsResult<()> {
        self.log(description, event_id, PluginLogKind::Success).await
    }

    pub async fn register_warning(&self, description: &str, event_id: i32) -> SettingsResult<()> {
        self.log(description, event_id, PluginLogKind::Warning).await
    }

    pub async fn register_failure(&self, description: &str, event_id: i32) -> SettingsResult<()> {
        self.log(description, event_id, PluginLogKind::Error).await
    }

    async fn log(
        &self,
        description: &str,
        event_id: i32,
        kind: PluginLogKind,
    ) -> SettingsResult<()> {
        debug!(plugin_id = %self.plugin_id, event_id, ?kind, "recording plugin log entry");
        self.log_repository
            .insert_event(&self.plugin_id, event_id, description, kind, Utc::now())
            .await
    }
}

/// Hands out [`PluginDataStorage`] handles sharing the same underlying
/// repositories.
pub struct PluginDataStorageProvider {
    configuration_repository: Arc<dyn PluginConfigurationRepository>,
    log_repository: Arc<dyn PluginLogRepository>,
    event_repository: Arc<dyn EventRepository>,
}

impl PluginDataStorageProvider {
    pub fn new(
        configuration_repository: Arc<dyn PluginConfigurationRepository>,
        log_repository: Arc<dyn PluginLogRepository>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            configuration_repository,
            log_repository,
            event_repository,
        }
    }

    pub fn data_storage(&self, plugin_id: impl Into<String>) -> PluginDataStorage {
        PluginDataStorage {
            plugin_id: plugin_id.into(),
            configuration_repository: self.configuration_repository.clone(),
            log_repository: self.log_repository.clone(),
            event_repository: self.event_repository.clone(),
        }
    }
}

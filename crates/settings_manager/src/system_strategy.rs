//! System-level strategy: global defaults for the whole platform.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::errors::SettingsResult;
use crate::keys::ConfigurationKey;
use crate::path::{ConfigurationEntry, ConfigurationModification, ConfigurationPath, PathKey, PathLevel};
use crate::repository::ConfigurationRepository;
use crate::resolution::{entry_order, group_entries, SettingsView};
use crate::strategy::{evaluate_value, PathStrategy};
use crate::users::UserManager;

pub struct SystemPathStrategy {
    repository: Arc<dyn ConfigurationRepository>,
    user_manager: Arc<dyn UserManager>,
}

impl SystemPathStrategy {
    pub fn new(
        repository: Arc<dyn ConfigurationRepository>,
        user_manager: Arc<dyn UserManager>,
    ) -> Self {
        Self {
            repository,
            user_manager,
        }
    }

    /// Upserts-or-deletes a single system-level value.
    pub async fn save_system_configuration(
        &self,
        key: ConfigurationKey,
        raw: Option<&str>,
    ) -> SettingsResult<()> {
        let existing = self.repository.find_system_by_key(key.value()).await?;
        match evaluate_value(key, raw) {
            None => {
                if existing.is_some() {
                    debug!(key = %key, "deleting system row for unset value");
                    self.repository.delete_system_by_key(key.value()).await?;
                }
            }
            Some(value) => {
                if existing.is_some() {
                    self.repository.update_system(key.value(), &value).await?;
                } else {
                    self.repository
                        .insert_system(key.value(), &value, key.description())
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Saves a batch of system-level values. No ownership gate applies
    /// at this level; the admin check belongs to the surface exposing
    /// the operation. Unknown keys abort before any write.
    pub async fn save_all_system_configuration(
        &self,
        list: &[ConfigurationModification],
    ) -> SettingsResult<()> {
        let mut batch = Vec::new();
        for modification in list.iter().filter(|m| m.should_be_saved()) {
            batch.push((
                ConfigurationKey::from_str(&modification.key)?,
                modification.value.as_deref(),
            ));
        }
        for (key, raw) in batch {
            self.save_system_configuration(key, raw).await?;
        }
        Ok(())
    }

    /// Deletes a system-level row; a missing row is a no-op.
    pub async fn delete_by_key(&self, key: &str) -> SettingsResult<()> {
        self.repository.delete_system_by_key(key).await
    }

    /// The admin system view: every stored non-internal row plus a
    /// placeholder for each catalog key without one. Non-admin callers
    /// receive an empty view.
    #[instrument(skip(self))]
    pub async fn load_all_system_configuration_including_missing(
        &self,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        let caller = self.user_manager.find_user_by_username(username).await?;
        let is_admin = match caller {
            Some(user) => self.user_manager.is_admin(&user).await?,
            None => false,
        };
        if !is_admin {
            debug!(username, "system view requested by non-admin, returning empty view");
            return Ok(SettingsView::new());
        }

        let existing: Vec<ConfigurationEntry> = self
            .repository
            .find_system_configuration()
            .await?
            .into_iter()
            .filter(|entry| {
                entry
                    .configuration_key()
                    .is_some_and(|key| !key.is_internal())
            })
            .collect();
        let missing: Vec<ConfigurationEntry> = ConfigurationKey::ui_visible()
            .into_iter()
            .filter(|key| !existing.iter().any(|entry| entry.key == key.value()))
            .map(|key| ConfigurationEntry::placeholder(key, PathLevel::System))
            .collect();

        let mut rows = existing;
        rows.extend(missing);
        rows.sort_by(entry_order);
        Ok(group_entries(rows))
    }
}

#[async_trait]
impl PathStrategy for SystemPathStrategy {
    async fn find(
        &self,
        path: &ConfigurationPath,
        key: ConfigurationKey,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        debug_assert!(matches!(path, ConfigurationPath::System));
        self.repository.find_system_by_key(key.value()).await
    }

    async fn save(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()> {
        self.save_system_configuration(path_key.key(), value).await
    }
}

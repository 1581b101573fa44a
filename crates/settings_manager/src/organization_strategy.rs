//! Organization-level strategy.
//!
//! Lookups fall back to system-level rows through the repository's chain
//! query; the most specific row wins. Mutations require organization
//! ownership. The grouped view applies admin elevation and the
//! payment-method blacklist filter.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::errors::SettingsResult;
use crate::keys::ConfigurationKey;
use crate::path::{ConfigurationEntry, ConfigurationModification, ConfigurationPath, PathKey, PathLevel};
use crate::repository::ConfigurationRepository;
use crate::resolution::{
    collect_keys_by_category, entry_order, group_entries, merge_with_existing,
    select_most_specific, union, SettingsView,
};
use crate::strategy::{evaluate_value, require_organization_owner, view_caller_role, PathStrategy};
use crate::users::UserManager;
use crate::visibility::{blacklisted_categories, remove_categories, retains_entry};

pub struct OrganizationPathStrategy {
    repository: Arc<dyn ConfigurationRepository>,
    user_manager: Arc<dyn UserManager>,
}

impl OrganizationPathStrategy {
    pub fn new(
        repository: Arc<dyn ConfigurationRepository>,
        user_manager: Arc<dyn UserManager>,
    ) -> Self {
        Self {
            repository,
            user_manager,
        }
    }

    /// Upserts-or-deletes a single organization-level value.
    pub async fn save_organization_configuration(
        &self,
        organization_id: i32,
        key: ConfigurationKey,
        raw: Option<&str>,
    ) -> SettingsResult<()> {
        let existing = self
            .repository
            .find_at_organization_level(organization_id, key.value())
            .await?;
        match evaluate_value(key, raw) {
            None => {
                self.repository
                    .delete_organization_level_by_key(key.value(), organization_id)
                    .await?
            }
            Some(value) => {
                if existing.is_some() {
                    self.repository
                        .update_organization_level(organization_id, key.value(), &value)
                        .await?;
                } else {
                    self.repository
                        .insert_organization_level(
                            organization_id,
                            key.value(),
                            &value,
                            key.description(),
                        )
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Saves a batch of organization-level values. Ownership and key
    /// validation happen once, before the first write, so a rejected
    /// batch persists nothing.
    #[instrument(skip(self, list), fields(entries = list.len()))]
    pub async fn save_all_organization_configuration(
        &self,
        organization_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        require_organization_owner(self.user_manager.as_ref(), username, organization_id).await?;
        let mut batch = Vec::new();
        for modification in list.iter().filter(|m| m.should_be_saved()) {
            batch.push((
                ConfigurationKey::from_str(&modification.key)?,
                modification.value.as_deref(),
            ));
        }
        for (key, raw) in batch {
            self.save_organization_configuration(organization_id, key, raw)
                .await?;
        }
        Ok(())
    }

    /// The grouped organization view. Non-owners get an empty view;
    /// admins see the union of system- and organization-level keys;
    /// categories owned by blacklisted payment methods are removed.
    #[instrument(skip(self))]
    pub async fn load_organization_config(
        &self,
        organization_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        let Some(is_admin) =
            view_caller_role(self.user_manager.as_ref(), username, organization_id).await?
        else {
            debug!(username, organization_id, "caller is not an owner, returning empty view");
            return Ok(SettingsView::new());
        };

        let mut rows: Vec<ConfigurationEntry> = self
            .repository
            .find_organization_configuration(organization_id)
            .await?
            .into_iter()
            .filter(|entry| retains_entry(is_admin, PathLevel::Organization, entry))
            .collect();
        rows.sort_by(entry_order);
        let existing = group_entries(rows);

        let blacklist = select_most_specific(
            self.repository
                .find_by_organization_and_key(
                    organization_id,
                    ConfigurationKey::PaymentMethodsBlacklist.value(),
                )
                .await?,
        )
        .and_then(|entry| entry.value)
        .unwrap_or_default();

        let defaults = if is_admin {
            union(&[PathLevel::System, PathLevel::Organization])
        } else {
            collect_keys_by_category(PathLevel::Organization)
        };
        let merged = merge_with_existing(&defaults, &existing);
        Ok(remove_categories(
            merged,
            &blacklisted_categories(&blacklist),
        ))
    }

    /// Deletes one organization-level row; owner only.
    pub async fn delete_organization_level_by_key(
        &self,
        key: &str,
        organization_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        require_organization_owner(self.user_manager.as_ref(), username, organization_id).await?;
        self.repository
            .delete_organization_level_by_key(key, organization_id)
            .await
    }
}

#[async_trait]
impl PathStrategy for OrganizationPathStrategy {
    async fn find(
        &self,
        path: &ConfigurationPath,
        key: ConfigurationKey,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        let ConfigurationPath::Organization { organization_id } = path else {
            unreachable!("organization strategy selected for {:?}", path.level());
        };
        let candidates = self
            .repository
            .find_by_organization_and_key(*organization_id, key.value())
            .await?;
        Ok(select_most_specific(candidates))
    }

    async fn save(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()> {
        let ConfigurationPath::Organization { organization_id } = path_key.path() else {
            unreachable!(
                "organization strategy selected for {:?}",
                path_key.path().level()
            );
        };
        self.save_organization_configuration(*organization_id, path_key.key(), value)
            .await
    }
}

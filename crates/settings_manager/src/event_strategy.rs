//! Event-level strategy.
//!
//! Event mutations resolve the owning organization through the event and
//! cross-check it against the caller-supplied organization id. The
//! grouped view removes the check-in station category unless both
//! enabling flags are set for the event.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::errors::{SettingsError, SettingsResult};
use crate::events::{Event, EventRepository};
use crate::keys::ConfigurationKey;
use crate::path::{ConfigurationEntry, ConfigurationModification, ConfigurationPath, PathKey, PathLevel, TriState};
use crate::repository::ConfigurationRepository;
use crate::resolution::{
    collect_keys_by_category, entry_order, group_entries, merge_with_existing,
    select_most_specific, union, SettingsView,
};
use crate::strategy::{
    evaluate_value, require_organization_owner, require_ownership, view_caller_role, PathStrategy,
};
use crate::users::UserManager;
use crate::visibility::{remove_check_in_settings_if_disabled, retains_entry};

pub struct EventPathStrategy {
    repository: Arc<dyn ConfigurationRepository>,
    user_manager: Arc<dyn UserManager>,
    event_repository: Arc<dyn EventRepository>,
}

impl EventPathStrategy {
    pub fn new(
        repository: Arc<dyn ConfigurationRepository>,
        user_manager: Arc<dyn UserManager>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            repository,
            user_manager,
            event_repository,
        }
    }

    async fn event_by_id(&self, event_id: i32) -> SettingsResult<Event> {
        self.event_repository
            .find_event_by_id(event_id)
            .await?
            .ok_or(SettingsError::EventNotFound { event_id })
    }

    /// Upserts-or-deletes a single event-level value.
    pub async fn save_event_configuration(
        &self,
        event_id: i32,
        organization_id: i32,
        key: ConfigurationKey,
        raw: Option<&str>,
    ) -> SettingsResult<()> {
        let existing = self
            .repository
            .find_at_event_level(event_id, organization_id, key.value())
            .await?;
        match evaluate_value(key, raw) {
            None => {
                self.repository
                    .delete_event_level_by_key(key.value(), event_id)
                    .await?
            }
            Some(value) => {
                if existing.is_some() {
                    self.repository
                        .update_event_level(event_id, organization_id, key.value(), &value)
                        .await?;
                } else {
                    self.repository
                        .insert_event_level(
                            organization_id,
                            event_id,
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

    /// Saves a batch of event-level values.
    ///
    /// The caller must own the organization they claim the event belongs
    /// to; if the event actually belongs to a different organization,
    /// ownership is re-validated against the actual one. All checks run
    /// before the first write.
    #[instrument(skip(self, list), fields(entries = list.len()))]
    pub async fn save_all_event_configuration(
        &self,
        event_id: i32,
        organization_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        let user =
            require_organization_owner(self.user_manager.as_ref(), username, organization_id)
                .await?;
        let event = self.event_by_id(event_id).await?;
        if organization_id != event.organization_id {
            warn!(
                event_id,
                claimed = organization_id,
                actual = event.organization_id,
                "organization mismatch on event save, re-validating ownership"
            );
            require_ownership(self.user_manager.as_ref(), &user, event.organization_id).await?;
        }
        let mut batch = Vec::new();
        for modification in list.iter().filter(|m| m.should_be_saved()) {
            batch.push((
                ConfigurationKey::from_str(&modification.key)?,
                modification.value.as_deref(),
            ));
        }
        for (key, raw) in batch {
            self.save_event_configuration(event_id, organization_id, key, raw)
                .await?;
        }
        Ok(())
    }

    /// True when every given boolean key resolves to true for the event;
    /// short-circuits on the first false or unset key.
    pub async fn are_boolean_settings_enabled(
        &self,
        event: &Event,
        keys: &[ConfigurationKey],
    ) -> SettingsResult<bool> {
        let path = ConfigurationPath::event(event.organization_id, event.id);
        for key in keys {
            let value = self.find(&path, *key).await?.and_then(|entry| entry.value);
            if !TriState::from_raw(value.as_deref()).unwrap_or(false) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The grouped event view. Non-owners get an empty view; admins see
    /// the union of system- and event-level keys; the check-in station
    /// category is hidden unless the integration is enabled.
    #[instrument(skip(self))]
    pub async fn load_event_config(
        &self,
        event_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        let event = self.event_by_id(event_id).await?;
        let Some(is_admin) = view_caller_role(
            self.user_manager.as_ref(),
            username,
            event.organization_id,
        )
        .await?
        else {
            debug!(username, event_id, "caller is not an owner, returning empty view");
            return Ok(SettingsView::new());
        };

        let mut rows: Vec<ConfigurationEntry> = self
            .repository
            .find_event_configuration(event.organization_id, event_id)
            .await?
            .into_iter()
            .filter(|entry| retains_entry(is_admin, PathLevel::Event, entry))
            .collect();
        rows.sort_by(entry_order);
        let existing = group_entries(rows);

        let check_in_enabled = self
            .are_boolean_settings_enabled(
                &event,
                &[
                    ConfigurationKey::CheckInStationEnabled,
                    ConfigurationKey::OfflineCheckInEnabled,
                ],
            )
            .await?;

        let defaults = if is_admin {
            union(&[PathLevel::System, PathLevel::Event])
        } else {
            collect_keys_by_category(PathLevel::Event)
        };
        Ok(remove_check_in_settings_if_disabled(
            check_in_enabled,
            merge_with_existing(&defaults, &existing),
        ))
    }

    /// Deletes one event-level row; owner of the event's actual
    /// organization only.
    pub async fn delete_event_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        let event = self.event_by_id(event_id).await?;
        require_organization_owner(self.user_manager.as_ref(), username, event.organization_id)
            .await?;
        self.repository.delete_event_level_by_key(key, event_id).await
    }
}

#[async_trait]
impl PathStrategy for EventPathStrategy {
    async fn find(
        &self,
        path: &ConfigurationPath,
        key: ConfigurationKey,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        let ConfigurationPath::Event {
            organization_id,
            event_id,
        } = path
        else {
            unreachable!("event strategy selected for {:?}", path.level());
        };
        let candidates = self
            .repository
            .find_by_event_and_key(*organization_id, *event_id, key.value())
            .await?;
        Ok(select_most_specific(candidates))
    }

    async fn save(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()> {
        let ConfigurationPath::Event {
            organization_id,
            event_id,
        } = path_key.path()
        else {
            unreachable!("event strategy selected for {:?}", path_key.path().level());
        };
        self.save_event_configuration(*event_id, *organization_id, path_key.key(), value)
            .await
    }
}

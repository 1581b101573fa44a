//! Ticket-category-level strategy, the most specific level.
//!
//! Ownership always resolves through the event's actual organization.
//! The grouped view uses the category-level catalog slice for every
//! caller; there is no system union at this depth.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::errors::{SettingsError, SettingsResult};
use crate::events::{Event, EventRepository};
use crate::keys::ConfigurationKey;
use crate::path::{ConfigurationEntry, ConfigurationModification, ConfigurationPath, PathKey, PathLevel};
use crate::repository::ConfigurationRepository;
use crate::resolution::{
    collect_keys_by_category, entry_order, group_entries, merge_with_existing,
    select_most_specific, SettingsView,
};
use crate::strategy::{evaluate_value, require_organization_owner, view_caller_role, PathStrategy};
use crate::users::UserManager;

pub struct TicketCategoryPathStrategy {
    repository: Arc<dyn ConfigurationRepository>,
    user_manager: Arc<dyn UserManager>,
    event_repository: Arc<dyn EventRepository>,
}

impl TicketCategoryPathStrategy {
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

    /// Upserts-or-deletes a single ticket-category-level value.
    pub async fn save_ticket_category_configuration(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: ConfigurationKey,
        raw: Option<&str>,
    ) -> SettingsResult<()> {
        let existing = self
            .repository
            .find_at_ticket_category_level(event_id, organization_id, ticket_category_id, key.value())
            .await?;
        match evaluate_value(key, raw) {
            None => {
                self.repository
                    .delete_ticket_category_level_by_key(key.value(), event_id, ticket_category_id)
                    .await?
            }
            Some(value) => {
                if existing.is_some() {
                    self.repository
                        .update_ticket_category_level(
                            event_id,
                            organization_id,
                            ticket_category_id,
                            key.value(),
                            &value,
                        )
                        .await?;
                } else {
                    self.repository
                        .insert_ticket_category_level(
                            organization_id,
                            event_id,
                            ticket_category_id,
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

    /// Saves a batch of category-level values; ownership of the event's
    /// actual organization is validated before any write.
    #[instrument(skip(self, list), fields(entries = list.len()))]
    pub async fn save_all_ticket_category_configuration(
        &self,
        ticket_category_id: i32,
        event_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        let event = self.event_by_id(event_id).await?;
        require_organization_owner(self.user_manager.as_ref(), username, event.organization_id)
            .await?;
        let mut batch = Vec::new();
        for modification in list.iter().filter(|m| m.should_be_saved()) {
            batch.push((
                ConfigurationKey::from_str(&modification.key)?,
                modification.value.as_deref(),
            ));
        }
        for (key, raw) in batch {
            self.save_ticket_category_configuration(
                event.organization_id,
                event_id,
                ticket_category_id,
                key,
                raw,
            )
            .await?;
        }
        Ok(())
    }

    /// The grouped ticket-category view; non-owners get an empty view.
    #[instrument(skip(self))]
    pub async fn load_ticket_category_config(
        &self,
        event_id: i32,
        ticket_category_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        let event = self.event_by_id(event_id).await?;
        if view_caller_role(self.user_manager.as_ref(), username, event.organization_id)
            .await?
            .is_none()
        {
            debug!(username, event_id, ticket_category_id, "caller is not an owner, returning empty view");
            return Ok(SettingsView::new());
        }

        let mut rows = self
            .repository
            .find_ticket_category_configuration(event.organization_id, event_id, ticket_category_id)
            .await?;
        rows.sort_by(entry_order);
        let existing = group_entries(rows);
        Ok(merge_with_existing(
            &collect_keys_by_category(PathLevel::TicketCategory),
            &existing,
        ))
    }

    /// Deletes one category-level row; owner of the event's actual
    /// organization only.
    pub async fn delete_ticket_category_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        ticket_category_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        let event = self.event_by_id(event_id).await?;
        require_organization_owner(self.user_manager.as_ref(), username, event.organization_id)
            .await?;
        self.repository
            .delete_ticket_category_level_by_key(key, event_id, ticket_category_id)
            .await
    }
}

#[async_trait]
impl PathStrategy for TicketCategoryPathStrategy {
    async fn find(
        &self,
        path: &ConfigurationPath,
        key: ConfigurationKey,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        let ConfigurationPath::TicketCategory {
            organization_id,
            event_id,
            ticket_category_id,
        } = path
        else {
            unreachable!("ticket category strategy selected for {:?}", path.level());
        };
        let candidates = self
            .repository
            .find_by_ticket_category_and_key(
                *organization_id,
                *event_id,
                *ticket_category_id,
                key.value(),
            )
            .await?;
        Ok(select_most_specific(candidates))
    }

    async fn save(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()> {
        let ConfigurationPath::TicketCategory {
            organization_id,
            event_id,
            ticket_category_id,
        } = path_key.path()
        else {
            unreachable!(
                "ticket category strategy selected for {:?}",
                path_key.path().level()
            );
        };
        self.save_ticket_category_configuration(
            *organization_id,
            *event_id,
            *ticket_category_id,
            path_key.key(),
            value,
        )
        .await
    }
}

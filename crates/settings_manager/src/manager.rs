//! The configuration manager facade.
//!
//! Single entry point for every settings operation. The manager owns the
//! four level strategies (built once at startup over shared collaborator
//! handles) and dispatches each request to the strategy matching the
//! path's level; the dispatch is an exhaustive match, so an unhandled
//! level cannot compile.
//!
//! The engine is stateless across calls: each operation runs to
//! completion against the storage collaborator, which is expected to
//! provide the transactional scope.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::errors::{SettingsError, SettingsResult};
use crate::events::{Event, EventRepository};
use crate::event_strategy::EventPathStrategy;
use crate::keys::ConfigurationKey;
use crate::organization_strategy::OrganizationPathStrategy;
use crate::path::{ConfigurationModification, PathKey, PathLevel, TriState};
use crate::repository::ConfigurationRepository;
use crate::resolution::SettingsView;
use crate::strategy::PathStrategy;
use crate::system_strategy::SystemPathStrategy;
use crate::ticket_category_strategy::TicketCategoryPathStrategy;
use crate::users::UserManager;

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;

/// Orchestrates catalog, path model, level strategies, resolution and
/// visibility filtering behind one API.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use settings_manager::{ConfigurationKey, ConfigurationManager, PathKey};
///
/// let manager = ConfigurationManager::new(repository, user_manager, event_repository);
/// let host = manager
///     .get_string_value_or(&PathKey::organization(42, ConfigurationKey::SmtpHost), "localhost")
///     .await?;
/// ```
pub struct ConfigurationManager {
    system: SystemPathStrategy,
    organization: OrganizationPathStrategy,
    event: EventPathStrategy,
    ticket_category: TicketCategoryPathStrategy,
}

impl ConfigurationManager {
    pub fn new(
        repository: Arc<dyn ConfigurationRepository>,
        user_manager: Arc<dyn UserManager>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            system: SystemPathStrategy::new(repository.clone(), user_manager.clone()),
            organization: OrganizationPathStrategy::new(
                repository.clone(),
                user_manager.clone(),
            ),
            event: EventPathStrategy::new(
                repository.clone(),
                user_manager.clone(),
                event_repository.clone(),
            ),
            ticket_category: TicketCategoryPathStrategy::new(
                repository,
                user_manager,
                event_repository,
            ),
        }
    }

    /// The strategy bound to a level. Exhaustive by construction.
    fn strategy(&self, level: PathLevel) -> &dyn PathStrategy {
        match level {
            PathLevel::System => &self.system,
            PathLevel::Organization => &self.organization,
            PathLevel::Event => &self.event,
            PathLevel::TicketCategory => &self.ticket_category,
        }
    }

    // -- typed getters ---------------------------------------------------

    /// The resolved value for a path+key, `None` when unset anywhere
    /// along the lookup chain.
    pub async fn get_string_value(&self, path_key: &PathKey) -> SettingsResult<Option<String>> {
        let entry = self
            .strategy(path_key.path().level())
            .find(path_key.path(), path_key.key())
            .await?;
        Ok(entry.and_then(|e| e.value))
    }

    pub async fn get_string_value_or(
        &self,
        path_key: &PathKey,
        default: &str,
    ) -> SettingsResult<String> {
        Ok(self
            .get_string_value(path_key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Integer getter; a missing value or unparsable text both fall back
    /// to the default.
    pub async fn get_int_value(&self, path_key: &PathKey, default: i32) -> SettingsResult<i32> {
        Ok(self
            .get_string_value(path_key)
            .await?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default))
    }

    /// Boolean getter over the three-state domain: `Unset` yields the
    /// default, an explicit stored `false` does not.
    pub async fn get_boolean_value(
        &self,
        path_key: &PathKey,
        default: bool,
    ) -> SettingsResult<bool> {
        Ok(self.get_tri_state_value(path_key).await?.unwrap_or(default))
    }

    pub async fn get_tri_state_value(&self, path_key: &PathKey) -> SettingsResult<TriState> {
        let value = self.get_string_value(path_key).await?;
        Ok(TriState::from_raw(value.as_deref()))
    }

    /// A value that must be configured; absence is an error.
    pub async fn get_required_value(&self, path_key: &PathKey) -> SettingsResult<String> {
        self.get_string_value(path_key)
            .await?
            .ok_or_else(|| SettingsError::RequiredValueMissing {
                key: path_key.key().value().to_string(),
            })
    }

    /// Resolves several path+keys at once; each key maps to its resolved
    /// value or `None`.
    pub async fn get_string_values(
        &self,
        path_keys: &[PathKey],
    ) -> SettingsResult<std::collections::HashMap<ConfigurationKey, Option<String>>> {
        let mut values = std::collections::HashMap::new();
        for path_key in path_keys {
            values.insert(path_key.key(), self.get_string_value(path_key).await?);
        }
        Ok(values)
    }

    // -- saves -----------------------------------------------------------

    /// Single-key upsert-or-delete at the path's own level.
    pub async fn save_config(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()> {
        self.strategy(path_key.path().level())
            .save(path_key, value)
            .await
    }

    pub async fn save_system_configuration(
        &self,
        key: ConfigurationKey,
        value: Option<&str>,
    ) -> SettingsResult<()> {
        self.system.save_system_configuration(key, value).await
    }

    pub async fn save_all_system_configuration(
        &self,
        list: &[ConfigurationModification],
    ) -> SettingsResult<()> {
        self.system.save_all_system_configuration(list).await
    }

    pub async fn save_all_organization_configuration(
        &self,
        organization_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        self.organization
            .save_all_organization_configuration(organization_id, list, username)
            .await
    }

    pub async fn save_all_event_configuration(
        &self,
        event_id: i32,
        organization_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        self.event
            .save_all_event_configuration(event_id, organization_id, list, username)
            .await
    }

    pub async fn save_ticket_category_configuration(
        &self,
        ticket_category_id: i32,
        event_id: i32,
        list: &[ConfigurationModification],
        username: &str,
    ) -> SettingsResult<()> {
        self.ticket_category
            .save_all_ticket_category_configuration(ticket_category_id, event_id, list, username)
            .await
    }

    // -- grouped views ---------------------------------------------------

    pub async fn load_organization_config(
        &self,
        organization_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        self.organization
            .load_organization_config(organization_id, username)
            .await
    }

    pub async fn load_event_config(
        &self,
        event_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        self.event.load_event_config(event_id, username).await
    }

    pub async fn load_ticket_category_config(
        &self,
        event_id: i32,
        ticket_category_id: i32,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        self.ticket_category
            .load_ticket_category_config(event_id, ticket_category_id, username)
            .await
    }

    pub async fn load_all_system_configuration_including_missing(
        &self,
        username: &str,
    ) -> SettingsResult<SettingsView> {
        self.system
            .load_all_system_configuration_including_missing(username)
            .await
    }

    // -- deletes ---------------------------------------------------------

    /// Deletes a system-level row by its raw key token.
    pub async fn delete_system_key(&self, key: &str) -> SettingsResult<()> {
        ConfigurationKey::from_str(key)?;
        self.system.delete_by_key(key).await
    }

    pub async fn delete_organization_level_by_key(
        &self,
        key: &str,
        organization_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        self.organization
            .delete_organization_level_by_key(key, organization_id, username)
            .await
    }

    pub async fn delete_event_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        self.event
            .delete_event_level_by_key(key, event_id, username)
            .await
    }

    pub async fn delete_ticket_category_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        ticket_category_id: i32,
        username: &str,
    ) -> SettingsResult<()> {
        self.ticket_category
            .delete_ticket_category_level_by_key(key, event_id, ticket_category_id, username)
            .await
    }

    // -- derived queries -------------------------------------------------

    /// True when every given boolean key is true for the event;
    /// short-circuits on the first miss.
    pub async fn are_boolean_settings_enabled_for_event(
        &self,
        event: &Event,
        keys: &[ConfigurationKey],
    ) -> SettingsResult<bool> {
        self.event.are_boolean_settings_enabled(event, keys).await
    }

    /// Whether enough billing information is configured to issue an
    /// invoice for the event: both the invoice address and the VAT
    /// number must be present (their content is not validated here).
    pub async fn has_all_configurations_for_invoice(&self, event: &Event) -> SettingsResult<bool> {
        let address = self
            .get_string_value(&PathKey::event(
                event.organization_id,
                event.id,
                ConfigurationKey::InvoiceAddress,
            ))
            .await?;
        let vat = self
            .get_string_value(&PathKey::event(
                event.organization_id,
                event.id,
                ConfigurationKey::VatNr,
            ))
            .await?;
        Ok(address.is_some() && vat.is_some())
    }

    /// CAPTCHA is required for offline payments only when the event
    /// opted in *and* the platform configured the flag at system level,
    /// a deliberate two-level condition.
    pub async fn is_captcha_for_offline_payments_enabled(
        &self,
        event: &Event,
    ) -> SettingsResult<bool> {
        let event_flag = self
            .get_boolean_value(
                &PathKey::event(
                    event.organization_id,
                    event.id,
                    ConfigurationKey::EnableCaptchaForOfflinePayments,
                ),
                false,
            )
            .await?;
        if !event_flag {
            return Ok(false);
        }
        let system_value = self
            .get_string_value(&PathKey::system(
                ConfigurationKey::EnableCaptchaForOfflinePayments,
            ))
            .await?;
        Ok(system_value.is_some())
    }

    /// True when any bootstrap key is still missing at system level.
    #[instrument(skip(self))]
    pub async fn is_basic_configuration_needed(&self) -> SettingsResult<bool> {
        for key in ConfigurationKey::basic() {
            if self
                .get_string_value(&PathKey::system(key))
                .await?
                .is_none()
            {
                warn!(key = %key, "no value configured for bootstrap key");
                return Ok(true);
            }
        }
        debug!("all bootstrap keys configured");
        Ok(false)
    }

    /// The uppercased short form of a reservation id, truncated to the
    /// configured length (default 8).
    pub async fn short_reservation_id(
        &self,
        event: &Event,
        reservation_id: &str,
    ) -> SettingsResult<String> {
        let length = self
            .get_int_value(
                &PathKey::event(
                    event.organization_id,
                    event.id,
                    ConfigurationKey::PartialReservationIdLength,
                ),
                8,
            )
            .await?;
        let length = usize::try_from(length).unwrap_or(8);
        Ok(reservation_id
            .chars()
            .take(length)
            .collect::<String>()
            .to_uppercase())
    }
}

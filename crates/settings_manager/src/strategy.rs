//! The per-level strategy seam.
//!
//! Each hierarchy level has one handler implementing [`PathStrategy`]:
//! `find` locates a value for a path+key, `save` upserts-or-deletes a
//! value at exactly that level. The handlers are built once by the
//! facade and selected by an exhaustive match on [`PathLevel`]; a path
//! of the wrong level reaching a handler is a programming error, not a
//! recoverable condition.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::{SettingsError, SettingsResult};
use crate::keys::{ComponentType, ConfigurationKey};
use crate::path::{ConfigurationEntry, ConfigurationPath, PathKey, TriState};
use crate::users::{User, UserManager};

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;

/// Lookup and single-key persistence at one hierarchy level.
#[async_trait]
pub trait PathStrategy: Send + Sync {
    /// A value defined exactly at this strategy's level for the given
    /// path and key; `None` means "fall through to a broader level or
    /// use the caller's default".
    async fn find(
        &self,
        path: &ConfigurationPath,
        key: ConfigurationKey,
    ) -> SettingsResult<Option<ConfigurationEntry>>;

    /// Upserts-or-deletes a value at exactly this strategy's level,
    /// following the uniform save policy: a boolean key with a blank
    /// value deletes the stored row, everything else upserts.
    async fn save(&self, path_key: &PathKey, value: Option<&str>) -> SettingsResult<()>;
}

/// Evaluates a raw caller value into what should be stored.
///
/// Boolean keys are trimmed and an empty result means "unset": the
/// stored row is deleted, creating the genuine three-state domain
/// (unset / true / false). Non-empty boolean input is normalized to the
/// canonical `"true"`/`"false"`. Text keys always yield a value; a
/// blank edit empties the stored value without deleting the row.
pub(crate) fn evaluate_value(key: ConfigurationKey, raw: Option<&str>) -> Option<String> {
    match key.component_type() {
        ComponentType::Boolean => TriState::from_raw(raw).canonical().map(str::to_owned),
        ComponentType::Text => Some(raw.unwrap_or_default().to_owned()),
    }
}

/// Resolves the caller for a mutating operation and requires ownership
/// of the organization. Fails before any write is issued.
pub(crate) async fn require_organization_owner(
    user_manager: &dyn UserManager,
    username: &str,
    organization_id: i32,
) -> SettingsResult<User> {
    let user = user_manager
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| SettingsError::UnknownUser {
            username: username.to_string(),
        })?;
    require_ownership(user_manager, &user, organization_id).await?;
    Ok(user)
}

/// Requires an already-resolved user to own the organization.
pub(crate) async fn require_ownership(
    user_manager: &dyn UserManager,
    user: &User,
    organization_id: i32,
) -> SettingsResult<()> {
    if user_manager
        .is_owner_of_organization(user, organization_id)
        .await?
    {
        Ok(())
    } else {
        warn!(
            username = %user.username,
            organization_id,
            "rejected settings mutation: caller is not an owner"
        );
        Err(SettingsError::NotAnOwner { organization_id })
    }
}

/// Resolves the caller for a view load. Returns `None` when the caller
/// is unknown or not an owner of the organization (the view is then an
/// empty map, not an error) and `Some(is_admin)` otherwise.
pub(crate) async fn view_caller_role(
    user_manager: &dyn UserManager,
    username: &str,
    organization_id: i32,
) -> SettingsResult<Option<bool>> {
    let Some(user) = user_manager.find_user_by_username(username).await? else {
        return Ok(None);
    };
    if !user_manager
        .is_owner_of_organization(&user, organization_id)
        .await?
    {
        return Ok(None);
    }
    Ok(Some(user_manager.is_admin(&user).await?))
}

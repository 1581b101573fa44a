//! User and role lookup collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SettingsResult;

/// A platform user, as much of it as the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
}

impl User {
    pub fn new(id: i32, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Answers "who is this" and "what may they do".
///
/// Ownership is checked for every mutation above system level; admin
/// status widens read views. The engine treats an unknown username on a
/// read path as "not an owner" (empty view), and on a write path as a
/// hard failure.
#[async_trait]
pub trait UserManager: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> SettingsResult<Option<User>>;

    async fn is_owner_of_organization(
        &self,
        user: &User,
        organization_id: i32,
    ) -> SettingsResult<bool>;

    async fn is_admin(&self, user: &User) -> SettingsResult<bool>;
}

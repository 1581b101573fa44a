//! Event lookup collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SettingsResult;

/// An event, reduced to what the engine needs: its identity and the
/// organization that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub organization_id: i32,
    pub display_name: String,
}

impl Event {
    pub fn new(id: i32, organization_id: i32, display_name: impl Into<String>) -> Self {
        Self {
            id,
            organization_id,
            display_name: display_name.into(),
        }
    }
}

/// Resolves event ids; used to walk from an event to its owning
/// organization when authorizing event- and category-level operations.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_event_by_id(&self, event_id: i32) -> SettingsResult<Option<Event>>;
}

//! Shared in-memory collaborator doubles for tests.
//!
//! The repository keeps rows in a mutex-guarded table and reproduces the
//! fallback-chain contract of the real store: organization lookups also
//! surface system rows, event lookups surface organization and system
//! rows, and so on down the hierarchy.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::SettingsResult;
use crate::events::{Event, EventRepository};
use crate::path::{ConfigurationEntry, PathLevel};
use crate::repository::ConfigurationRepository;
use crate::users::{User, UserManager};

#[derive(Debug, Clone)]
struct Row {
    id: i64,
    level: PathLevel,
    organization_id: Option<i32>,
    event_id: Option<i32>,
    ticket_category_id: Option<i32>,
    key: String,
    value: String,
    description: String,
}

impl Row {
    fn to_entry(&self) -> ConfigurationEntry {
        ConfigurationEntry::new(
            self.id,
            self.key.clone(),
            Some(self.value.clone()),
            self.description.clone(),
            self.level,
        )
    }
}

/// In-memory [`ConfigurationRepository`].
#[derive(Default)]
pub struct InMemoryConfigurationRepository {
    rows: Mutex<Vec<Row>>,
    next_id: AtomicI64,
    mutations: AtomicI64,
}

impl InMemoryConfigurationRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            mutations: AtomicI64::new(0),
        }
    }

    /// Number of writes (inserts, updates, deletes that removed a row)
    /// issued so far; used to assert batch atomicity.
    pub fn mutation_count(&self) -> i64 {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn push(
        &self,
        level: PathLevel,
        organization_id: Option<i32>,
        event_id: Option<i32>,
        ticket_category_id: Option<i32>,
        key: &str,
        value: &str,
        description: &str,
    ) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(Row {
            id,
            level,
            organization_id,
            event_id,
            ticket_category_id,
            key: key.to_string(),
            value: value.to_string(),
            description: description.to_string(),
        });
    }

    fn update_where(&self, matches: impl Fn(&Row) -> bool, value: &str) {
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut().filter(|r| matches(r)) {
            row.value = value.to_string();
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }

    fn delete_where(&self, matches: impl Fn(&Row) -> bool) {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !matches(r));
        if rows.len() != before {
            self.mutations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn collect(&self, matches: impl Fn(&Row) -> bool) -> Vec<ConfigurationEntry> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(r))
            .map(Row::to_entry)
            .collect()
    }
}

fn at_system(row: &Row, key: &str) -> bool {
    row.level == PathLevel::System && row.key == key
}

fn at_organization(row: &Row, organization_id: i32, key: &str) -> bool {
    row.level == PathLevel::Organization
        && row.organization_id == Some(organization_id)
        && row.key == key
}

fn at_event(row: &Row, event_id: i32, key: &str) -> bool {
    row.level == PathLevel::Event && row.event_id == Some(event_id) && row.key == key
}

fn at_ticket_category(row: &Row, event_id: i32, ticket_category_id: i32, key: &str) -> bool {
    row.level == PathLevel::TicketCategory
        && row.event_id == Some(event_id)
        && row.ticket_category_id == Some(ticket_category_id)
        && row.key == key
}

#[async_trait]
impl ConfigurationRepository for InMemoryConfigurationRepository {
    async fn find_system_by_key(&self, key: &str) -> SettingsResult<Option<ConfigurationEntry>> {
        Ok(self.collect(|r| at_system(r, key)).into_iter().next())
    }

    async fn find_by_organization_and_key(
        &self,
        organization_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| at_system(r, key) || at_organization(r, organization_id, key)))
    }

    async fn find_by_event_and_key(
        &self,
        organization_id: i32,
        event_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| {
            at_system(r, key)
                || at_organization(r, organization_id, key)
                || at_event(r, event_id, key)
        }))
    }

    async fn find_by_ticket_category_and_key(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: &str,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| {
            at_system(r, key)
                || at_organization(r, organization_id, key)
                || at_event(r, event_id, key)
                || at_ticket_category(r, event_id, ticket_category_id, key)
        }))
    }

    async fn find_at_organization_level(
        &self,
        organization_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        Ok(self
            .collect(|r| at_organization(r, organization_id, key))
            .into_iter()
            .next())
    }

    async fn find_at_event_level(
        &self,
        event_id: i32,
        _organization_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        Ok(self
            .collect(|r| at_event(r, event_id, key))
            .into_iter()
            .next())
    }

    async fn find_at_ticket_category_level(
        &self,
        event_id: i32,
        _organization_id: i32,
        ticket_category_id: i32,
        key: &str,
    ) -> SettingsResult<Option<ConfigurationEntry>> {
        Ok(self
            .collect(|r| at_ticket_category(r, event_id, ticket_category_id, key))
            .into_iter()
            .next())
    }

    async fn find_system_configuration(&self) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| r.level == PathLevel::System))
    }

    async fn find_organization_configuration(
        &self,
        organization_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| {
            r.level == PathLevel::Organization && r.organization_id == Some(organization_id)
        }))
    }

    async fn find_event_configuration(
        &self,
        _organization_id: i32,
        event_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| r.level == PathLevel::Event && r.event_id == Some(event_id)))
    }

    async fn find_ticket_category_configuration(
        &self,
        _organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
    ) -> SettingsResult<Vec<ConfigurationEntry>> {
        Ok(self.collect(|r| {
            r.level == PathLevel::TicketCategory
                && r.event_id == Some(event_id)
                && r.ticket_category_id == Some(ticket_category_id)
        }))
    }

    async fn insert_system(
        &self,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()> {
        self.push(PathLevel::System, None, None, None, key, value, description);
        Ok(())
    }

    async fn update_system(&self, key: &str, value: &str) -> SettingsResult<()> {
        self.update_where(|r| at_system(r, key), value);
        Ok(())
    }

    async fn delete_system_by_key(&self, key: &str) -> SettingsResult<()> {
        self.delete_where(|r| at_system(r, key));
        Ok(())
    }

    async fn insert_organization_level(
        &self,
        organization_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()> {
        self.push(
            PathLevel::Organization,
            Some(organization_id),
            None,
            None,
            key,
            value,
            description,
        );
        Ok(())
    }

    async fn update_organization_level(
        &self,
        organization_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()> {
        self.update_where(|r| at_organization(r, organization_id, key), value);
        Ok(())
    }

    async fn delete_organization_level_by_key(
        &self,
        key: &str,
        organization_id: i32,
    ) -> SettingsResult<()> {
        self.delete_where(|r| at_organization(r, organization_id, key));
        Ok(())
    }

    async fn insert_event_level(
        &self,
        organization_id: i32,
        event_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()> {
        self.push(
            PathLevel::Event,
            Some(organization_id),
            Some(event_id),
            None,
            key,
            value,
            description,
        );
        Ok(())
    }

    async fn update_event_level(
        &self,
        event_id: i32,
        _organization_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()> {
        self.update_where(|r| at_event(r, event_id, key), value);
        Ok(())
    }

    async fn delete_event_level_by_key(&self, key: &str, event_id: i32) -> SettingsResult<()> {
        self.delete_where(|r| at_event(r, event_id, key));
        Ok(())
    }

    async fn insert_ticket_category_level(
        &self,
        organization_id: i32,
        event_id: i32,
        ticket_category_id: i32,
        key: &str,
        value: &str,
        description: &str,
    ) -> SettingsResult<()> {
        self.push(
            PathLevel::TicketCategory,
            Some(organization_id),
            Some(event_id),
            Some(ticket_category_id),
            key,
            value,
            description,
        );
        Ok(())
    }

    async fn update_ticket_category_level(
        &self,
        event_id: i32,
        _organization_id: i32,
        ticket_category_id: i32,
        key: &str,
        value: &str,
    ) -> SettingsResult<()> {
        self.update_where(
            |r| at_ticket_category(r, event_id, ticket_category_id, key),
            value,
        );
        Ok(())
    }

    async fn delete_ticket_category_level_by_key(
        &self,
        key: &str,
        event_id: i32,
        ticket_category_id: i32,
    ) -> SettingsResult<()> {
        self.delete_where(|r| at_ticket_category(r, event_id, ticket_category_id, key));
        Ok(())
    }
}

/// [`UserManager`] double backed by static role tables.
#[derive(Default)]
pub struct StaticUserManager {
    users: HashMap<String, User>,
    owners: HashSet<(i32, i32)>,
    admins: HashSet<i32>,
}

impl StaticUserManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.username.clone(), user);
        self
    }

    pub fn with_owner(mut self, user_id: i32, organization_id: i32) -> Self {
        self.owners.insert((user_id, organization_id));
        self
    }

    pub fn with_admin(mut self, user_id: i32) -> Self {
        self.admins.insert(user_id);
        self
    }
}

#[async_trait]
impl UserManager for StaticUserManager {
    async fn find_user_by_username(&self, username: &str) -> SettingsResult<Option<User>> {
        Ok(self.users.get(username).cloned())
    }

    async fn is_owner_of_organization(
        &self,
        user: &User,
        organization_id: i32,
    ) -> SettingsResult<bool> {
        Ok(self.owners.contains(&(user.id, organization_id)))
    }

    async fn is_admin(&self, user: &User) -> SettingsResult<bool> {
        Ok(self.admins.contains(&user.id))
    }
}

/// [`EventRepository`] double backed by a static table.
#[derive(Default)]
pub struct StaticEventRepository {
    events: HashMap<i32, Event>,
}

impl StaticEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.insert(event.id, event);
        self
    }
}

#[async_trait]
impl EventRepository for StaticEventRepository {
    async fn find_event_by_id(&self, event_id: i32) -> SettingsResult<Option<Event>> {
        Ok(self.events.get(&event_id).cloned())
    }
}

//! End-to-end scenarios exercising the whole engine: catalog, strategy
//! dispatch, resolution, merge and visibility together.

use std::sync::Arc;

use crate::manager::ConfigurationManager;
use crate::keys::{ConfigurationKey, SettingCategory};
use crate::path::{ConfigurationModification, PathKey, PathLevel, TriState};
use crate::test_support::{
    InMemoryConfigurationRepository, StaticEventRepository, StaticUserManager,
};
use crate::events::Event;
use crate::users::User;

fn platform() -> (Arc<InMemoryConfigurationRepository>, ConfigurationManager) {
    let repository = Arc::new(InMemoryConfigurationRepository::new());
    let user_manager = Arc::new(
        StaticUserManager::new()
            .with_user(User::new(1, "root"))
            .with_user(User::new(2, "organizer"))
            .with_admin(1)
            .with_owner(1, 10)
            .with_owner(2, 10),
    );
    let event_repository =
        Arc::new(StaticEventRepository::new().with_event(Event::new(100, 10, "OpenAir")));
    let manager = ConfigurationManager::new(repository.clone(), user_manager, event_repository);
    (repository, manager)
}

/// A platform bootstrap followed by an organization override, as an
/// operator and an organizer would actually drive it.
#[tokio::test]
async fn bootstrap_then_override_then_inspect() {
    let (_repository, manager) = platform();

    // platform operator seeds the system defaults
    manager
        .save_all_system_configuration(&[
            ConfigurationModification::new(None, "BASE_URL", Some("https://tickets.example.com".into())),
            ConfigurationModification::new(None, "MAPS_CLIENT_API_KEY", Some("maps-key".into())),
            ConfigurationModification::new(None, "SMTP_HOST", Some("mail.example.com".into())),
        ])
        .await
        .unwrap();
    assert!(!manager.is_basic_configuration_needed().await.unwrap());

    // the organizer overrides the mail host for their organization
    manager
        .save_all_organization_configuration(
            10,
            &[ConfigurationModification::new(
                None,
                "SMTP_HOST",
                Some("mail.org10.com".into()),
            )],
            "organizer",
        )
        .await
        .unwrap();

    // resolution prefers the override for that organization
    let resolved = manager
        .get_string_value(&PathKey::organization(10, ConfigurationKey::SmtpHost))
        .await
        .unwrap();
    assert_eq!(resolved.as_deref(), Some("mail.org10.com"));

    // the organizer's view shows the stored override and placeholders
    // for everything else that is settable
    let view = manager
        .load_organization_config(10, "organizer")
        .await
        .unwrap();
    let mail = view.get(&SettingCategory::Mail).unwrap();
    let host = mail.iter().find(|e| e.key == "SMTP_HOST").unwrap();
    assert!(!host.is_placeholder());
    assert_eq!(host.value.as_deref(), Some("mail.org10.com"));
    assert_eq!(host.path_level, PathLevel::Organization);
    assert!(mail.iter().any(|e| e.key == "MAIL_REPLY_TO" && e.is_placeholder()));
}

/// Clearing a boolean override reopens the fallthrough to the broader
/// level instead of pinning `false`.
#[tokio::test]
async fn clearing_a_boolean_override_restores_the_system_default() {
    let (_repository, manager) = platform();
    let system_key = PathKey::system(ConfigurationKey::EnableCaptchaForOfflinePayments);
    let event_key = PathKey::event(10, 100, ConfigurationKey::EnableCaptchaForOfflinePayments);

    manager.save_config(&system_key, Some("true")).await.unwrap();
    manager.save_config(&event_key, Some("false")).await.unwrap();

    // the event-level false wins over the system-level true
    assert!(!manager.get_boolean_value(&event_key, true).await.unwrap());

    // clearing the override falls through to the system value again
    manager.save_config(&event_key, Some("")).await.unwrap();
    assert!(manager.get_boolean_value(&event_key, false).await.unwrap());
    assert_eq!(
        manager.get_tri_state_value(&system_key).await.unwrap(),
        TriState::True
    );
}

/// The admin system view stays consistent while values come and go.
#[tokio::test]
async fn system_view_tracks_stored_and_missing_keys() {
    let (_repository, manager) = platform();

    manager
        .save_config(
            &PathKey::system(ConfigurationKey::SmtpHost),
            Some("mail.example.com"),
        )
        .await
        .unwrap();

    let view = manager
        .load_all_system_configuration_including_missing("root")
        .await
        .unwrap();
    let mail = view.get(&SettingCategory::Mail).unwrap();
    assert!(mail.iter().find(|e| e.key == "SMTP_HOST").unwrap().id > 0);
    assert!(mail.iter().find(|e| e.key == "SMTP_PORT").unwrap().is_placeholder());

    manager.delete_system_key("SMTP_HOST").await.unwrap();
    let view = manager
        .load_all_system_configuration_including_missing("root")
        .await
        .unwrap();
    let mail = view.get(&SettingCategory::Mail).unwrap();
    assert!(mail.iter().find(|e| e.key == "SMTP_HOST").unwrap().is_placeholder());
}

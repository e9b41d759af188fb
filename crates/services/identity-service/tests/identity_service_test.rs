//! Identity application service tests against the in-process registry.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_test::{assert_err, assert_ok};

use common::AppError;
use domain::{EventRecorder, IdentityEvent, PasswordPolicy};
use identity_service_lib::repository::InMemoryUserStore;
use identity_service_lib::service::{
    ChangeUserContactInformationCommand, ChangeUserPasswordCommand,
    ChangeUserPersonalNameCommand, DefineUserEnablementCommand, EnablementInput,
    IdentityApplicationService, IdentityService, RegisterUserCommand,
};

fn setup() -> (IdentityApplicationService, Arc<EventRecorder>) {
    let events = Arc::new(EventRecorder::new());
    let service = IdentityApplicationService::new(
        Arc::new(InMemoryUserStore::new()),
        PasswordPolicy::standard(),
        events.clone(),
    );
    (service, events)
}

fn register_command(username: &str) -> RegisterUserCommand {
    RegisterUserCommand {
        tenant_id: "T1".to_string(),
        username: username.to_string(),
        password: "Goodpass1!".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email_address: "jane@x.com".to_string(),
        primary_telephone: Some("303-555-1210".to_string()),
        secondary_telephone: None,
        enablement: EnablementInput::indefinite(),
    }
}

fn change_password(current: &str, changed: &str) -> ChangeUserPasswordCommand {
    ChangeUserPasswordCommand {
        tenant_id: "T1".to_string(),
        username: "jdoe".to_string(),
        current_password: current.to_string(),
        changed_password: changed.to_string(),
    }
}

#[tokio::test]
async fn test_register_user_returns_descriptor_and_publishes() {
    let (service, events) = setup();

    let descriptor = assert_ok!(service.register_user(register_command("jdoe")).await);
    assert_eq!(descriptor.tenant_id.as_str(), "T1");
    assert_eq!(descriptor.username, "jdoe");
    assert_eq!(descriptor.email_address, "jane@x.com");

    let published = events.events();
    assert_eq!(published.len(), 1);
    assert!(matches!(&published[0], IdentityEvent::UserRegistered(e) if e.username == "jdoe"));
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let (service, events) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);
    events.take();

    let err = assert_err!(service.register_user(register_command("jdoe")).await);
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_same_username_in_other_tenant_is_allowed() {
    let (service, _) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);

    let mut other = register_command("jdoe");
    other.tenant_id = "T2".to_string();
    assert_ok!(service.register_user(other).await);

    assert_eq!(service.users("T1").await.unwrap().len(), 1);
    assert_eq!(service.users("T2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_rejects_invalid_input_without_storing() {
    let (service, events) = setup();

    let mut weak = register_command("jdoe");
    weak.password = "1234".to_string();
    let err = assert_err!(service.register_user(weak).await);
    assert_eq!(err.code(), "POLICY_VIOLATION");

    let mut bad_email = register_command("jdoe");
    bad_email.email_address = "not-an-email".to_string();
    let err = assert_err!(service.register_user(bad_email).await);
    assert_eq!(err.code(), "INVALID_ARGUMENT");

    let mut blank_tenant = register_command("jdoe");
    blank_tenant.tenant_id = " ".to_string();
    assert_err!(service.register_user(blank_tenant).await);

    assert!(events.is_empty());
    assert!(matches!(service.user("T1", "jdoe").await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_change_password_flow() {
    let (service, events) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);
    let before = service.user("T1", "jdoe").await.unwrap().password().to_string();
    events.take();

    let err = assert_err!(service.change_user_password(change_password("", "StrongPw9!")).await);
    assert_eq!(err.code(), "EMPTY_ARGUMENT");

    let err = assert_err!(service.change_user_password(change_password("wrong", "StrongPw9!")).await);
    assert_eq!(err.code(), "ARGUMENT_MISMATCH");

    let err = assert_err!(service.change_user_password(change_password("Goodpass1!", "Goodpass1!")).await);
    assert_eq!(err.code(), "ARGUMENT_UNCHANGED");

    assert!(events.is_empty());
    assert_eq!(service.user("T1", "jdoe").await.unwrap().password(), before);

    assert_ok!(service.change_user_password(change_password("Goodpass1!", "StrongPw9!")).await);
    assert_ne!(service.user("T1", "jdoe").await.unwrap().password(), before);

    let published = events.take();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].event_type(), "UserPasswordChanged");

    // The new password is the current one from now on
    assert_ok!(service.change_user_password(change_password("StrongPw9!", "Goodpass1!")).await);
}

#[tokio::test]
async fn test_define_enablement_changes_is_enabled() {
    let (service, events) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);
    assert!(service.user("T1", "jdoe").await.unwrap().is_enabled());
    events.take();

    let expired = EnablementInput {
        enabled: true,
        start_date: Some(Utc::now() - Duration::days(30)),
        end_date: Some(Utc::now() - Duration::days(1)),
    };
    assert_ok!(
        service
            .define_user_enablement(DefineUserEnablementCommand {
                tenant_id: "T1".to_string(),
                username: "jdoe".to_string(),
                enablement: expired,
            })
            .await
    );

    assert!(!service.user("T1", "jdoe").await.unwrap().is_enabled());
    let published = events.take();
    assert_eq!(published.len(), 1);
    assert!(matches!(&published[0], IdentityEvent::UserEnablementChanged(e) if e.enablement.end_date().is_some()));
}

#[tokio::test]
async fn test_define_enablement_rejects_inverted_window() {
    let (service, _) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);

    let inverted = EnablementInput {
        enabled: true,
        start_date: Some(Utc::now()),
        end_date: Some(Utc::now() - Duration::days(1)),
    };
    let err = assert_err!(
        service
            .define_user_enablement(DefineUserEnablementCommand {
                tenant_id: "T1".to_string(),
                username: "jdoe".to_string(),
                enablement: inverted,
            })
            .await
    );
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_person_changes_publish_person_events() {
    let (service, events) = setup();
    assert_ok!(service.register_user(register_command("jdoe")).await);
    events.take();

    assert_ok!(
        service
            .change_user_personal_name(ChangeUserPersonalNameCommand {
                tenant_id: "T1".to_string(),
                username: "jdoe".to_string(),
                first_name: "Janet".to_string(),
                last_name: "Doe".to_string(),
            })
            .await
    );
    assert_ok!(
        service
            .change_user_contact_information(ChangeUserContactInformationCommand {
                tenant_id: "T1".to_string(),
                username: "jdoe".to_string(),
                email_address: "janet@x.com".to_string(),
                primary_telephone: None,
                secondary_telephone: Some("".to_string()),
            })
            .await
    );

    let types: Vec<_> = events.take().iter().map(|e| e.event_type()).collect();
    assert_eq!(types, vec!["PersonNameChanged", "PersonContactInformationChanged"]);

    let user = service.user("T1", "jdoe").await.unwrap();
    assert_eq!(user.person().name().as_formatted_name(), "Janet Doe");
    assert_eq!(
        service.user_descriptor("T1", "jdoe").await.unwrap().email_address,
        "janet@x.com"
    );
}

#[tokio::test]
async fn test_commands_on_unknown_user_are_not_found() {
    let (service, _) = setup();

    let err = assert_err!(service.change_user_password(change_password("Goodpass1!", "StrongPw9!")).await);
    assert!(matches!(err, AppError::NotFound));
    assert!(matches!(service.user_descriptor("T1", "ghost").await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_concurrent_password_changes_serialize() {
    let (service, events) = setup();
    let service = Arc::new(service);
    assert_ok!(service.register_user(register_command("jdoe")).await);
    events.take();

    // Both start from the same current password; only one can win
    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .change_user_password(change_password("Goodpass1!", "StrongPw9!"))
                .await
        })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .change_user_password(change_password("Goodpass1!", "OtherPw77#"))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(events.len(), 1);
}

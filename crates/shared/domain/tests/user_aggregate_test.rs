//! User aggregate behaviour tests.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use domain::{
    ContactInformation, DomainError, EmailAddress, Enablement, EncryptionService, EventRecorder,
    FullName, GroupMember, GroupMemberType, IdentityEvent, PasswordPolicy, PasswordService,
    Person, Sha256EncryptionService, TenantId, User,
};

// =============================================================================
// Fixtures
// =============================================================================

/// Flags only the listed passwords as weak
struct ListedWeakPasswords(&'static [&'static str]);

impl PasswordService for ListedWeakPasswords {
    fn is_weak(&self, plain_text: &str) -> bool {
        self.0.iter().any(|weak| *weak == plain_text)
    }
}

/// Reversible toy transform, deterministic like the real one
struct ReversingEncryption;

impl EncryptionService for ReversingEncryption {
    fn encrypted_value(&self, plain_text: &str) -> domain::DomainResult<String> {
        Ok(format!("enc:{}", plain_text.chars().rev().collect::<String>()))
    }
}

fn policy() -> PasswordPolicy {
    PasswordPolicy::new(
        Arc::new(ReversingEncryption),
        Arc::new(ListedWeakPasswords(&["1234"])),
    )
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

fn person(first: &str, last: &str, email: &str) -> Person {
    Person::new(
        FullName::new(first, last).unwrap(),
        ContactInformation::new(EmailAddress::new(email).unwrap(), None, None),
    )
}

fn jane() -> Person {
    person("Jane", "Doe", "jane@x.com")
}

fn register_with(password: &str, recorder: &EventRecorder) -> User {
    User::register(
        tenant("T1"),
        "jdoe",
        password,
        Enablement::indefinite(),
        jane(),
        &policy(),
        recorder,
    )
    .unwrap()
}

/// Registered user with its registration event already drained
fn registered_user(password: &str) -> (User, EventRecorder) {
    let recorder = EventRecorder::new();
    let user = register_with(password, &recorder);
    recorder.take();
    (user, recorder)
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_register_publishes_user_registered() {
    let recorder = EventRecorder::new();
    let enablement = Enablement::indefinite();

    let user = User::register(
        tenant("T1"),
        "jdoe",
        "Goodpass1!",
        enablement,
        jane(),
        &PasswordPolicy::standard(),
        &recorder,
    )
    .unwrap();

    assert_eq!(user.is_enabled(), enablement.is_enablement_enabled());
    assert_eq!(
        user.password(),
        Sha256EncryptionService::new().encrypted_value("Goodpass1!").unwrap()
    );

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        IdentityEvent::UserRegistered(event) => {
            assert_eq!(event.tenant_id.as_str(), "T1");
            assert_eq!(event.username, "jdoe");
            assert_eq!(event.full_name.as_formatted_name(), "Jane Doe");
            assert_eq!(event.email_address.address(), "jane@x.com");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_register_with_disabled_enablement() {
    let recorder = EventRecorder::new();
    let user = User::register(
        tenant("T1"),
        "jdoe",
        "Goodpass1!",
        Enablement::disabled(),
        jane(),
        &policy(),
        &recorder,
    )
    .unwrap();

    assert!(!user.is_enabled());
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_register_rejects_weak_password() {
    let recorder = EventRecorder::new();
    let result = User::register(
        tenant("T1"),
        "jdoe",
        "1234",
        Enablement::indefinite(),
        jane(),
        &policy(),
        &recorder,
    );

    assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    assert!(recorder.is_empty());
}

#[test]
fn test_register_rejects_password_equal_to_username() {
    let recorder = EventRecorder::new();
    let result = User::register(
        tenant("T1"),
        "jdoe-the-user",
        "jdoe-the-user",
        Enablement::indefinite(),
        jane(),
        &policy(),
        &recorder,
    );

    assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    assert!(recorder.is_empty());
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_equality_uses_natural_key_only() {
    let recorder = EventRecorder::new();
    let first = register_with("Goodpass1!", &recorder);

    let mut second = User::register(
        tenant("T1"),
        "jdoe",
        "Otherpass2?",
        Enablement::disabled(),
        person("John", "Dough", "john@y.org"),
        &policy(),
        &recorder,
    )
    .unwrap();
    second.define_enablement(
        Enablement::new(true, Some(Utc::now() + Duration::days(3)), None).unwrap(),
        &recorder,
    );

    assert_ne!(first.password(), second.password());
    assert_eq!(first, second);

    let mut set = HashSet::new();
    set.insert(first.clone());
    assert!(!set.insert(second));

    let other_tenant = User::register(
        tenant("T2"),
        "jdoe",
        "Goodpass1!",
        Enablement::indefinite(),
        jane(),
        &policy(),
        &recorder,
    )
    .unwrap();
    assert_ne!(first, other_tenant);
}

#[test]
fn test_projections() {
    let (user, _) = registered_user("Goodpass1!");

    assert_eq!(
        user.to_group_member(),
        GroupMember::new(tenant("T1"), "jdoe", GroupMemberType::User)
    );

    let descriptor = user.user_descriptor();
    assert_eq!(descriptor.tenant_id, tenant("T1"));
    assert_eq!(descriptor.username, "jdoe");
    assert_eq!(descriptor.email_address, "jane@x.com");
}

#[test]
fn test_group_member_ignores_state() {
    let (mut user, recorder) = registered_user("okCurrentPw1");
    user.change_password("okCurrentPw1", "StrongPw9!", &policy(), &recorder)
        .unwrap();
    user.define_enablement(Enablement::disabled(), &recorder);

    let member = user.to_group_member();
    assert_eq!(member.tenant_id, tenant("T1"));
    assert_eq!(member.name, "jdoe");
    assert!(member.is_user());
}

// =============================================================================
// Password change
// =============================================================================

#[test]
fn test_change_password_requires_current() {
    let (mut user, recorder) = registered_user("okCurrentPw1");
    let before = user.password().to_string();

    let result = user.change_password("", "StrongPw9!", &policy(), &recorder);

    assert!(matches!(result, Err(DomainError::EmptyArgument(_))));
    assert_eq!(user.password(), before);
    assert!(recorder.is_empty());
}

#[test]
fn test_change_password_requires_matching_current() {
    let (mut user, recorder) = registered_user("okCurrentPw1");
    let before = user.password().to_string();

    let result = user.change_password("notTheCurrent1", "StrongPw9!", &policy(), &recorder);

    assert!(matches!(result, Err(DomainError::ArgumentMismatch(_))));
    assert_eq!(user.password(), before);
    assert!(recorder.is_empty());
}

#[test]
fn test_change_password_rejects_unchanged() {
    let (mut user, recorder) = registered_user("okCurrentPw1");

    let result = user.change_password("okCurrentPw1", "okCurrentPw1", &policy(), &recorder);

    assert!(matches!(result, Err(DomainError::ArgumentUnchanged(_))));
    assert!(recorder.is_empty());
}

#[test]
fn test_change_password_rejects_weak() {
    let (mut user, recorder) = registered_user("okCurrentPw1");
    let before = user.password().to_string();

    let result = user.change_password("okCurrentPw1", "1234", &policy(), &recorder);

    assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    assert_eq!(user.password(), before);
    assert!(recorder.is_empty());
}

#[test]
fn test_change_password_rejects_username() {
    let (mut user, recorder) = registered_user("okCurrentPw1");

    let result = user.change_password("okCurrentPw1", "jdoe", &policy(), &recorder);

    assert!(matches!(result, Err(DomainError::PolicyViolation(_))));
    assert!(recorder.is_empty());
}

#[test]
fn test_change_password_success() {
    let (mut user, recorder) = registered_user("okCurrentPw1");

    user.change_password("okCurrentPw1", "StrongPw9!", &policy(), &recorder)
        .unwrap();

    assert_eq!(
        user.password(),
        ReversingEncryption.encrypted_value("StrongPw9!").unwrap()
    );

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        IdentityEvent::UserPasswordChanged(event) => {
            assert_eq!(event.tenant_id, tenant("T1"));
            assert_eq!(event.username, "jdoe");
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The new password is now the one to confirm
    assert!(matches!(
        user.change_password("okCurrentPw1", "Another1!", &policy(), &recorder),
        Err(DomainError::ArgumentMismatch(_))
    ));
    user.change_password("StrongPw9!", "Another1!", &policy(), &recorder)
        .unwrap();
    assert_eq!(recorder.len(), 1);
}

// =============================================================================
// Enablement
// =============================================================================

#[test]
fn test_define_enablement_replaces_and_publishes() {
    let (mut user, recorder) = registered_user("Goodpass1!");
    let password_before = user.password().to_string();
    let person_before = user.person().clone();

    let now = Utc::now();
    let window = Enablement::new(true, Some(now - Duration::days(1)), Some(now - Duration::hours(1)))
        .unwrap();
    user.define_enablement(window, &recorder);

    assert_eq!(user.enablement(), &window);
    assert!(!user.is_enabled());
    assert!(user.is_enabled_at(now - Duration::hours(2)));
    assert_eq!(user.password(), password_before);
    assert_eq!(user.person(), &person_before);

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        IdentityEvent::UserEnablementChanged(event) => {
            assert_eq!(event.tenant_id, tenant("T1"));
            assert_eq!(event.username, "jdoe");
            assert_eq!(event.enablement, window);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_define_same_enablement_still_publishes() {
    let (mut user, recorder) = registered_user("Goodpass1!");

    user.define_enablement(Enablement::indefinite(), &recorder);
    user.define_enablement(Enablement::indefinite(), &recorder);

    assert_eq!(recorder.len(), 2);
}

// =============================================================================
// Personal details
// =============================================================================

#[test]
fn test_personal_changes_delegate_to_person() {
    let (mut user, recorder) = registered_user("Goodpass1!");

    user.change_personal_name(FullName::new("Janet", "Doe").unwrap(), &recorder);
    user.change_personal_contact_information(
        ContactInformation::new(EmailAddress::new("janet@x.com").unwrap(), None, None),
        &recorder,
    );

    assert_eq!(user.person().name().as_formatted_name(), "Janet Doe");
    assert_eq!(user.user_descriptor().email_address, "janet@x.com");

    // Only person events; the user publishes nothing of its own
    let events = recorder.take();
    let types: Vec<_> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(types, vec!["PersonNameChanged", "PersonContactInformationChanged"]);
}

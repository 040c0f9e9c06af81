//! End-to-end flows over the auth service and the in-memory store.

use std::sync::Arc;

use argon2::Params;

use taskforge_auth::{
    AuthConfig, AuthError, AuthService, CredentialStore, NewUser, PasswordHasher, PermissionMap,
    Requirement, TokenVerifier, UpdateRole, UpdateUser, authorize,
};
use taskforge_core::RoleId;

use crate::memory::InMemoryCredentialStore;
use crate::seed::{seed_roles, seed_users};

fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(16, 1, 1, None).unwrap())
}

fn test_service() -> (AuthService, Arc<InMemoryCredentialStore>) {
    let store = Arc::new(InMemoryCredentialStore::with_hasher(fast_hasher()));
    seed_roles(store.as_ref()).unwrap();

    let service = AuthService::new(store.clone(), AuthConfig::default())
        .with_hasher(fast_hasher());
    (service, store)
}

fn new_user(email: &str, password: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: password.to_string(),
        role_id: None,
    }
}

#[test]
fn registration_assigns_the_default_role_and_denies_beyond_it() {
    let (service, _store) = test_service();

    let grant = service.register(new_user("a@x.com", "secret1")).unwrap();
    let role = grant.user.role.as_ref().expect("default role assigned");
    assert_eq!(role.name, "viewer");

    // The decoded token carries the default role's permission snapshot.
    let verifier = TokenVerifier::new(&AuthConfig::default().jwt_secret);
    let principal = verifier.decode(&grant.access_token).unwrap();
    assert_eq!(principal.permissions, role.permissions);

    // Lowest privilege: reading projects is in, creating them is not.
    assert!(authorize(&principal, &Requirement::single("projects", "read")));
    assert!(!authorize(&principal, &Requirement::single("projects", "create")));
}

#[test]
fn login_and_registration_issue_the_same_token_shape() {
    let (service, _store) = test_service();

    let registered = service.register(new_user("a@x.com", "secret1")).unwrap();
    let logged_in = service.login("a@x.com", "secret1").unwrap();

    assert_eq!(registered.token_type, logged_in.token_type);
    assert_eq!(registered.expires_in, logged_in.expires_in);

    let verifier = TokenVerifier::new(&AuthConfig::default().jwt_secret);
    let p1 = verifier.decode(&registered.access_token).unwrap();
    let p2 = verifier.decode(&logged_in.access_token).unwrap();
    assert_eq!(p1, p2);
}

#[test]
fn unknown_email_and_wrong_password_fail_identically() {
    let (service, _store) = test_service();
    service.register(new_user("real@x.com", "secret1")).unwrap();

    let unknown = service.login("nobody@x.com", "anything").unwrap_err();
    let wrong = service.login("real@x.com", "wrongpass").unwrap_err();

    assert_eq!(unknown, wrong);
    assert_eq!(unknown, AuthError::InvalidCredentials);
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[test]
fn duplicate_registration_conflicts() {
    let (service, _store) = test_service();
    service.register(new_user("a@x.com", "secret1")).unwrap();

    let err = service.register(new_user("a@x.com", "secret2")).unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));

    // Email canonicalization applies to the uniqueness check too.
    let err = service
        .register(new_user(" A@X.COM ", "secret2"))
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[test]
fn unknown_role_id_on_registration_is_not_found() {
    let (service, _store) = test_service();

    let err = service
        .register(NewUser {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            role_id: Some(RoleId::new()),
        })
        .unwrap_err();

    assert!(matches!(err, AuthError::NotFound(_)));
}

#[test]
fn short_password_is_rejected_before_hashing() {
    let (service, _store) = test_service();

    let err = service.register(new_user("a@x.com", "short")).unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[test]
fn email_only_update_leaves_the_stored_hash_intact() {
    let (service, store) = test_service();

    let grant = service.register(new_user("a@x.com", "secret1")).unwrap();
    let before = store
        .find_user_by_email("a@x.com")
        .unwrap()
        .unwrap()
        .user
        .password_hash;

    // Update only the email; the existing hash rides through save_user.
    service
        .update_user(
            grant.user.id,
            UpdateUser {
                email: Some("renamed@x.com".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    // And again, to make sure repetition never compounds.
    service
        .update_user(
            grant.user.id,
            UpdateUser {
                email: Some("renamed-again@x.com".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let after = store
        .find_user_by_email("renamed-again@x.com")
        .unwrap()
        .unwrap()
        .user
        .password_hash;

    assert_eq!(before, after);
    assert!(service.login("renamed-again@x.com", "secret1").is_ok());
}

#[test]
fn password_update_rotates_the_hash() {
    let (service, store) = test_service();

    let grant = service.register(new_user("a@x.com", "secret1")).unwrap();
    let before = store
        .find_user_by_email("a@x.com")
        .unwrap()
        .unwrap()
        .user
        .password_hash;

    service
        .update_user(
            grant.user.id,
            UpdateUser {
                password: Some("secret2".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let after = store
        .find_user_by_email("a@x.com")
        .unwrap()
        .unwrap()
        .user
        .password_hash;

    assert_ne!(before, after);
    assert!(service.login("a@x.com", "secret2").is_ok());
    assert_eq!(
        service.login("a@x.com", "secret1").unwrap_err(),
        AuthError::InvalidCredentials
    );
}

#[test]
fn role_edits_are_not_retroactive_for_issued_tokens() {
    let (service, store) = test_service();

    let grant = service.register(new_user("a@x.com", "secret1")).unwrap();
    let viewer_id = store.find_role_by_name("viewer").unwrap().unwrap().id;

    // Widen the role after the token was issued.
    service
        .update_role(
            viewer_id,
            UpdateRole {
                permissions: Some(
                    PermissionMap::new().with("projects", &["read", "write"]),
                ),
                ..Default::default()
            },
        )
        .unwrap();

    // The old token keeps its issued snapshot.
    let stale = service.principal_from_token(&grant.access_token).unwrap();
    assert!(stale.permissions.allows("projects", "read"));
    assert!(!stale.permissions.allows("projects", "write"));

    // Re-authenticating picks up the new mapping.
    let fresh = service.authenticate("a@x.com", "secret1").unwrap();
    assert!(fresh.permissions.allows("projects", "write"));
}

#[test]
fn seeded_accounts_authenticate_with_their_roles() {
    let (service, store) = test_service();
    seed_users(store.as_ref()).unwrap();

    let admin = service.authenticate("admin@test.com", "admin123").unwrap();
    assert_eq!(admin.role.as_deref(), Some("admin"));
    assert!(authorize(&admin, &Requirement::single("users", "read")));

    let viewer = service.authenticate("viewer@test.com", "viewer123").unwrap();
    assert_eq!(viewer.role.as_deref(), Some("viewer"));
    assert!(!authorize(&viewer, &Requirement::single("users", "read")));

    // Seeding twice is a no-op.
    seed_roles(store.as_ref()).unwrap();
    seed_users(store.as_ref()).unwrap();
    assert!(service.authenticate("admin@test.com", "admin123").is_ok());
}

#[test]
fn removed_users_can_no_longer_authenticate() {
    let (service, _store) = test_service();

    let grant = service.register(new_user("a@x.com", "secret1")).unwrap();
    service.remove_user(grant.user.id).unwrap();

    assert_eq!(
        service.login("a@x.com", "secret1").unwrap_err(),
        AuthError::InvalidCredentials
    );
    assert!(matches!(
        service.remove_user(grant.user.id),
        Err(AuthError::NotFound(_))
    ));
}

#[test]
fn role_management_round_trip() {
    let (service, _store) = test_service();

    let role = service
        .create_role(
            "auditor",
            PermissionMap::new().with("projects", &["read"]).with("tasks", &["read"]),
        )
        .unwrap();

    assert!(matches!(
        service.create_role("auditor", PermissionMap::new()),
        Err(AuthError::Conflict(_))
    ));

    let fetched = service.get_role(role.id).unwrap();
    assert_eq!(fetched, role);

    let names: Vec<String> = service
        .list_roles()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["admin", "auditor", "editor", "viewer"]);
}

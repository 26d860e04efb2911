//! End-to-end reconciliation tests over an in-memory store, a temp data
//! directory and a scripted remote identity service.

use async_trait::async_trait;
use nacre_client::{ClientError, ClientResult, RemoteIdentity};
use nacre_session::credential;
use nacre_session::session::{LoginError, SessionEngine, SessionOrigin};
use nacre_session::store::IdentityStore;
use shared::client::{EmployeeInfo, LoginResponse, UserInfo};
use shared::models::{BranchCreate, Employee, EmployeeCreate, PermissionSet, Role, User, UserCreate};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Scripted remote: each call pops the next queued response; an empty
/// queue behaves like an unreachable service.
#[derive(Default)]
struct MockRemote {
    login_responses: Mutex<VecDeque<ClientResult<LoginResponse>>>,
    verify_responses: Mutex<VecDeque<ClientResult<UserInfo>>>,
    login_calls: AtomicUsize,
    verify_calls: AtomicUsize,
}

impl MockRemote {
    fn with_login(responses: Vec<ClientResult<LoginResponse>>) -> Self {
        Self {
            login_responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    fn with_verify(responses: Vec<ClientResult<UserInfo>>) -> Self {
        Self {
            verify_responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RemoteIdentity for MockRemote {
    async fn login(&self, _username: &str, _secret: &str) -> ClientResult<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("mock: unreachable".into())))
    }

    async fn verify_token(&self, _token: &str) -> ClientResult<UserInfo> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verify_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("mock: unreachable".into())))
    }
}

fn remote_user(username: &str, role: Role) -> UserInfo {
    UserInfo {
        id: format!("user:remote_{username}"),
        username: username.to_string(),
        role,
        is_master_admin: role == Role::MasterAdmin,
        permissions: PermissionSet::default(),
        permissions_by_branch: Default::default(),
        employee: EmployeeInfo {
            id: format!("employee:remote_{username}"),
            name: format!("{username} (remote)"),
            role,
            branch_id: None,
            branch_ids: None,
        },
    }
}

fn remote_login(username: &str, role: Role, token: &str) -> LoginResponse {
    LoginResponse {
        token: token.to_string(),
        user: remote_user(username, role),
    }
}

async fn engine_with(remote: Option<MockRemote>) -> (SessionEngine, IdentityStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = IdentityStore::open_in_memory().await.unwrap();
    let remote = remote.map(|m| Arc::new(m) as Arc<dyn RemoteIdentity>);
    let engine = SessionEngine::new(store.clone(), remote, dir.path());
    (engine, store, dir)
}

async fn seed_employee(store: &IdentityStore, name: &str, role: Role, active: bool) -> Employee {
    let employee = store
        .employees()
        .create(EmployeeCreate {
            name: name.to_string(),
            role,
            branch_id: None,
            branch_ids: None,
            code: None,
            barcode: None,
        })
        .await
        .unwrap();
    if !active {
        store
            .employees()
            .set_active(&employee.id, false)
            .await
            .unwrap();
    }
    employee
}

async fn seed_user(
    store: &IdentityStore,
    username: &str,
    employee_id: &str,
    role: Role,
    secret: Option<&str>,
) -> User {
    let secret_hash = secret.map(|s| credential::hash(s).unwrap());
    store
        .users()
        .create(UserCreate {
            username: username.to_string(),
            secret_hash,
            employee_id: employee_id.to_string(),
            role,
            permissions: PermissionSet::default(),
            permissions_by_branch: Default::default(),
        })
        .await
        .unwrap()
}

fn auth_files_exist(dir: &TempDir) -> (bool, bool) {
    let auth = dir.path().join("auth");
    (
        auth.join("session.json").exists(),
        auth.join("token").exists(),
    )
}

// ============ Login ============

#[tokio::test]
async fn master_admin_bootstraps_with_default_secret_offline() {
    let (engine, store, _dir) = engine_with(None).await;

    // "admin" maps to the canonical username even on a pristine store
    let session = engine.login("admin", "1234", None).await.unwrap();
    assert_eq!(session.user.username, "master_admin");
    assert_eq!(session.origin, SessionOrigin::Local);
    assert!(session.user.is_master_admin);
    assert!(session.user.permissions.is_all());

    // the bootstrap stored a real digest, not the plaintext
    let user = store
        .users()
        .find_by_username("master_admin")
        .await
        .unwrap()
        .unwrap();
    let digest = user.secret_hash.unwrap();
    assert_ne!(digest, "1234");
    assert!(credential::verify("1234", &digest).unwrap());

    // subsequent logins verify against the stored hash
    engine.logout();
    let again = engine.login("master_admin", "1234", None).await.unwrap();
    assert_eq!(again.user.username, "master_admin");

    // and the default secret path never accepts a wrong secret
    engine.logout();
    let err = engine.login("admin", "9999", None).await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn remote_rejection_is_terminal_despite_valid_local_copy() {
    let remote = MockRemote::with_login(vec![Err(ClientError::InvalidCredentials)]);
    let (engine, store, _dir) = engine_with(Some(remote)).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    // the local copy would accept this pair, but the authority said no
    let err = engine.login("jdoe", "pw", None).await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
    assert!(engine.current().is_none());
}

#[tokio::test]
async fn connectivity_failure_falls_back_to_local_login() {
    let remote = MockRemote::with_login(vec![Err(ClientError::Network("down".into()))]);
    let (engine, store, _dir) = engine_with(Some(remote)).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    assert_eq!(session.origin, SessionOrigin::Local);
    assert_eq!(session.employee.name, "Jane Doe");
}

#[tokio::test]
async fn server_error_also_falls_back_to_local_login() {
    let remote = MockRemote::with_login(vec![Err(ClientError::Server {
        status: 503,
        message: "maintenance".into(),
    })]);
    let (engine, store, _dir) = engine_with(Some(remote)).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    assert_eq!(session.origin, SessionOrigin::Local);
}

#[tokio::test]
async fn inactive_employee_never_logs_in() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Old Timer", Role::Manager, false).await;
    seed_user(&store, "old", &employee.id, Role::Manager, Some("pw")).await;

    let err = engine.login("old", "pw", None).await.unwrap_err();
    assert!(matches!(err, LoginError::EmployeeInactive));
    assert!(engine.current().is_none());
}

#[tokio::test]
async fn unknown_identifier_is_rejected_as_invalid_credentials() {
    let (engine, _store, _dir) = engine_with(None).await;
    let err = engine.login("nobody", "pw", None).await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn employee_without_credential_record_is_not_provisioned() {
    let (engine, store, _dir) = engine_with(None).await;
    seed_employee(&store, "Jane Doe", Role::Seller, true).await;

    // resolves through the employee name lookup, but no user exists
    let err = engine.login("Jane Doe", "pw", None).await.unwrap_err();
    assert!(matches!(err, LoginError::UserNotProvisioned));
}

#[tokio::test]
async fn deactivated_user_is_not_provisioned() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    let user = seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;
    // disable only the credential record, not the employee
    store.users().set_active(&user.id, false).await.unwrap();

    let err = engine.login("jdoe", "pw", None).await.unwrap_err();
    assert!(matches!(err, LoginError::UserNotProvisioned));
}

#[tokio::test]
async fn missing_secret_without_bootstrap_path() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, None).await;

    let err = engine.login("jdoe", "1234", None).await.unwrap_err();
    assert!(matches!(err, LoginError::MissingSecret));
}

#[tokio::test]
async fn wrong_local_secret_is_invalid_credentials() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let err = engine.login("jdoe", "wrong", None).await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn login_replaces_previous_session_entirely() {
    let (engine, store, _dir) = engine_with(None).await;
    let a = seed_employee(&store, "Alice", Role::Manager, true).await;
    seed_user(&store, "alice", &a.id, Role::Manager, Some("pw")).await;
    let b = seed_employee(&store, "Bob", Role::Employee, true).await;
    seed_user(&store, "bob", &b.id, Role::Employee, Some("pw")).await;

    engine.login("alice", "pw", None).await.unwrap();
    assert!(engine.has_permission("reports:view"));

    engine.login("bob", "pw", None).await.unwrap();
    let current = engine.current().unwrap();
    assert_eq!(current.user.username, "bob");
    // no bleed-through of the manager's grants
    assert!(!engine.has_permission("reports:view"));
}

#[tokio::test]
async fn empty_grant_normalizes_to_role_default_and_persists() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Manager, true).await;
    let seeded = seed_user(&store, "jdoe", &employee.id, Role::Manager, Some("pw")).await;
    assert!(seeded.permissions.is_empty());

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    assert!(session.has_permission("reports:view"));
    assert!(session.has_permission("orders:void"));
    assert!(!session.user.permissions.is_all());

    // the normalized grant was written back
    let stored = store
        .users()
        .find_by_username("jdoe")
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.permissions.is_empty());
}

#[tokio::test]
async fn authorization_uses_stored_grant_not_role_default() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Manager, true).await;
    let user = seed_user(&store, "jdoe", &employee.id, Role::Manager, Some("pw")).await;
    // a manager narrowed down to a single permission
    store
        .users()
        .update_permissions(&user.id, &PermissionSet::from_tokens(["reports:view"]))
        .await
        .unwrap();

    engine.login("jdoe", "pw", None).await.unwrap();
    assert!(engine.has_permission("reports:view"));
    assert!(!engine.has_permission("orders:void"));
}

#[tokio::test]
async fn identifier_resolves_through_staff_code() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = store
        .employees()
        .create(EmployeeCreate {
            name: "Jane Doe".into(),
            role: Role::Seller,
            branch_id: None,
            branch_ids: None,
            code: Some("007".into()),
            barcode: Some("EMP-007".into()),
        })
        .await
        .unwrap();
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let session = engine.login("007", "pw", None).await.unwrap();
    assert_eq!(session.user.username, "jdoe");

    engine.logout();
    let session = engine.login("EMP-007", "pw", None).await.unwrap();
    assert_eq!(session.user.username, "jdoe");
}

#[tokio::test]
async fn hint_resolves_when_identifier_does_not() {
    let (engine, store, _dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let session = engine
        .login("badge-display-name", "pw", Some(&employee.id))
        .await
        .unwrap();
    assert_eq!(session.user.username, "jdoe");
}

#[tokio::test]
async fn remote_login_establishes_and_mirrors_locally() {
    let remote = MockRemote::with_login(vec![Ok(remote_login(
        "jdoe",
        Role::Seller,
        "tok-1",
    ))]);
    let (engine, store, dir) = engine_with(Some(remote)).await;

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    assert_eq!(session.origin, SessionOrigin::Remote);
    assert_eq!(session.remote_token.as_deref(), Some("tok-1"));
    // seller default was applied to the remote's empty grant
    assert!(session.has_permission("reports:view"));
    assert!(!session.has_permission("orders:void"));

    // local copy now exists for offline use
    let mirrored = store
        .users()
        .find_by_username("jdoe")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mirrored.role, Role::Seller);

    let (descriptor, token) = auth_files_exist(&dir);
    assert!(descriptor);
    assert!(token);
}

#[tokio::test]
async fn remote_master_admin_login_provisions_offline_default_secret() {
    let remote = MockRemote::with_login(vec![Ok(remote_login(
        "master_admin",
        Role::MasterAdmin,
        "tok-1",
    ))]);
    let (engine, store, _dir) = engine_with(Some(remote)).await;

    engine.login("master_admin", "remote-password", None).await.unwrap();

    let digest_one = store
        .users()
        .find_by_username("master_admin")
        .await
        .unwrap()
        .unwrap()
        .secret_hash
        .unwrap();
    assert!(credential::verify("1234", &digest_one).unwrap());

    // repeating the remote login must not rewrite the digest
    let remote = MockRemote::with_login(vec![Ok(remote_login(
        "master_admin",
        Role::MasterAdmin,
        "tok-2",
    ))]);
    let dir = tempfile::tempdir().unwrap();
    let engine = SessionEngine::new(
        store.clone(),
        Some(Arc::new(remote) as Arc<dyn RemoteIdentity>),
        dir.path(),
    );
    engine.login("master_admin", "remote-password", None).await.unwrap();

    let digest_two = store
        .users()
        .find_by_username("master_admin")
        .await
        .unwrap()
        .unwrap()
        .secret_hash
        .unwrap();
    assert_eq!(digest_one, digest_two);
}

#[tokio::test]
async fn background_token_attaches_to_local_session() {
    // first response feeds the foreground remote strategy (unreachable),
    // second feeds the background acquisition after the local success
    let remote = MockRemote::with_login(vec![
        Err(ClientError::Network("down".into())),
        Ok(remote_login("jdoe", Role::Seller, "late-token")),
    ]);
    let (engine, store, dir) = engine_with(Some(remote)).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    assert_eq!(session.origin, SessionOrigin::Local);
    assert!(session.remote_token.is_none());
    let permissions_before = session.user.permissions.clone();

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let current = engine.current().unwrap();
    assert_eq!(current.remote_token.as_deref(), Some("late-token"));
    // the token is the only thing the background path may touch
    assert_eq!(current.origin, SessionOrigin::Local);
    assert_eq!(current.user.permissions, permissions_before);
    let (_, token) = auth_files_exist(&dir);
    assert!(token);
}

#[tokio::test]
async fn stale_background_token_is_dropped_after_logout() {
    let remote = MockRemote::with_login(vec![
        Err(ClientError::Network("down".into())),
        Ok(remote_login("jdoe", Role::Seller, "late-token")),
    ]);
    let (engine, store, _dir) = engine_with(Some(remote)).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;

    engine.login("jdoe", "pw", None).await.unwrap();
    engine.logout();

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(engine.current().is_none());
}

// ============ Restore ============

#[tokio::test]
async fn restore_with_no_persisted_state_is_unauthenticated() {
    let (engine, _store, _dir) = engine_with(None).await;
    assert!(engine.restore().await.unwrap().is_none());
}

#[tokio::test]
async fn restore_verifies_stored_token_remotely() {
    let login_remote = MockRemote::with_login(vec![Ok(remote_login(
        "jdoe",
        Role::Seller,
        "tok-1",
    ))]);
    let (engine, store, dir) = engine_with(Some(login_remote)).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    // new process: the stored token is still honored by the remote
    let verify_remote = MockRemote::with_verify(vec![Ok(remote_user("jdoe", Role::Seller))]);
    let engine = SessionEngine::new(
        store.clone(),
        Some(Arc::new(verify_remote) as Arc<dyn RemoteIdentity>),
        dir.path(),
    );
    let session = engine.restore().await.unwrap().unwrap();
    assert_eq!(session.origin, SessionOrigin::RestoredRemote);
    assert_eq!(session.user.username, "jdoe");
    assert_eq!(session.remote_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn restore_falls_back_to_descriptor_when_remote_unreachable() {
    let login_remote = MockRemote::with_login(vec![Ok(remote_login(
        "jdoe",
        Role::Seller,
        "tok-1",
    ))]);
    let (engine, store, dir) = engine_with(Some(login_remote)).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    // verification cannot reach the service; the cached descriptor governs
    let verify_remote = MockRemote::with_verify(vec![Err(ClientError::Network("down".into()))]);
    let engine = SessionEngine::new(
        store.clone(),
        Some(Arc::new(verify_remote) as Arc<dyn RemoteIdentity>),
        dir.path(),
    );
    let session = engine.restore().await.unwrap().unwrap();
    assert_eq!(session.origin, SessionOrigin::RestoredLocal);
    assert_eq!(session.user.username, "jdoe");
    assert!(session.remote_token.is_none());
}

#[tokio::test]
async fn rejected_token_is_discarded_but_descriptor_still_restores() {
    let login_remote = MockRemote::with_login(vec![Ok(remote_login(
        "jdoe",
        Role::Seller,
        "tok-1",
    ))]);
    let (engine, store, dir) = engine_with(Some(login_remote)).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    // the authority rejects the stored token; the employee is still fine,
    // so the descriptor governs, but the dead token must not be retried
    // on the next start
    let verify_remote = MockRemote::with_verify(vec![Err(ClientError::InvalidToken)]);
    let engine = SessionEngine::new(
        store.clone(),
        Some(Arc::new(verify_remote) as Arc<dyn RemoteIdentity>),
        dir.path(),
    );
    let session = engine.restore().await.unwrap().unwrap();
    assert_eq!(session.origin, SessionOrigin::RestoredLocal);

    let (descriptor, token) = auth_files_exist(&dir);
    assert!(descriptor);
    assert!(!token);
}

#[tokio::test]
async fn restore_without_remote_uses_descriptor() {
    let (engine, store, dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    let engine = SessionEngine::new(store.clone(), None, dir.path());
    let session = engine.restore().await.unwrap().unwrap();
    assert_eq!(session.origin, SessionOrigin::RestoredLocal);
    assert_eq!(session.employee.name, "Jane Doe");
}

#[tokio::test]
async fn restore_discards_descriptor_of_deactivated_employee() {
    let (engine, store, dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    // deactivated between runs; the remote also refuses the stored token
    store
        .employees()
        .set_active(&employee.id, false)
        .await
        .unwrap();
    let verify_remote = MockRemote::with_verify(vec![Err(ClientError::InvalidToken)]);
    let engine = SessionEngine::new(
        store.clone(),
        Some(Arc::new(verify_remote) as Arc<dyn RemoteIdentity>),
        dir.path(),
    );
    assert!(engine.restore().await.unwrap().is_none());

    // nothing survives an unauthenticated restore
    let (descriptor, token) = auth_files_exist(&dir);
    assert!(!descriptor);
    assert!(!token);
}

#[tokio::test]
async fn branch_scoped_grants_survive_login_and_descriptor_restore() {
    let (engine, store, dir) = engine_with(None).await;
    let branch = store
        .branches()
        .create(BranchCreate {
            name: "Downtown".into(),
        })
        .await
        .unwrap();
    let employee = seed_employee(&store, "Jane Doe", Role::Manager, true).await;
    let mut by_branch = BTreeMap::new();
    by_branch.insert(
        branch.id.clone(),
        PermissionSet::from_tokens(["reports:view"]),
    );
    store
        .users()
        .create(UserCreate {
            username: "jdoe".into(),
            secret_hash: Some(credential::hash("pw").unwrap()),
            employee_id: employee.id.clone(),
            role: Role::Manager,
            permissions: PermissionSet::from_tokens(["reports:view"]),
            permissions_by_branch: by_branch,
        })
        .await
        .unwrap();

    let session = engine.login("jdoe", "pw", None).await.unwrap();
    let scoped = session.user.permissions_by_branch.get(&branch.id).unwrap();
    assert!(scoped.allows("reports:view"));
    assert!(!scoped.allows("orders:void"));
    drop(engine);

    // the scoped grant rides the descriptor across a restart
    let engine = SessionEngine::new(store.clone(), None, dir.path());
    let restored = engine.restore().await.unwrap().unwrap();
    let scoped = restored.user.permissions_by_branch.get(&branch.id).unwrap();
    assert!(scoped.allows("reports:view"));
    assert!(!scoped.allows("orders:void"));
}

#[tokio::test]
async fn restore_refreshes_employee_projection_from_store() {
    let (engine, store, dir) = engine_with(None).await;
    let employee = seed_employee(&store, "Jane Doe", Role::Seller, true).await;
    seed_user(&store, "jdoe", &employee.id, Role::Seller, Some("pw")).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    drop(engine);

    let engine = SessionEngine::new(store.clone(), None, dir.path());
    let session = engine.restore().await.unwrap().unwrap();
    assert_eq!(session.employee.id, employee.id);
}

// ============ Logout ============

#[tokio::test]
async fn logout_clears_session_and_persisted_state() {
    let remote = MockRemote::with_login(vec![Ok(remote_login(
        "jdoe",
        Role::Seller,
        "tok-1",
    ))]);
    let (engine, _store, dir) = engine_with(Some(remote)).await;
    engine.login("jdoe", "pw", None).await.unwrap();
    assert!(engine.current().is_some());

    engine.logout();
    assert!(engine.current().is_none());
    assert!(!engine.has_permission("reports:view"));
    let (descriptor, token) = auth_files_exist(&dir);
    assert!(!descriptor);
    assert!(!token);

    // idempotent
    engine.logout();
}

//! Session Reconciliation Engine
//!
//! Evaluates an ordered list of resolution strategies (`[Remote, Local]`
//! for login, `[RemoteToken, LocalDescriptor]` for restore) until one
//! establishes a session, one fails terminally, or the list is exhausted.
//! Fallback order is data, not control flow.

use super::descriptor::{SessionDescriptor, SessionFiles};
use super::error::LoginError;
use super::types::{ActiveSession, EmployeeSummary, SessionOrigin, SessionUser};
use crate::config::Config;
use crate::credential;
use crate::permissions;
use crate::store::{IdentityStore, StoreResult};
use nacre_client::{ClientError, HttpRemoteClient, RemoteIdentity};
use parking_lot::RwLock;
use shared::client::UserInfo;
use shared::models::{Employee, EmployeeCreate, Role, User, UserCreate};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Canonical username of the master administrator
pub const MASTER_ADMIN_USERNAME: &str = "master_admin";

/// Login resolution sources, evaluated in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStrategy {
    Remote,
    Local,
}

/// Restore resolution sources, evaluated in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStrategy {
    RemoteToken,
    LocalDescriptor,
}

/// Outcome of running a single strategy
enum Resolution {
    Established(ActiveSession),
    Terminal(LoginError),
    Skip,
}

struct EngineInner {
    store: IdentityStore,
    remote: Option<Arc<dyn RemoteIdentity>>,
    files: SessionFiles,
    current: RwLock<Option<ActiveSession>>,
    login_order: Vec<LoginStrategy>,
    restore_order: Vec<RestoreStrategy>,
}

/// The reconciliation engine. Cheap to clone; clones share the same
/// active session.
#[derive(Clone)]
pub struct SessionEngine {
    inner: Arc<EngineInner>,
}

impl SessionEngine {
    pub fn new(
        store: IdentityStore,
        remote: Option<Arc<dyn RemoteIdentity>>,
        data_dir: &Path,
    ) -> Self {
        Self::with_strategies(
            store,
            remote,
            data_dir,
            vec![LoginStrategy::Remote, LoginStrategy::Local],
            vec![RestoreStrategy::RemoteToken, RestoreStrategy::LocalDescriptor],
        )
    }

    pub fn with_strategies(
        store: IdentityStore,
        remote: Option<Arc<dyn RemoteIdentity>>,
        data_dir: &Path,
        login_order: Vec<LoginStrategy>,
        restore_order: Vec<RestoreStrategy>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                remote,
                files: SessionFiles::new(data_dir),
                current: RwLock::new(None),
                login_order,
                restore_order,
            }),
        }
    }

    /// Build an engine from configuration: on-disk store under the data
    /// directory, remote source only when an endpoint is configured.
    pub async fn from_config(config: &Config) -> Result<Self, LoginError> {
        let data_dir = Path::new(&config.data_dir);
        let store = IdentityStore::open(&data_dir.join("identity.db")).await?;
        let remote: Option<Arc<dyn RemoteIdentity>> = match &config.remote_url {
            Some(url) => {
                let client =
                    HttpRemoteClient::new(url, Duration::from_millis(config.remote_timeout_ms))
                        .map_err(|e| LoginError::System(e.to_string()))?;
                Some(Arc::new(client))
            }
            None => None,
        };
        Ok(Self::new(store, remote, data_dir))
    }

    // ============ Queries ============

    /// The live session, if any
    pub fn current(&self) -> Option<ActiveSession> {
        self.inner.current.read().clone()
    }

    /// Whether the live session holds `token`. Consults only the user's
    /// own stored grant, never the role default.
    pub fn has_permission(&self, token: &str) -> bool {
        self.inner
            .current
            .read()
            .as_ref()
            .is_some_and(|s| s.has_permission(token))
    }

    // ============ Restore ============

    /// Restore a session at process start, without credentials.
    ///
    /// Returns `Ok(None)` when no source yields a usable session; in that
    /// case no persisted artifact survives.
    pub async fn restore(&self) -> Result<Option<ActiveSession>, LoginError> {
        for strategy in &self.inner.restore_order {
            let resolution = match strategy {
                RestoreStrategy::RemoteToken => self.restore_from_token().await?,
                RestoreStrategy::LocalDescriptor => self.restore_from_descriptor().await?,
            };
            match resolution {
                Resolution::Established(session) => {
                    self.install(session.clone());
                    tracing::info!(
                        username = %session.user.username,
                        origin = ?session.origin,
                        "Session restored"
                    );
                    return Ok(Some(session));
                }
                Resolution::Terminal(err) => return Err(err),
                Resolution::Skip => {}
            }
        }
        if let Err(e) = self.inner.files.clear_all() {
            tracing::warn!(error = %e, "Failed to clear stale session artifacts");
        }
        Ok(None)
    }

    async fn restore_from_token(&self) -> Result<Resolution, LoginError> {
        let Some(remote) = &self.inner.remote else {
            return Ok(Resolution::Skip);
        };
        let token = match self.inner.files.load_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(Resolution::Skip),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                return Ok(Resolution::Skip);
            }
        };

        match remote.verify_token(&token).await {
            Ok(user) => {
                let local = self.mirror_remote_user(&user).await;
                let session = self.session_from_remote(
                    &user,
                    local.as_ref(),
                    SessionOrigin::RestoredRemote,
                    Some(token),
                );
                self.persist(&session);
                Ok(Resolution::Established(session))
            }
            Err(e) => {
                // An authority rejection is final for this token; keep it
                // only when the failure was reachability.
                if matches!(e, ClientError::InvalidToken) {
                    if let Err(e) = self.inner.files.clear_token() {
                        tracing::warn!(error = %e, "Failed to discard rejected token");
                    }
                }
                tracing::warn!(error = %e, "Stored token not usable; trying local descriptor");
                Ok(Resolution::Skip)
            }
        }
    }

    async fn restore_from_descriptor(&self) -> Result<Resolution, LoginError> {
        let descriptor = match self.inner.files.load_descriptor() {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => return Ok(Resolution::Skip),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable session descriptor; discarding");
                if let Err(e) = self.inner.files.clear_all() {
                    tracing::warn!(error = %e, "Failed to discard session descriptor");
                }
                return Ok(Resolution::Skip);
            }
        };

        match self
            .inner
            .store
            .employees()
            .find_by_id(&descriptor.employee.id)
            .await?
        {
            Some(employee) if employee.active => {
                let session = ActiveSession {
                    user: descriptor.user,
                    employee: employee_summary(&employee),
                    remote_token: None,
                    origin: SessionOrigin::RestoredLocal,
                    attempt_id: Uuid::new_v4(),
                    logged_in_at: shared::util::now_millis(),
                };
                Ok(Resolution::Established(session))
            }
            _ => {
                // Stale descriptor: the employee vanished or was disabled
                // since it was cached. Discard, do not merely ignore.
                tracing::info!(
                    employee_id = %descriptor.employee.id,
                    "Cached session no longer valid; discarding"
                );
                if let Err(e) = self.inner.files.clear_all() {
                    tracing::warn!(error = %e, "Failed to discard stale session descriptor");
                }
                Ok(Resolution::Skip)
            }
        }
    }

    // ============ Login ============

    /// Authenticate a credential pair and establish a session.
    ///
    /// `hint` optionally names an employee id resolved at the entry
    /// surface (a scanned badge) before the secret was submitted; it is
    /// consulted only when the identifier itself resolves nothing.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        hint: Option<&str>,
    ) -> Result<ActiveSession, LoginError> {
        let raw = identifier.trim();
        let username = normalize_identifier(identifier);

        for strategy in &self.inner.login_order {
            let resolution = match strategy {
                LoginStrategy::Remote => self.login_remote(&username, secret).await?,
                LoginStrategy::Local => self.login_local(&username, raw, secret, hint).await?,
            };
            match resolution {
                Resolution::Established(session) => {
                    self.install(session.clone());
                    tracing::info!(
                        username = %session.user.username,
                        origin = ?session.origin,
                        "Employee logged in"
                    );
                    if session.origin == SessionOrigin::Local {
                        self.spawn_token_fetch(&session, &username, secret);
                    }
                    return Ok(session);
                }
                Resolution::Terminal(err) => return Err(err),
                Resolution::Skip => {}
            }
        }
        Err(LoginError::System(
            "no login strategy produced a session".into(),
        ))
    }

    async fn login_remote(&self, username: &str, secret: &str) -> Result<Resolution, LoginError> {
        let Some(remote) = &self.inner.remote else {
            return Ok(Resolution::Skip);
        };
        match remote.login(username, secret).await {
            Ok(response) => {
                let local = self.mirror_remote_user(&response.user).await;
                let session = self.session_from_remote(
                    &response.user,
                    local.as_ref(),
                    SessionOrigin::Remote,
                    Some(response.token),
                );
                self.persist(&session);
                Ok(Resolution::Established(session))
            }
            // An explicit rejection by the remote authority is terminal: a
            // local offline copy must not override it.
            Err(ClientError::InvalidCredentials) => {
                tracing::warn!(username = %username, "Remote rejected credentials");
                Ok(Resolution::Terminal(LoginError::InvalidCredentials))
            }
            Err(e) if e.is_connectivity() => {
                tracing::warn!(error = %e, "Remote unreachable; trying local login");
                Ok(Resolution::Skip)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote login failed; trying local login");
                Ok(Resolution::Skip)
            }
        }
    }

    async fn login_local(
        &self,
        username: &str,
        raw: &str,
        secret: &str,
        hint: Option<&str>,
    ) -> Result<Resolution, LoginError> {
        let store = &self.inner.store;

        // Resolve the identifier: username, then employee name/code/barcode,
        // then the scanned-employee hint.
        let mut user = store.users().find_by_username(username).await?;
        let mut employee: Option<Employee> = None;
        if user.is_none() {
            if let Some(found) = store.employees().find_by_lookup(raw).await? {
                user = store.users().find_by_employee(&found.id).await?;
                employee = Some(found);
            }
        }
        if user.is_none() && employee.is_none() {
            if let Some(id) = hint {
                if let Some(found) = store.employees().find_by_id(id).await? {
                    user = store.users().find_by_employee(&found.id).await?;
                    employee = Some(found);
                }
            }
        }
        if user.is_none() && employee.is_none() && username == MASTER_ADMIN_USERNAME {
            let (bootstrapped_user, bootstrapped_employee) =
                self.first_run_admin_bootstrap().await?;
            user = Some(bootstrapped_user);
            employee = Some(bootstrapped_employee);
        }

        // Gate order matters: a disabled employee is reported as such even
        // when no credential record exists.
        let employee = match (&user, employee) {
            (_, Some(employee)) => employee,
            (Some(user), None) => store
                .employees()
                .find_by_id(&user.employee_id)
                .await?
                .ok_or_else(|| {
                    LoginError::System(format!(
                        "employee record missing for user {}",
                        user.username
                    ))
                })?,
            (None, None) => return Ok(Resolution::Terminal(LoginError::InvalidCredentials)),
        };
        if !employee.active {
            return Ok(Resolution::Terminal(LoginError::EmployeeInactive));
        }
        let Some(user) = user else {
            return Ok(Resolution::Terminal(LoginError::UserNotProvisioned));
        };
        if !user.active {
            return Ok(Resolution::Terminal(LoginError::UserNotProvisioned));
        }

        // Verify the secret, or take the one-time default-secret upgrade
        // path for a master admin without a stored hash.
        let user = match &user.secret_hash {
            Some(digest) => {
                let valid = credential::verify(secret, digest)
                    .map_err(|e| LoginError::System(e.to_string()))?;
                if !valid {
                    tracing::warn!(username = %user.username, "Login failed - invalid credentials");
                    return Ok(Resolution::Terminal(LoginError::InvalidCredentials));
                }
                user
            }
            None => {
                if user.role.is_master_admin() && secret == credential::DEFAULT_ADMIN_SECRET {
                    let digest = credential::hash(secret)
                        .map_err(|e| LoginError::System(e.to_string()))?;
                    store.users().set_secret_hash(&user.id, &digest).await?;
                    tracing::info!(
                        username = %user.username,
                        "Default secret upgraded to a stored hash"
                    );
                    User {
                        secret_hash: Some(digest),
                        ..user
                    }
                } else {
                    return Ok(Resolution::Terminal(LoginError::MissingSecret));
                }
            }
        };

        // Normalize an empty grant to the role default, and keep the store
        // consistent with what the session reports.
        let grant = if user.permissions.is_empty() {
            let defaults = permissions::resolve(user.role);
            store.users().update_permissions(&user.id, &defaults).await?;
            defaults
        } else {
            user.permissions.clone()
        };
        if permissions::is_customized(user.role, &grant) {
            tracing::warn!(
                username = %user.username,
                role = %user.role,
                "Stored permissions differ from the role default"
            );
        }

        let session = ActiveSession {
            user: SessionUser {
                id: user.id.clone(),
                username: user.username.clone(),
                role: user.role,
                is_master_admin: user.role.is_master_admin()
                    || employee.role.is_master_admin(),
                permissions: grant,
                permissions_by_branch: user.permissions_by_branch.clone(),
            },
            employee: employee_summary(&employee),
            remote_token: None,
            origin: SessionOrigin::Local,
            attempt_id: Uuid::new_v4(),
            logged_in_at: shared::util::now_millis(),
        };
        self.persist(&session);
        Ok(Resolution::Established(session))
    }

    /// A brand-new installation must never be unreachable: resolve the
    /// canonical admin username to a freshly provisioned master-admin
    /// pair when nothing exists yet.
    async fn first_run_admin_bootstrap(&self) -> Result<(User, Employee), LoginError> {
        tracing::info!("No master admin found; provisioning first-run administrator");
        let store = &self.inner.store;
        let employee = store
            .employees()
            .create(EmployeeCreate {
                name: "Master Admin".into(),
                role: Role::MasterAdmin,
                branch_id: None,
                branch_ids: None,
                code: None,
                barcode: None,
            })
            .await?;
        let user = store
            .users()
            .create(UserCreate {
                username: MASTER_ADMIN_USERNAME.into(),
                secret_hash: None,
                employee_id: employee.id.clone(),
                role: Role::MasterAdmin,
                permissions: permissions::resolve(Role::MasterAdmin),
                permissions_by_branch: Default::default(),
            })
            .await?;
        Ok((user, employee))
    }

    // ============ Logout ============

    /// Drop the live session and every persisted artifact. Idempotent.
    pub fn logout(&self) {
        if let Some(session) = self.inner.current.write().take() {
            tracing::info!(username = %session.user.username, "Employee logged out");
        }
        if let Err(e) = self.inner.files.clear_all() {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    // ============ Internals ============

    /// Atomic swap: the new session entirely replaces the old one
    fn install(&self, session: ActiveSession) {
        *self.inner.current.write() = Some(session);
    }

    fn persist(&self, session: &ActiveSession) {
        if let Err(e) = self
            .inner
            .files
            .save_descriptor(&SessionDescriptor::from(session))
        {
            tracing::warn!(error = %e, "Failed to persist session descriptor");
        }
        if let Some(token) = &session.remote_token {
            if let Err(e) = self.inner.files.save_token(token) {
                tracing::warn!(error = %e, "Failed to persist token");
            }
        }
    }

    /// Build a session from what the remote reported. Ids come from the
    /// mirrored local pair when available, so the persisted descriptor
    /// always references records the descriptor-restore path can find;
    /// permissions and role come from the remote, which is authoritative.
    fn session_from_remote(
        &self,
        user: &UserInfo,
        local: Option<&(User, Employee)>,
        origin: SessionOrigin,
        token: Option<String>,
    ) -> ActiveSession {
        let grant = if user.permissions.is_empty() {
            permissions::resolve(user.role)
        } else {
            user.permissions.clone()
        };
        if permissions::is_customized(user.role, &grant) {
            tracing::warn!(
                username = %user.username,
                role = %user.role,
                "Remote permissions differ from the role default"
            );
        }
        let user_id = local
            .map(|(u, _)| u.id.clone())
            .unwrap_or_else(|| user.id.clone());
        let employee = match local {
            Some((_, employee)) => employee_summary(employee),
            None => EmployeeSummary {
                id: user.employee.id.clone(),
                name: user.employee.name.clone(),
                role: user.employee.role,
                branch_id: user.employee.branch_id.clone(),
                branch_ids: user.employee.branch_ids.clone(),
            },
        };
        ActiveSession {
            user: SessionUser {
                id: user_id,
                username: user.username.clone(),
                role: user.role,
                is_master_admin: user.role.is_master_admin() || user.is_master_admin,
                permissions: grant,
                permissions_by_branch: user.permissions_by_branch.clone(),
            },
            employee,
            remote_token: token,
            origin,
            attempt_id: Uuid::new_v4(),
            logged_in_at: shared::util::now_millis(),
        }
    }

    /// Keep the local store usable offline after a remote session: make
    /// sure a local user/employee pair exists, and give a master admin
    /// without a stored hash the documented default secret. Writing the
    /// hash is skipped when one is already present, so repeating the
    /// bootstrap changes nothing. Best-effort: a failed mirror is logged,
    /// never fails the remote session.
    async fn mirror_remote_user(&self, info: &UserInfo) -> Option<(User, Employee)> {
        match self.mirror_remote_user_inner(info).await {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to mirror remote user locally");
                None
            }
        }
    }

    async fn mirror_remote_user_inner(&self, info: &UserInfo) -> StoreResult<(User, Employee)> {
        let store = &self.inner.store;
        let (mut user, employee) = match store.users().find_by_username(&info.username).await? {
            Some(user) => {
                let employee = store
                    .employees()
                    .find_by_id(&user.employee_id)
                    .await?
                    .ok_or_else(|| {
                        crate::store::StoreError::NotFound(format!(
                            "employee record missing for user {}",
                            user.username
                        ))
                    })?;
                (user, employee)
            }
            None => {
                let employee = match store.employees().find_by_lookup(&info.employee.name).await? {
                    Some(employee) => employee,
                    None => {
                        store
                            .employees()
                            .create(EmployeeCreate {
                                name: info.employee.name.clone(),
                                role: info.employee.role,
                                branch_id: info.employee.branch_id.clone(),
                                branch_ids: info.employee.branch_ids.clone(),
                                code: None,
                                barcode: None,
                            })
                            .await?
                    }
                };
                let user = store
                    .users()
                    .create(UserCreate {
                        username: info.username.clone(),
                        secret_hash: None,
                        employee_id: employee.id.clone(),
                        role: info.role,
                        permissions: info.permissions.clone(),
                        permissions_by_branch: info.permissions_by_branch.clone(),
                    })
                    .await?;
                (user, employee)
            }
        };

        if user.secret_hash.is_none() && user.role.is_master_admin() {
            let digest = credential::hash(credential::DEFAULT_ADMIN_SECRET)
                .map_err(|e| crate::store::StoreError::Database(e.to_string()))?;
            store.users().set_secret_hash(&user.id, &digest).await?;
            tracing::info!(
                username = %user.username,
                "Default secret provisioned for offline master admin login"
            );
            user.secret_hash = Some(digest);
        }
        Ok((user, employee))
    }

    /// Best-effort background remote login after a local success, solely
    /// to obtain a token for later remote operations. May only attach a
    /// token to the same attempt; never touches role or permissions.
    fn spawn_token_fetch(&self, session: &ActiveSession, username: &str, secret: &str) {
        let Some(remote) = self.inner.remote.clone() else {
            return;
        };
        let engine = self.clone();
        let username = username.to_string();
        let secret = secret.to_string();
        let attempt_id = session.attempt_id;
        tokio::spawn(async move {
            match remote.login(&username, &secret).await {
                Ok(response) => engine.attach_token(attempt_id, response.token),
                Err(e) => {
                    tracing::debug!(error = %e, "Background token acquisition failed");
                }
            }
        });
    }

    fn attach_token(&self, attempt_id: Uuid, token: String) {
        let mut guard = self.inner.current.write();
        match guard.as_mut() {
            Some(session) if session.attempt_id == attempt_id => {
                session.remote_token = Some(token.clone());
                drop(guard);
                if let Err(e) = self.inner.files.save_token(&token) {
                    tracing::warn!(error = %e, "Failed to persist token");
                }
                tracing::debug!("Token attached to active session");
            }
            _ => {
                tracing::debug!("Session changed before token arrived; token dropped");
            }
        }
    }
}

fn employee_summary(employee: &Employee) -> EmployeeSummary {
    EmployeeSummary {
        id: employee.id.clone(),
        name: employee.name.clone(),
        role: employee.role,
        branch_id: employee.branch_id.clone(),
        branch_ids: employee.branch_ids.clone(),
    }
}

/// Trim the identifier and map the legacy `"admin"` spelling to the
/// canonical master-admin username
fn normalize_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    if trimmed.eq_ignore_ascii_case("admin") {
        MASTER_ADMIN_USERNAME.to_string()
    } else {
        trimmed.to_string()
    }
}

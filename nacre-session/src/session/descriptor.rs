//! Persisted session state
//!
//! Two artifacts under `{data_dir}/auth/`: the session descriptor
//! (`session.json`, the cached user + employee projection) and the remote
//! bearer token (`token`). They are cleared together on logout, and a
//! restore that ends unauthenticated leaves neither behind.

use super::types::{ActiveSession, EmployeeSummary, SessionOrigin, SessionUser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DESCRIPTOR_FILE: &str = "session.json";
const TOKEN_FILE: &str = "token";

#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cached `{user, employee}` pair written after every successful
/// reconciliation, read back on the restore path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub user: SessionUser,
    pub employee: EmployeeSummary,
    pub origin: SessionOrigin,
    pub logged_in_at: i64,
}

impl From<&ActiveSession> for SessionDescriptor {
    fn from(session: &ActiveSession) -> Self {
        Self {
            user: session.user.clone(),
            employee: session.employee.clone(),
            origin: session.origin,
            logged_in_at: session.logged_in_at,
        }
    }
}

/// On-disk persistence for the session descriptor and bearer token
#[derive(Debug, Clone)]
pub struct SessionFiles {
    auth_dir: PathBuf,
}

impl SessionFiles {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            auth_dir: data_dir.join("auth"),
        }
    }

    fn descriptor_path(&self) -> PathBuf {
        self.auth_dir.join(DESCRIPTOR_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.auth_dir.join(TOKEN_FILE)
    }

    pub fn save_descriptor(&self, descriptor: &SessionDescriptor) -> Result<(), SessionFileError> {
        std::fs::create_dir_all(&self.auth_dir)?;
        let content = serde_json::to_string_pretty(descriptor)?;
        std::fs::write(self.descriptor_path(), content)?;
        tracing::debug!(username = %descriptor.user.username, "Session descriptor saved");
        Ok(())
    }

    pub fn load_descriptor(&self) -> Result<Option<SessionDescriptor>, SessionFileError> {
        let path = self.descriptor_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save_token(&self, token: &str) -> Result<(), SessionFileError> {
        std::fs::create_dir_all(&self.auth_dir)?;
        std::fs::write(self.token_path(), token)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>, SessionFileError> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&path)?;
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    /// Remove only the token. Idempotent.
    pub fn clear_token(&self) -> Result<(), SessionFileError> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Remove both artifacts. Idempotent.
    pub fn clear_all(&self) -> Result<(), SessionFileError> {
        for path in [self.descriptor_path(), self.token_path()] {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{PermissionSet, Role};
    use std::collections::BTreeMap;

    fn descriptor() -> SessionDescriptor {
        SessionDescriptor {
            user: SessionUser {
                id: "user:u1".into(),
                username: "jdoe".into(),
                role: Role::Seller,
                is_master_admin: false,
                permissions: PermissionSet::from_tokens(["reports:view"]),
                permissions_by_branch: BTreeMap::new(),
            },
            employee: EmployeeSummary {
                id: "employee:e1".into(),
                name: "Jane Doe".into(),
                role: Role::Seller,
                branch_id: None,
                branch_ids: None,
            },
            origin: SessionOrigin::Local,
            logged_in_at: 1,
        }
    }

    #[test]
    fn descriptor_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let files = SessionFiles::new(dir.path());
        assert!(files.load_descriptor().unwrap().is_none());

        files.save_descriptor(&descriptor()).unwrap();
        let loaded = files.load_descriptor().unwrap().unwrap();
        assert_eq!(loaded.user.username, "jdoe");
        assert_eq!(loaded.employee.id, "employee:e1");
    }

    #[test]
    fn clear_removes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let files = SessionFiles::new(dir.path());
        files.save_descriptor(&descriptor()).unwrap();
        files.save_token("tok").unwrap();

        files.clear_all().unwrap();
        assert!(files.load_descriptor().unwrap().is_none());
        assert!(files.load_token().unwrap().is_none());

        // idempotent
        files.clear_all().unwrap();
    }

    #[test]
    fn empty_token_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let files = SessionFiles::new(dir.path());
        files.save_token("  \n").unwrap();
        assert!(files.load_token().unwrap().is_none());
    }
}

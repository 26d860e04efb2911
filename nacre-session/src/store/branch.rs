//! Branch Repository

use super::{BaseRepository, StoreError, StoreResult, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{Branch, BranchCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Branch row matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl BranchRecord {
    pub fn into_model(self) -> Branch {
        Branch {
            id: self.id.map(|t| t.to_string()).unwrap_or_default(),
            name: self.name,
            active: self.is_active,
        }
    }
}

#[derive(Clone)]
pub struct BranchRepository {
    base: BaseRepository,
}

impl BranchRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find branch by id
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Branch>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        let record: Option<BranchRecord> = self.base.db().select(thing).await?;
        Ok(record.map(BranchRecord::into_model))
    }

    /// Find all branches
    pub async fn find_all(&self) -> StoreResult<Vec<Branch>> {
        let records: Vec<BranchRecord> = self
            .base
            .db()
            .query("SELECT * FROM branch ORDER BY name")
            .await?
            .take(0)?;
        Ok(records.into_iter().map(BranchRecord::into_model).collect())
    }

    /// Create a new branch
    pub async fn create(&self, data: BranchCreate) -> StoreResult<Branch> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE branch SET
                    name = $name,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .await?;

        let created: Option<BranchRecord> = result.take(0)?;
        created
            .map(BranchRecord::into_model)
            .ok_or_else(|| StoreError::Database("Failed to create branch".to_string()))
    }
}

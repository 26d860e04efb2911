//! Employee Repository

use super::{BaseRepository, StoreError, StoreResult, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{Employee, EmployeeCreate, Role};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Employee row matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub role: Role,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub branch: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_vec_record_id")]
    pub branches: Option<Vec<RecordId>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl EmployeeRecord {
    pub fn into_model(self) -> Employee {
        let branch_ids: Option<Vec<String>> = self
            .branches
            .map(|v| v.iter().map(|r| r.to_string()).collect());
        // branch_id is the denormalized first entry when only the list is set
        let branch_id = self
            .branch
            .map(|r| r.to_string())
            .or_else(|| branch_ids.as_ref().and_then(|v| v.first().cloned()));
        Employee {
            id: self.id.map(|t| t.to_string()).unwrap_or_default(),
            name: self.name,
            role: self.role,
            branch_id,
            branch_ids,
            code: self.code,
            barcode: self.barcode,
            active: self.is_active,
        }
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find employee by id
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Employee>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        let record: Option<EmployeeRecord> = self.base.db().select(thing).await?;
        Ok(record.map(EmployeeRecord::into_model))
    }

    /// Find an employee whose name, staff code or barcode matches the
    /// submitted identifier
    pub async fn find_by_lookup(&self, identifier: &str) -> StoreResult<Option<Employee>> {
        let identifier = identifier.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM employee \
                 WHERE name = $ident OR code = $ident OR barcode = $ident \
                 LIMIT 1",
            )
            .bind(("ident", identifier))
            .await?;
        let records: Vec<EmployeeRecord> = result.take(0)?;
        Ok(records.into_iter().next().map(EmployeeRecord::into_model))
    }

    /// Find all employees
    pub async fn find_all(&self) -> StoreResult<Vec<Employee>> {
        let records: Vec<EmployeeRecord> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY name")
            .await?
            .take(0)?;
        Ok(records.into_iter().map(EmployeeRecord::into_model).collect())
    }

    /// Create a new employee
    pub async fn create(&self, data: EmployeeCreate) -> StoreResult<Employee> {
        let branch: Option<RecordId> = match &data.branch_id {
            Some(id) => Some(
                id.parse()
                    .map_err(|_| StoreError::Validation(format!("Invalid branch ID: {}", id)))?,
            ),
            None => None,
        };
        let branches: Option<Vec<RecordId>> = match &data.branch_ids {
            Some(ids) => {
                let mut parsed = Vec::with_capacity(ids.len());
                for id in ids {
                    parsed.push(id.parse().map_err(|_| {
                        StoreError::Validation(format!("Invalid branch ID: {}", id))
                    })?);
                }
                Some(parsed)
            }
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE employee SET
                    name = $name,
                    role = $role,
                    branch = $branch,
                    branches = $branches,
                    code = $code,
                    barcode = $barcode,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("role", data.role))
            .bind(("branch", branch))
            .bind(("branches", branches))
            .bind(("code", data.code))
            .bind(("barcode", data.barcode))
            .await?;

        let created: Option<EmployeeRecord> = result.take(0)?;
        created
            .map(EmployeeRecord::into_model)
            .ok_or_else(|| StoreError::Database("Failed to create employee".to_string()))
    }

    /// Set the active flag
    pub async fn set_active(&self, id: &str, active: bool) -> StoreResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = $active")
            .bind(("thing", thing))
            .bind(("active", active))
            .await?;
        Ok(())
    }
}

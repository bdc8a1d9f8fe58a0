use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use thiserror::Error;
use tracing::info;

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;
use crate::models::{Employee, EmployeeChanges, NewEmployee};

/// How a single employee document is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeKey {
    /// The client-supplied, unique `employeeId`.
    EmployeeId(String),
    /// The store-generated `_id`.
    ObjectId(ObjectId),
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeKey::EmployeeId(id) => write!(f, "employeeId={}", id),
            EmployeeKey::ObjectId(oid) => write!(f, "_id={}", oid.to_hex()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Employee with employeeId '{0}' already exists")]
    Duplicate(String),
    #[error("Store error: {0}")]
    Backend(String),
}

/// The EmployeeStore trait abstracts the employee collection.
///
/// Each method maps onto one document-database query; uniqueness of
/// `employeeId` is the store's responsibility.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, StoreError>;
    /// All employees, oldest first.
    async fn find_all(&self) -> Result<Vec<Employee>, StoreError>;
    async fn find_one(&self, key: &EmployeeKey) -> Result<Option<Employee>, StoreError>;
    /// Replace the mutable fields and return the document after the update.
    async fn find_one_and_update(
        &self,
        key: &EmployeeKey,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError>;
    /// Remove the document and return it as it was before deletion.
    async fn find_one_and_delete(&self, key: &EmployeeKey)
        -> Result<Option<Employee>, StoreError>;
    async fn exists(&self, employee_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .find_one(&EmployeeKey::EmployeeId(employee_id.to_string()))
            .await?
            .is_some())
    }
    async fn ping(&self) -> Result<(), StoreError>;
    fn get_type(&self) -> &str;
}

/// Creates a concrete store implementation based on the StoreConfig.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn EmployeeStore>, StoreError> {
    match config {
        StoreConfig::MongoDB(mongo_config) => {
            let store = MongoDBStore::new(mongo_config).await?;
            info!("Successfully created MongoDB store.");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("Using in-memory employee store; data is lost on shutdown.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime, Document};
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, Database, IndexModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EmployeeKey, EmployeeStore, StoreError};
use crate::models::{Employee, EmployeeChanges, NewEmployee};

/// MongoDB server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

fn default_collection() -> String {
    "employees".to_string()
}

fn default_app_name() -> String {
    "Employee-Directory".to_string()
}

/// The config struct for MongoDB connections.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

/// A concrete `EmployeeStore` implementation that uses MongoDB.
pub struct MongoDBStore {
    database: Database,
    collection: Collection<EmployeeDocument>,
}

/// Document shape for storing employees in MongoDB.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct EmployeeDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    employee_id: String,
    name: String,
    email: String,
    position: String,
    department: String,
    salary: f64,
    created_at: DateTime,
    updated_at: DateTime,
}

impl MongoDBStore {
    /// Connects to MongoDB and makes sure the unique index on `employeeId` exists.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB at URI: {}", config.uri);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to parse MongoDB URI: {}", e)))?;
        client_options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(client_options).map_err(|e| {
            StoreError::Backend(format!("Failed to create MongoDB client: {}", e))
        })?;

        let database = client.database(&config.database);
        let collection = database.collection::<EmployeeDocument>(&config.collection);

        let mut unique_on_employee_id = IndexModel::default();
        unique_on_employee_id.keys = doc! { "employeeId": 1 };
        unique_on_employee_id.options = Some(IndexOptions::builder().unique(true).build());

        collection
            .create_index(unique_on_employee_id, None)
            .await
            .map_err(|e| {
                StoreError::Backend(format!("Failed to create unique index on employeeId: {}", e))
            })?;

        info!(
            "MongoDB connection established; using {}.{}",
            config.database, config.collection
        );

        Ok(Self {
            database,
            collection,
        })
    }

    fn filter(key: &EmployeeKey) -> Document {
        match key {
            EmployeeKey::EmployeeId(id) => doc! { "employeeId": id.clone() },
            EmployeeKey::ObjectId(oid) => doc! { "_id": *oid },
        }
    }

    fn new_to_doc(employee: NewEmployee) -> EmployeeDocument {
        let now = DateTime::from_chrono(Utc::now());
        EmployeeDocument {
            id: ObjectId::new(),
            employee_id: employee.employee_id,
            name: employee.name,
            email: employee.email,
            position: employee.position,
            department: employee.department,
            salary: employee.salary,
            created_at: now,
            updated_at: now,
        }
    }

    fn doc_to_employee(doc: EmployeeDocument) -> Employee {
        Employee {
            id: doc.id.to_hex(),
            employee_id: doc.employee_id,
            name: doc.name,
            email: doc.email,
            position: doc.position,
            department: doc.department,
            salary: doc.salary,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }

    fn changes_to_update(changes: EmployeeChanges) -> Document {
        doc! {
            "$set": {
                "name": changes.name,
                "email": changes.email,
                "position": changes.position,
                "department": changes.department,
                "salary": changes.salary,
                "updatedAt": DateTime::from_chrono(Utc::now()),
            }
        }
    }
}

fn is_duplicate_key(e: &MongoError) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl EmployeeStore for MongoDBStore {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        let document = Self::new_to_doc(employee);
        match self.collection.insert_one(&document, None).await {
            Ok(_) => {
                debug!("Inserted employee document {}", document.id);
                Ok(Self::doc_to_employee(document))
            }
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(document.employee_id)),
            Err(e) => Err(StoreError::Backend(format!(
                "Failed to insert employee: {}",
                e
            ))),
        }
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let mut cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to list employees: {}", e)))?;

        let mut employees = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to read employee document: {}", e)))?
        {
            employees.push(Self::doc_to_employee(document));
        }

        Ok(employees)
    }

    async fn find_one(&self, key: &EmployeeKey) -> Result<Option<Employee>, StoreError> {
        let document = self
            .collection
            .find_one(Self::filter(key), None)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to query employee: {}", e)))?;

        Ok(document.map(Self::doc_to_employee))
    }

    async fn find_one_and_update(
        &self,
        key: &EmployeeKey,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let document = self
            .collection
            .find_one_and_update(Self::filter(key), Self::changes_to_update(changes), options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to update employee: {}", e)))?;

        Ok(document.map(Self::doc_to_employee))
    }

    async fn find_one_and_delete(
        &self,
        key: &EmployeeKey,
    ) -> Result<Option<Employee>, StoreError> {
        let document = self
            .collection
            .find_one_and_delete(Self::filter(key), None)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to delete employee: {}", e)))?;

        Ok(document.map(Self::doc_to_employee))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(format!("MongoDB ping failed: {}", e)))
    }

    fn get_type(&self) -> &str {
        "mongo"
    }
}

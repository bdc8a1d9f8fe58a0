#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response};
use async_trait::async_trait;
use axum::Router;
use employee_directory::config::{extract_config, ConfigV1};
use employee_directory::models::{Employee, EmployeeChanges, NewEmployee};
use employee_directory::routes::create_router;
use employee_directory::startup::build_state;
use employee_directory::state::AppState;
use employee_directory::store::{EmployeeKey, EmployeeStore, MemoryStore, StoreError};
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use serde_json::{json, Value};

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: "debug"
  format: "json"
store:
  type: memory
"#;

pub fn load_test_config() -> ConfigV1 {
    let figment = Figment::new().merge(Yaml::string(TEST_CONFIG));
    extract_config(&figment).expect("Failed to parse test config YAML")
}

pub async fn build_app() -> Router {
    let state = build_state(Arc::new(load_test_config()))
        .await
        .expect("memory store should always build");
    create_router(state)
}

/// Backend message that must never reach an HTTP client.
pub const BACKEND_FAILURE: &str = "connection refused by db-1.internal:27017";

/// A store whose every call fails as if the database were unreachable.
pub struct FailingStore;

#[async_trait]
impl EmployeeStore for FailingStore {
    async fn insert(&self, _employee: NewEmployee) -> Result<Employee, StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    async fn find_one(&self, _key: &EmployeeKey) -> Result<Option<Employee>, StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    async fn find_one_and_update(
        &self,
        _key: &EmployeeKey,
        _changes: EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    async fn find_one_and_delete(
        &self,
        _key: &EmployeeKey,
    ) -> Result<Option<Employee>, StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Backend(BACKEND_FAILURE.to_string()))
    }

    fn get_type(&self) -> &str {
        "failing"
    }
}

/// Reports every `employeeId` as free, then loses the insert to a concurrent
/// writer, the way a unique index rejects the second of two racing inserts.
pub struct RacingStore {
    inner: MemoryStore,
}

#[async_trait]
impl EmployeeStore for RacingStore {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        Err(StoreError::Duplicate(employee.employee_id))
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        self.inner.find_all().await
    }

    async fn find_one(&self, key: &EmployeeKey) -> Result<Option<Employee>, StoreError> {
        self.inner.find_one(key).await
    }

    async fn find_one_and_update(
        &self,
        key: &EmployeeKey,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        self.inner.find_one_and_update(key, changes).await
    }

    async fn find_one_and_delete(
        &self,
        key: &EmployeeKey,
    ) -> Result<Option<Employee>, StoreError> {
        self.inner.find_one_and_delete(key).await
    }

    async fn exists(&self, _employee_id: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get_type(&self) -> &str {
        "racing"
    }
}

pub fn build_app_with_store(store: Arc<dyn EmployeeStore>) -> Router {
    create_router(AppState {
        config: Arc::new(load_test_config()),
        store,
    })
}

pub fn build_failing_app() -> Router {
    build_app_with_store(Arc::new(FailingStore))
}

pub fn build_racing_app() -> Router {
    build_app_with_store(Arc::new(RacingStore {
        inner: MemoryStore::new(),
    }))
}

pub fn json_request(method: Method, path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn raw_request(method: Method, path: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub fn employee_body(employee_id: &str) -> Value {
    json!({
        "employeeId": employee_id,
        "name": "Margaret Hamilton",
        "email": format!("{}@example.com", employee_id.to_lowercase()),
        "position": "Software Engineer",
        "department": "Apollo",
        "salary": 95000
    })
}

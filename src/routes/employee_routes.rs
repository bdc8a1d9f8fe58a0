//! Employee CRUD endpoint handlers.
//!
//! Single documents can be addressed two ways: by the client-supplied
//! `employeeId` (`/employees/:employee_id`) or by the store-generated `_id`
//! (`/employees/oid/:id`). Both paths share the same store calls.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Employee, EmployeePayload};
use crate::state::AppState;
use crate::store::{EmployeeKey, StoreError};
use crate::utils::http_helpers::HTTPError;

/// Registers employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:employee_id",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route(
            "/employees/oid/:id",
            get(get_employee_by_oid)
                .put(update_employee_by_oid)
                .delete(delete_employee_by_oid),
        )
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteEmployeeResponse {
    pub message: String,
    pub employee: Employee,
}

fn not_found(key: &EmployeeKey) -> HTTPError {
    debug!("No employee matches {}", key);
    HTTPError::not_found("Employee not found")
}

fn object_id_key(id: &str) -> Result<EmployeeKey, HTTPError> {
    ObjectId::parse_str(id)
        .map(EmployeeKey::ObjectId)
        .map_err(|_| HTTPError::bad_request(format!("'{}' is not a valid ObjectId", id)))
}

/// POST /employees: validate, check for an existing `employeeId`, insert.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), HTTPError> {
    let Json(payload) = payload?;
    let new_employee = payload.into_new_employee()?;

    if state.store.exists(&new_employee.employee_id).await? {
        debug!(
            "Rejecting create, employeeId {} is taken",
            new_employee.employee_id
        );
        return Err(StoreError::Duplicate(new_employee.employee_id).into());
    }

    // The unique index still catches a concurrent insert that slipped past the check.
    let employee = state.store.insert(new_employee).await?;
    info!(
        "Created employee {} with _id {}",
        employee.employee_id, employee.id
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /employees
async fn list_employees(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, HTTPError> {
    let employees = state.store.find_all().await?;
    debug!("Returning {} employees", employees.len());
    Ok(Json(employees))
}

async fn fetch(state: &AppState, key: EmployeeKey) -> Result<Json<Employee>, HTTPError> {
    match state.store.find_one(&key).await? {
        Some(employee) => Ok(Json(employee)),
        None => Err(not_found(&key)),
    }
}

async fn replace(
    state: &AppState,
    key: EmployeeKey,
    payload: EmployeePayload,
) -> Result<Json<Employee>, HTTPError> {
    let path_employee_id = match &key {
        EmployeeKey::EmployeeId(id) => Some(id.as_str()),
        EmployeeKey::ObjectId(_) => None,
    };
    let changes = payload.into_changes(path_employee_id)?;

    match state.store.find_one_and_update(&key, changes).await? {
        Some(employee) => {
            info!("Updated employee {}", employee.employee_id);
            Ok(Json(employee))
        }
        None => Err(not_found(&key)),
    }
}

async fn remove(
    state: &AppState,
    key: EmployeeKey,
) -> Result<Json<DeleteEmployeeResponse>, HTTPError> {
    match state.store.find_one_and_delete(&key).await? {
        Some(employee) => {
            info!("Deleted employee {}", employee.employee_id);
            Ok(Json(DeleteEmployeeResponse {
                message: "Employee deleted successfully".to_string(),
                employee,
            }))
        }
        None => Err(not_found(&key)),
    }
}

/// GET /employees/:employee_id
async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<Employee>, HTTPError> {
    fetch(&state, EmployeeKey::EmployeeId(employee_id)).await
}

/// PUT /employees/:employee_id
async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<Json<Employee>, HTTPError> {
    let Json(payload) = payload?;
    replace(&state, EmployeeKey::EmployeeId(employee_id), payload).await
}

/// DELETE /employees/:employee_id
async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<DeleteEmployeeResponse>, HTTPError> {
    remove(&state, EmployeeKey::EmployeeId(employee_id)).await
}

/// GET /employees/oid/:id
async fn get_employee_by_oid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, HTTPError> {
    fetch(&state, object_id_key(&id)?).await
}

/// PUT /employees/oid/:id
async fn update_employee_by_oid(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<Json<Employee>, HTTPError> {
    let key = object_id_key(&id)?;
    let Json(payload) = payload?;
    replace(&state, key, payload).await
}

/// DELETE /employees/oid/:id
async fn delete_employee_by_oid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEmployeeResponse>, HTTPError> {
    remove(&state, object_id_key(&id)?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_key_parses_hex() {
        let oid = ObjectId::new();
        assert_eq!(
            object_id_key(&oid.to_hex()).unwrap(),
            EmployeeKey::ObjectId(oid)
        );
    }

    #[test]
    fn test_object_id_key_rejects_garbage() {
        let err = object_id_key("E-1").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}

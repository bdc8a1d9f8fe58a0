use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{EmployeeKey, EmployeeStore, StoreError};
use crate::models::{Employee, EmployeeChanges, NewEmployee};

/// An in-process store holding employees in insertion order.
///
/// It enforces the same `employeeId` uniqueness rule as the MongoDB
/// unique index, so handlers behave identically against either backend.
pub struct MemoryStore {
    employees: RwLock<Vec<Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            employees: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(employee: &Employee, key: &EmployeeKey) -> bool {
    match key {
        EmployeeKey::EmployeeId(id) => employee.employee_id == *id,
        EmployeeKey::ObjectId(oid) => employee.id == oid.to_hex(),
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, StoreError> {
        let mut employees = self.employees.write().await;
        if employees
            .iter()
            .any(|e| e.employee_id == employee.employee_id)
        {
            return Err(StoreError::Duplicate(employee.employee_id));
        }

        let employee = employee.into_employee(ObjectId::new(), Utc::now());
        debug!("Inserted employee {} into memory store", employee.employee_id);
        employees.push(employee.clone());
        Ok(employee)
    }

    async fn find_all(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.employees.read().await.clone())
    }

    async fn find_one(&self, key: &EmployeeKey) -> Result<Option<Employee>, StoreError> {
        let employees = self.employees.read().await;
        Ok(employees.iter().find(|e| matches(e, key)).cloned())
    }

    async fn find_one_and_update(
        &self,
        key: &EmployeeKey,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, StoreError> {
        let mut employees = self.employees.write().await;
        match employees.iter_mut().find(|e| matches(e, key)) {
            Some(employee) => {
                changes.apply_to(employee, Utc::now());
                Ok(Some(employee.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_one_and_delete(
        &self,
        key: &EmployeeKey,
    ) -> Result<Option<Employee>, StoreError> {
        let mut employees = self.employees.write().await;
        let position = employees.iter().position(|e| matches(e, key));
        Ok(position.map(|index| employees.remove(index)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn get_type(&self) -> &str {
        "memory"
    }
}

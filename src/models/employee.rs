use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Whole salaries go out as JSON integers (`95000`, not `95000.0`).
fn serialize_salary<S: Serializer>(salary: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if salary.fract() == 0.0 && salary.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*salary as i64)
    } else {
        serializer.serialize_f64(*salary)
    }
}

/// The `Employee` struct is one document of the employee collection, as
/// returned to HTTP clients.
///
/// `id` is the store-generated identifier rendered as a hex string, while
/// `employee_id` is the client-supplied identifier that must be unique.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    #[serde(serialize_with = "serialize_salary")]
    pub salary: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated create request. Every required field is present.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
}

impl NewEmployee {
    /// Turn the request into a stored document with the given identifier and timestamps.
    pub fn into_employee(self, id: ObjectId, now: DateTime<Utc>) -> Employee {
        Employee {
            id: id.to_hex(),
            employee_id: self.employee_id,
            name: self.name,
            email: self.email,
            position: self.position,
            department: self.department,
            salary: self.salary,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated replacement for the mutable fields of an employee.
/// The identifiers and `created_at` are never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeChanges {
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
}

impl EmployeeChanges {
    /// Overwrite the mutable fields of `employee` and bump `updated_at`.
    pub fn apply_to(self, employee: &mut Employee, now: DateTime<Utc>) {
        employee.name = self.name;
        employee.email = self.email;
        employee.position = self.position;
        employee.department = self.department;
        employee.salary = self.salary;
        employee.updated_at = now;
    }
}

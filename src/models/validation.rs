use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::employee::{EmployeeChanges, NewEmployee};

/// Raw request body for create and update calls.
///
/// Every field is optional here so that validation can report all of the
/// missing ones at once instead of failing on the first. Values are kept raw
/// so that type mismatches are reported by validation rather than rejected
/// as malformed JSON: numbers and booleans are cast to strings, numeric
/// strings are cast to a salary.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub employee_id: Option<Value>,
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub position: Option<Value>,
    pub department: Option<Value>,
    pub salary: Option<Value>,
}

/// Fields that failed presence or type checks.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation failed: missing [{}], invalid [{}]", .missing.join(", "), .invalid.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<String>,
}

impl ValidationError {
    fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// Scalar values cast to a trimmed string; arrays and objects have no string form.
fn cast_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Absent, null or blank values are recorded as missing, non-scalars as invalid.
fn required_str(
    value: Option<Value>,
    field: &'static str,
    errors: &mut ValidationError,
) -> String {
    match value {
        None | Some(Value::Null) => errors.missing.push(field),
        Some(v) => match cast_str(&v) {
            Some(s) if !s.is_empty() => return s,
            Some(_) => errors.missing.push(field),
            None => errors.invalid.push(format!("{} must be a string", field)),
        },
    }
    String::new()
}

fn required_salary(value: Option<Value>, errors: &mut ValidationError) -> f64 {
    let number = match value {
        None | Some(Value::Null) => {
            errors.missing.push("salary");
            return 0.0;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.missing.push("salary");
            return 0.0;
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => n,
        Some(_) => {
            errors
                .invalid
                .push("salary must be a non-negative number".to_string());
            0.0
        }
        None => {
            errors.invalid.push("salary must be a number".to_string());
            0.0
        }
    }
}

impl EmployeePayload {
    /// Validate a create request. `employeeId` is required along with every
    /// mutable field.
    pub fn into_new_employee(self) -> Result<NewEmployee, ValidationError> {
        let mut errors = ValidationError::default();

        let employee_id = required_str(self.employee_id, "employeeId", &mut errors);
        let name = required_str(self.name, "name", &mut errors);
        let email = required_str(self.email, "email", &mut errors);
        let position = required_str(self.position, "position", &mut errors);
        let department = required_str(self.department, "department", &mut errors);
        let salary = required_salary(self.salary, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewEmployee {
            employee_id,
            name,
            email,
            position,
            department,
            salary,
        })
    }

    /// Validate an update request.
    ///
    /// When the document is addressed by its custom identifier, pass it as
    /// `path_employee_id`: a body `employeeId` that differs from it is rejected.
    /// Otherwise the body `employeeId` is ignored.
    pub fn into_changes(
        self,
        path_employee_id: Option<&str>,
    ) -> Result<EmployeeChanges, ValidationError> {
        let mut errors = ValidationError::default();

        let body_id = self.employee_id.as_ref().and_then(cast_str);
        if let (Some(path_id), Some(body_id)) = (path_employee_id, body_id) {
            if !body_id.is_empty() && body_id != path_id {
                errors.invalid.push(format!(
                    "employeeId '{}' in body does not match '{}' in path",
                    body_id, path_id
                ));
            }
        }

        let name = required_str(self.name, "name", &mut errors);
        let email = required_str(self.email, "email", &mut errors);
        let position = required_str(self.position, "position", &mut errors);
        let department = required_str(self.department, "department", &mut errors);
        let salary = required_salary(self.salary, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(EmployeeChanges {
            name,
            email,
            position,
            department,
            salary,
        })
    }
}

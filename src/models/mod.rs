pub mod employee;
pub mod validation;

pub use employee::{Employee, EmployeeChanges, NewEmployee};
pub use validation::{EmployeePayload, ValidationError};

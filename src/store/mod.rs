pub mod base;
pub mod memory_store;
pub mod mongodb_store;

// Re-export the primary store items so code outside can do
// "use crate::store::{EmployeeStore, create_store};"
pub use base::{create_store, EmployeeKey, EmployeeStore, StoreError};
pub use memory_store::MemoryStore;
pub use mongodb_store::MongoDBConfig;

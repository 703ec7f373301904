//! Service layer guarding the employee and product catalogs.
//! - `EntityService` holds the shared create/read/update/delete rules.
//! - `EmployeeService` and `ProductService` pick the natural-key policy per type.
//! - `storage` defines the store contract and its key-value backends.

pub mod errors;
pub mod storage;
pub mod entity_service;
pub mod employee;
pub mod product;
#[cfg(test)]
pub mod test_support;

pub use employee::EmployeeService;
pub use entity_service::{EntityService, NaturalKeyPolicy};
pub use errors::{ServiceError, StoreError};
pub use product::ProductService;

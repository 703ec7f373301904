//! Domain models for the employee and product catalogs.
//! - `Entity` describes what the service layer needs from a stored record.
//! - Input types carry client-supplied fields and their boundary validation.

pub mod errors;
pub mod entity;
pub mod employee;
pub mod product;

pub use employee::{Employee, EmployeeInput};
pub use entity::{Entity, EntityId};
pub use product::{Product, ProductInput};
pub use rust_decimal::Decimal;

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` request DTOs for create and update operations

pub mod admin_user;
pub mod category;
pub mod issue;

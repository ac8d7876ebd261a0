//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_user_repo;
pub mod category_repo;
pub mod issue_repo;

pub use admin_user_repo::AdminUserRepo;
pub use category_repo::CategoryRepo;
pub use issue_repo::IssueRepo;

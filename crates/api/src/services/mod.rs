//! Application services.
//!
//! Each service owns a handle to the [`Store`](bugtracker_db::Store) and takes
//! the acting user explicitly on every call. Mutations follow one order:
//! load the target (404), authorize it against the policy (401/403/409),
//! validate the input collecting every violation (422), then persist.

pub mod account;
pub mod category;
pub mod issue;

pub use account::AccountService;
pub use category::CategoryService;
pub use issue::{IssuePage, IssueService};

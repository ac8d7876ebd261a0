//! Domain logic for the bug tracker.
//!
//! Everything in this crate is free of I/O: entity enumerations, the
//! authorization policies, listing parameters, and field validation. The
//! `db` and `api` crates build persistence and HTTP on top of it.

pub mod error;
pub mod issue;
pub mod listing;
pub mod policy;
pub mod roles;
pub mod types;
pub mod validation;

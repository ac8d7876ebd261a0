//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated admin from a JWT Bearer token.
//! - [`auth::MaybeUser`] -- Like `AuthUser`, but anonymous requests yield `None`.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;

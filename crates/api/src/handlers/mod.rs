pub mod auth;
pub mod category;
pub mod home;
pub mod issue;
pub mod profile;

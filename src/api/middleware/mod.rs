pub mod auth;

pub use auth::{verify_admin, verify_role, verify_token};

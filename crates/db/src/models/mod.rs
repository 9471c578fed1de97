//! Entity models stored in tables and their DTOs.

pub mod user;
pub mod user_email;

/// Canonical lookup form of a user name or email: trimmed and upper-cased.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

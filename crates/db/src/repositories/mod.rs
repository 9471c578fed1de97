//! Stores over a [`crate::table::TableClient`].

pub mod user_email_repo;
pub mod user_repo;

pub use user_email_repo::UserEmailRepo;
pub use user_repo::UserRepo;

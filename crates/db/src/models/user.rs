//! User entity model and DTOs.

use idhelper_core::entity_keys::EntityKeyDeriver;
use idhelper_core::last_login::HasLastLogin;
use idhelper_core::types::{Timestamp, UserKey};
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::models::normalize;
use crate::table::TableEntity;

/// Full user record from the user table.
///
/// `password_hash` is opaque here; hashing and verification belong to the
/// host. NEVER serialize this to API responses directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUser {
    pub key: UserKey,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub password_hash: Option<String>,
    pub security_stamp: String,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    /// Version of the stored row this copy was read from.
    #[serde(skip)]
    pub etag: Option<String>,
}

impl StoredUser {
    pub fn to_entity(&self, keys: &EntityKeyDeriver) -> Result<TableEntity, TableError> {
        Ok(TableEntity::from_model(keys.derive(&self.key), self)?.with_etag(self.etag.clone()))
    }

    pub fn from_entity(entity: &TableEntity) -> Result<Self, TableError> {
        let mut user: Self = entity.to_model()?;
        if user.key.value() != entity.partition_key {
            return Err(TableError::Invalid(format!(
                "user key '{}' does not match partition key '{}'",
                user.key, entity.partition_key
            )));
        }
        user.etag = entity.etag.clone();
        Ok(user)
    }
}

impl HasLastLogin for StoredUser {
    fn last_login(&self) -> Option<Timestamp> {
        self.last_login
    }

    fn set_last_login(&mut self, at: Timestamp) {
        self.last_login = Some(at);
    }
}

/// DTO for creating a new user. A key is generated when `key` is `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub key: Option<UserKey>,
    pub user_name: String,
    pub password_hash: Option<String>,
}

impl CreateUser {
    pub fn into_user(self, now: Timestamp) -> StoredUser {
        StoredUser {
            key: self.key.unwrap_or_else(UserKey::generate),
            normalized_user_name: normalize(&self.user_name),
            user_name: self.user_name,
            email: None,
            normalized_email: None,
            email_confirmed: false,
            password_hash: self.password_hash,
            security_stamp: uuid::Uuid::new_v4().to_string(),
            last_login: None,
            created_at: now,
            etag: None,
        }
    }
}

//! Store for the email -> user index.
//!
//! Index rows are partitioned by normalized email so that a lookup by email
//! is a point read. The user record itself is saved through
//! [`super::UserRepo`]; methods here that take `&mut StoredUser` only change
//! the in-memory copy.

use std::sync::Arc;

use idhelper_core::entity_keys::EntityKeyDeriver;
use idhelper_core::error::{require_non_blank, CoreError};
use idhelper_core::types::UserKey;
use validator::ValidateEmail;

use crate::error::TableError;
use crate::models::normalize;
use crate::models::user::StoredUser;
use crate::models::user_email::EmailIndexEntry;
use crate::table::TableClient;

/// Insert attempts when the index row keeps vanishing between write and read.
const CLAIM_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct UserEmailRepo {
    client: Arc<dyn TableClient>,
    table: String,
    keys: EntityKeyDeriver,
}

impl UserEmailRepo {
    pub fn new(
        client: Arc<dyn TableClient>,
        table: impl Into<String>,
        keys: EntityKeyDeriver,
    ) -> Result<Self, TableError> {
        let table = table.into();
        require_non_blank("table", &table)?;
        Ok(Self { client, table, keys })
    }

    /// Point `email` at `user` and update the user's email fields.
    ///
    /// Fails with [`TableError::Conflict`] if the email already belongs to a
    /// different user. Changing the address resets `email_confirmed`. `user`
    /// is only modified once every storage call has succeeded.
    pub async fn set_email(&self, user: &mut StoredUser, email: &str) -> Result<(), TableError> {
        let email = email.trim();
        validate_email(email)?;
        let normalized = normalize(email);

        let claimed = self.claim(&user.key, &normalized).await?;

        let changed = user.normalized_email.as_deref() != Some(normalized.as_str());
        if changed {
            if let Some(previous) = user.normalized_email.as_deref() {
                if let Err(e) = self.release(previous, &user.key).await {
                    if claimed {
                        self.undo_claim(&normalized, &user.key).await;
                    }
                    return Err(e);
                }
            }
            user.email_confirmed = false;
        }
        user.normalized_email = Some(normalized);
        user.email = Some(email.to_string());
        tracing::info!(user_key = %user.key, "Set user email");
        Ok(())
    }

    /// Owner of `email`, if any.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserKey>, TableError> {
        require_non_blank("email", email)?;
        self.find_by_normalized(&normalize(email)).await
    }

    /// Drop the index row for `email` regardless of owner. Returns `true`
    /// if it existed.
    ///
    /// Repair tool for orphaned index rows: the owning [`StoredUser`] is not
    /// touched. Use [`Self::clear_email`] to detach an email from a user.
    pub async fn remove(&self, email: &str) -> Result<bool, TableError> {
        require_non_blank("email", email)?;
        self.remove_normalized(&normalize(email)).await
    }

    /// Remove the user's email and its index row.
    pub async fn clear_email(&self, user: &mut StoredUser) -> Result<(), TableError> {
        if let Some(normalized) = user.normalized_email.as_deref() {
            self.release(normalized, &user.key).await?;
        }
        user.normalized_email = None;
        user.email = None;
        user.email_confirmed = false;
        Ok(())
    }

    pub fn set_email_confirmed(&self, user: &mut StoredUser, confirmed: bool) {
        user.email_confirmed = confirmed;
    }

    /// Insert the index row for `normalized` owned by `key`.
    ///
    /// The insert is the ownership check: it fails atomically if a row
    /// exists. Returns `true` if a new row was written and `false` if `key`
    /// already owned it.
    async fn claim(&self, key: &UserKey, normalized: &str) -> Result<bool, TableError> {
        let entry = EmailIndexEntry {
            normalized_email: normalized.to_string(),
            user_key: key.clone(),
        };

        for _ in 0..CLAIM_ATTEMPTS {
            match self
                .client
                .insert(&self.table, entry.to_entity(&self.keys)?)
                .await
            {
                Ok(_) => return Ok(true),
                Err(TableError::Conflict { .. }) => {}
                Err(e) => return Err(e),
            }

            match self.find_by_normalized(normalized).await? {
                Some(owner) if owner == *key => return Ok(false),
                Some(_) => {
                    tracing::warn!(user_key = %key, "Email already in use by another user");
                    return Err(self.conflict(normalized));
                }
                // Released between the insert and the read; try again.
                None => continue,
            }
        }
        Err(self.conflict(normalized))
    }

    /// Delete the index row for `normalized` if `key` owns it.
    async fn release(&self, normalized: &str, key: &UserKey) -> Result<bool, TableError> {
        match self.find_by_normalized(normalized).await? {
            Some(owner) if owner == *key => self.remove_normalized(normalized).await,
            _ => Ok(false),
        }
    }

    async fn undo_claim(&self, normalized: &str, key: &UserKey) {
        if let Err(e) = self.release(normalized, key).await {
            tracing::warn!(user_key = %key, error = %e, "Failed to roll back email claim");
        }
    }

    fn conflict(&self, normalized: &str) -> TableError {
        TableError::Conflict {
            table: self.table.clone(),
            partition_key: normalized.to_string(),
            row_key: self.keys.row_key().to_string(),
        }
    }

    async fn find_by_normalized(&self, normalized: &str) -> Result<Option<UserKey>, TableError> {
        let keys = self.keys.derive_from_str(normalized)?;
        match self.client.get(&self.table, &keys).await? {
            Some(entity) => Ok(Some(EmailIndexEntry::from_entity(&entity)?.user_key)),
            None => Ok(None),
        }
    }

    async fn remove_normalized(&self, normalized: &str) -> Result<bool, TableError> {
        let keys = self.keys.derive_from_str(normalized)?;
        self.client.delete(&self.table, &keys).await
    }
}

fn validate_email(email: &str) -> Result<(), CoreError> {
    require_non_blank("email", email)?;
    if !email.validate_email() {
        return Err(CoreError::InvalidArgument {
            param: "email",
            reason: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(())
}

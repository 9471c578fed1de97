//! Store for user records. One row per user, partitioned by user key.

use std::sync::Arc;

use idhelper_core::clock::Clock;
use idhelper_core::entity_keys::EntityKeyDeriver;
use idhelper_core::error::require_non_blank;
use idhelper_core::last_login::LastLoginSetter;
use idhelper_core::types::UserKey;

use crate::error::TableError;
use crate::models::user::{CreateUser, StoredUser};
use crate::table::TableClient;

/// Provides CRUD operations for users.
#[derive(Clone)]
pub struct UserRepo {
    client: Arc<dyn TableClient>,
    table: String,
    keys: EntityKeyDeriver,
    clock: Arc<dyn Clock>,
}

impl UserRepo {
    pub fn new(
        client: Arc<dyn TableClient>,
        table: impl Into<String>,
        keys: EntityKeyDeriver,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TableError> {
        let table = table.into();
        require_non_blank("table", &table)?;
        Ok(Self {
            client,
            table,
            keys,
            clock,
        })
    }

    /// Insert a new user, returning the stored record.
    pub async fn create(&self, input: CreateUser) -> Result<StoredUser, TableError> {
        let user = input.into_user(self.clock.now_utc());
        let stored = self
            .client
            .insert(&self.table, user.to_entity(&self.keys)?)
            .await
            .inspect_err(|e| {
                if matches!(e, TableError::Conflict { .. }) {
                    tracing::warn!(user_key = %user.key, "User key already exists");
                }
            })?;
        tracing::info!(user_key = %user.key, table = %self.table, "Created user");
        StoredUser::from_entity(&stored)
    }

    pub async fn find_by_key(&self, key: &UserKey) -> Result<Option<StoredUser>, TableError> {
        self.client
            .get(&self.table, &self.keys.derive(key))
            .await?
            .map(|entity| StoredUser::from_entity(&entity))
            .transpose()
    }

    /// Persist changes to `user`.
    ///
    /// If `user.etag` is set the write fails with
    /// [`TableError::PreconditionFailed`] when the stored row changed since.
    pub async fn update(&self, user: &StoredUser) -> Result<StoredUser, TableError> {
        let stored = self
            .client
            .replace(&self.table, user.to_entity(&self.keys)?)
            .await?;
        tracing::debug!(user_key = %user.key, "Updated user");
        StoredUser::from_entity(&stored)
    }

    /// Delete a user. Returns `true` if the row existed.
    pub async fn delete(&self, key: &UserKey) -> Result<bool, TableError> {
        let deleted = self.client.delete(&self.table, &self.keys.derive(key)).await?;
        if deleted {
            tracing::info!(user_key = %key, "Deleted user");
        }
        Ok(deleted)
    }

    /// Stamp the user's last login and persist it.
    ///
    /// Returns `None` if no user with `key` exists.
    pub async fn record_login(
        &self,
        key: &UserKey,
        setter: &LastLoginSetter,
    ) -> Result<Option<StoredUser>, TableError> {
        let Some(mut user) = self.find_by_key(key).await? else {
            return Ok(None);
        };
        setter.set_last_login(&mut user);
        self.update(&user).await.map(Some)
    }
}

//! Email index entry: normalized email -> owning user key.

use idhelper_core::entity_keys::EntityKeyDeriver;
use idhelper_core::types::UserKey;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::table::TableEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailIndexEntry {
    pub normalized_email: String,
    pub user_key: UserKey,
}

impl EmailIndexEntry {
    /// The index row is partitioned by the normalized email.
    pub fn to_entity(&self, keys: &EntityKeyDeriver) -> Result<TableEntity, TableError> {
        TableEntity::from_model(keys.derive_from_str(&self.normalized_email)?, self)
    }

    pub fn from_entity(entity: &TableEntity) -> Result<Self, TableError> {
        entity.to_model()
    }
}

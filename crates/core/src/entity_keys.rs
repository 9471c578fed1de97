//! Partition/row key derivation for user-related table entities.
//!
//! Every entity kind lives in exactly one row per user: the partition key is
//! the user key and the row key is a per-store constant naming the kind. A
//! point lookup therefore never needs a scan.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_blank, CoreError};
use crate::types::UserKey;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Row key of the user record.
pub const USER_ROW_KEY: &str = "User";

/// Row key of the email-index record.
pub const EMAIL_INDEX_ROW_KEY: &str = "EmailIndex";

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Two-part address of one entity in a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableEntityKeys {
    pub partition_key: String,
    pub row_key: String,
}

/// Derives [`TableEntityKeys`] for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKeyDeriver {
    row_key: String,
}

impl EntityKeyDeriver {
    /// Deriver for the entity kind identified by `row_key`.
    pub fn new(row_key: impl Into<String>) -> Result<Self, CoreError> {
        let row_key = row_key.into();
        require_non_blank("row_key", &row_key)?;
        Ok(Self { row_key })
    }

    pub fn user() -> Self {
        Self {
            row_key: USER_ROW_KEY.to_string(),
        }
    }

    pub fn email_index() -> Self {
        Self {
            row_key: EMAIL_INDEX_ROW_KEY.to_string(),
        }
    }

    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    pub fn derive(&self, key: &UserKey) -> TableEntityKeys {
        self.keys_for(key.value())
    }

    /// Derive keys from an unvalidated partition value.
    pub fn derive_from_str(&self, key: &str) -> Result<TableEntityKeys, CoreError> {
        require_non_blank("key", key)?;
        Ok(self.keys_for(key))
    }

    fn keys_for(&self, partition_key: &str) -> TableEntityKeys {
        tracing::trace!(partition_key, row_key = %self.row_key, "Derived entity keys");
        TableEntityKeys {
            partition_key: partition_key.to_string(),
            row_key: self.row_key.clone(),
        }
    }
}

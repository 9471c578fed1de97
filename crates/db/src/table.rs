//! The table storage seam.
//!
//! A table holds entities addressed by `(partition_key, row_key)`. Each
//! entity carries a bag of JSON properties plus a server-assigned etag and
//! timestamp that change on every write.

use async_trait::async_trait;
use idhelper_core::entity_keys::TableEntityKeys;
use idhelper_core::types::Timestamp;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TableError;

/// One row in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    /// Server-assigned version. When set on a replace, the write only
    /// succeeds if it still matches the stored entity.
    pub etag: Option<String>,
    /// Server-assigned time of the last write.
    pub timestamp: Option<Timestamp>,
    pub properties: Map<String, Value>,
}

impl TableEntity {
    pub fn new(keys: TableEntityKeys, properties: Map<String, Value>) -> Self {
        Self {
            partition_key: keys.partition_key,
            row_key: keys.row_key,
            etag: None,
            timestamp: None,
            properties,
        }
    }

    /// Build an entity whose properties are the serialized fields of `model`.
    ///
    /// `model` must serialize to a JSON object.
    pub fn from_model<T: Serialize>(keys: TableEntityKeys, model: &T) -> Result<Self, TableError> {
        match serde_json::to_value(model)? {
            Value::Object(properties) => Ok(Self::new(keys, properties)),
            other => Err(TableError::Invalid(format!(
                "entity properties must be an object, got {other}"
            ))),
        }
    }

    /// Deserialize the property bag into a model.
    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T, TableError> {
        Ok(serde_json::from_value(Value::Object(self.properties.clone()))?)
    }

    pub fn keys(&self) -> TableEntityKeys {
        TableEntityKeys {
            partition_key: self.partition_key.clone(),
            row_key: self.row_key.clone(),
        }
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}

/// Client for a key/entity table service.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Point lookup. `Ok(None)` when the entity does not exist.
    async fn get(
        &self,
        table: &str,
        keys: &TableEntityKeys,
    ) -> Result<Option<TableEntity>, TableError>;

    /// Insert a new entity. Fails with [`TableError::Conflict`] if one exists.
    async fn insert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError>;

    /// Replace an existing entity.
    ///
    /// Fails with [`TableError::NotFound`] if it does not exist, and with
    /// [`TableError::PreconditionFailed`] if `entity.etag` is set and stale.
    async fn replace(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError>;

    /// Insert or unconditionally replace.
    async fn upsert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError>;

    /// Delete an entity. Returns `true` if it existed.
    async fn delete(&self, table: &str, keys: &TableEntityKeys) -> Result<bool, TableError>;

    /// All entities in one partition, ordered by row key.
    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> Result<Vec<TableEntity>, TableError>;
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn keys() -> TableEntityKeys {
        TableEntityKeys {
            partition_key: "p".into(),
            row_key: "r".into(),
        }
    }

    #[test]
    fn model_properties_survive_conversion() {
        let sample = Sample {
            name: "a".into(),
            count: 3,
        };
        let entity = TableEntity::from_model(keys(), &sample).unwrap();
        assert_eq!(entity.properties["count"], 3);
        assert_eq!(entity.to_model::<Sample>().unwrap(), sample);
        assert_eq!(entity.keys(), keys());
    }

    #[test]
    fn non_object_model_is_rejected() {
        let err = TableEntity::from_model(keys(), &42).unwrap_err();
        assert!(matches!(err, TableError::Invalid(_)));
    }
}

//! In-process [`TableClient`] used by tests and local development.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use idhelper_core::clock::{Clock, SystemClock};
use idhelper_core::entity_keys::TableEntityKeys;
use idhelper_core::error::require_non_blank;
use tokio::sync::RwLock;

use crate::error::TableError;
use crate::table::{TableClient, TableEntity};

type Table = BTreeMap<(String, String), TableEntity>;

/// Tables held in memory. Tables are created on first write.
pub struct InMemoryTableClient {
    tables: RwLock<HashMap<String, Table>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryTableClient {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryTableClient {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entities stored in `table`.
    pub async fn len(&self, table: &str) -> usize {
        self.tables.read().await.get(table).map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, table: &str) -> bool {
        self.len(table).await == 0
    }

    /// Stamp a fresh etag and timestamp on `entity`.
    fn stamp(&self, mut entity: TableEntity) -> TableEntity {
        entity.etag = Some(uuid::Uuid::new_v4().to_string());
        entity.timestamp = Some(self.clock.now_utc());
        entity
    }
}

fn row_id(keys: &TableEntityKeys) -> (String, String) {
    (keys.partition_key.clone(), keys.row_key.clone())
}

fn check(table: &str, entity: &TableEntity) -> Result<(), TableError> {
    require_non_blank("table", table)?;
    require_non_blank("partition_key", &entity.partition_key)?;
    require_non_blank("row_key", &entity.row_key)?;
    Ok(())
}

#[async_trait]
impl TableClient for InMemoryTableClient {
    async fn get(
        &self,
        table: &str,
        keys: &TableEntityKeys,
    ) -> Result<Option<TableEntity>, TableError> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(&row_id(keys))).cloned())
    }

    async fn insert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        check(table, &entity)?;
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let id = row_id(&entity.keys());
        if rows.contains_key(&id) {
            return Err(TableError::Conflict {
                table: table.to_string(),
                partition_key: id.0,
                row_key: id.1,
            });
        }
        let stored = self.stamp(entity);
        rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn replace(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        check(table, &entity)?;
        let mut tables = self.tables.write().await;
        let id = row_id(&entity.keys());
        let Some(current) = tables.get_mut(table).and_then(|t| t.get_mut(&id)) else {
            return Err(TableError::NotFound {
                table: table.to_string(),
                partition_key: id.0,
                row_key: id.1,
            });
        };
        if entity.etag.is_some() && entity.etag != current.etag {
            return Err(TableError::PreconditionFailed {
                table: table.to_string(),
                partition_key: id.0,
                row_key: id.1,
            });
        }
        let stored = self.stamp(entity);
        *current = stored.clone();
        Ok(stored)
    }

    async fn upsert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        check(table, &entity)?;
        let mut tables = self.tables.write().await;
        let stored = self.stamp(entity);
        tables
            .entry(table.to_string())
            .or_default()
            .insert(row_id(&stored.keys()), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, table: &str, keys: &TableEntityKeys) -> Result<bool, TableError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(table)
            .and_then(|t| t.remove(&row_id(keys)))
            .is_some())
    }

    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> Result<Vec<TableEntity>, TableError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.values()
                    .filter(|e| e.partition_key == partition_key)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

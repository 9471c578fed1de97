#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeZone;
use idhelper_core::clock::FixedClock;
use idhelper_core::config::IdentityConfig;
use idhelper_core::entity_keys::TableEntityKeys;
use idhelper_core::types::{Timestamp, UserKey};
use idhelper_db::models::user::{CreateUser, StoredUser};
use idhelper_db::repositories::{UserEmailRepo, UserRepo};
use idhelper_db::{InMemoryTableClient, TableClient, TableEntity, TableError};

/// Everything a store test needs, wired against one in-memory table client.
pub struct TestStores {
    pub client: Arc<InMemoryTableClient>,
    pub clock: Arc<FixedClock>,
    pub config: IdentityConfig,
    pub users: UserRepo,
    pub emails: UserEmailRepo,
}

/// Fixed start time for every test clock.
pub fn epoch() -> Timestamp {
    chrono::Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

pub fn build_stores() -> TestStores {
    let config = IdentityConfig::default();
    let clock = Arc::new(FixedClock::new(epoch()));
    let client = Arc::new(InMemoryTableClient::new(clock.clone()));

    let users = UserRepo::new(
        client.clone(),
        config.user_table.clone(),
        config.user_keys().unwrap(),
        clock.clone(),
    )
    .unwrap();
    let emails = UserEmailRepo::new(
        client.clone(),
        config.email_table.clone(),
        config.email_keys().unwrap(),
    )
    .unwrap();

    TestStores {
        client,
        clock,
        config,
        users,
        emails,
    }
}

/// Create a user with a known key.
pub async fn create_user(stores: &TestStores, key: &str, user_name: &str) -> StoredUser {
    stores
        .users
        .create(CreateUser {
            key: Some(UserKey::new(key).unwrap()),
            user_name: user_name.to_string(),
            password_hash: Some("opaque-hash".to_string()),
        })
        .await
        .expect("user creation should succeed")
}

/// Email store over `client`, using the same table and keys as `stores`.
pub fn email_repo_over(stores: &TestStores, client: Arc<dyn TableClient>) -> UserEmailRepo {
    UserEmailRepo::new(
        client,
        stores.config.email_table.clone(),
        stores.config.email_keys().unwrap(),
    )
    .unwrap()
}

/// Table client that yields to the scheduler around every call, so that
/// concurrent store operations interleave.
pub struct YieldingClient {
    pub inner: Arc<InMemoryTableClient>,
}

#[async_trait]
impl TableClient for YieldingClient {
    async fn get(
        &self,
        table: &str,
        keys: &TableEntityKeys,
    ) -> Result<Option<TableEntity>, TableError> {
        tokio::task::yield_now().await;
        let found = self.inner.get(table, keys).await;
        tokio::task::yield_now().await;
        found
    }

    async fn insert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        tokio::task::yield_now().await;
        self.inner.insert(table, entity).await
    }

    async fn replace(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        tokio::task::yield_now().await;
        self.inner.replace(table, entity).await
    }

    async fn upsert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        tokio::task::yield_now().await;
        self.inner.upsert(table, entity).await
    }

    async fn delete(&self, table: &str, keys: &TableEntityKeys) -> Result<bool, TableError> {
        tokio::task::yield_now().await;
        self.inner.delete(table, keys).await
    }

    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> Result<Vec<TableEntity>, TableError> {
        tokio::task::yield_now().await;
        self.inner.query_partition(table, partition_key).await
    }
}

/// Table client whose deletes always fail.
pub struct FailingDeleteClient {
    pub inner: Arc<InMemoryTableClient>,
}

#[async_trait]
impl TableClient for FailingDeleteClient {
    async fn get(
        &self,
        table: &str,
        keys: &TableEntityKeys,
    ) -> Result<Option<TableEntity>, TableError> {
        self.inner.get(table, keys).await
    }

    async fn insert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        self.inner.insert(table, entity).await
    }

    async fn replace(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        self.inner.replace(table, entity).await
    }

    async fn upsert(&self, table: &str, entity: TableEntity) -> Result<TableEntity, TableError> {
        self.inner.upsert(table, entity).await
    }

    async fn delete(&self, _table: &str, _keys: &TableEntityKeys) -> Result<bool, TableError> {
        Err(TableError::Invalid("delete unavailable".to_string()))
    }

    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> Result<Vec<TableEntity>, TableError> {
        self.inner.query_partition(table, partition_key).await
    }
}

use async_trait::async_trait;
use bytes::Bytes;
use mlnano_models::{CreateDataSetInput, DataSetRecord};

use crate::error::ClientError;
use crate::storage::PutOptions;
use crate::subscription::Subscription;

/// The managed data API as seen by the console.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn create_data_set(
        &self,
        input: &CreateDataSetInput,
    ) -> Result<DataSetRecord, ClientError>;

    /// First page only.
    async fn list_data_sets(&self) -> Result<Vec<DataSetRecord>, ClientError>;

    /// Backend-wide feed of newly created records.
    async fn subscribe_on_create(
        &self,
    ) -> Result<Subscription<DataSetRecord>, ClientError>;
}

/// Object storage as seen by the console.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        options: PutOptions,
    ) -> Result<(), ClientError>;

    /// Resolve a key to a fetchable URL.
    async fn get(&self, key: &str) -> Result<String, ClientError>;
}

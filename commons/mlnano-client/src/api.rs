use async_trait::async_trait;
use bytes::Bytes;
use mlnano_models::schema::{
    self, CreateDataSetData, CreateDataSetVariables, ListDataSetsData,
    ListDataSetsVariables, OnCreateDataSetData,
};
use mlnano_models::{CreateDataSetInput, DataSetRecord};
use tracing::info;

use crate::backend::{DataApi, ObjectStorage};
use crate::error::ClientError;
use crate::graphql::GraphqlClient;
use crate::storage::{AccessLevel, PutOptions, StorageClient};
use crate::subscription::Subscription;

#[async_trait]
impl DataApi for GraphqlClient {
    async fn create_data_set(
        &self,
        input: &CreateDataSetInput,
    ) -> Result<DataSetRecord, ClientError> {
        input.validate_input()?;
        let data: CreateDataSetData = self
            .execute(
                schema::CREATE_DATA_SET_OPERATION,
                &schema::create_data_set_document(),
                &CreateDataSetVariables { input },
            )
            .await?;
        let record = data
            .create_data_set
            .ok_or(ClientError::MissingData("createDataSet"))?;
        info!(id = %record.id, name = %record.name, "data set created");
        Ok(record)
    }

    async fn list_data_sets(&self) -> Result<Vec<DataSetRecord>, ClientError> {
        let data: ListDataSetsData = self
            .execute(
                schema::LIST_DATA_SETS_OPERATION,
                &schema::list_data_sets_document(),
                &ListDataSetsVariables::default(),
            )
            .await?;
        let page = data
            .list_data_sets
            .ok_or(ClientError::MissingData("listDataSets"))?;
        Ok(page.items)
    }

    async fn subscribe_on_create(
        &self,
    ) -> Result<Subscription<DataSetRecord>, ClientError> {
        self.subscribe(
            schema::ON_CREATE_DATA_SET_OPERATION,
            &schema::on_create_data_set_document(),
            &serde_json::json!({}),
            select_created,
        )
        .await
    }
}

fn select_created(data: OnCreateDataSetData) -> Result<DataSetRecord, ClientError> {
    data.on_create_data_set
        .ok_or(ClientError::MissingData("onCreateDataSet"))
}

#[async_trait]
impl ObjectStorage for StorageClient {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        options: PutOptions,
    ) -> Result<(), ClientError> {
        self.put_object(key, body, &options).await
    }

    /// Uploads go to the private level, so reads resolve there too.
    async fn get(&self, key: &str) -> Result<String, ClientError> {
        self.presign(AccessLevel::Private, key).await
    }
}

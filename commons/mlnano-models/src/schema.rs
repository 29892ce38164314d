//! GraphQL documents and response envelopes for the data set API.
//!
//! The create path, the list path and the live feed all select the same
//! record shape (`DATA_SET_FIELDS`), so a record decoded from any of them is
//! a [`DataSetRecord`].

use serde::{Deserialize, Serialize};

use crate::dataset::{CreateDataSetInput, DataSetRecord, ModelDataSetConnection};

const DATA_SET_FIELDS: &str = "id
      name
      description
      file {
        bucket
        region
        key
      }
      createdAt
      updatedAt";

pub const CREATE_DATA_SET_OPERATION: &str = "CreateDataSet";
pub const LIST_DATA_SETS_OPERATION: &str = "ListDataSets";
pub const ON_CREATE_DATA_SET_OPERATION: &str = "OnCreateDataSet";

pub fn create_data_set_document() -> String {
    format!(
        "mutation CreateDataSet(
  $input: CreateDataSetInput!
  $condition: ModelDataSetConditionInput
) {{
  createDataSet(input: $input, condition: $condition) {{
      {DATA_SET_FIELDS}
  }}
}}"
    )
}

pub fn list_data_sets_document() -> String {
    format!(
        "query ListDataSets(
  $filter: ModelDataSetFilterInput
  $limit: Int
  $nextToken: String
) {{
  listDataSets(filter: $filter, limit: $limit, nextToken: $nextToken) {{
    items {{
      {DATA_SET_FIELDS}
    }}
    nextToken
  }}
}}"
    )
}

pub fn on_create_data_set_document() -> String {
    format!(
        "subscription OnCreateDataSet {{
  onCreateDataSet {{
      {DATA_SET_FIELDS}
  }}
}}"
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDataSetVariables<'a> {
    pub input: &'a CreateDataSetInput,
}

/// `listDataSets` is only ever called for the first page, so no filter,
/// limit or token is sent.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListDataSetsVariables {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDataSetData {
    pub create_data_set: Option<DataSetRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDataSetsData {
    pub list_data_sets: Option<ModelDataSetConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnCreateDataSetData {
    pub on_create_data_set: Option<DataSetRecord>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::ValidationError;

/// Location of an uploaded object in the storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct S3Object {
    pub bucket: String,
    pub region: String,
    #[validate(length(min = 1, message = "File key cannot be empty"))]
    pub key: String,
}

/// A data set as persisted by the backend: one uploaded file plus its label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSetRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file: S3Object,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CreateDataSetInput {
    #[validate(length(min = 1, message = "Data set name cannot be empty"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(nested)]
    pub file: S3Object,
}

impl CreateDataSetInput {
    pub fn new(name: impl Into<String>, file: S3Object) -> Self {
        Self {
            name: name.into(),
            description: None,
            file,
        }
    }

    /// Check the input before it is sent to the backend.
    pub fn validate_input(&self) -> Result<(), ValidationError> {
        self.validate()?;
        Ok(())
    }
}

/// One page of `listDataSets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelDataSetConnection {
    pub items: Vec<DataSetRecord>,
    #[serde(default)]
    pub next_token: Option<String>,
}

use bytes::Bytes;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;
use crate::http::{HttpClient, parse_url};

/// Presigned links stay valid for 15 minutes.
pub const PRESIGN_EXPIRES_SECS: u64 = 900;

/// Visibility scope of a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Protected,
    #[default]
    Private,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Protected => "protected",
            AccessLevel::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    pub access_level: AccessLevel,
    pub content_type: String,
}

impl PutOptions {
    pub fn private(content_type: impl Into<String>) -> Self {
        Self {
            access_level: AccessLevel::Private,
            content_type: content_type.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PresignedUrl {
    url: String,
}

/// Client for the object storage gateway.
///
/// Objects live at `{storage_url}/{bucket}/{level}/{identity}/{key}`; the
/// public level has no identity segment.
#[derive(Clone, Debug)]
pub struct StorageClient {
    http: HttpClient,
    base_url: Url,
    bucket: String,
}

impl StorageClient {
    pub fn new(
        http: HttpClient,
        storage_url: &str,
        bucket: &str,
    ) -> Result<Self, ClientError> {
        if bucket.is_empty() {
            return Err(ClientError::config_error("Storage bucket not configured"));
        }
        Ok(Self {
            http,
            base_url: parse_url(storage_url, "storage url")?,
            bucket: bucket.to_string(),
        })
    }

    pub fn object_url(&self, level: AccessLevel, key: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::config_error("storage url cannot be a base")
            })?;
            segments.pop_if_empty();
            segments.push(&self.bucket).push(level.as_str());
            if level != AccessLevel::Public {
                segments.push(self.http.session().identity_id());
            }
            segments.push(key);
        }
        Ok(url)
    }

    pub async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), ClientError> {
        let url = self.object_url(options.access_level, key)?;
        debug!(%url, size = body.len(), "uploading object");
        self.http.put_bytes(url, body, &options.content_type).await
    }

    /// Resolve a key to a time-limited URL.
    pub async fn presign(
        &self,
        level: AccessLevel,
        key: &str,
    ) -> Result<String, ClientError> {
        let mut url = self.object_url(level, key)?;
        url.query_pairs_mut()
            .append_pair("presign", "true")
            .append_pair("expires", &PRESIGN_EXPIRES_SECS.to_string());
        let presigned: PresignedUrl = self.http.get_json(url).await?;
        Ok(presigned.url)
    }
}

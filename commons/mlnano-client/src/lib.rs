//! Transports for the managed data set backend: GraphQL over HTTP, GraphQL
//! subscriptions over server-sent events and the object storage gateway.

mod api;
mod backend;
mod error;
mod graphql;
mod http;
mod session;
pub mod sse;
mod storage;
mod subscription;

pub use backend::*;
pub use error::*;
pub use graphql::*;
pub use http::*;
pub use session::*;
pub use storage::*;
pub use subscription::*;

/// Endpoints and bucket coordinates of one backend deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_url: String,
    pub realtime_url: String,
    pub storage_url: String,
    pub bucket: String,
    pub region: String,
}

/// Client factory for creating API clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create the GraphQL client and the storage client sharing one session.
    pub fn create_clients(
        config: &BackendConfig,
        session: Session,
    ) -> Result<(GraphqlClient, StorageClient), ClientError> {
        let http = HttpClient::new(session)?;
        let api = GraphqlClient::new(
            http.clone(),
            &config.api_url,
            &config.realtime_url,
        )?;
        let storage =
            StorageClient::new(http, &config.storage_url, &config.bucket)?;
        Ok((api, storage))
    }
}

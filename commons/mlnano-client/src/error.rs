use thiserror::Error;

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub error_type: Option<String>,
}

/// Client-related errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("GraphQL error: {}", join_messages(.0))]
    Graphql(Vec<GraphqlError>),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] mlnano_models::ValidationError),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Response is missing field '{0}'")]
    MissingData(&'static str),
}

impl ClientError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn subscription(msg: impl Into<String>) -> Self {
        Self::Subscription(msg.into())
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

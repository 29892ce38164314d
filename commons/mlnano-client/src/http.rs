use super::error::ClientError;
use super::session::Session;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP client carrying the session credentials on every request
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    session: Session,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(session: Session) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("mlnano/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::RequestFailed)?;

        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start an authenticated request
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, self.session.token())
    }

    /// Make a POST request with JSON body
    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        self.handle_response(response).await
    }

    /// Make a GET request and decode the JSON body
    pub async fn get_json<T>(&self, url: Url) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        self.handle_response(response).await
    }

    /// Upload raw bytes with PUT
    pub async fn put_bytes(
        &self,
        url: Url,
        body: bytes::Bytes,
        content_type: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        check_status(response).await.map(|_| ())
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = check_status(response).await?;
        let text = response.text().await.map_err(ClientError::RequestFailed)?;
        serde_json::from_str(&text).map_err(ClientError::SerializationError)
    }
}

/// Turn non-2xx responses into [`ClientError::ApiError`].
pub async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::api_error(status.as_u16(), error_text))
    }
}

pub(crate) fn parse_url(raw: &str, what: &str) -> Result<Url, ClientError> {
    Url::parse(raw)
        .map_err(|e| ClientError::config_error(format!("invalid {what} '{raw}': {e}")))
}

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, GraphqlError};
use crate::http::{HttpClient, check_status, parse_url};
use crate::sse::SseDecoder;
use crate::subscription::Subscription;

const SUBSCRIPTION_BUFFER: usize = 64;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: &'a V,
    pub operation_name: &'a str,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlResponse<T> {
    pub fn into_data(self) -> Result<T, ClientError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(ClientError::Graphql(errors)),
            _ => self.data.ok_or(ClientError::MissingData("data")),
        }
    }
}

/// GraphQL client for the managed data API.
///
/// Queries and mutations are plain `POST`s. Subscriptions use the
/// GraphQL-over-SSE "distinct connections" mode: one streaming `POST` per
/// subscription, `next` events carrying execution results and a final
/// `complete` event.
#[derive(Clone, Debug)]
pub struct GraphqlClient {
    http: HttpClient,
    api_url: Url,
    realtime_url: Url,
}

impl GraphqlClient {
    pub fn new(
        http: HttpClient,
        api_url: &str,
        realtime_url: &str,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            api_url: parse_url(api_url, "api url")?,
            realtime_url: parse_url(realtime_url, "realtime url")?,
        })
    }

    pub async fn execute<V, T>(
        &self,
        operation_name: &str,
        document: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphqlRequest {
            query: document,
            variables,
            operation_name,
        };
        debug!(operation = operation_name, "graphql request");
        let response: GraphqlResponse<T> =
            self.http.post_json(self.api_url.clone(), &body).await?;
        response.into_data()
    }

    /// Open a push feed. Each `next` payload is decoded as `T` and narrowed
    /// with `select`; decoding failures are delivered as errors on the feed
    /// without ending it.
    pub async fn subscribe<V, T, U>(
        &self,
        operation_name: &str,
        document: &str,
        variables: &V,
        select: fn(T) -> Result<U, ClientError>,
    ) -> Result<Subscription<U>, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned + Send + 'static,
        U: Send + 'static,
    {
        let body = GraphqlRequest {
            query: document,
            variables,
            operation_name,
        };
        let response = self
            .http
            .request(Method::POST, self.realtime_url.clone())
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(ClientError::RequestFailed)?;
        let response = check_status(response).await?;
        debug!(operation = operation_name, "subscription established");

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let operation = operation_name.to_string();

        tokio::spawn(async move {
            let mut stream = Box::pin(response.bytes_stream());
            let mut decoder = SseDecoder::default();
            loop {
                let chunk = tokio::select! {
                    _ = cancelled.cancelled() => {
                        debug!(operation = %operation, "subscription cancelled");
                        return;
                    }
                    chunk = stream.next() => chunk,
                };
                let bytes = match chunk {
                    Some(Ok(bytes)) => bytes,
                    Some(Err(e)) => {
                        warn!(operation = %operation, "subscription stream failed: {e}");
                        let _ = tx.send(Err(ClientError::RequestFailed(e))).await;
                        return;
                    }
                    None => {
                        debug!(operation = %operation, "subscription stream ended");
                        return;
                    }
                };
                for event in decoder.push(&bytes) {
                    match event.event.as_str() {
                        "next" => {
                            let item = decode_next(&event.data, select);
                            if tx.send(item).await.is_err() {
                                return;
                            }
                        }
                        "complete" => {
                            debug!(operation = %operation, "subscription completed by server");
                            return;
                        }
                        other => debug!(operation = %operation, "ignoring sse event '{other}'"),
                    }
                }
            }
        });

        Ok(Subscription::with_cancellation(rx, token))
    }
}

fn decode_next<T, U>(
    data: &str,
    select: fn(T) -> Result<U, ClientError>,
) -> Result<U, ClientError>
where
    T: DeserializeOwned,
{
    let response: GraphqlResponse<T> = serde_json::from_str(data)?;
    response.into_data().and_then(select)
}

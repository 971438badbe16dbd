//! Execute GraphQL operations over HTTP

use std::time::Duration;

use futures::stream;
use reqwest::RequestBuilder;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::{
    Client, ClientError, Document, OperationContext, OperationResult, OperationResultSource,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`HttpClient`]
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// The GraphQL endpoint
    pub url: Url,

    /// Headers sent with every operation
    pub headers: HeaderMap,

    /// The default timeout of each request
    pub timeout: Duration,

    /// Bearer token sent in the `Authorization` header
    pub token: Option<SecretString>,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }
}

/// A [`Client`] POSTing operations as JSON to a single GraphQL endpoint
#[derive(Clone, Debug)]
pub struct HttpClient {
    url: Url,
    headers: HeaderMap,
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = config.headers;
        headers.insert(
            HeaderName::from_static("graphql-ops-client-version"),
            HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
        );
        if let Some(token) = config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            url: config.url,
            headers,
            inner,
        })
    }

    fn execute(
        &self,
        document: &Document,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> OperationResultSource {
        let context = context.unwrap_or_default();

        let mut request_body = serde_json::json!({
            "query": document.source(),
            "variables": variables.unwrap_or(Value::Null),
        });
        if let Some(op_name) = document.operation_name() {
            if let Some(obj) = request_body.as_object_mut() {
                obj.insert(
                    "operationName".to_string(),
                    Value::String(op_name.to_string()),
                );
            }
        }

        let mut headers = self.headers.clone();
        headers.extend(context.headers);

        let mut request = self
            .inner
            .post(context.url.unwrap_or_else(|| self.url.clone()))
            .headers(headers)
            .json(&request_body);
        if let Some(timeout) = context.timeout {
            request = request.timeout(timeout);
        }

        // Nothing is sent until the source is polled
        OperationResultSource::from_stream(stream::once(send(request)))
    }
}

impl Client for HttpClient {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    fn query(
        &self,
        document: &Document,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> OperationResultSource {
        self.execute(document, variables, context)
    }

    fn mutation(
        &self,
        document: &Document,
        variables: Option<Value>,
        context: Option<OperationContext>,
    ) -> OperationResultSource {
        self.execute(document, variables, context)
    }
}

async fn send(request: RequestBuilder) -> Result<OperationResult, ClientError> {
    let res = request.send().await?;
    let status = res.status();
    tracing::debug!("graphql response {:?}", res);
    let body = res.text().await?;

    match serde_json::from_str::<OperationResult>(&body) {
        Ok(result) => {
            if !status.is_success() {
                tracing::warn!("GraphQL endpoint responded with {status}");
            }
            Ok(result)
        }
        Err(_) if !status.is_success() => Err(ClientError::Status { status, body }),
        Err(err) => Err(ClientError::Json(err)),
    }
}

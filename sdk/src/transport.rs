//! The network side of the host-does-IO split.
//!
//! `ludiks_core` turns operations into `HttpRequest` values; an
//! `HttpTransport` executes them. Non-2xx statuses come back as data so the
//! core parser can interpret them. Only failures that produce no response at
//! all are errors here.

use async_trait::async_trait;
use ludiks_core::{HttpMethod, HttpRequest, HttpResponse, LudiksError};
use tracing::debug;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LudiksError>;
}

/// `HttpTransport` backed by `reqwest`.
///
/// Timeouts and proxies are configured on the `reqwest::Client` passed to
/// `with_client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, LudiksError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LudiksError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| LudiksError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Execute one request, logging the exchange.
pub(crate) async fn send(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<HttpResponse, LudiksError> {
    let method = request.method.as_str();
    let url = request.url.clone();
    debug!(method, url = %url, "sending Ludiks request");
    let response = transport.execute(request).await?;
    debug!(method, url = %url, status = response.status, "received Ludiks response");
    Ok(response)
}

//! Generic JSON client bound to one base URL and bearer token.
//!
//! Header merge order: JSON content type and bearer token first, then any
//! headers added with `with_header`, which replace defaults of the same name.

use std::sync::Arc;

use ludiks_core::client::parse_json;
use ludiks_core::{HttpMethod, LudiksClient, LudiksError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::transport::{send, HttpTransport, ReqwestTransport};

#[derive(Clone)]
pub struct ApiClient {
    client: LudiksClient,
    headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_transport(base_url, token, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(base_url: &str, token: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: LudiksClient::new(base_url, token),
            headers: Vec::new(),
            transport,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, LudiksError> {
        self.request::<T, ()>(HttpMethod::Get, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, LudiksError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(HttpMethod::Post, path, body).await
    }

    pub async fn delete<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, LudiksError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(HttpMethod::Delete, path, body).await
    }

    async fn request<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, LudiksError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let mut request = self.client.build_json(method, path, body)?;
        for (name, value) in &self.headers {
            request.set_header(name, value);
        }
        let response = send(self.transport.as_ref(), request).await?;
        parse_json(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.client.base_url())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

//! The first-generation Ludiks surface, built on `ApiClient`.
//!
//! These endpoints predate `/api/end-user` and `/api/tracking`. They are kept
//! for servers that still expose them.

use std::sync::Arc;

use ludiks_core::{LudiksError, User, DEFAULT_BASE_URL};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::transport::HttpTransport;

#[derive(Debug, Clone)]
pub struct LegacySdk {
    client: ApiClient,
}

impl LegacySdk {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: ApiClient::new(base_url, api_key),
        }
    }

    pub fn with_transport(
        api_key: &str,
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            client: ApiClient::with_transport(base_url, api_key, transport),
        }
    }

    pub async fn add_user(&self, user: &User) -> Result<(), LudiksError> {
        let _: Value = self.client.post("/api/user", Some(user)).await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), LudiksError> {
        let path = format!("/api/user/{}", urlencoding::encode(user_id));
        let _: Value = self.client.delete::<Value, ()>(&path, None).await?;
        Ok(())
    }

    pub async fn user_logged(&self, user_id: &str) -> Result<(), LudiksError> {
        let body = json!({ "userId": user_id });
        let _: Value = self.client.post("/api/user/logged", Some(&body)).await?;
        Ok(())
    }

    pub async fn user_progression(
        &self,
        user_id: &str,
        circuit_id: &str,
        amount: u32,
    ) -> Result<(), LudiksError> {
        let body = json!({ "userId": user_id, "circuitId": circuit_id, "amount": amount });
        let _: Value = self.client.post("/api/progression", Some(&body)).await?;
        Ok(())
    }

    /// `user_progression` with the default amount of 1.
    pub async fn user_progression_once(
        &self,
        user_id: &str,
        circuit_id: &str,
    ) -> Result<(), LudiksError> {
        self.user_progression(user_id, circuit_id, 1).await
    }
}

//! REST 集合资源客户端
//!
//! `GET/POST {collection}`，`PUT/DELETE {collection}/{id}`，请求与响应体均为 JSON 画像记录。

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::config::ApiConfig;
use crate::error::{Result, StoreError};
use crate::models::profile::Profile;
use crate::storage::repository::{ProfileStore, StoreResult};

/// HTTP 画像存储
#[derive(Clone)]
pub struct HttpProfileStore {
    client: Client,
    collection_url: String,
}

impl HttpProfileStore {
    /// 根据接口配置创建客户端
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            collection_url: config.collection_url(),
        })
    }

    /// 集合资源地址
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    /// 非 2xx 状态视为失败，携带响应体作为原因
    async fn check_status(response: Response) -> std::result::Result<Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response.text().await.unwrap_or_default();
        Err(format!("status {}: {}", status, error_text))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, String> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| format!("failed to decode response: {}", e))
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn list(&self) -> StoreResult<Vec<Profile>> {
        tracing::debug!("GET {}", self.collection_url);

        let result = match self.client.get(&self.collection_url).send().await {
            Ok(response) => Self::decode::<Vec<Profile>>(response).await,
            Err(e) => Err(format!("request failed: {}", e)),
        };

        result.map_err(|reason| {
            tracing::error!("Error fetching profiles: {}", reason);
            StoreError::Fetch { reason }
        })
    }

    async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
        tracing::debug!("POST {} (id={})", self.collection_url, profile.id);

        let result = match self
            .client
            .post(&self.collection_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(profile)
            .send()
            .await
        {
            Ok(response) => Self::decode::<Profile>(response).await,
            Err(e) => Err(format!("request failed: {}", e)),
        };

        result.map_err(|reason| {
            tracing::error!("Error creating profile {}: {}", profile.id, reason);
            StoreError::Create { reason }
        })
    }

    async fn update(&self, profile: &Profile) -> StoreResult<Profile> {
        let url = self.item_url(&profile.id);
        tracing::debug!("PUT {}", url);

        let result = match self
            .client
            .put(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(profile)
            .send()
            .await
        {
            Ok(response) => Self::decode::<Profile>(response).await,
            Err(e) => Err(format!("request failed: {}", e)),
        };

        result.map_err(|reason| {
            tracing::error!("Error updating profile with ID {}: {}", profile.id, reason);
            StoreError::Update {
                id: profile.id.clone(),
                reason,
            }
        })
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);

        let result = match self.client.delete(&url).send().await {
            Ok(response) => Self::check_status(response).await.map(|_| ()),
            Err(e) => Err(format!("request failed: {}", e)),
        };

        result.map_err(|reason| {
            tracing::error!("Error deleting profile with ID {}: {}", id, reason);
            StoreError::Delete {
                id: id.to_string(),
                reason,
            }
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use scrubview_common::{ItemId, MediaSourceId, UserId};
use std::time::Duration;

use super::MediaServer;

const TOKEN_HEADER: &str = "X-Emby-Token";

pub struct JellyfinClient {
    client: Client,
    base_url: String,
    api_key: String,
    user_id: UserId,
}

impl JellyfinClient {
    pub fn new(config: &ServerConfig, user_id: UserId) -> Self {
        Self::with_timeout(&config.url, &config.api_key, user_id, config.timeout())
    }

    pub fn with_timeout(base_url: &str, api_key: &str, user_id: UserId, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> Result<Bytes> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(TOKEN_HEADER, &self.api_key)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", path, status, body.trim());
        }

        response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", path))
    }

    /// Test connectivity to the server
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("/System/Info"))
            .header(TOKEN_HEADER, &self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

pub(crate) fn item_path(user_id: UserId, item_id: ItemId) -> String {
    format!("/Users/{}/Items/{}", user_id, item_id)
}

pub(crate) fn sheet_path(item_id: ItemId, sheet_width: u32, sheet_index: u64) -> String {
    format!("/Videos/{}/Trickplay/{}/{}.jpg", item_id, sheet_width, sheet_index)
}

#[async_trait::async_trait]
impl MediaServer for JellyfinClient {
    async fn item_document(&self, item_id: ItemId) -> Result<Bytes> {
        self.get_bytes(&item_path(self.user_id, item_id), &[]).await
    }

    async fn trickplay_sheet(
        &self,
        item_id: ItemId,
        sheet_width: u32,
        sheet_index: u64,
        media_source_id: &MediaSourceId,
    ) -> Result<Bytes> {
        self.get_bytes(
            &sheet_path(item_id, sheet_width, sheet_index),
            &[("mediaSourceId", media_source_id.as_str())],
        )
        .await
    }
}

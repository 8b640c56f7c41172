use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::domain::SiteSettings;

/// Path the settings are served from; also the cache key.
pub const SETTINGS_PATH: &str = "/api/admin/settings";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Settings endpoint returned status {0}")]
    Status(StatusCode),
    #[error("Invalid settings payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can produce the current settings record.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn fetch_settings(&self) -> Result<SiteSettings, SettingsError>;
}

/// HTTP client for the settings endpoint
#[derive(Clone)]
pub struct SettingsClient {
    client: Client,
    base_url: String,
}

impl SettingsClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        SettingsClient { client, base_url }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SETTINGS_PATH)
    }
}

#[async_trait]
impl SettingsSource for SettingsClient {
    async fn fetch_settings(&self) -> Result<SiteSettings, SettingsError> {
        let response = self.client.get(self.url()).send().await?;

        // Body is ignored on failure.
        if !response.status().is_success() {
            return Err(SettingsError::Status(response.status()));
        }

        // Only the shape is checked; admin write rules do not apply to reads.
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_url_joins_base() {
        let client = SettingsClient::new("http://localhost:3000/".to_string());
        assert_eq!(client.url(), "http://localhost:3000/api/admin/settings");

        let client = SettingsClient::new("https://chidiogara.com".to_string());
        assert_eq!(client.url(), "https://chidiogara.com/api/admin/settings");
    }

    #[tokio::test]
    async fn test_fetch_settings_success() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::to_string(&SiteSettings::default()).unwrap();
        let _mock = server
            .mock("GET", SETTINGS_PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = SettingsClient::new(server.url());
        let settings = client.fetch_settings().await.unwrap();
        assert_eq!(settings, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_fetch_settings_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let body = serde_json::to_string(&SiteSettings::default()).unwrap();
        let _mock = server
            .mock("GET", SETTINGS_PATH)
            .with_status(503)
            .with_body(body)
            .create_async()
            .await;

        let client = SettingsClient::new(server.url());
        let result = client.fetch_settings().await;
        assert!(matches!(
            result,
            Err(SettingsError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn test_fetch_settings_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SETTINGS_PATH)
            .with_status(200)
            .with_body(r#"{"siteName": 42}"#)
            .create_async()
            .await;

        let client = SettingsClient::new(server.url());
        let result = client.fetch_settings().await;
        assert!(matches!(result, Err(SettingsError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_settings_ignores_write_rules() {
        let mut server = mockito::Server::new_async().await;
        let mut settings = SiteSettings::default();
        settings.site_name = String::new();
        settings.contact_email = "not-an-email".to_string();
        let _mock = server
            .mock("GET", SETTINGS_PATH)
            .with_status(200)
            .with_body(serde_json::to_string(&settings).unwrap())
            .create_async()
            .await;

        let client = SettingsClient::new(server.url());
        let fetched = client.fetch_settings().await.unwrap();
        assert!(fetched.validate().is_err());
        assert_eq!(fetched, settings);
    }
}

//! Figma API client for fetching node trees, rendered SVGs and image fills.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::api_types::{FigmaFile, FigmaImageExport, FigmaImageFills, FigmaNodesResponse, ImageFormat};
use crate::config::{FigmaSettings, DEFAULT_FIGMA_BASE_URL};
use crate::FcgError;

/// Export requests are split so the query string stays within API limits.
const MAX_IDS_PER_EXPORT: usize = 50;

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn token(&self) -> &str {
        match self {
            FigmaAuth::PersonalAccessToken(token) | FigmaAuth::OAuthToken(token) => token,
        }
    }

    fn headers(&self) -> Result<HeaderMap, FigmaError> {
        let mut headers = HeaderMap::new();
        match self {
            FigmaAuth::PersonalAccessToken(token) => {
                headers.insert(
                    HeaderName::from_static("x-figma-token"),
                    HeaderValue::from_str(token).map_err(|_| FigmaError::MissingToken)?,
                );
            }
            FigmaAuth::OAuthToken(token) => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", token))
                        .map_err(|_| FigmaError::MissingToken)?,
                );
            }
        }
        Ok(headers)
    }
}

#[derive(Debug, Error)]
pub enum FigmaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Figma API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Missing access token")]
    MissingToken,
    #[error("Node not found: {0}")]
    NodeNotFound(String),
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

pub fn map_figma_error(e: FigmaError) -> FcgError {
    match e {
        FigmaError::Request(req_err) => FcgError::Network(req_err),
        FigmaError::Api { status, message } => FcgError::FigmaApi {
            status: Some(
                reqwest::StatusCode::from_u16(status)
                    .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            ),
            message,
        },
        FigmaError::MissingToken => FcgError::Config(
            "Missing Figma token; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
        ),
        FigmaError::NodeNotFound(id) => FcgError::FigmaApi {
            status: None,
            message: format!("Node not found: {}", id),
        },
        FigmaError::RateLimited(secs) => FcgError::FigmaApi {
            status: Some(reqwest::StatusCode::TOO_MANY_REQUESTS),
            message: format!("Rate limited, retry after {} seconds", secs),
        },
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    client: reqwest::Client,
    base_url: String,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self, FigmaError> {
        Self::with_base_url(auth, DEFAULT_FIGMA_BASE_URL, Duration::from_secs(30))
    }

    pub fn from_settings(auth: FigmaAuth, settings: &FigmaSettings) -> Result<Self, FigmaError> {
        Self::with_base_url(auth, &settings.base_url, settings.timeout)
    }

    pub fn with_base_url(
        auth: FigmaAuth,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FigmaError> {
        if auth.token().is_empty() {
            return Err(FigmaError::MissingToken);
        }

        let client = reqwest::Client::builder()
            .default_headers(auth.headers()?)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_file(&self, file_key: &str) -> Result<FigmaFile, FigmaError> {
        let url = format!("{}/files/{}?geometry=paths", self.base_url, file_key);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    pub async fn get_file_nodes(
        &self,
        file_key: &str,
        node_ids: &[&str],
    ) -> Result<FigmaNodesResponse, FigmaError> {
        let ids = node_ids.join(",");
        let url = format!(
            "{}/files/{}/nodes?ids={}&geometry=paths",
            self.base_url, file_key, ids
        );
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Render URLs for many nodes; nodes Figma could not render are left out.
    pub async fn export_images(
        &self,
        file_key: &str,
        node_ids: &[String],
        format: ImageFormat,
        scale: f32,
    ) -> Result<HashMap<String, String>, FigmaError> {
        let mut urls = HashMap::new();
        for chunk in node_ids.chunks(MAX_IDS_PER_EXPORT) {
            let url = format!(
                "{}/images/{}?ids={}&format={}&scale={}",
                self.base_url,
                file_key,
                chunk.join(","),
                format.as_str(),
                scale
            );
            let response = self.client.get(&url).send().await?;
            let export: FigmaImageExport = self.handle_response(response).await?;
            if let Some(err) = export.err {
                return Err(FigmaError::Api {
                    status: 400,
                    message: err,
                });
            }
            urls.extend(
                export
                    .images
                    .into_iter()
                    .filter_map(|(id, url)| url.map(|u| (id, u))),
            );
        }
        Ok(urls)
    }

    /// Download URLs for every image fill in the file, keyed by `imageRef`.
    pub async fn get_image_fills(
        &self,
        file_key: &str,
    ) -> Result<HashMap<String, String>, FigmaError> {
        let url = format!("{}/files/{}/images", self.base_url, file_key);
        let response = self.client.get(&url).send().await?;
        let fills: FigmaImageFills = self.handle_response(response).await?;
        Ok(fills.meta.images)
    }

    pub async fn download_text(&self, url: &str) -> Result<String, FigmaError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FigmaError::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.text().await?)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FigmaError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(FigmaError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FigmaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn personal_access_token_sets_expected_header() {
        let auth = FigmaAuth::PersonalAccessToken("secret".into());
        let headers = auth.headers().expect("headers");

        assert_eq!(
            headers.get("x-figma-token").and_then(|v| v.to_str().ok()),
            Some("secret")
        );
    }

    #[test]
    fn oauth_token_sets_bearer_auth_header() {
        let auth = FigmaAuth::OAuthToken("oauth_secret".into());
        let headers = auth.headers().expect("headers");

        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(header, Some("Bearer oauth_secret"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let result = FigmaClient::new(FigmaAuth::PersonalAccessToken(String::new()));
        assert!(matches!(result, Err(FigmaError::MissingToken)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = FigmaClient::with_base_url(
            FigmaAuth::PersonalAccessToken("t".into()),
            "https://figma.test/v1/",
            Duration::from_secs(5),
        )
        .expect("client");
        assert_eq!(client.base_url, "https://figma.test/v1");
    }

    #[test]
    fn map_figma_error_covers_missing_token_and_rate_limit() {
        let err = map_figma_error(FigmaError::MissingToken);
        assert!(matches!(err, FcgError::Config(ref msg) if msg.contains("FIGMA_TOKEN")));

        let err = map_figma_error(FigmaError::RateLimited(12));
        match err {
            FcgError::FigmaApi { status, message } => {
                assert_eq!(status, Some(reqwest::StatusCode::TOO_MANY_REQUESTS));
                assert!(message.contains("12"));
            }
            other => panic!("expected FigmaApi, got {other:?}"),
        }
    }

    #[test]
    fn auth_from_env_prefers_figma_token() {
        let _guard = EnvGuard;
        env::set_var("FIGMA_TOKEN", "pat_token");
        env::set_var("FIGMA_OAUTH_TOKEN", "oauth_token");

        let auth = FigmaAuth::from_env().expect("auth from env");
        match auth {
            FigmaAuth::PersonalAccessToken(token) => assert_eq!(token, "pat_token"),
            _ => panic!("expected personal access token"),
        }
    }

    struct EnvGuard;

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            env::remove_var("FIGMA_TOKEN");
            env::remove_var("FIGMA_OAUTH_TOKEN");
        }
    }
}

//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, PageResponse};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};

/// HTTP client trait for making HTTP requests
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue one request; `form` is sent url-encoded when present
    async fn fetch(
        &self,
        method: HttpMethod,
        url: &str,
        form: Option<&[(String, String)]>,
    ) -> Result<PageResponse, HttpError>;
}

/// HTTP Manager holding one cookie session
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    config: HttpConfig,
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {}s",
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub async fn get(&self, url: &str) -> Result<PageResponse, HttpError> {
        self.fetch(HttpMethod::Get, url, None).await
    }

    pub async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<PageResponse, HttpError> {
        self.fetch(HttpMethod::Post, url, Some(form)).await
    }

    /// POST to the persistence reset endpoint; anything but 200 is an error.
    pub async fn reset_database(&self, url: &str) -> Result<(), HttpError> {
        info!("Resetting storefront database via {}", url);
        let response = self.fetch(HttpMethod::Post, url, None).await?;

        if response.status != 200 {
            return Err(HttpError::UnexpectedStatus {
                method: HttpMethod::Post.to_string(),
                url: response.url,
                status: response.status,
                expected: 200,
            });
        }

        info!("Database reset completed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn fetch(
        &self,
        method: HttpMethod,
        url: &str,
        form: Option<&[(String, String)]>,
    ) -> Result<PageResponse, HttpError> {
        let parsed = url::Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!("Building {} request to {}", method, parsed);
        let mut request = self.client.request(reqwest::Method::from(method), parsed);

        if let Some(form) = form {
            debug!("Adding form-encoded body with {} fields", form.len());
            request = request.form(form);
        }

        let started = Instant::now();
        let response = request.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;
        let elapsed = started.elapsed();

        debug!(
            status,
            url = %final_url,
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "HTTP response received"
        );

        Ok(PageResponse {
            method,
            url: final_url,
            status,
            body,
            elapsed,
        })
    }
}

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::model::{ExtendRequest, VolumeFilter, VolumeRecord, VolumeRequest};

/// Volume operations offered by the control plane.
pub trait VolumeApi {
    async fn create_volume(&self, request: &VolumeRequest) -> Result<VolumeRecord, ApiError>;
    async fn get_volume(&self, id: &str) -> Result<VolumeRecord, ApiError>;
    async fn list_volumes(&self, filter: &VolumeFilter) -> Result<Vec<VolumeRecord>, ApiError>;
    async fn delete_volume(&self, id: &str, request: &VolumeRequest) -> Result<(), ApiError>;
    async fn update_volume(
        &self,
        id: &str,
        request: &VolumeRequest,
    ) -> Result<VolumeRecord, ApiError>;
    async fn extend_volume(
        &self,
        id: &str,
        request: &ExtendRequest,
    ) -> Result<VolumeRecord, ApiError>;
}

pub struct Client {
    client: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some((user, password)) = &config.basic_auth {
            let auth = format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)));
            let mut value = reqwest::header::HeaderValue::from_str(&auth)
                .context("Invalid basic auth credentials")?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.volumes_url())
            .with_context(|| format!("Invalid endpoint {}", config.endpoint))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid endpoint {}", config.endpoint);
        }

        Ok(Self { client, base_url })
    }

    /// Appends path segments below the collection URL. Each segment is
    /// percent-escaped, so an id can never reach another resource.
    fn volume_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid endpoint {}", self.base_url)))?
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "control plane responded");

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

impl VolumeApi for Client {
    async fn create_volume(&self, request: &VolumeRequest) -> Result<VolumeRecord, ApiError> {
        debug!(url = %self.base_url, ?request, "creating volume");
        self.send_json(self.client.post(self.base_url.clone()).json(request))
            .await
    }

    async fn get_volume(&self, id: &str) -> Result<VolumeRecord, ApiError> {
        let url = self.volume_url(&[id])?;
        debug!(%url, "fetching volume");
        self.send_json(self.client.get(url)).await
    }

    async fn list_volumes(&self, filter: &VolumeFilter) -> Result<Vec<VolumeRecord>, ApiError> {
        debug!(url = %self.base_url, ?filter, "listing volumes");
        self.send_json(self.client.get(self.base_url.clone()).query(&filter.to_query()))
            .await
    }

    async fn delete_volume(&self, id: &str, request: &VolumeRequest) -> Result<(), ApiError> {
        let url = self.volume_url(&[id])?;
        debug!(%url, ?request, "deleting volume");
        self.send(self.client.delete(url).json(request)).await?;
        Ok(())
    }

    async fn update_volume(
        &self,
        id: &str,
        request: &VolumeRequest,
    ) -> Result<VolumeRecord, ApiError> {
        let url = self.volume_url(&[id])?;
        debug!(%url, ?request, "updating volume");
        self.send_json(self.client.put(url).json(request)).await
    }

    async fn extend_volume(
        &self,
        id: &str,
        request: &ExtendRequest,
    ) -> Result<VolumeRecord, ApiError> {
        let url = self.volume_url(&[id, "resize"])?;
        debug!(%url, ?request, "extending volume");
        self.send_json(self.client.post(url).json(request)).await
    }
}

//! HTTP implementations of the studio backend and the balance service.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::de::DeserializeOwned;
use shared::protocol::{
    AccountResponse, CreateEndpointsRequest, CreateEndpointsResponse, GenerateRustResponse,
    GenerationRequest, RefreshResponse, UploadResponse,
};
use tracing::debug;
use url::Url;

use crate::{BalanceService, ObjectUpload, StudioBackend};

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")
}

/// Makes `join` append to the base path instead of replacing its last segment.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn decode_body<T: DeserializeOwned>(response: reqwest::Response, route: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .with_context(|| format!("failed to read {route} response body"))?;
    debug!("transport: response route={route} status={status} bytes={}", body.len());
    serde_json::from_slice(&body)
        .with_context(|| format!("unparseable {route} response (status {status})"))
}

/// Client for the studio backend.
///
/// HTTP status codes are not consulted: the backend reports its failures as
/// `{"error": ...}` bodies alongside a 500, and those bodies must reach the
/// classifiers intact. Only an unreachable host, a timeout or an unparseable
/// body is an error here.
pub struct HttpStudioBackend {
    http: Client,
    base_url: Url,
}

impl HttpStudioBackend {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: as_directory(base_url),
        })
    }

    fn route(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid backend route '{path}'"))
    }
}

#[async_trait]
impl StudioBackend for HttpStudioBackend {
    async fn generate_rust(&self, request: &GenerationRequest) -> Result<GenerateRustResponse> {
        let response = self
            .http
            .post(self.route("generate-rust")?)
            .json(request)
            .send()
            .await?;
        decode_body(response, "generate-rust").await
    }

    async fn upload_object(&self, upload: ObjectUpload) -> Result<UploadResponse> {
        let part = Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.route("upload-to-cos")?)
            .multipart(form)
            .send()
            .await?;
        decode_body(response, "upload-to-cos").await
    }

    async fn refresh_smart_contracts(&self) -> Result<RefreshResponse> {
        let response = self
            .http
            .post(self.route("refresh-smart-contracts")?)
            .send()
            .await?;
        decode_body(response, "refresh-smart-contracts").await
    }

    async fn create_endpoints(
        &self,
        request: &CreateEndpointsRequest,
    ) -> Result<CreateEndpointsResponse> {
        let response = self
            .http
            .post(self.route("create-endpoints")?)
            .json(request)
            .send()
            .await?;
        decode_body(response, "create-endpoints").await
    }
}

/// Account lookups against a MultiversX-style API (`GET /accounts/{address}`).
pub struct HttpBalanceService {
    http: Client,
    api_url: Url,
}

impl HttpBalanceService {
    pub fn new(api_url: Url, timeout: Duration) -> Result<Self> {
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("balance api url '{api_url}' cannot be a base"));
        }
        Ok(Self {
            http: build_client(timeout)?,
            api_url,
        })
    }

    fn account_url(&self, address: &str) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("balance api url '{}' cannot be a base", self.api_url))?
            .pop_if_empty()
            .push("accounts")
            .push(address);
        Ok(url)
    }
}

#[async_trait]
impl BalanceService for HttpBalanceService {
    async fn query_address(&self, address: &str) -> Result<AccountResponse> {
        let account = self
            .http
            .get(self.account_url(address)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(account)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

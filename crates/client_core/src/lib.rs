use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::protocol::{
    AccountResponse, CreateEndpointsRequest, CreateEndpointsResponse, GenerateRustResponse,
    GenerationRequest, RefreshResponse, UploadResponse,
};
use tracing::{info, warn};
use url::Url;

pub mod balance;
pub mod composer;
pub mod endpoints;
pub mod error;
pub mod ingest;
pub mod latest;
pub mod object_store;
pub mod scaffold;
pub mod template;
pub mod transport;

pub use balance::{AddressEdit, AddressQuery, BalanceBinding, BalanceDisplay, DEFAULT_CURRENCY};
pub use composer::{compose, CodeGenerator, GenerationForm, GenerationResult};
pub use endpoints::{EndpointList, OrderedList};
pub use error::StudioError;
pub use ingest::{FileIngestor, FileReader, SelectedFile, TokioFileReader};
pub use object_store::{ObjectStorage, RefreshOutcome, StorageStatus, UploadOutcome};
pub use scaffold::{generate_scaffold, ContractScaffold, ScaffoldForm};
pub use transport::{HttpBalanceService, HttpStudioBackend};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// File payload for the object-store upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The studio backend: code generation, object storage, catalogue refresh and
/// endpoint submission. Implementations return the decoded body of any
/// response they could parse and an error only for transport-level failures.
#[async_trait]
pub trait StudioBackend: Send + Sync {
    async fn generate_rust(&self, request: &GenerationRequest) -> Result<GenerateRustResponse>;
    async fn upload_object(&self, upload: ObjectUpload) -> Result<UploadResponse>;
    async fn refresh_smart_contracts(&self) -> Result<RefreshResponse>;
    async fn create_endpoints(
        &self,
        request: &CreateEndpointsRequest,
    ) -> Result<CreateEndpointsResponse>;
}

pub struct MissingStudioBackend;

#[async_trait]
impl StudioBackend for MissingStudioBackend {
    async fn generate_rust(&self, _request: &GenerationRequest) -> Result<GenerateRustResponse> {
        Err(anyhow!("studio backend is unavailable"))
    }

    async fn upload_object(&self, upload: ObjectUpload) -> Result<UploadResponse> {
        Err(anyhow!(
            "studio backend is unavailable for upload of {}",
            upload.file_name
        ))
    }

    async fn refresh_smart_contracts(&self) -> Result<RefreshResponse> {
        Err(anyhow!("studio backend is unavailable"))
    }

    async fn create_endpoints(
        &self,
        _request: &CreateEndpointsRequest,
    ) -> Result<CreateEndpointsResponse> {
        Err(anyhow!("studio backend is unavailable"))
    }
}

#[async_trait]
pub trait BalanceService: Send + Sync {
    async fn query_address(&self, address: &str) -> Result<AccountResponse>;
}

pub struct MissingBalanceService;

#[async_trait]
impl BalanceService for MissingBalanceService {
    async fn query_address(&self, address: &str) -> Result<AccountResponse> {
        Err(anyhow!("balance service is unavailable for address {address}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSubmission {
    Accepted,
    Rejected,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub backend_url: Url,
    pub balance_api_url: Url,
    pub currency: String,
    pub request_timeout: Duration,
}

impl ConnectOptions {
    pub fn new(backend_url: Url, balance_api_url: Url) -> Self {
        Self {
            backend_url,
            balance_api_url,
            currency: DEFAULT_CURRENCY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// One studio session: every panel's state plus the collaborators they share.
pub struct StudioClient {
    backend: Arc<dyn StudioBackend>,
    balance: BalanceBinding,
    generator: CodeGenerator,
    storage: ObjectStorage,
    ingestor: FileIngestor,
}

impl StudioClient {
    pub fn new() -> Self {
        Self::new_with_dependencies(
            Arc::new(MissingStudioBackend),
            Arc::new(MissingBalanceService),
            Arc::new(TokioFileReader),
            DEFAULT_CURRENCY,
        )
    }

    pub fn new_with_dependencies(
        backend: Arc<dyn StudioBackend>,
        balance_service: Arc<dyn BalanceService>,
        reader: Arc<dyn FileReader>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            balance: BalanceBinding::new(balance_service, currency),
            generator: CodeGenerator::new(Arc::clone(&backend)),
            storage: ObjectStorage::new(Arc::clone(&backend), Arc::clone(&reader)),
            ingestor: FileIngestor::with_reader(reader),
            backend,
        }
    }

    pub fn connect(options: ConnectOptions) -> Result<Self> {
        let backend = HttpStudioBackend::new(options.backend_url, options.request_timeout)?;
        let balance = HttpBalanceService::new(options.balance_api_url, options.request_timeout)?;
        Ok(Self::new_with_dependencies(
            Arc::new(backend),
            Arc::new(balance),
            Arc::new(TokioFileReader),
            options.currency,
        ))
    }

    pub fn balance(&self) -> &BalanceBinding {
        &self.balance
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    pub fn storage(&self) -> &ObjectStorage {
        &self.storage
    }

    pub fn ingestor(&self) -> &FileIngestor {
        &self.ingestor
    }

    /// Submits `form` with the most recently ingested file attached as the
    /// override source whenever the form does not already carry one.
    pub async fn generate(&self, form: &GenerationForm) -> GenerationResult {
        let form = match (&form.uploaded_source, self.ingestor.held_text()) {
            (None, Some(held)) => form.clone().with_uploaded_source(Some(held)),
            _ => form.clone(),
        };
        self.generator.submit_form(&form).await
    }

    pub async fn submit_endpoints(&self, form: &ScaffoldForm) -> EndpointSubmission {
        let request = form.submission();
        match self.backend.create_endpoints(&request).await {
            Ok(CreateEndpointsResponse { success: true }) => {
                info!("endpoints: accepted count={}", request.endpoints.len());
                EndpointSubmission::Accepted
            }
            Ok(_) => {
                info!("endpoints: rejected count={}", request.endpoints.len());
                EndpointSubmission::Rejected
            }
            Err(err) => {
                warn!("endpoints: transport failure: {err:#}");
                EndpointSubmission::Failed
            }
        }
    }
}

impl Default for StudioClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

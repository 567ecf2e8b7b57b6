//! Generation form snapshot, request composition and result classification.

use std::{collections::BTreeSet, sync::Arc};

use shared::{
    domain::{ContractType, FunctionalRequirement, ShardTarget},
    protocol::{GenerateRustResponse, GenerationRequest},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::{StudioError, GENERATION_TRANSPORT_MESSAGE},
    latest::{Latest, Sequenced},
    StudioBackend,
};

/// Immutable snapshot of the generation form at the moment of submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationForm {
    pub description: String,
    pub contract_type: ContractType,
    pub shard_target: ShardTarget,
    pub functional_requirements: BTreeSet<FunctionalRequirement>,
    pub uploaded_source: Option<String>,
}

impl GenerationForm {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_contract_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = contract_type;
        self
    }

    pub fn with_shard_target(mut self, shard_target: ShardTarget) -> Self {
        self.shard_target = shard_target;
        self
    }

    /// Checkbox semantics: checking adds the tag, unchecking removes it.
    pub fn with_requirement(mut self, requirement: FunctionalRequirement, checked: bool) -> Self {
        if checked {
            self.functional_requirements.insert(requirement);
        } else {
            self.functional_requirements.remove(&requirement);
        }
        self
    }

    pub fn with_uploaded_source(mut self, source: Option<String>) -> Self {
        self.uploaded_source = source;
        self
    }
}

/// Builds the outbound request. Empty fields are forwarded as-is so the
/// backend can apply its own defaults, and both the description and the
/// uploaded source travel together.
pub fn compose(form: &GenerationForm) -> GenerationRequest {
    GenerationRequest {
        description: form.description.clone(),
        contract_type: form.contract_type,
        shard_target: form.shard_target,
        functional_requirements: form.functional_requirements.clone(),
        override_source: form.uploaded_source.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { code: String },
    Failure { message: String },
}

impl GenerationResult {
    pub fn from_error(err: &StudioError) -> Self {
        GenerationResult::Failure {
            message: err.display_message(GENERATION_TRANSPORT_MESSAGE),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

/// `error` is checked before `rustCode`; a body carrying neither is treated
/// like an unparseable one.
pub fn classify_generation(reply: GenerateRustResponse) -> Result<String, StudioError> {
    match reply {
        GenerateRustResponse {
            error: Some(message),
            ..
        } => Err(StudioError::ServiceReported(message)),
        GenerateRustResponse {
            rust_code: Some(code),
            ..
        } => Ok(code),
        _ => {
            warn!("generate: response carried neither error nor rustCode");
            Err(StudioError::Transport)
        }
    }
}

/// Submits generation requests and keeps the latest one's result on display.
pub struct CodeGenerator {
    backend: Arc<dyn StudioBackend>,
    display: Latest<Option<GenerationResult>>,
}

impl CodeGenerator {
    pub fn new(backend: Arc<dyn StudioBackend>) -> Self {
        Self {
            backend,
            display: Latest::new(None),
        }
    }

    /// Each call runs to completion and returns its own result. Only the most
    /// recently started call updates the display.
    pub async fn submit(&self, request: GenerationRequest) -> GenerationResult {
        let sequence = self.display.issue(|_| {});
        info!(
            "generate: submitting sequence={sequence} contract_type={} shard_target={} requirements={}",
            request.contract_type,
            request.shard_target,
            request.functional_requirements.len()
        );

        let outcome = match self.backend.generate_rust(&request).await {
            Ok(reply) => classify_generation(reply),
            Err(err) => {
                warn!("generate: transport failure sequence={sequence}: {err:#}");
                Err(StudioError::Transport)
            }
        };
        let result = match outcome {
            Ok(code) => GenerationResult::Success { code },
            Err(err) => GenerationResult::from_error(&err),
        };

        let shown = result.clone();
        if !self.display.resolve(sequence, |slot| *slot = Some(shown)) {
            debug!("generate: superseded result discarded sequence={sequence}");
        }
        result
    }

    pub async fn submit_form(&self, form: &GenerationForm) -> GenerationResult {
        self.submit(compose(form)).await
    }

    pub fn shown(&self) -> Option<GenerationResult> {
        self.display.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Sequenced<Option<GenerationResult>>> {
        self.display.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/composer_tests.rs"]
mod tests;

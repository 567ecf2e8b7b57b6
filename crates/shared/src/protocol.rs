use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, ContractType, FunctionalRequirement, ShardTarget};

/// Outbound body of `POST /generate-rust`.
///
/// Every field is always present on the wire, empty or not, so the backend can
/// apply its own defaulting. `override_source` travels as `uploadedRustContent`
/// next to `description`; which one wins is decided by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub description: String,
    pub contract_type: ContractType,
    pub shard_target: ShardTarget,
    pub functional_requirements: BTreeSet<FunctionalRequirement>,
    #[serde(rename = "uploadedRustContent")]
    pub override_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRustResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rust_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEndpointsRequest {
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEndpointsResponse {
    #[serde(default)]
    pub success: bool,
}

/// Account record returned by the balance lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub balance: Amount,
}

//! Local contract skeleton generation. Nothing here touches the network.

use shared::protocol::CreateEndpointsRequest;
use tracing::debug;

use crate::{
    endpoints::EndpointList,
    error::{StudioError, MISSING_CONTRACT_NAME_MESSAGE},
    template::{render, Bindings},
};

pub const CONTRACT_TEMPLATE: &str = "#![no_std]

multiversx_sc::imports!();

#[multiversx_sc::contract]
pub trait {CONTRACT_NAME} {
    #[init]
    fn init(&self) {}
{ENDPOINTS}}
";

pub const ENDPOINT_TEMPLATE: &str = "
    #[endpoint]
    fn {ENDPOINT_NAME}(&self) {}
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractScaffold {
    pub name: String,
    pub rendered_source: String,
}

pub fn generate_scaffold(
    contract_name: &str,
    endpoints: &EndpointList,
) -> Result<ContractScaffold, StudioError> {
    let name = contract_name.trim();
    if name.is_empty() {
        return Err(StudioError::validation(MISSING_CONTRACT_NAME_MESSAGE));
    }

    let endpoint_source: String = endpoints
        .named()
        .map(|endpoint| render(ENDPOINT_TEMPLATE, &Bindings::new().with("ENDPOINT_NAME", endpoint)))
        .collect();

    let bindings = Bindings::new()
        .with("CONTRACT_NAME", name)
        .with("ENDPOINTS", endpoint_source);
    let rendered_source = render(CONTRACT_TEMPLATE, &bindings);
    debug!(
        "scaffold: rendered contract={name} endpoints={}",
        endpoints.named().count()
    );

    Ok(ContractScaffold {
        name: name.to_string(),
        rendered_source,
    })
}

/// Contract-name field plus the endpoint rows beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldForm {
    pub contract_name: String,
    endpoints: EndpointList,
}

impl ScaffoldForm {
    pub fn new() -> Self {
        Self {
            contract_name: String::new(),
            endpoints: EndpointList::blank(),
        }
    }

    pub fn endpoints(&self) -> &EndpointList {
        &self.endpoints
    }

    pub fn add_endpoint(&mut self) {
        self.endpoints = self.endpoints.insert_at_end(String::new());
    }

    pub fn set_endpoint(&mut self, index: usize, value: impl Into<String>) -> Result<(), StudioError> {
        self.endpoints = self.endpoints.update(index, value.into())?;
        Ok(())
    }

    pub fn remove_endpoint(&mut self, index: usize) -> Result<(), StudioError> {
        self.endpoints = self.endpoints.remove(index)?;
        Ok(())
    }

    pub fn generate(&self) -> Result<ContractScaffold, StudioError> {
        generate_scaffold(&self.contract_name, &self.endpoints)
    }

    pub fn submission(&self) -> CreateEndpointsRequest {
        CreateEndpointsRequest {
            endpoints: self.endpoints.as_slice().to_vec(),
        }
    }
}

impl Default for ScaffoldForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/scaffold_tests.rs"]
mod tests;

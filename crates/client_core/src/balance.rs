//! Address-driven balance lookups.
//!
//! Every change of the watched address issues a new sequence number. A lookup
//! task is spawned per non-empty address and its response only lands if its
//! sequence is still the newest; a quick typist can have the lookup for "ab"
//! finish after the one for "abcdef", and the older answer must lose.

use std::sync::Arc;

use shared::domain::Balance;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    latest::{Latest, Sequenced},
    BalanceService,
};

pub const DEFAULT_CURRENCY: &str = "EGLD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub address: String,
    pub sequence: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceDisplay {
    pub address: String,
    pub balance: Option<Balance>,
    /// A lookup for `address` is outstanding. The previous balance stays
    /// visible meanwhile.
    pub pending: bool,
}

impl BalanceDisplay {
    pub fn text(&self) -> String {
        self.balance
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct AddressEdit {
    pub query: AddressQuery,
    /// Handle of the spawned lookup; `None` for an empty address or when no
    /// runtime was available.
    pub lookup: Option<JoinHandle<()>>,
}

pub struct BalanceBinding {
    service: Arc<dyn BalanceService>,
    currency: String,
    display: Latest<BalanceDisplay>,
    runtime: Option<Handle>,
}

impl BalanceBinding {
    /// Lookups run on the runtime current at construction, if any. Use
    /// [`BalanceBinding::with_runtime`] when building the binding elsewhere.
    pub fn new(service: Arc<dyn BalanceService>, currency: impl Into<String>) -> Self {
        Self {
            service,
            currency: currency.into(),
            display: Latest::new(BalanceDisplay::default()),
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Feeds a new value of the address field. Returns `None` when the value
    /// did not change. An empty address clears the balance before returning;
    /// a non-empty one spawns a lookup. Callable from any thread: without a
    /// runtime to spawn on, the lookup is treated as failed.
    pub fn set_address(&self, address: impl Into<String>) -> Option<AddressEdit> {
        let address = address.into();
        if self.display.inspect(|display| display.address == address) {
            return None;
        }

        let cleared = address.is_empty();
        let sequence = self.display.issue(|display| {
            display.address = address.clone();
            display.pending = !cleared;
            if cleared {
                display.balance = None;
            }
        });
        let query = AddressQuery { address, sequence };

        if cleared {
            debug!("balance: cleared sequence={sequence}");
            return Some(AddressEdit {
                query,
                lookup: None,
            });
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!(
                "balance: no tokio runtime for lookup address={} sequence={sequence}",
                query.address
            );
            self.display.resolve(sequence, |display| {
                display.balance = None;
                display.pending = false;
            });
            return Some(AddressEdit {
                query,
                lookup: None,
            });
        };

        let lookup = runtime.spawn(run_lookup(
            Arc::clone(&self.service),
            self.display.clone(),
            self.currency.clone(),
            query.clone(),
        ));
        Some(AddressEdit {
            query,
            lookup: Some(lookup),
        })
    }

    pub fn display(&self) -> BalanceDisplay {
        self.display.snapshot()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.display.sequence()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn subscribe(&self) -> watch::Receiver<Sequenced<BalanceDisplay>> {
        self.display.subscribe()
    }
}

async fn run_lookup(
    service: Arc<dyn BalanceService>,
    display: Latest<BalanceDisplay>,
    currency: String,
    query: AddressQuery,
) {
    let balance = match service.query_address(&query.address).await {
        Ok(account) => Some(Balance::new(account.balance, currency)),
        Err(err) => {
            warn!(
                "balance: lookup failed address={} sequence={}: {err:#}",
                query.address, query.sequence
            );
            None
        }
    };

    let found = balance.is_some();
    let landed = display.resolve(query.sequence, |display| {
        display.balance = balance;
        display.pending = false;
    });
    if landed {
        info!(
            "balance: applied address={} sequence={} found={found}",
            query.address, query.sequence
        );
    } else {
        debug!(
            "balance: stale lookup discarded address={} sequence={}",
            query.address, query.sequence
        );
    }
}

#[cfg(test)]
#[path = "tests/balance_tests.rs"]
mod tests;

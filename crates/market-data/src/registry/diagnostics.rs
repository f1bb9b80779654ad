//! Per-request provider attempt tracking.

use serde::Serialize;

use crate::errors::MarketDataError;
use crate::models::ProviderId;
use crate::provider::Operation;

/// Why a provider was not called.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    /// Provider does not serve this operation.
    OperationNotSupported { operation: Operation },

    /// An earlier provider failed and the fallback policy is fail-fast.
    FailFast,
}

/// Outcome of one provider in the chain.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AttemptOutcome {
    Skipped { skip: SkipReason },
    Failed { error: MarketDataError },
    Succeeded,
}

/// Record of a single provider attempt during a fetch.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
    pub provider_id: ProviderId,
    /// Symbol sent to the provider; absent for skipped providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_symbol: Option<String>,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Every provider the chain considered, in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self, provider_id: ProviderId, reason: SkipReason) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            provider_symbol: None,
            outcome: AttemptOutcome::Skipped { skip: reason },
        });
    }

    pub fn record_error(
        &mut self,
        provider_id: ProviderId,
        provider_symbol: String,
        error: MarketDataError,
    ) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            provider_symbol: Some(provider_symbol),
            outcome: AttemptOutcome::Failed { error },
        });
    }

    pub fn record_success(&mut self, provider_id: ProviderId, provider_symbol: String) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            provider_symbol: Some(provider_symbol),
            outcome: AttemptOutcome::Succeeded,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Succeeded => format!("{}: SUCCESS", a.provider_id),
                AttemptOutcome::Skipped { skip } => {
                    format!("{}: SKIPPED ({:?})", a.provider_id, skip)
                }
                AttemptOutcome::Failed { error } => format!("{}: ERROR ({})", a.provider_id, error),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any provider succeeded.
    pub fn has_success(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.outcome == AttemptOutcome::Succeeded)
    }

    /// The provider whose record was returned.
    pub fn succeeded_provider(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.outcome == AttemptOutcome::Succeeded)
            .map(|a| a.provider_id.as_ref())
    }

    /// Get all errors.
    pub fn errors(&self) -> Vec<(&ProviderId, &MarketDataError)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failed { error } => Some((&a.provider_id, error)),
                _ => None,
            })
            .collect()
    }
}

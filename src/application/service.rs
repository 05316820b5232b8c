use crate::domain::charge::{ChargeRequest, ChargeResult, HealthStatus, Mode};
use crate::domain::ports::ProviderBox;
use crate::error::{PixError, Result};
use chrono::Utc;
use tracing::{info, warn};

/// The main entry point for charge creation.
///
/// `PixService` owns an ordered list of charge providers and applies the
/// fallback policy: providers are tried strictly one at a time, the first
/// success wins, and a provider's failure never affects the next attempt.
/// Retry of an individual provider is the provider's own concern.
pub struct PixService {
    providers: Vec<ProviderBox>,
    mode: Mode,
}

impl PixService {
    pub fn new(providers: Vec<ProviderBox>, mode: Mode) -> Self {
        Self { providers, mode }
    }

    /// Creates a charge through the first provider that succeeds.
    ///
    /// Fails with [`PixError::AllProvidersFailed`] carrying the last
    /// provider's error message once the list is exhausted.
    pub async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeResult> {
        let mut last_error: Option<PixError> = None;

        for provider in &self.providers {
            match provider.create_charge(request).await {
                Ok(result) => {
                    info!(provider = provider.name(), txid = %result.transaction_id, "charge created");
                    return Ok(result);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(PixError::AllProvidersFailed {
            last: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no providers configured".to_string()),
        })
    }

    /// Liveness report for the hosting boundary. Always succeeds.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            mode: self.mode,
            providers: self.providers.iter().map(|p| p.name().to_string()).collect(),
            timestamp: Utc::now(),
        }
    }
}

use super::charge::{ChargeRequest, ChargeResult};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A charge-creation backend.
///
/// Implementations either build the BR Code locally or register the charge
/// with a payment API and embed the provider-issued code. The orchestrator
/// tries providers in order and keeps the first success.
#[async_trait]
pub trait ChargeProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeResult>;
}

/// Renders a finished payload string into a QR image.
///
/// Rendering is independent of payload construction; a failure here must not
/// discard the payload text.
#[async_trait]
pub trait QrRenderer: Send + Sync {
    /// Returns a PNG data URL for the given payload.
    async fn render(&self, payload: &str) -> Result<String>;
}

pub type ProviderBox = Box<dyn ChargeProvider>;
pub type RendererArc = Arc<dyn QrRenderer>;

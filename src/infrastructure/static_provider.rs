use crate::domain::charge::{ChargeRequest, ChargeResult};
use crate::domain::normalize::{normalize, truncate};
use crate::domain::payload::{MAX_NAME_LEN, build_payload};
use crate::domain::ports::{ChargeProvider, RendererArc};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::warn;

/// How long a statically generated code is advertised as valid. The payload
/// itself is reusable; this is informational for the caller.
const STATIC_EXPIRY_DAYS: i64 = 30;

/// Charge provider backed by the local BR Code codec.
///
/// Needs no credentials and no network: the payload is built in-process and
/// only the QR rasterization is delegated. Always configured last so a remote
/// provider outage degrades to a static code instead of a failure.
pub struct StaticPixProvider {
    renderer: RendererArc,
}

impl StaticPixProvider {
    pub fn new(renderer: RendererArc) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl ChargeProvider for StaticPixProvider {
    fn name(&self) -> &str {
        "static-pix"
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeResult> {
        let payload = build_payload(request)?;

        // A failed render is not a failed charge; the text payload alone is
        // a usable copy-and-paste code.
        let qr_image = match self.renderer.render(&payload).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "QR render failed, returning payload without image");
                None
            }
        };

        let now = Utc::now();
        Ok(ChargeResult {
            transaction_id: format!("static-{}", now.timestamp_millis()),
            amount: request.amount.value(),
            recipient_name: truncate(&normalize(&request.recipient_name), MAX_NAME_LEN).to_string(),
            description: request
                .description
                .as_deref()
                .map(normalize)
                .unwrap_or_default(),
            payload_text: payload,
            qr_image,
            expires_at: now + Duration::days(STATIC_EXPIRY_DAYS),
            provider: self.name().to_string(),
        })
    }
}

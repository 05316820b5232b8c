use crate::domain::charge::{ChargeRequest, ChargeResult};
use crate::domain::ports::{ChargeProvider, RendererArc};
use crate::error::{PixError, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use reqwest::header::AUTHORIZATION;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const PROVIDER_NAME: &str = "efi";
const SANDBOX_BASE_URL: &str = "https://pix-h.api.efipay.com.br";
const PRODUCTION_BASE_URL: &str = "https://pix.api.efipay.com.br";
const SANDBOX_PIX_KEY: &str = "testepix@efipay.com.br";

/// Charge expiry requested from the API, in seconds.
const CHARGE_EXPIRY_SECS: i64 = 3600;

/// Credentials and routing for the Efí (Gerencianet) Pix API.
#[derive(Debug, Clone)]
pub struct EfiConfig {
    pub client_id: String,
    pub client_secret: String,
    /// The merchant's receiving key registered with Efí.
    pub pix_key: String,
    pub sandbox: bool,
}

impl EfiConfig {
    /// Reads the provider configuration from `EFI_CLIENT_ID`,
    /// `EFI_CLIENT_SECRET`, `EFI_PIX_KEY` and `EFI_SANDBOX`.
    ///
    /// Returns `None` when credentials are absent, which disables the remote
    /// provider rather than failing the static path. In sandbox mode a
    /// missing key falls back to Efí's shared test key.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("EFI_CLIENT_ID").ok()?;
        let client_secret = std::env::var("EFI_CLIENT_SECRET").ok()?;
        let sandbox = std::env::var("EFI_SANDBOX").map(|v| v == "true").unwrap_or(false);
        let pix_key = match std::env::var("EFI_PIX_KEY") {
            Ok(key) => key,
            Err(_) if sandbox => SANDBOX_PIX_KEY.to_string(),
            Err(_) => return None,
        };

        Some(Self {
            client_id,
            client_secret,
            pix_key,
            sandbox,
        })
    }
}

/// Cached OAuth credential. `Valid` is only trusted while `until` is in the
/// future; an elapsed deadline reads as expired.
enum TokenState {
    Absent,
    Valid { token: String, until: DateTime<Utc> },
}

impl TokenState {
    fn usable(&self, now: DateTime<Utc>) -> Option<&str> {
        match self {
            TokenState::Valid { token, until } if now < *until => Some(token),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Serialize)]
struct CobRequest {
    calendario: Calendario,
    devedor: Devedor,
    valor: Valor,
    chave: String,
    #[serde(rename = "solicitacaoPagador")]
    solicitacao_pagador: String,
}

#[derive(Serialize)]
struct Calendario {
    expiracao: i64,
}

#[derive(Serialize)]
struct Devedor {
    nome: String,
}

#[derive(Serialize, Deserialize)]
struct Valor {
    original: String,
}

#[derive(Deserialize)]
struct CobResponse {
    txid: String,
    valor: Valor,
    #[serde(rename = "pixCopiaECola")]
    pix_copia_e_cola: String,
}

/// Charge provider backed by the Efí Pix API.
///
/// Registers the charge remotely and embeds the provider-issued
/// copy-and-paste code verbatim; the local codec is bypassed on this path.
/// Holds a cached OAuth token behind a mutex: the lock is kept across a
/// refresh, so concurrent charges never trigger duplicate token exchanges.
pub struct EfiProvider {
    config: EfiConfig,
    base_url: String,
    http: reqwest::Client,
    token: Mutex<TokenState>,
    renderer: RendererArc,
}

impl EfiProvider {
    pub fn new(config: EfiConfig, renderer: RendererArc) -> Result<Self> {
        let base_url = if config.sandbox {
            SANDBOX_BASE_URL
        } else {
            PRODUCTION_BASE_URL
        };
        Self::with_base_url(config, base_url, renderer)
    }

    /// Like [`EfiProvider::new`] with an explicit API endpoint. Tests point
    /// this at a local mock server.
    pub fn with_base_url(
        config: EfiConfig,
        base_url: impl Into<String>,
        renderer: RendererArc,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(30))
            .build()
            .map_err(|e| provider_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            base_url: base_url.into(),
            http,
            token: Mutex::new(TokenState::Absent),
            renderer,
        })
    }

    /// Returns a bearer token, exchanging credentials only when the cached
    /// one is absent or past its deadline.
    ///
    /// The deadline is set at 90% of the declared lifetime so a token is
    /// never used right at its edge.
    async fn access_token(&self) -> Result<String> {
        let mut state = self.token.lock().await;

        if let Some(token) = state.usable(Utc::now()) {
            return Ok(token.to_string());
        }

        debug!("exchanging credentials for a new access token");
        let credentials = STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .header(AUTHORIZATION, format!("Basic {credentials}"))
            .json(&serde_json::json!({ "grant_type": "client_credentials" }))
            .send()
            .await
            .map_err(|e| provider_error(format!("token exchange failed: {e}")))?;

        if !response.status().is_success() {
            let message = remote_error_message(response).await;
            return Err(provider_error(format!("token exchange failed: {message}")));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("malformed token response: {e}")))?;

        let until = Utc::now() + Duration::milliseconds(body.expires_in * 900);
        let token = body.access_token.clone();
        *state = TokenState::Valid {
            token: body.access_token,
            until,
        };

        Ok(token)
    }
}

#[async_trait]
impl ChargeProvider for EfiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_charge(&self, request: &ChargeRequest) -> Result<ChargeResult> {
        let token = self.access_token().await?;
        let txid = generate_txid();

        let description = request
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "Pix payment".to_string());

        let body = CobRequest {
            calendario: Calendario {
                expiracao: CHARGE_EXPIRY_SECS,
            },
            devedor: Devedor {
                nome: request.recipient_name.clone(),
            },
            valor: Valor {
                original: request.amount.to_payload(),
            },
            chave: self.config.pix_key.clone(),
            solicitacao_pagador: description.clone(),
        };

        let response = self
            .http
            .put(format!("{}/v2/cob/{txid}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_error(format!("charge registration failed: {e}")))?;

        if !response.status().is_success() {
            let message = remote_error_message(response).await;
            return Err(provider_error(format!("charge registration failed: {message}")));
        }

        let cob: CobResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("malformed charge response: {e}")))?;

        let qr_image = match self.renderer.render(&cob.pix_copia_e_cola).await {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(error = %e, "QR render failed, returning payload without image");
                None
            }
        };

        let amount = cob
            .valor
            .original
            .parse::<Decimal>()
            .unwrap_or_else(|_| request.amount.value());

        Ok(ChargeResult {
            transaction_id: cob.txid,
            amount,
            recipient_name: request.recipient_name.clone(),
            description,
            payload_text: cob.pix_copia_e_cola,
            qr_image,
            expires_at: Utc::now() + Duration::seconds(CHARGE_EXPIRY_SECS),
            provider: PROVIDER_NAME.to_string(),
        })
    }
}

fn provider_error(message: impl Into<String>) -> PixError {
    PixError::Provider {
        provider: PROVIDER_NAME.to_string(),
        message: message.into(),
    }
}

/// Pulls the most useful message out of an error response body. Efí reports
/// OAuth problems under `error_description` and charge problems under
/// `message`.
async fn remote_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error_description")
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}: {body}")),
        Err(_) => format!("HTTP {status}"),
    }
}

const TXID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Transaction identifier for the charge-registration endpoint: 32 characters
/// from a 62-character alphanumeric alphabet, fresh per attempt.
fn generate_txid() -> String {
    let mut rng = rand::rng();
    (0..32)
        .map(|_| TXID_ALPHABET[rng.random_range(0..TXID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txid_shape() {
        let txid = generate_txid();
        assert_eq!(txid.len(), 32);
        assert!(txid.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_txids_are_unique_per_attempt() {
        assert_ne!(generate_txid(), generate_txid());
    }

    #[test]
    fn test_token_state_expiry() {
        let now = Utc::now();
        let valid = TokenState::Valid {
            token: "t".to_string(),
            until: now + Duration::seconds(60),
        };
        assert_eq!(valid.usable(now), Some("t"));
        assert!(valid.usable(now + Duration::seconds(61)).is_none());
        assert!(TokenState::Absent.usable(now).is_none());
    }
}

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixError {
    #[error("invalid Pix key: {0:?}")]
    InvalidKey(String),
    #[error("amount must be between 0.01 and 999999.99, got {0}")]
    InvalidAmount(Decimal),
    #[error("payload field {tag} exceeds the 99-byte TLV limit")]
    FieldOverflow { tag: &'static str },
    #[error("QR render failed: {0}")]
    Render(String),
    #[error("provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
    #[error("all providers failed, last error: {last}")]
    AllProvidersFailed { last: String },
}

pub type Result<T> = std::result::Result<T, PixError>;

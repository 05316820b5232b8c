use crate::error::PixError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A transaction amount in BRL.
///
/// Wrapper around `rust_decimal::Decimal` enforcing the BR Code range:
/// strictly positive, at most 999999.99. Construction is the validation:
/// an out-of-range amount is unrepresentable downstream.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
#[serde(into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const MAX: Decimal = dec!(999999.99);

    pub fn new(value: Decimal) -> Result<Self, PixError> {
        if value > Decimal::ZERO && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(PixError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Renders the amount the way the payload's tag 54 expects it: two
    /// decimal digits, period separator, no grouping.
    pub fn to_payload(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PixError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// A request to create a Pix charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    /// The receiving Pix key, in any of the five registered shapes.
    pub payment_key: String,
    pub amount: Amount,
    /// Recipient (merchant) name; normalized and capped at 25 characters in
    /// the payload.
    pub recipient_name: String,
    /// Recipient city; normalized and capped at 15 characters in the payload.
    pub recipient_city: String,
    /// Optional free-text note, capped at 25 characters in the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The canonical outcome of a successful charge creation.
///
/// Created once per request and never persisted. `qr_image` is `None` when
/// rendering failed; the payload text is still valid and scannable apps can
/// consume it as copy-and-paste.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    pub transaction_id: String,
    pub amount: Decimal,
    pub recipient_name: String,
    pub description: String,
    /// The full BR Code text ("Pix copia e cola").
    pub payload_text: String,
    /// PNG data URL of the rendered QR code, when rendering succeeded.
    pub qr_image: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub provider: String,
}

/// Which charge path the service is wired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local codec only, no API credentials involved.
    Static,
    Sandbox,
    Production,
}

/// Fixed-shape liveness report for the hosting boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub mode: Mode,
    pub providers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_range() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(Amount::new(dec!(999999.99)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0)),
            Err(PixError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-10.00)),
            Err(PixError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(1000000.00)),
            Err(PixError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_amount_payload_formatting() {
        assert_eq!(Amount::new(dec!(15.5)).unwrap().to_payload(), "15.50");
        assert_eq!(Amount::new(dec!(100)).unwrap().to_payload(), "100.00");
        assert_eq!(Amount::new(dec!(0.015)).unwrap().to_payload(), "0.02");
    }

    #[test]
    fn test_amount_deserialization_validates() {
        let ok: Amount = serde_json::from_str("25.90").unwrap();
        assert_eq!(ok.value(), dec!(25.90));

        assert!(serde_json::from_str::<Amount>("0").is_err());
        assert!(serde_json::from_str::<Amount>("1000000").is_err());
    }

    #[test]
    fn test_charge_request_wire_names() {
        let json = r#"{
            "paymentKey": "a@b.co",
            "amount": 10.00,
            "recipientName": "Maria",
            "recipientCity": "Recife"
        }"#;
        let req: ChargeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.payment_key, "a@b.co");
        assert!(req.description.is_none());
    }
}

use crate::error::{PixError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Longest key the receiving-account TLV slot can carry. With the fixed
/// `BR.GOV.BCB.PIX` domain identifier alongside it, a 77-byte key fills the
/// nested block to exactly 99 bytes, the TLV maximum.
pub const MAX_KEY_LEN: usize = 77;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+55\d{10,11}$").expect("invalid phone regex"));
static CPF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{11}$").expect("invalid CPF regex"));
static CNPJ_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{14}$").expect("invalid CNPJ regex"));
static RANDOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("invalid random-key regex")
});

/// The shapes of payment key the Pix directory recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Email,
    Phone,
    Cpf,
    Cnpj,
    Random,
}

/// A payment key that passed classification.
///
/// Classification tries the five recognized shapes in a fixed order, first
/// match wins: email, phone (`+55` prefix), CPF, CNPJ, random (UUID). The raw
/// string is preserved untouched; it goes into the payload verbatim, without
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixKey {
    raw: String,
    kind: KeyKind,
}

impl PixKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let kind = classify(raw).ok_or_else(|| PixError::InvalidKey(raw.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }
}

fn classify(raw: &str) -> Option<KeyKind> {
    if raw.len() > MAX_KEY_LEN {
        return None;
    }

    if raw.contains('@') && raw.contains('.') {
        return EMAIL_RE.is_match(raw).then_some(KeyKind::Email);
    }
    if raw.starts_with("+55") {
        return PHONE_RE.is_match(raw).then_some(KeyKind::Phone);
    }
    if CPF_RE.is_match(raw) {
        return Some(KeyKind::Cpf);
    }
    if CNPJ_RE.is_match(raw) {
        return Some(KeyKind::Cnpj);
    }
    if RANDOM_RE.is_match(raw) {
        return Some(KeyKind::Random);
    }

    None
}

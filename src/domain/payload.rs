use super::charge::ChargeRequest;
use super::crc::checksum;
use super::key::PixKey;
use super::normalize::{normalize, truncate};
use crate::error::{PixError, Result};

/// Byte caps for the free-text slots, applied after normalization.
pub const MAX_NAME_LEN: usize = 25;
pub const MAX_CITY_LEN: usize = 15;
pub const MAX_DESCRIPTION_LEN: usize = 25;

mod tag {
    pub const FORMAT_INDICATOR: &str = "00";
    pub const POI_METHOD: &str = "01";
    pub const MERCHANT_ACCOUNT: &str = "26";
    pub const MERCHANT_CATEGORY: &str = "52";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const MERCHANT_NAME: &str = "59";
    pub const MERCHANT_CITY: &str = "60";
    pub const ADDITIONAL_DATA: &str = "62";
    pub const CRC: &str = "63";

    // Sub-tags inside the nested templates.
    pub const ACCOUNT_GUI: &str = "00";
    pub const ACCOUNT_KEY: &str = "01";
    pub const DATA_DESCRIPTION: &str = "05";
}

const FORMAT_V1: &str = "01";
const POI_STATIC: &str = "12";
const PIX_GUI: &str = "BR.GOV.BCB.PIX";
const MCC_GENERIC: &str = "0000";
const CURRENCY_BRL: &str = "986";
const COUNTRY_BR: &str = "BR";
const CRC_LEN: &str = "04";

/// Emits one TLV field: tag, zero-padded two-digit byte length, value.
///
/// A value over 99 bytes cannot be represented in this format; the key-length
/// cap keeps every field below that in practice, but an overflow is still a
/// typed error rather than a truncation.
fn tlv(tag: &'static str, value: &str) -> Result<String> {
    if value.len() > 99 {
        return Err(PixError::FieldOverflow { tag });
    }
    Ok(format!("{tag}{:02}{value}", value.len()))
}

/// Builds the complete static BR Code payload for a charge request.
///
/// Validates the key before any TLV construction, normalizes and truncates
/// the free-text fields, emits the fields in the order consuming scanners
/// expect, and appends the CRC trailer. The checksum covers the payload text
/// plus the trailer's own tag and length. Pure: identical requests produce
/// byte-identical payloads.
pub fn build_payload(request: &ChargeRequest) -> Result<String> {
    let key = PixKey::parse(&request.payment_key)?;

    let name = normalize(&request.recipient_name);
    let city = normalize(&request.recipient_city);

    let mut payload = String::new();
    payload.push_str(&tlv(tag::FORMAT_INDICATOR, FORMAT_V1)?);
    payload.push_str(&tlv(tag::POI_METHOD, POI_STATIC)?);

    let account = format!(
        "{}{}",
        tlv(tag::ACCOUNT_GUI, PIX_GUI)?,
        tlv(tag::ACCOUNT_KEY, key.as_str())?
    );
    payload.push_str(&tlv(tag::MERCHANT_ACCOUNT, &account)?);

    payload.push_str(&tlv(tag::MERCHANT_CATEGORY, MCC_GENERIC)?);
    payload.push_str(&tlv(tag::CURRENCY, CURRENCY_BRL)?);
    payload.push_str(&tlv(tag::AMOUNT, &request.amount.to_payload())?);
    payload.push_str(&tlv(tag::COUNTRY, COUNTRY_BR)?);
    payload.push_str(&tlv(tag::MERCHANT_NAME, truncate(&name, MAX_NAME_LEN))?);
    payload.push_str(&tlv(tag::MERCHANT_CITY, truncate(&city, MAX_CITY_LEN))?);

    // The whole template is omitted when no description was supplied, never
    // emitted empty.
    if let Some(description) = request.description.as_deref()
        && !description.is_empty()
    {
        let description = normalize(description);
        let data = tlv(tag::DATA_DESCRIPTION, truncate(&description, MAX_DESCRIPTION_LEN))?;
        payload.push_str(&tlv(tag::ADDITIONAL_DATA, &data)?);
    }

    // The trailer's tag and length take part in their own checksum.
    payload.push_str(tag::CRC);
    payload.push_str(CRC_LEN);
    let crc = checksum(&payload);
    payload.push_str(&crc);

    Ok(payload)
}

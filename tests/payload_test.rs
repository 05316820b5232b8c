use pix_brcode::domain::charge::{Amount, ChargeRequest};
use pix_brcode::domain::crc::checksum;
use pix_brcode::domain::key::{KeyKind, PixKey};
use pix_brcode::domain::normalize::normalize;
use pix_brcode::domain::payload::build_payload;
use pix_brcode::error::PixError;
use rust_decimal_macros::dec;

fn request(key: &str, description: Option<&str>) -> ChargeRequest {
    ChargeRequest {
        payment_key: key.to_string(),
        amount: Amount::new(dec!(15.50)).unwrap(),
        recipient_name: "Fulano de Tal".to_string(),
        recipient_city: "Sao Paulo".to_string(),
        description: description.map(str::to_string),
    }
}

#[test]
fn test_payload_envelope_for_every_key_shape() {
    let keys = [
        "a@b.co",
        "+5511999999999",
        "12345678901",
        "12345678000195",
        "123e4567-e89b-12d3-a456-426614174000",
    ];

    for key in keys {
        let payload = build_payload(&request(key, None)).unwrap();
        assert!(payload.starts_with("000201"), "payload for {key}");

        let (body, crc) = payload.split_at(payload.len() - 4);
        assert!(body.ends_with("6304"));
        assert_eq!(crc.len(), 4);
        assert!(crc.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_eq!(checksum(body), crc);
    }
}

#[test]
fn test_payload_is_pure() {
    let req = request("a@b.co", Some("Almoço"));
    let first = build_payload(&req).unwrap();
    for _ in 0..10 {
        assert_eq!(build_payload(&req).unwrap(), first);
    }
}

#[test]
fn test_truncation_law() {
    let mut req = request("12345678901", None);
    req.recipient_name = "N".repeat(73);

    let payload = build_payload(&req).unwrap();
    let normalized = normalize(&req.recipient_name);
    let expected: String = normalized.chars().take(25).collect();
    assert_eq!(expected.len(), 25);
    assert!(payload.contains(&format!("5925{expected}")));
}

#[test]
fn test_additional_data_block_rules() {
    // Without a description the city field runs straight into the CRC
    // trailer; no tag-62 template in between.
    let without = build_payload(&request("a@b.co", None)).unwrap();
    assert!(without.contains("6009Sao Paulo6304"));

    let with = build_payload(&request("a@b.co", Some("Coffee"))).unwrap();
    assert_eq!(with.matches("62100506Coffee").count(), 1);
}

#[test]
fn test_normalization_example_from_the_manual() {
    assert_eq!(normalize("Café & açúcar - R$ 15,50"), "Cafe acucar - R 15,50");
}

#[test]
fn test_key_classification_table() {
    assert_eq!(PixKey::parse("a@b.co").unwrap().kind(), KeyKind::Email);
    assert_eq!(PixKey::parse("+5511999999999").unwrap().kind(), KeyKind::Phone);
    assert_eq!(PixKey::parse("12345678901").unwrap().kind(), KeyKind::Cpf);
    assert!(PixKey::parse("bad-key").is_err());
}

#[test]
fn test_invalid_inputs_produce_no_partial_payload() {
    let err = build_payload(&request("bad-key", Some("desc"))).unwrap_err();
    assert!(matches!(err, PixError::InvalidKey(_)));

    assert!(matches!(
        Amount::new(dec!(0.00)),
        Err(PixError::InvalidAmount(_))
    ));
    assert!(matches!(
        Amount::new(dec!(1000000)),
        Err(PixError::InvalidAmount(_))
    ));
}

#[test]
fn test_checksum_determinism_and_sensitivity() {
    let payload = build_payload(&request("a@b.co", None)).unwrap();
    assert_eq!(checksum(&payload), checksum(&payload));

    let mut corrupted = payload.clone();
    corrupted.replace_range(6..7, if &payload[6..7] == "0" { "1" } else { "0" });
    assert_ne!(checksum(&payload), checksum(&corrupted));
}

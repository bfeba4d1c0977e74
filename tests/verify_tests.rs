#![cfg(test)]

mod common;

use dispair::verify::SignatureVerifier;
use dispair::DispairError;

#[test]
fn test_valid_signature() {
    let verifier = SignatureVerifier::from_hex(&common::public_key_hex()).unwrap();
    let body = r#"{"type":1}"#;
    let signature = common::sign(common::TIMESTAMP, body);

    assert!(verifier
        .verify(common::TIMESTAMP, body.as_bytes(), &signature)
        .is_ok());
}

#[test]
fn test_timestamp_is_part_of_the_message() {
    let verifier = SignatureVerifier::from_hex(&common::public_key_hex()).unwrap();
    let body = r#"{"type":1}"#;
    let signature = common::sign(common::TIMESTAMP, body);

    assert!(matches!(
        verifier.verify("1700000001", body.as_bytes(), &signature),
        Err(DispairError::InvalidSignature)
    ));
}

#[test]
fn test_tampered_body() {
    let verifier = SignatureVerifier::from_hex(&common::public_key_hex()).unwrap();
    let signature = common::sign(common::TIMESTAMP, r#"{"type":1}"#);

    assert!(verifier
        .verify(common::TIMESTAMP, br#"{"type":2}"#, &signature)
        .is_err());
}

#[test]
fn test_malformed_signatures() {
    let verifier = SignatureVerifier::from_hex(&common::public_key_hex()).unwrap();

    for signature in ["", "not hex", "abcd", "00".repeat(64).as_str()] {
        assert!(matches!(
            verifier.verify(common::TIMESTAMP, b"{}", signature),
            Err(DispairError::InvalidSignature)
        ));
    }
}

#[test]
fn test_bad_public_key() {
    assert!(matches!(
        SignatureVerifier::from_hex("zz"),
        Err(DispairError::Config(_))
    ));
    assert!(matches!(
        SignatureVerifier::from_hex("abcd"),
        Err(DispairError::Config(_))
    ));
}

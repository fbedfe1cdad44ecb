//! Integration tests against real PKCS#12 fixtures.
//!
//! The fixtures under `tests/certs/` at the workspace root were generated
//! with OpenSSL (RSA-2048 self-signed certificates, 3DES/SHA-1 PBE,
//! SHA-1 MAC):
//!
//! - `empresa_teste.pfx` — password `senha123`, subject CN fuses the
//!   company name and CNPJ (`EMPRESA TESTE LTDA:11222333000181`).
//! - `acme_cnpj_oid.pfx` — password `acme`, CNPJ in the dedicated
//!   ICP-Brasil subject attribute 2.16.76.1.3.3.
//! - `jane_doe.pfx` — password `letmein`, no tax identifier anywhere.
//! - `no_password.pfx` — exported with an empty password.

use std::path::PathBuf;

use pfxmeta_lib::{is_valid_container, parse_certificate, PfxError};

fn fixture(name: &str) -> Vec<u8> {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.pop(); // up from pfxmeta-lib to the workspace root
    p.push("tests");
    p.push("certs");
    p.push(name);
    std::fs::read(&p).unwrap_or_else(|e| panic!("missing fixture {}: {}", p.display(), e))
}

const GARBAGE: &[u8] = &[0x91, 0x5f, 0x07, 0xaa, 0x3c, 0xe2, 0x44, 0x10, 0xfe, 0x6b];

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn empresa_parses_with_correct_password() {
    let bytes = fixture("empresa_teste.pfx");
    let meta = parse_certificate(&bytes, Some("senha123")).unwrap();

    assert_eq!(meta.holder_name, "EMPRESA TESTE LTDA:11222333000181");
    assert_eq!(meta.cnpj.as_deref(), Some("11222333000181"));
    assert_eq!(meta.company_name.as_deref(), Some("EMPRESA TESTE LTDA"));

    // notAfter copied verbatim from the certificate.
    assert_eq!(meta.expiration_date.timestamp, 2102931138);
    assert_eq!(meta.expiration_date.iso8601, "2036-08-21T11:32:18Z");

    assert_eq!(meta.serial_number, "1122334455");

    // Self-signed, so the issuer mirrors the subject, flattened in
    // encoding order.
    assert_eq!(
        meta.issuer,
        "countryName=BR, stateOrProvinceName=SP, localityName=Sao Paulo, \
         organizationName=EMPRESA TESTE LTDA, \
         commonName=EMPRESA TESTE LTDA:11222333000181"
    );

    assert_eq!(
        meta.subject.common_name(),
        Some("EMPRESA TESTE LTDA:11222333000181")
    );
    assert_eq!(meta.subject.organization_name(), Some("EMPRESA TESTE LTDA"));
    assert_eq!(meta.subject.country_name(), Some("BR"));
    assert_eq!(meta.subject.get("localityName"), Some("Sao Paulo"));
    assert!(!meta.subject.is_empty());
}

#[test]
fn empresa_wrong_password_is_typed() {
    let bytes = fixture("empresa_teste.pfx");
    let err = parse_certificate(&bytes, Some("hunter2")).unwrap_err();
    assert_eq!(err, PfxError::WrongPassword);
    let message = err.to_string();
    assert_eq!(message, "incorrect password for the certificate");
    // The passphrase must never leak into diagnostics.
    assert!(!message.contains("hunter2"));
    assert!(!format!("{err:?}").contains("hunter2"));
}

#[test]
fn parse_is_idempotent() {
    let bytes = fixture("empresa_teste.pfx");
    let first = parse_certificate(&bytes, Some("senha123")).unwrap();
    let second = parse_certificate(&bytes, Some("senha123")).unwrap();
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Password handling
// ---------------------------------------------------------------------------

#[test]
fn missing_password_equals_empty_password() {
    let bytes = fixture("no_password.pfx");
    let with_none = parse_certificate(&bytes, None).unwrap();
    let with_empty = parse_certificate(&bytes, Some("")).unwrap();
    assert_eq!(with_none, with_empty);
    assert_eq!(with_none.holder_name, "Jane Doe");
}

#[test]
fn no_password_container_rejects_wrong_password() {
    let bytes = fixture("no_password.pfx");
    let err = parse_certificate(&bytes, Some("not-the-password")).unwrap_err();
    assert_eq!(err, PfxError::WrongPassword);
}

// ---------------------------------------------------------------------------
// Identity heuristics against real certificates
// ---------------------------------------------------------------------------

#[test]
fn dedicated_oid_attribute_recovers_cnpj() {
    let bytes = fixture("acme_cnpj_oid.pfx");
    let meta = parse_certificate(&bytes, Some("acme")).unwrap();

    assert_eq!(meta.holder_name, "ACME COMPANY");
    assert_eq!(meta.cnpj.as_deref(), Some("11222333000181"));
    // Nothing to strip from the holder name in this profile.
    assert_eq!(meta.company_name.as_deref(), Some("ACME COMPANY"));
    // The unregistered OID stays addressable as a subject key.
    assert_eq!(meta.subject.get("2.16.76.1.3.3"), Some("11222333000181"));
}

#[test]
fn certificate_without_tax_id() {
    let bytes = fixture("jane_doe.pfx");
    let meta = parse_certificate(&bytes, Some("letmein")).unwrap();
    assert_eq!(meta.holder_name, "Jane Doe");
    assert_eq!(meta.cnpj, None);
    assert_eq!(meta.company_name.as_deref(), Some("Jane Doe"));
}

#[test]
fn recovered_cnpj_is_always_14_digits() {
    for (name, password) in [
        ("empresa_teste.pfx", "senha123"),
        ("acme_cnpj_oid.pfx", "acme"),
        ("jane_doe.pfx", "letmein"),
    ] {
        let meta = parse_certificate(&fixture(name), Some(password)).unwrap();
        if let Some(cnpj) = &meta.cnpj {
            assert_eq!(cnpj.len(), 14, "{name}");
            assert!(cnpj.bytes().all(|b| b.is_ascii_digit()), "{name}");
        }
    }
}

// ---------------------------------------------------------------------------
// Structural gate and corrupt uploads
// ---------------------------------------------------------------------------

#[test]
fn fixtures_pass_prevalidation() {
    for name in [
        "empresa_teste.pfx",
        "acme_cnpj_oid.pfx",
        "jane_doe.pfx",
        "no_password.pfx",
    ] {
        assert!(is_valid_container(&fixture(name)), "{name}");
    }
}

#[test]
fn random_bytes_fail_cleanly() {
    assert!(!is_valid_container(GARBAGE));
    let err = parse_certificate(GARBAGE, Some("senha123")).unwrap_err();
    // Never misreported as a password problem.
    assert_eq!(err, PfxError::InvalidCertificate);
    assert_eq!(err.to_string(), "invalid or corrupted .pfx file");
}

#[test]
fn empty_buffer_fails_cleanly() {
    assert!(!is_valid_container(&[]));
    assert_eq!(
        parse_certificate(&[], None).unwrap_err(),
        PfxError::InvalidCertificate
    );
}

#[test]
fn truncated_container_is_invalid() {
    let bytes = fixture("empresa_teste.pfx");
    let err = parse_certificate(&bytes[..40], Some("senha123")).unwrap_err();
    assert_eq!(err, PfxError::InvalidCertificate);
}

//! End-to-end parsing: PKCS#12 bytes to a `CertificateMetadata` record.

use std::panic::{catch_unwind, AssertUnwindSafe};

use x509_parser::prelude::*;

use crate::container;
use crate::fields::{CertificateMetadata, DateTime, SubjectAttributes};
use crate::identity;
use crate::oid;
use crate::PfxError;

/// Parse a PKCS#12 (`.pfx`/`.p12`) byte buffer and extract certificate
/// metadata.
///
/// `password` decrypts the container; `None` behaves exactly like an empty
/// string, which some exported certificates use. The call is a pure,
/// synchronous, single-attempt function: identical inputs yield identical
/// output, failures are never retried, and the password is not retained
/// beyond the call.
pub fn parse_certificate(
    bytes: &[u8],
    password: Option<&str>,
) -> Result<CertificateMetadata, PfxError> {
    let password = password.unwrap_or("");
    // The ASN.1 stack is not trusted to be panic-free on adversarial
    // input; a panic surfaces as the generic unknown-error kind instead of
    // unwinding into the caller.
    catch_unwind(AssertUnwindSafe(|| parse_inner(bytes, password)))
        .unwrap_or(Err(PfxError::Unknown))
}

fn parse_inner(bytes: &[u8], password: &str) -> Result<CertificateMetadata, PfxError> {
    let leaf_der = container::decrypt_leaf(bytes, password)?;
    // A certificate bag that does not decode as X.509 counts as a corrupt
    // file, same as a missing bag.
    let (_, x509) =
        X509Certificate::from_der(&leaf_der).map_err(|_| PfxError::InvalidCertificate)?;
    Ok(build_metadata(&x509))
}

fn build_metadata(x509: &X509Certificate) -> CertificateMetadata {
    let tbs = &x509.tbs_certificate;

    let raw_subject = collect_attributes(&tbs.subject);
    let subject = build_subject_map(&raw_subject);
    let holder_name = resolve_holder_name(&subject);

    let identity = identity::recover_identity(&raw_subject, &holder_name);

    CertificateMetadata {
        holder_name,
        expiration_date: DateTime::from_unix(tbs.validity.not_after.timestamp()),
        issuer: flatten_dn(&tbs.issuer),
        serial_number: hex::encode(tbs.raw_serial()),
        subject,
        cnpj: identity.cnpj,
        company_name: identity.company_name,
    }
}

/// Walk a distinguished name in encoding order, yielding (dotted OID,
/// decoded value) pairs.
fn collect_attributes(name: &X509Name) -> Vec<(String, Option<String>)> {
    let mut attributes = Vec::new();
    for rdn in name.iter() {
        for attr in rdn.iter() {
            let oid_str = attr.attr_type().to_id_string();
            attributes.push((oid_str, decode_attribute_value(attr)));
        }
    }
    attributes
}

/// Decode an attribute value to text.
///
/// `as_str` covers the standard string types. ICP-Brasil attribute values
/// have been observed wrapped in non-string ASN.1 types whose content
/// octets are plain ASCII, so fall back to UTF-8 on the raw content before
/// treating the value as undecodable.
fn decode_attribute_value(attr: &AttributeTypeAndValue) -> Option<String> {
    if let Ok(s) = attr.as_str() {
        return Some(s.to_string());
    }
    std::str::from_utf8(attr.attr_value().data)
        .ok()
        .map(str::to_string)
}

/// Build the subject map: the three convenience keys first, then every
/// discovered attribute keyed by its long name (or dotted OID when none is
/// registered). A repeated key keeps its position and the later value wins.
fn build_subject_map(raw: &[(String, Option<String>)]) -> SubjectAttributes {
    let mut discovered = SubjectAttributes::new();
    for (oid_str, value) in raw {
        let key = oid::attribute_name(oid_str).unwrap_or(oid_str.as_str());
        discovered.insert(key, value.clone());
    }

    let mut subject = SubjectAttributes::new();
    for key in ["commonName", "organizationName", "countryName"] {
        subject.insert(key, discovered.get(key).map(str::to_string));
    }
    for (key, value) in discovered.iter() {
        subject.insert(key, value.map(str::to_string));
    }
    subject
}

/// First non-empty of common name and organization name, else "Unknown".
fn resolve_holder_name(subject: &SubjectAttributes) -> String {
    subject
        .common_name()
        .filter(|s| !s.is_empty())
        .or_else(|| subject.organization_name().filter(|s| !s.is_empty()))
        .unwrap_or("Unknown")
        .to_string()
}

/// Flatten a distinguished name to `key=value` pairs joined by `, `, in
/// encoding order. Values that do not decode as text render as `<binary>`.
fn flatten_dn(name: &X509Name) -> String {
    collect_attributes(name)
        .into_iter()
        .map(|(oid_str, value)| {
            let key = oid::attribute_name(&oid_str)
                .map(str::to_string)
                .unwrap_or(oid_str);
            format!("{}={}", key, value.as_deref().unwrap_or("<binary>"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

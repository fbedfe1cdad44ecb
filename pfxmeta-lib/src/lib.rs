//! pfxmeta-lib: Library for parsing PKCS#12 (.pfx) certificate bundles.
//!
//! Takes an untrusted byte upload plus an optional passphrase, decrypts the
//! PKCS#12 container, and extracts a clean metadata record from the
//! end-entity X.509 certificate: holder identity, expiration date, issuer,
//! serial number, and a best-effort Brazilian CNPJ tax identifier recovered
//! from the ICP-Brasil subject attribute or from the common name text.
//!
//! The private key material inside the container is never extracted or used.

mod check;
mod container;
mod display;
mod fields;
mod identity;
mod oid;
mod parser;
mod prevalidate;
mod util;

pub use check::{certificate_status, check_expiry, days_remaining, CertificateStatus};
pub use display::{display_text, to_json};
pub use fields::{CertificateMetadata, DateTime, SubjectAttributes};
pub use identity::format_cnpj;
pub use parser::parse_certificate;
pub use prevalidate::{is_pfx_file, is_valid_container};

/// Errors returned by pfxmeta-lib.
///
/// Callers branch on these kinds: a wrong password is correctable by
/// re-prompting the user, an invalid file only by uploading a different one.
/// Neither can succeed on an automatic retry with the same inputs, so the
/// library never retries anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PfxError {
    /// The supplied passphrase does not decrypt the container.
    #[error("incorrect password for the certificate")]
    WrongPassword,

    /// The bytes are not a usable PKCS#12: structurally broken, or no
    /// decodable certificate bag inside.
    #[error("invalid or corrupted .pfx file")]
    InvalidCertificate,

    /// Any other failure during parsing, with the underlying message kept
    /// for diagnostics.
    #[error("error processing certificate: {0}")]
    Processing(String),

    /// A failure that carried no usable diagnostic, such as a panic in the
    /// underlying ASN.1 stack caught at the boundary.
    #[error("unknown error while processing certificate")]
    Unknown,
}

//! Certificate metadata types.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Metadata extracted from the end-entity certificate of a PKCS#12 bundle.
///
/// Transient: constructed once per successful parse and handed to the
/// caller. Persistence, ownership, and display formatting are the caller's
/// job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    /// Best-effort display name: subject common name, else organization
    /// name, else the literal `"Unknown"`.
    pub holder_name: String,
    /// The certificate's notAfter instant, copied verbatim with no
    /// timezone conversion.
    pub expiration_date: DateTime,
    /// Issuer distinguished name flattened to `key=value` pairs joined by
    /// `, `, in certificate encoding order.
    pub issuer: String,
    /// Serial number as lowercase hex of the encoded bytes.
    pub serial_number: String,
    /// Every subject attribute, in certificate encoding order.
    pub subject: SubjectAttributes,
    /// 14-digit CNPJ recovered by the identity heuristics, digits only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    /// Holder name with the recovered CNPJ and residual separator
    /// punctuation removed; absent when cleanup leaves nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Date-time representation: the encoded instant as a unix timestamp plus
/// an ISO 8601 rendering of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    pub iso8601: String,
    pub timestamp: i64,
}

impl DateTime {
    pub(crate) fn from_unix(ts: i64) -> Self {
        let iso = match time::OffsetDateTime::from_unix_timestamp(ts) {
            Ok(dt) => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                dt.year(),
                u8::from(dt.month()),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second()
            ),
            Err(_) => format!("{}", ts),
        };
        DateTime {
            iso8601: iso,
            timestamp: ts,
        }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iso8601)
    }
}

/// Subject attributes keyed by long attribute name (or dotted OID when no
/// name is registered), preserving certificate encoding order.
///
/// `commonName`, `organizationName`, and `countryName` are always present
/// as the first three keys, with `None` values when the certificate does
/// not carry them. A `None` value also marks an attribute whose encoded
/// value could not be decoded as text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubjectAttributes {
    entries: Vec<(String, Option<String>)>,
}

impl SubjectAttributes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a key, keeping the position of an existing key and letting
    /// the later value win.
    pub(crate) fn insert(&mut self, key: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Look up an attribute value. Returns `None` both for a missing key
    /// and for a key present without a decodable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get("commonName")
    }

    pub fn organization_name(&self) -> Option<&str> {
        self.get("organizationName")
    }

    pub fn country_name(&self) -> Option<&str> {
        self.get("countryName")
    }
}

impl Serialize for SubjectAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

//! OID string constants used throughout pfxmeta-lib.
//!
//! Distinguished-name attribute OIDs come from RFC 4519 / X.520; the
//! tax-identifier attribute comes from the ICP-Brasil certificate profile
//! (DOC-ICP-04). Grouping them here avoids magic strings scattered across
//! modules and keeps the jurisdiction-specific OID in one place.

// ── X.509 Distinguished Name attributes (RFC 4519 / X.520) ──────────────

pub const COMMON_NAME: &str = "2.5.4.3";
pub const SURNAME: &str = "2.5.4.4";
pub const SERIAL_NUMBER: &str = "2.5.4.5";
pub const COUNTRY: &str = "2.5.4.6";
pub const LOCALITY: &str = "2.5.4.7";
pub const STATE_OR_PROVINCE: &str = "2.5.4.8";
pub const STREET_ADDRESS: &str = "2.5.4.9";
pub const ORGANIZATION: &str = "2.5.4.10";
pub const ORGANIZATIONAL_UNIT: &str = "2.5.4.11";
pub const TITLE: &str = "2.5.4.12";
pub const POSTAL_CODE: &str = "2.5.4.17";
pub const GIVEN_NAME: &str = "2.5.4.42";
pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1"; // PKCS#9
pub const DOMAIN_COMPONENT: &str = "0.9.2342.19200300.100.1.25";

// ── ICP-Brasil subject attributes (DOC-ICP-04) ───────────────────────────

/// CNPJ of the certificate holder in e-CNPJ certificates.
pub const ICP_BRASIL_CNPJ: &str = "2.16.76.1.3.3";

/// Map a DN attribute OID to its long attribute name.
///
/// Returns `None` for unregistered OIDs; callers fall back to the dotted
/// OID string itself as the key. The ICP-Brasil OIDs are deliberately not
/// named, so their subject-map keys stay addressable by OID.
pub fn attribute_name(oid: &str) -> Option<&'static str> {
    Some(match oid {
        COMMON_NAME => "commonName",
        SURNAME => "surname",
        SERIAL_NUMBER => "serialNumber",
        COUNTRY => "countryName",
        LOCALITY => "localityName",
        STATE_OR_PROVINCE => "stateOrProvinceName",
        STREET_ADDRESS => "streetAddress",
        ORGANIZATION => "organizationName",
        ORGANIZATIONAL_UNIT => "organizationalUnitName",
        TITLE => "title",
        POSTAL_CODE => "postalCode",
        GIVEN_NAME => "givenName",
        EMAIL_ADDRESS => "emailAddress",
        DOMAIN_COMPONENT => "domainComponent",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_name_maps_to_long_form() {
        assert_eq!(attribute_name("2.5.4.3"), Some("commonName"));
    }

    #[test]
    fn cnpj_oid_has_no_registered_name() {
        assert_eq!(attribute_name(ICP_BRASIL_CNPJ), None);
    }

    #[test]
    fn unknown_oid_returns_none() {
        assert_eq!(attribute_name("1.2.3.4.5"), None);
    }
}

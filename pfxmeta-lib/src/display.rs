//! Human-readable and JSON rendering of certificate metadata.

use crate::fields::CertificateMetadata;
use crate::identity::format_cnpj;
use crate::PfxError;

/// Format certificate metadata as a human-readable text block.
pub fn display_text(metadata: &CertificateMetadata) -> String {
    let mut out = String::new();

    out.push_str("Certificate:\n");
    out.push_str(&format!("  Holder: {}\n", metadata.holder_name));
    if let Some(company) = &metadata.company_name {
        out.push_str(&format!("  Company: {}\n", company));
    }
    if let Some(cnpj) = &metadata.cnpj {
        out.push_str(&format!("  CNPJ: {}\n", format_cnpj(cnpj)));
    }
    out.push_str(&format!("  Serial: {}\n", metadata.serial_number));
    out.push_str(&format!("  Issuer: {}\n", metadata.issuer));
    out.push_str(&format!("  Expires: {}\n", metadata.expiration_date));
    out.push_str("  Subject:\n");
    for (key, value) in metadata.subject.iter() {
        out.push_str(&format!("    {}: {}\n", key, value.unwrap_or("-")));
    }

    out
}

/// Serialize certificate metadata to a pretty-printed JSON string with
/// camelCase keys; absent optionals are omitted.
pub fn to_json(metadata: &CertificateMetadata) -> Result<String, PfxError> {
    serde_json::to_string_pretty(metadata).map_err(|e| PfxError::Processing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{DateTime, SubjectAttributes};

    fn sample() -> CertificateMetadata {
        let mut subject = SubjectAttributes::default();
        subject.insert("commonName", Some("EMPRESA TESTE LTDA:11222333000181".into()));
        subject.insert("organizationName", None);
        subject.insert("countryName", Some("BR".into()));
        CertificateMetadata {
            holder_name: "EMPRESA TESTE LTDA:11222333000181".into(),
            expiration_date: DateTime::from_unix(2102931138),
            issuer: "countryName=BR, commonName=Test CA".into(),
            serial_number: "1122334455".into(),
            subject,
            cnpj: Some("11222333000181".into()),
            company_name: Some("EMPRESA TESTE LTDA".into()),
        }
    }

    #[test]
    fn text_includes_formatted_cnpj() {
        let text = display_text(&sample());
        assert!(text.contains("CNPJ: 11.222.333/0001-81"));
        assert!(text.contains("Company: EMPRESA TESTE LTDA\n"));
        assert!(text.contains("Expires: 2036-08-21T11:32:18Z"));
    }

    #[test]
    fn text_renders_missing_values_as_dash() {
        let text = display_text(&sample());
        assert!(text.contains("organizationName: -"));
    }

    #[test]
    fn text_omits_absent_optionals() {
        let mut meta = sample();
        meta.cnpj = None;
        meta.company_name = None;
        let text = display_text(&meta);
        assert!(!text.contains("CNPJ:"));
        assert!(!text.contains("Company:"));
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"holderName\""));
        assert!(json.contains("\"expirationDate\""));
        assert!(json.contains("\"serialNumber\""));
        assert!(json.contains("\"companyName\""));
    }
}

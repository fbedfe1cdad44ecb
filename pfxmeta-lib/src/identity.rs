//! Recovery of the holder's tax identifier (CNPJ) and a clean company name.
//!
//! ICP-Brasil e-CNPJ certificates carry the 14-digit CNPJ either in a
//! dedicated subject attribute or fused into the common name text
//! (`"EMPRESA LTDA:11222333000181"`). The strategies below run in strict
//! priority order and stop at the first hit; the ordering and the
//! jurisdiction OID are load-bearing for compatibility with existing
//! records.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::oid;
use crate::util::digits_only;

/// A CNPJ is exactly 14 digits once formatting is stripped.
const CNPJ_DIGITS: usize = 14;

/// Conventional punctuated CNPJ shape, `XX.XXX.XXX/XXXX-XX`, with every
/// separator optional. Unanchored: the first match anywhere in the text
/// wins, even if a later run of digits was the intended identifier.
static CNPJ_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2}").expect("valid pattern"));

// Cleanup uses ASCII word characters only; accented characters at the
// edges of a name are treated as punctuation, matching the behavior the
// upload flow has always had.
static LEADING_NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^0-9A-Za-z_]+").expect("valid pattern"));
static TRAILING_NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z_]+$").expect("valid pattern"));

/// Outcome of the identity heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HolderIdentity {
    pub cnpj: Option<String>,
    pub company_name: Option<String>,
}

/// Run the heuristic chain over the raw subject attributes (dotted OID,
/// decoded value) and the resolved holder name.
pub(crate) fn recover_identity(
    subject_attributes: &[(String, Option<String>)],
    holder_name: &str,
) -> HolderIdentity {
    let cnpj = cnpj_from_subject_attribute(subject_attributes)
        .or_else(|| cnpj_from_holder_name(holder_name));
    let company_name = clean_company_name(holder_name, cnpj.as_deref());
    HolderIdentity { cnpj, company_name }
}

/// Strategy 1: the dedicated ICP-Brasil subject attribute.
///
/// The attribute value is defined to hold exactly 14 digits; anything that
/// strips to a different length is rejected so the invariant on the
/// returned CNPJ holds, and the pattern fallback gets its chance.
fn cnpj_from_subject_attribute(attributes: &[(String, Option<String>)]) -> Option<String> {
    let value = attributes
        .iter()
        .find(|(oid_str, _)| oid_str == oid::ICP_BRASIL_CNPJ)
        .and_then(|(_, value)| value.as_deref())?;
    let digits = digits_only(value);
    if digits.len() == CNPJ_DIGITS {
        Some(digits)
    } else {
        if !digits.is_empty() {
            log::warn!(
                "ICP-Brasil CNPJ attribute stripped to {} digits, ignoring",
                digits.len()
            );
        }
        None
    }
}

/// Strategy 2: first punctuated-or-bare CNPJ shape in the holder name.
fn cnpj_from_holder_name(holder_name: &str) -> Option<String> {
    CNPJ_PATTERN
        .find(holder_name)
        .map(|m| digits_only(m.as_str()))
}

/// Remove the recovered CNPJ from the holder name and tidy the remainder:
/// one trailing colon, then any leading and trailing runs of non-word
/// characters, then surrounding whitespace. `None` when nothing is left.
fn clean_company_name(holder_name: &str, cnpj: Option<&str>) -> Option<String> {
    let mut name = holder_name.to_string();
    if let Some(digits) = cnpj {
        // Both forms are removed; a name can only contain one of them, so
        // the other replacement is a no-op.
        name = name.replace(&format_cnpj(digits), "");
        name = name.replace(digits, "");
    }
    let name = name.strip_suffix(':').unwrap_or(&name).to_string();
    let name = LEADING_NON_WORD.replace(&name, "");
    let name = TRAILING_NON_WORD.replace(&name, "");
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Format a bare 14-digit CNPJ as `XX.XXX.XXX/XXXX-XX`.
///
/// Inputs that do not strip to exactly 14 digits are returned unchanged.
pub fn format_cnpj(cnpj: &str) -> String {
    let digits = digits_only(cnpj);
    if digits.len() != CNPJ_DIGITS {
        return cnpj.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}

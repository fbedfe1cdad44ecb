//! Certificate expiry checks and status classification.

use time::{Duration, OffsetDateTime};

use crate::fields::CertificateMetadata;

/// Expiration buckets used by dashboards and notification flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    Valid,
    /// Expires within [`WARNING_WINDOW_DAYS`] days.
    ExpiringSoon,
    Expired,
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CertificateStatus::Valid => "valid",
            CertificateStatus::ExpiringSoon => "expiring-soon",
            CertificateStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// Days before expiration at which a certificate is flagged for renewal.
pub const WARNING_WINDOW_DAYS: i64 = 30;

/// Whole days between `now` and the expiration date, comparing calendar
/// dates only (the time of day is ignored on both sides). Zero on the
/// expiration day itself, negative afterwards.
pub fn days_remaining(metadata: &CertificateMetadata, now: OffsetDateTime) -> i64 {
    let expires = match OffsetDateTime::from_unix_timestamp(metadata.expiration_date.timestamp) {
        Ok(dt) => dt,
        Err(_) => return 0,
    };
    i64::from(expires.date().to_julian_day() - now.date().to_julian_day())
}

/// Classify a certificate by how far away its expiration is.
pub fn certificate_status(metadata: &CertificateMetadata, now: OffsetDateTime) -> CertificateStatus {
    let days = days_remaining(metadata, now);
    if days < 0 {
        CertificateStatus::Expired
    } else if days <= WARNING_WINDOW_DAYS {
        CertificateStatus::ExpiringSoon
    } else {
        CertificateStatus::Valid
    }
}

/// Check whether the certificate will still be valid after `seconds` have
/// elapsed from now.
pub fn check_expiry(metadata: &CertificateMetadata, seconds: u64) -> bool {
    let margin = Duration::seconds(i64::try_from(seconds).unwrap_or(i64::MAX));
    let deadline = OffsetDateTime::now_utc().saturating_add(margin);
    metadata.expiration_date.timestamp > deadline.unix_timestamp()
}

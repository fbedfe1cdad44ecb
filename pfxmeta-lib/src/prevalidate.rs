//! Cheap structural pre-check for uploaded certificate files.

/// Check whether a byte buffer decodes as a well-formed DER structure.
///
/// This is the password-independent gate upload handlers run before asking
/// the user for a passphrase: it rejects wrong file types, truncated
/// uploads, and zero-byte files without exception-handling overhead. It is
/// intentionally weak — a structurally valid blob can still fail the full
/// parse with a wrong password, an unsupported algorithm, or a bag layout
/// that holds no certificate.
///
/// Never panics and never returns an error; every decode failure is
/// `false`. The underlying decoder bounds its recursion depth, so deeply
/// nested adversarial input fails instead of overflowing the stack.
pub fn is_valid_container(bytes: &[u8]) -> bool {
    x509_parser::der_parser::parse_der(bytes).is_ok()
}

/// Alias entry point used when screening uploads by content rather than by
/// filename extension. Identical to [`is_valid_container`].
pub fn is_pfx_file(bytes: &[u8]) -> bool {
    is_valid_container(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SEQUENCE { INTEGER 1 }
    const MINIMAL_DER: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x01];

    #[test]
    fn accepts_minimal_der_sequence() {
        assert!(is_valid_container(MINIMAL_DER));
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(!is_valid_container(&[]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_valid_container(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05]));
    }

    #[test]
    fn rejects_truncated_length() {
        // SEQUENCE claiming 16 bytes of content with none present.
        assert!(!is_valid_container(&[0x30, 0x10]));
    }

    #[test]
    fn rejects_text_file() {
        assert!(!is_valid_container(b"-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn alias_matches_primary() {
        assert_eq!(is_pfx_file(MINIMAL_DER), is_valid_container(MINIMAL_DER));
        assert_eq!(is_pfx_file(b"nope"), is_valid_container(b"nope"));
    }
}

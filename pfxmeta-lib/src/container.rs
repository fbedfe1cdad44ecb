//! PKCS#12 container decryption and certificate bag selection.

use p12::PFX;

use crate::PfxError;

/// Decrypt a PKCS#12 container and return the DER bytes of the end-entity
/// certificate, taken as the first X.509 certificate bag. No chain building
/// and no bag-count validation beyond "at least one".
///
/// Key bags are ignored: the private key is never extracted, and the
/// passphrase is used only as local key material for this call.
pub(crate) fn decrypt_leaf(bytes: &[u8], password: &str) -> Result<Vec<u8>, PfxError> {
    let pfx = PFX::parse(bytes).map_err(|_| PfxError::InvalidCertificate)?;

    // The MAC is keyed from the passphrase over the authenticated safe, so
    // a mismatch is a typed wrong-password signal rather than something
    // inferred from an error message. Containers without a MAC verify
    // trivially.
    if !pfx.verify_mac(password) {
        log::debug!("PKCS#12 MAC verification failed");
        return Err(PfxError::WrongPassword);
    }

    let cert_bags = pfx
        .cert_x509_bags(password)
        .map_err(|e| PfxError::Processing(format!("{e:?}")))?;

    cert_bags
        .into_iter()
        .next()
        .ok_or(PfxError::InvalidCertificate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_invalid_not_wrong_password() {
        let err = decrypt_leaf(&[0x00, 0x01, 0x02], "password").unwrap_err();
        assert_eq!(err, PfxError::InvalidCertificate);
    }

    #[test]
    fn plain_der_without_pfx_shape_is_invalid() {
        // Well-formed DER (SEQUENCE { INTEGER 1 }) that is not a PFX.
        let err = decrypt_leaf(&[0x30, 0x03, 0x02, 0x01, 0x01], "").unwrap_err();
        assert_eq!(err, PfxError::InvalidCertificate);
    }
}

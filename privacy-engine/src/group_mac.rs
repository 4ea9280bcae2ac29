//! Group-secret authorization: HMAC-SHA-512 keyed by a shared group secret.
//!
//! Every member holds the same secret, so a valid MAC proves group membership
//! but, unlike a ring signature, the verifier can also forge it.

use crate::errors::PrivacyError;
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

const MAC_BYTES: usize = 64;

fn keyed_mac(secret_hex: &str) -> Result<HmacSha512, PrivacyError> {
    let key = hex::decode(secret_hex)
        .map_err(|e| PrivacyError::InvalidEncoding(format!("group secret: {e}")))?;
    if key.is_empty() {
        return Err(PrivacyError::InvalidEncoding("group secret is empty".to_string()));
    }
    HmacSha512::new_from_slice(&key).map_err(|e| PrivacyError::InvalidEncoding(format!("{e}")))
}

/// 128-character lowercase hex MAC over `message`.
pub fn group_sign(secret_hex: &str, message: &[u8]) -> Result<String, PrivacyError> {
    let mut mac = keyed_mac(secret_hex)?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a hex MAC. A MAC of the wrong shape is an error.
pub fn group_verify(secret_hex: &str, message: &[u8], signature_hex: &str) -> Result<bool, PrivacyError> {
    let tag = hex::decode(signature_hex)
        .map_err(|e| PrivacyError::MalformedSignature(format!("group signature: {e}")))?;
    if tag.len() != MAC_BYTES {
        return Err(PrivacyError::MalformedSignature(format!(
            "group signature must be {MAC_BYTES} bytes, got {}",
            tag.len()
        )));
    }

    let mut mac = keyed_mac(secret_hex)?;
    mac.update(message);
    Ok(mac.verify_slice(&tag).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231, test case 2.
    const JEFE_HEX: &str = "4a656665";
    const JEFE_MAC: &str = "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737";

    #[test]
    fn matches_rfc_4231_vector() {
        let mac = group_sign(JEFE_HEX, b"what do ya want for nothing?").unwrap();
        assert_eq!(mac, JEFE_MAC);
        assert_eq!(mac.len(), 128);
    }

    #[test]
    fn verifies_own_output_and_rejects_other_messages() {
        let secret = "00112233445566778899aabbccddeeff";
        let mac = group_sign(secret, b"team|5.4|6.2").unwrap();

        assert!(group_verify(secret, b"team|5.4|6.2", &mac).unwrap());
        assert!(!group_verify(secret, b"team|5.4|6.3", &mac).unwrap());
        assert!(!group_verify("ffeeddccbbaa99887766554433221100", b"team|5.4|6.2", &mac).unwrap());
    }

    #[test]
    fn rejects_bad_secrets_and_tags() {
        assert!(matches!(group_sign("", b"m"), Err(PrivacyError::InvalidEncoding(_))));
        assert!(matches!(group_sign("xyz", b"m"), Err(PrivacyError::InvalidEncoding(_))));
        assert!(matches!(
            group_verify("aa", b"m", "abcd"),
            Err(PrivacyError::MalformedSignature(_))
        ));
    }
}

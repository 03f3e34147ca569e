// file: src/webhook/signature.rs
// description: HMAC-SHA256 webhook signature computation and verification
// reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the `sha256=<hex>` signature for a raw request body.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Verify a supplied signature against the raw body. The comparison is
/// constant-time and length-checked; a short-circuiting lexical compare
/// would leak the mismatch position through timing.
pub fn verify(secret: &str, body: &[u8], supplied: &str) -> bool {
    let Some(hex_digest) = supplied.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_reference_vector() {
        // RFC-style HMAC-SHA256 reference vector
        let signature = sign("key", b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            signature,
            "sha256=f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let body = br#"{"action":"published"}"#;
        let signature = sign("shared-secret", body);
        assert!(verify("shared-secret", body, &signature));
    }

    #[test]
    fn test_single_byte_tamper_rejects() {
        let body = b"payload-bytes";
        let signature = sign("shared-secret", body);

        let mut tampered = body.to_vec();
        tampered[0] ^= 0x01;
        assert!(!verify("shared-secret", &tampered, &signature));
    }

    #[test]
    fn test_wrong_secret_rejects() {
        let body = b"payload-bytes";
        let signature = sign("shared-secret", body);
        assert!(!verify("other-secret", body, &signature));
    }

    #[test]
    fn test_wrong_length_signature_rejects() {
        let body = b"payload-bytes";
        assert!(!verify("shared-secret", body, "sha256=deadbeef"));
        assert!(!verify("shared-secret", body, "sha256="));
    }

    #[test]
    fn test_missing_prefix_rejects() {
        let body = b"payload-bytes";
        let signature = sign("shared-secret", body);
        let unprefixed = signature.trim_start_matches(SIGNATURE_PREFIX);
        assert!(!verify("shared-secret", body, unprefixed));
    }

    #[test]
    fn test_non_hex_signature_rejects() {
        assert!(!verify("shared-secret", b"body", "sha256=not-hex-at-all"));
    }
}

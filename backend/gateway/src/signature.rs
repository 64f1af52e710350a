//! Webhook signature verification.
//!
//! The inbox provider signs each delivery with HMAC-SHA256 over
//! `"{id}.{timestamp}.{body}"`, keyed by the shared secret (base64,
//! usually carried with a `whsec_` prefix). The signature header may list
//! several space-separated candidates (`v1,<base64>`), any one of which
//! may match; providers rotate secrets this way.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Verify a delivery against the shared secret.
///
/// Returns false on any malformed input, including an undecodable secret
/// (which is additionally logged, since that is an operator problem, not a
/// caller problem).
pub fn verify_signature(
    secret: &str,
    msg_id: &str,
    timestamp: &str,
    body: &str,
    signature_header: &str,
) -> bool {
    let Some(expected) = compute_signature(secret, msg_id, timestamp, body) else {
        return false;
    };

    signature_header
        .split_whitespace()
        .filter_map(|entry| entry.strip_prefix("v1,"))
        .any(|candidate| candidate == expected)
}

/// Produce the `v1,<base64>` entry for a delivery, the counterpart of
/// [`verify_signature`]. Useful for replaying captured events locally.
pub fn sign(secret: &str, msg_id: &str, timestamp: &str, body: &str) -> Option<String> {
    compute_signature(secret, msg_id, timestamp, body).map(|sig| format!("v1,{sig}"))
}

fn compute_signature(secret: &str, msg_id: &str, timestamp: &str, body: &str) -> Option<String> {
    let encoded_key = secret.strip_prefix("whsec_").unwrap_or(secret);
    let key = match BASE64.decode(encoded_key) {
        Ok(key) => key,
        Err(e) => {
            error!(error = %e, "Webhook secret is not valid base64");
            return None;
        }
    };

    let mut mac = HmacSha256::new_from_slice(&key).ok()?;
    mac.update(format!("{msg_id}.{timestamp}.{body}").as_bytes());
    Some(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // "testsecret" base64-encoded.
    const SECRET: &str = "whsec_dGVzdHNlY3JldA==";

    #[test]
    fn signed_delivery_verifies() {
        let body = r#"{"type":"email.received"}"#;
        let header = sign(SECRET, "msg_1", "1718000000", body).unwrap();
        assert!(verify_signature(SECRET, "msg_1", "1718000000", body, &header));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let header = sign(SECRET, "msg_1", "1718000000", "original").unwrap();
        assert!(!verify_signature(SECRET, "msg_1", "1718000000", "tampered", &header));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let header = sign(SECRET, "msg_1", "1718000000", "body").unwrap();
        let other = "whsec_b3RoZXJzZWNyZXQ=";
        assert!(!verify_signature(other, "msg_1", "1718000000", "body", &header));
    }

    #[test]
    fn any_candidate_in_the_header_may_match() {
        let body = "body";
        let good = sign(SECRET, "msg_1", "1718000000", body).unwrap();
        let header = format!("v1,bm90LWEtcmVhbC1zaWc= {good}");
        assert!(verify_signature(SECRET, "msg_1", "1718000000", body, &header));
    }

    #[test]
    fn undecodable_secret_never_verifies() {
        assert!(sign("whsec_%%%", "msg_1", "t", "body").is_none());
        assert!(!verify_signature("whsec_%%%", "msg_1", "t", "body", "v1,xyz"));
    }

    #[test]
    fn entries_without_version_prefix_are_ignored() {
        let body = "body";
        let good = sign(SECRET, "msg_1", "1718000000", body).unwrap();
        let bare = good.strip_prefix("v1,").unwrap();
        assert!(!verify_signature(SECRET, "msg_1", "1718000000", body, bare));
    }
}

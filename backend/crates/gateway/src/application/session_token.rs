//! Session Token Signing
//!
//! Session tokens are `<session_id>.<signature>` where the signature is
//! HMAC-SHA256 over the session ID string, base64url-encoded without
//! padding. The token proves the session ID was issued by this service;
//! validity and expiry live in the session store.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use kernel::id::SessionId;
use sha2::Sha256;

use crate::error::{GatewayError, GatewayResult};

/// Sign a session ID into a transportable token
pub fn sign_session_token(session_id: SessionId, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token's signature and recover the session ID
///
/// Every malformed or tampered token maps to `SessionInvalid`; the
/// caller learns nothing about which check failed.
pub fn parse_session_token(token: &str, secret: &[u8; 32]) -> GatewayResult<SessionId> {
    let (session_id_str, signature_b64) = token
        .split_once('.')
        .ok_or(GatewayError::SessionInvalid)?;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| GatewayError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| GatewayError::SessionInvalid)?;

    let uuid: uuid::Uuid = session_id_str
        .parse()
        .map_err(|_| GatewayError::SessionInvalid)?;

    Ok(SessionId::from_uuid(uuid))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_sign_and_parse_roundtrip() {
        let session_id = SessionId::new();
        let token = sign_session_token(session_id, &SECRET);

        let parsed = parse_session_token(&token, &SECRET).unwrap();
        assert_eq!(parsed, session_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = sign_session_token(SessionId::new(), &SECRET);

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(parse_session_token(&tampered, &SECRET).is_err());

        // Swap the session ID, keep the signature
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", SessionId::new(), sig);
        assert!(parse_session_token(&forged, &SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign_session_token(SessionId::new(), &SECRET);
        assert!(parse_session_token(&token, &[8u8; 32]).is_err());
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(parse_session_token("", &SECRET).is_err());
        assert!(parse_session_token("no-separator", &SECRET).is_err());
        assert!(parse_session_token("not-a-uuid.c2ln", &SECRET).is_err());
    }
}

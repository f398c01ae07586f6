//! Token identity reader.
//!
//! Extracts the user identifier from the payload segment of a stored bearer
//! token. The signature and expiry are NOT verified: the identity is only as
//! trustworthy as the token store, and the server remains the authority.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::traits::TokenStore;

/// Claim carrying the user identifier in tokens issued by the backend.
pub const USER_ID_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";

/// URL-safe alphabet, padding optional. Standard-alphabet input is mapped
/// onto it before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Identity information decoded from a token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: String,
    /// The `exp` claim, if present. Informational only.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Resolve the current user from the store. Re-reads the store every call.
pub fn current_user_id(store: &dyn TokenStore) -> Option<String> {
    let token = store.read()?;
    user_id_from_token(&token)
}

/// Extract the user identifier from a token, or `None` if the token is
/// malformed or carries no identity claim.
pub fn user_id_from_token(token: &str) -> Option<String> {
    inspect_token(token).map(|claims| claims.user_id)
}

/// Decode the identity and expiry claims from a token.
pub fn inspect_token(token: &str) -> Option<TokenClaims> {
    let payload = match decode_payload(token) {
        Ok(payload) => payload,
        Err(reason) => {
            tracing::warn!("invalid token format: {reason}");
            return None;
        }
    };

    let user_id = match payload.get(USER_ID_CLAIM)? {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let expires_at = payload
        .get("exp")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Some(TokenClaims {
        user_id,
        expires_at,
    })
}

fn decode_payload(token: &str) -> Result<Value, String> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(format!("expected 3 segments, found {}", segments.len()));
    }

    let normalized = segments[1].replace('+', "-").replace('/', "_");
    let bytes = PAYLOAD_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| format!("payload is not base64: {e}"))?;
    let payload: Value =
        serde_json::from_slice(&bytes).map_err(|e| format!("payload is not JSON: {e}"))?;

    if payload.is_object() {
        Ok(payload)
    } else {
        Err("payload is not a JSON object".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StaticTokenStore;

    fn token_with_payload(payload: &str) -> String {
        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(payload);
        format!("eyJhbGciOiJIUzI1NiJ9.{encoded}.c2lnbmF0dXJl")
    }

    #[test]
    fn extracts_user_id_claim() {
        let token = token_with_payload(&format!(r#"{{"{USER_ID_CLAIM}":"user-42"}}"#));
        assert_eq!(user_id_from_token(&token).as_deref(), Some("user-42"));
    }

    #[test]
    fn accepts_padded_standard_base64() {
        let payload = format!(r#"{{"{USER_ID_CLAIM}":"user-42","name":"??>"}}"#);
        let encoded = base64::engine::general_purpose::STANDARD.encode(payload);
        let token = format!("h.{encoded}.s");
        assert_eq!(user_id_from_token(&token).as_deref(), Some("user-42"));
    }

    #[test]
    fn numeric_claim_becomes_string() {
        let token = token_with_payload(&format!(r#"{{"{USER_ID_CLAIM}":42}}"#));
        assert_eq!(user_id_from_token(&token).as_deref(), Some("42"));
    }

    #[test]
    fn malformed_tokens_yield_none() {
        assert_eq!(user_id_from_token(""), None);
        assert_eq!(user_id_from_token("only-one-segment"), None);
        assert_eq!(user_id_from_token("header.payload"), None);
        assert_eq!(user_id_from_token("h.!!!not-base64!!!.s"), None);
        assert_eq!(user_id_from_token(&token_with_payload("not json")), None);
        assert_eq!(user_id_from_token(&token_with_payload("[1,2]")), None);
    }

    #[test]
    fn missing_or_empty_claim_yields_none() {
        assert_eq!(user_id_from_token(&token_with_payload(r#"{"sub":"x"}"#)), None);
        let token = token_with_payload(&format!(r#"{{"{USER_ID_CLAIM}":""}}"#));
        assert_eq!(user_id_from_token(&token), None);
    }

    #[test]
    fn inspect_reads_expiry() {
        let token = token_with_payload(&format!(
            r#"{{"{USER_ID_CLAIM}":"u1","exp":1700000000}}"#
        ));
        let claims = inspect_token(&token).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn current_user_reads_store() {
        let token = token_with_payload(&format!(r#"{{"{USER_ID_CLAIM}":"u9"}}"#));
        assert_eq!(
            current_user_id(&StaticTokenStore::new(token)).as_deref(),
            Some("u9")
        );
        assert_eq!(current_user_id(&StaticTokenStore::empty()), None);
    }
}

//! Access token payload decoding
//!
//! The front end never holds the signing key. Tokens are decoded without
//! signature or expiry checks and the role read from them only decides which
//! screens to offer; the remote API enforces authorization on every call.

use jsonwebtoken::dangerous::insecure_decode;
use serde::{Deserialize, Serialize};

use crate::auth::models::Role;
use crate::error::{Error, Result};

/// A claim that may be a single value or a list (`roles`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(value) => Some(value.as_str()),
            OneOrMany::Many(values) => values.first().map(String::as_str),
        }
    }

    fn contains(&self, wanted: &str) -> bool {
        match self {
            OneOrMany::One(value) => value == wanted,
            OneOrMany::Many(values) => values.iter().any(|v| v == wanted),
        }
    }
}

/// Access token claims issued by the invoicing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<OneOrMany>,
    /// Expiration time, seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// `role` wins; `roles` is the fallback
    pub fn role(&self) -> Result<Role> {
        if let Some(role) = &self.role {
            return Ok(Role::from_claim(role));
        }
        match &self.roles {
            Some(roles) if roles.contains("ADMIN") => Ok(Role::Admin),
            Some(roles) => roles
                .first()
                .map(Role::from_claim)
                .ok_or_else(|| Error::InvalidToken("empty roles claim".to_string())),
            None => Err(Error::InvalidToken("token carries no role".to_string())),
        }
    }

    /// `userId` (string or number), falling back to `sub`
    pub fn user_id(&self) -> Option<String> {
        match &self.user_id {
            Some(serde_json::Value::String(id)) => Some(id.clone()),
            Some(serde_json::Value::Number(id)) => Some(id.to_string()),
            _ => self.sub.clone(),
        }
    }

    /// Expiry as epoch milliseconds; a token without `exp` never expires locally
    pub fn expires_at_millis(&self) -> i64 {
        self.exp
            .map(|exp| exp.saturating_mul(1000))
            .unwrap_or(i64::MAX)
    }
}

/// Decode a token's payload without verifying its signature, whatever the algorithm
pub fn decode_claims(token: &str) -> Result<Claims> {
    insecure_decode::<Claims>(token)
        .map(|data| data.claims)
        .map_err(|e| Error::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(payload: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(b"issuer-side-secret"),
        )
        .expect("Failed to create token")
    }

    #[test]
    fn test_decode_admin_token() {
        let t = token(serde_json::json!({"userId": 42, "role": "ADMIN", "exp": 2_000_000_000}));
        let claims = decode_claims(&t).expect("Failed to decode token");

        assert_eq!(claims.role().unwrap(), Role::Admin);
        assert_eq!(claims.user_id().as_deref(), Some("42"));
        assert_eq!(claims.expires_at_millis(), 2_000_000_000_000);
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let t = token(serde_json::json!({"sub": "u-1", "role": "USER", "exp": 1}));
        let claims = decode_claims(&t).expect("expired tokens must still decode");
        assert_eq!(claims.role().unwrap(), Role::User);
        assert_eq!(claims.user_id().as_deref(), Some("u-1"));
        assert_eq!(claims.expires_at_millis(), 1000);
    }

    #[test]
    fn test_roles_fallback() {
        let t = token(serde_json::json!({"sub": "1", "roles": ["USER", "ADMIN"]}));
        assert_eq!(decode_claims(&t).unwrap().role().unwrap(), Role::Admin);

        let t = token(serde_json::json!({"sub": "1", "roles": "USER"}));
        assert_eq!(decode_claims(&t).unwrap().role().unwrap(), Role::User);
    }

    #[test]
    fn test_missing_role_is_invalid() {
        let t = token(serde_json::json!({"sub": "1"}));
        let claims = decode_claims(&t).unwrap();
        assert!(matches!(claims.role(), Err(Error::InvalidToken(_))));
        assert_eq!(claims.expires_at_millis(), i64::MAX);
    }

    /// Re-head an HS256 token as `alg`; the signature is never checked
    fn with_alg(token: &str, encoded_header: &str) -> String {
        let mut parts = token.split('.');
        parts.next();
        let payload = parts.next().unwrap();
        format!("{}.{}.c2lnbmF0dXJl", encoded_header, payload)
    }

    #[test]
    fn test_asymmetric_algorithms_decode() {
        let t = token(serde_json::json!({"userId": 1, "role": "ADMIN"}));

        // {"alg":"RS256","typ":"JWT"}
        let rs256 = with_alg(&t, "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9");
        let claims = decode_claims(&rs256).expect("RS256 tokens must decode");
        assert_eq!(claims.role().unwrap(), Role::Admin);
        assert_eq!(claims.user_id().as_deref(), Some("1"));

        // {"alg":"ES256","typ":"JWT"}
        let es256 = with_alg(&t, "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(decode_claims(&es256).unwrap().role().unwrap(), Role::Admin);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(decode_claims("invalid.token.here").is_err());
        assert!(decode_claims("").is_err());
    }
}

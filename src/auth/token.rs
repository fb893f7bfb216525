//! Bearer-token issuance and verification. Tokens are stateless HS256
//! JWTs carrying a subject and an expiry; there is no revocation — a
//! token stays valid until `exp`, and logout is a client-side concern.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fallback ttl when the caller does not supply one. The login flow
/// always passes the configured ttl explicitly.
pub const DEFAULT_TTL_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    exp: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token has no subject claim")]
    MissingSubject,
}

/// Issues and verifies bearer tokens with a key injected at construction.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(signing_key: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: expiry is exact.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        }
    }

    /// Sign `{sub: subject, exp: now + ttl}`.
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> anyhow::Result<String> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_TTL_MINUTES));
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (Utc::now() + ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the subject. The four
    /// failure kinds are distinguished here for logging only — the gate
    /// collapses them all into one uniform rejection.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;

        // jsonwebtoken still accepts a token at the exact expiry instant;
        // validity requires now strictly before exp.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        match data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(TokenError::MissingSubject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-signing-key")
    }

    #[test]
    fn issue_then_verify_returns_subject() {
        let tokens = issuer();
        let t = tokens.issue("alice", Some(Duration::minutes(30))).unwrap();
        assert_eq!(tokens.verify(&t).unwrap(), "alice");
    }

    #[test]
    fn verification_is_repeatable() {
        let tokens = issuer();
        let t = tokens.issue("alice", None).unwrap();
        assert_eq!(tokens.verify(&t).unwrap(), "alice");
        assert_eq!(tokens.verify(&t).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer();
        let t = tokens.issue("alice", Some(Duration::seconds(-5))).unwrap();
        assert_eq!(tokens.verify(&t), Err(TokenError::Expired));
    }

    #[test]
    fn token_expiring_now_is_already_invalid() {
        let tokens = issuer();
        // exp == now: strictly-before semantics reject it.
        let t = tokens.issue("alice", Some(Duration::seconds(0))).unwrap();
        assert_eq!(tokens.verify(&t), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let t = TokenIssuer::new("other-key")
            .issue("alice", Some(Duration::minutes(5)))
            .unwrap();
        assert_eq!(issuer().verify(&t), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(issuer().verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(issuer().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn token_without_subject_is_rejected() {
        #[derive(Serialize)]
        struct NoSub {
            exp: i64,
        }
        let claims = NoSub {
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let t = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-key"),
        )
        .unwrap();
        assert_eq!(issuer().verify(&t), Err(TokenError::MissingSubject));
    }
}

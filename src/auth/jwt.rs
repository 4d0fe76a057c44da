//! # Token Verification
//!
//! Resolves an opaque bearer credential to a stable user identifier. Tokens
//! are HS256 JWTs; the stable identifier is the verified email address.
//! This boundary owns nothing else: no password storage, no sessions.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// JWT claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Verified email address
    pub email: String,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Stable user identifier (the verified email)
    pub user_id: String,
    /// Verified email address
    pub email: String,
}

impl AuthUser {
    /// Display nickname derived from the email's local part
    pub fn nickname(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Verifies bearer tokens against a shared secret
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifies a token and resolves the caller's identity
    pub fn verify(&self, token: &str) -> AuthResult<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            },
        )?;
        Ok(AuthUser {
            user_id: data.claims.email.clone(),
            email: data.claims.email,
        })
    }
}

/// Mints a token for `email`, valid for `ttl_secs`. Used by the dev CLI and
/// the test suite; production deployments mint tokens elsewhere.
pub fn mint(secret: &str, email: &str, ttl_secs: i64) -> AuthResult<String> {
    let claims = Claims {
        sub: email.to_string(),
        email: email.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::TokenGenerationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_mint_and_verify_round_trip() {
        let token = mint(SECRET, "test1@test.com", 3600).unwrap();
        let user = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(user.user_id, "test1@test.com");
        assert_eq!(user.email, "test1@test.com");
        assert_eq!(user.nickname(), "test1");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint(SECRET, "test1@test.com", 3600).unwrap();
        let err = TokenVerifier::new("other-secret").verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint(SECRET, "test1@test.com", -120).unwrap();
        let err = TokenVerifier::new(SECRET).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = TokenVerifier::new(SECRET).verify("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }
}

//! # Auth Errors

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity-resolution errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No usable Authorization header on the request
    #[error("Authorization required")]
    AuthenticationRequired,

    /// Token is not a well-formed JWT
    #[error("Malformed token")]
    MalformedToken,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token signature does not verify
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token could not be minted
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::AuthenticationRequired
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature => 401,
            AuthError::TokenGenerationFailed => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::AuthenticationRequired.status_code(), 401);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::TokenGenerationFailed.status_code(), 500);
    }
}

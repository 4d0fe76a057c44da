//! # Authentication
//!
//! Bearer-token identity resolution. The rest of the system only ever sees
//! an [`AuthUser`]; how the credential was issued is not this crate's
//! concern.

pub mod errors;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use jwt::{mint, AuthUser, Claims, TokenVerifier};

/// Extracts and verifies the bearer token from an Authorization header
/// value, e.g. `Bearer eyJ...`.
pub fn authenticate_header(verifier: &TokenVerifier, header: Option<&str>) -> AuthResult<AuthUser> {
    let header = header.ok_or(AuthError::AuthenticationRequired)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::AuthenticationRequired)?;
    verifier.verify(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_rejected() {
        let verifier = TokenVerifier::new("s");
        assert!(matches!(
            authenticate_header(&verifier, None),
            Err(AuthError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_non_bearer_header_rejected() {
        let verifier = TokenVerifier::new("s");
        assert!(matches!(
            authenticate_header(&verifier, Some("Basic dXNlcjpwdw==")),
            Err(AuthError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_bearer_header_accepted() {
        let token = mint("s", "a@b.c", 60).unwrap();
        let verifier = TokenVerifier::new("s");
        let user = authenticate_header(&verifier, Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(user.email, "a@b.c");
    }
}

//! Session tokens: HS256-signed, embedding account id and email, valid
//! for one hour. Tokens are never persisted; possession of a valid token
//! stands in for re-presenting credentials.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for the account, expiring in one hour.
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, id: i64, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(id, email, chrono::Utc::now().timestamp())
    }

    fn issue_at(
        &self,
        id: i64,
        email: &str,
        issued_at: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
    }

    /// Verify signature and expiry, returning the embedded claims.
    /// # Errors
    /// Returns an error on a bad signature or an expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        // The 1-hour window is exact, no expiry leeway
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("secret", &"***").finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from("test-secret".to_string()))
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let signer = signer();
        let token = signer.issue(42, "a@x.com").unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = signer().issue(42, "a@x.com").unwrap();

        let other = TokenSigner::new(SecretString::from("other-secret".to_string()));
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let issued_at = chrono::Utc::now().timestamp() - 2 * TOKEN_TTL_SECS;
        let token = signer.issue_at(42, "a@x.com", issued_at).unwrap();

        let err = signer.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(signer().verify("not-a-token").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("***"));
        assert!(!debug.contains("test-secret"));
    }
}

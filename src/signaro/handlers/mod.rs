pub mod health;
pub use self::health::health;

pub mod user_signup;
pub use self::user_signup::signup;

pub mod user_login;
pub use self::user_login::login;

pub mod signs;
pub use self::signs::{add_sign, delete_sign, list_signs};

pub mod translate;
pub use self::translate::{predict_sign, translate};

// common functions for the handlers
use crate::signaro::{
    error::Error,
    storage::{self, Account, SqlitePool},
    token::TokenSigner,
};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::warn;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the bearer token to a live account. The embedded email is
/// re-resolved against the store on every call; no caching.
pub async fn authenticate(
    pool: &SqlitePool,
    signer: &TokenSigner,
    headers: &HeaderMap,
) -> Result<Account, Error> {
    let token = bearer_token(headers).ok_or(Error::MissingToken)?;

    let claims = signer.verify(token).map_err(|err| {
        warn!("Token verification failed: {err}");
        Error::InvalidToken
    })?;

    storage::find_account_by_email(pool, &claims.email)
        .await?
        .ok_or_else(|| Error::NotFound("User not found.".to_string()))
}

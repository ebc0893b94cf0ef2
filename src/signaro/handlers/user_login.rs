use crate::signaro::{
    error::Error,
    storage::{self, SqlitePool},
    token::TokenSigner,
};
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserLogin {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/api/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "Login successful, token issued", content_type = "application/json"),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    pool: Extension<SqlitePool>,
    signer: Extension<Arc<TokenSigner>>,
    payload: Option<Json<UserLogin>>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let user = match payload {
        Some(Json(payload)) => payload,
        None => {
            return Err(Error::Validation(
                "Email and password are required.".to_string(),
            ))
        }
    };

    if user.email.is_empty() || user.password.is_empty() {
        return Err(Error::Validation(
            "Email and password are required.".to_string(),
        ));
    }

    // Unknown email and wrong password are indistinguishable to the caller
    let Some(account) = storage::find_account_by_email(&pool, &user.email).await? else {
        debug!("login attempt for unknown email");

        return Err(Error::InvalidCredentials);
    };

    if !bcrypt::verify(&user.password, &account.password_hash)? {
        debug!("password mismatch for account {}", account.id);

        return Err(Error::InvalidCredentials);
    }

    let token = signer.issue(account.id, &account.email)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Login successful!",
            "token": token,
            "email": account.email,
            "id": account.id,
        })),
    ))
}

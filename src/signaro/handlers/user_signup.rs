use crate::signaro::{
    error::Error,
    storage::{self, SignupOutcome, SqlitePool},
};
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use utoipa::ToSchema;

const BCRYPT_COST: u32 = 10;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct UserSignup {
    email: String,
    password: String,
}

#[utoipa::path(
    post,
    path= "/api/signup",
    request_body = UserSignup,
    responses (
        (status = 201, description = "Registration successful", content_type = "application/json"),
        (status = 400, description = "Missing fields or password shorter than 6 characters"),
        (status = 409, description = "Account with this email already exists"),
    ),
    tag= "auth"
)]
// axum handler for signup
#[instrument(skip_all)]
pub async fn signup(
    pool: Extension<SqlitePool>,
    payload: Option<Json<UserSignup>>,
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

    // Characters, not bytes: a short multibyte password must not slip through
    if user.password.chars().count() < 6 {
        return Err(Error::Validation(
            "Password must be at least 6 characters long.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&user.password, BCRYPT_COST)?;

    // The UNIQUE constraint on email decides the race, not a pre-check
    match storage::insert_account(&pool, &user.email, &password_hash).await? {
        SignupOutcome::Created(id) => {
            debug!("account {} created for {}", id, user.email);

            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Registration successful! Please log in." })),
            ))
        }
        SignupOutcome::Conflict => Err(Error::Conflict(
            "User with this email already exists.".to_string(),
        )),
    }
}

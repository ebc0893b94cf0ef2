use crate::signaro::{
    error::Error,
    handlers::authenticate,
    storage::{self, SignInsertOutcome, SqlitePool},
    token::TokenSigner,
};
use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSign {
    word: String,
    video_url: Option<String>,
}

/// Deterministic media placeholder used until real uploads exist.
fn placeholder_video_url(word: &str) -> String {
    format!("https://example.com/signs/{}.mp4", urlencoding::encode(word))
}

#[utoipa::path(
    post,
    path= "/api/signs",
    request_body = AddSign,
    responses (
        (status = 201, description = "Custom sign added", content_type = "application/json"),
        (status = 400, description = "Missing or empty word"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Invalid or expired token"),
        (status = 409, description = "A sign for this word already exists"),
    ),
    security (("bearer" = [])),
    tag= "signs"
)]
// axum handler for adding a sign
#[instrument(skip_all)]
pub async fn add_sign(
    pool: Extension<SqlitePool>,
    signer: Extension<Arc<TokenSigner>>,
    headers: HeaderMap,
    payload: Option<Json<AddSign>>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let account = authenticate(&pool, &signer, &headers).await?;

    let sign = match payload {
        Some(Json(payload)) => payload,
        None => return Err(Error::Validation("Sign word is required.".to_string())),
    };

    let word = sign.word.trim();
    if word.is_empty() {
        return Err(Error::Validation("Sign word is required.".to_string()));
    }

    let video_url = sign
        .video_url
        .clone()
        .unwrap_or_else(|| placeholder_video_url(word));

    match storage::insert_sign(&pool, account.id, word, &video_url).await? {
        SignInsertOutcome::Created(record) => {
            debug!("sign {} added for account {}", record.id, account.id);

            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "message": "Custom sign added successfully.",
                    "sign": record,
                })),
            ))
        }
        SignInsertOutcome::Conflict => Err(Error::Conflict(format!(
            "You've already added a sign for \"{word}\"."
        ))),
    }
}

#[utoipa::path(
    get,
    path= "/api/signs",
    responses (
        (status = 200, description = "All signs owned by the caller, ordered by word", content_type = "application/json"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Invalid or expired token"),
    ),
    security (("bearer" = [])),
    tag= "signs"
)]
// axum handler for listing signs
#[instrument(skip_all)]
pub async fn list_signs(
    pool: Extension<SqlitePool>,
    signer: Extension<Arc<TokenSigner>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), Error> {
    let account = authenticate(&pool, &signer, &headers).await?;

    let signs = storage::list_signs(&pool, account.id).await?;

    Ok((StatusCode::OK, Json(json!({ "signs": signs }))))
}

#[utoipa::path(
    delete,
    path= "/api/signs/{id}",
    params (("id" = i64, Path, description = "Sign identifier")),
    responses (
        (status = 200, description = "Custom sign deleted", content_type = "application/json"),
        (status = 400, description = "Non-numeric sign id"),
        (status = 401, description = "Authentication token required"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Sign not found or not owned by the caller"),
    ),
    security (("bearer" = [])),
    tag= "signs"
)]
// axum handler for deleting a sign
#[instrument(skip_all)]
pub async fn delete_sign(
    pool: Extension<SqlitePool>,
    signer: Extension<Arc<TokenSigner>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let account = authenticate(&pool, &signer, &headers).await?;

    let Ok(sign_id) = id.parse::<i64>() else {
        return Err(Error::Validation("Invalid sign ID provided.".to_string()));
    };

    // A single ambiguous answer for "absent" and "not owned"
    if storage::delete_sign(&pool, account.id, sign_id).await? {
        Ok((
            StatusCode::OK,
            Json(json!({ "message": "Custom sign deleted successfully." })),
        ))
    } else {
        Err(Error::NotFound(
            "Sign not found or you do not have permission to delete it.".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_video_url_plain_word() {
        assert_eq!(
            placeholder_video_url("Yes"),
            "https://example.com/signs/Yes.mp4"
        );
    }

    #[test]
    fn test_placeholder_video_url_encodes_spaces_and_unicode() {
        assert_eq!(
            placeholder_video_url("thank you"),
            "https://example.com/signs/thank%20you.mp4"
        );
        assert_eq!(
            placeholder_video_url("héllo"),
            "https://example.com/signs/h%C3%A9llo.mp4"
        );
    }

    #[test]
    fn test_placeholder_video_url_is_deterministic() {
        assert_eq!(placeholder_video_url("Hi"), placeholder_video_url("Hi"));
    }
}

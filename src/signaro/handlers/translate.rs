use crate::signaro::{error::Error, translate::Translator};
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    text: String,
    target_language: String,
}

#[utoipa::path(
    post,
    path= "/api/translate",
    request_body = TranslateRequest,
    responses (
        (status = 200, description = "Translated text", content_type = "application/json"),
        (status = 400, description = "Missing text or target language"),
        (status = 501, description = "No translation endpoint configured"),
        (status = 502, description = "Translation endpoint failed"),
    ),
    tag= "translate"
)]
// axum handler for translation
#[instrument(skip_all)]
pub async fn translate(
    translator: Extension<Translator>,
    payload: Option<Json<TranslateRequest>>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => {
            return Err(Error::Validation(
                "Text and target language are required.".to_string(),
            ))
        }
    };

    if request.text.trim().is_empty() || request.target_language.trim().is_empty() {
        return Err(Error::Validation(
            "Text and target language are required.".to_string(),
        ));
    }

    let translation = translator
        .translate(&request.text, &request.target_language)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "translation": translation }))))
}

#[utoipa::path(
    post,
    path= "/api/predict-sign",
    responses (
        (status = 501, description = "Sign prediction is not implemented"),
    ),
    tag= "translate"
)]
// axum handler for the sign prediction placeholder
pub async fn predict_sign() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({ "message": "Sign prediction endpoint not yet implemented." })),
    )
}

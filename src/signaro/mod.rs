use crate::{
    cli::globals::GlobalArgs,
    signaro::handlers::{
        health, health::__path_health, signs, signs::__path_add_sign, signs::__path_delete_sign,
        signs::__path_list_signs, translate::__path_predict_sign, translate::__path_translate,
        user_login, user_login::__path_login, user_signup, user_signup::__path_signup,
    },
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

pub mod error;
pub mod handlers;
pub mod storage;
pub mod token;
pub mod translate;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        signup,
        login,
        add_sign,
        list_signs,
        delete_sign,
        translate,
        predict_sign
    ),
    components(schemas(
        health::Health,
        user_signup::UserSignup,
        user_login::UserLogin,
        signs::AddSign,
        handlers::translate::TranslateRequest,
        storage::Sign
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "signaro", description = "Sign vocabulary and authentication API")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router. The pool, token signer and translator
/// are constructed once at startup and injected here; tests pass their
/// own in-memory instances.
pub fn router(
    pool: storage::SqlitePool,
    signer: Arc<token::TokenSigner>,
    translator: translate::Translator,
) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(|| async { "🖐" }))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route(
            "/api/signs",
            get(handlers::list_signs).post(handlers::add_sign),
        )
        .route("/api/signs/:id", delete(handlers::delete_sign))
        .route("/api/translate", post(handlers::translate))
        .route("/api/predict-sign", post(handlers::predict_sign))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(signer))
                .layer(Extension(translator))
                .layer(Extension(pool.clone())),
        )
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(Extension(pool))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database and apply the schema
    let pool = storage::connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let signer = Arc::new(token::TokenSigner::new(globals.jwt_secret.clone()));

    let translator = translate::Translator::new(globals.translate_url.clone())
        .context("Failed to build translation client")?;

    let app = router(pool, signer, translator);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

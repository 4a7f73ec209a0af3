//! HTTP transport for the identity service.
//!
//! API endpoints:
//! - GET    /health          - liveness check
//! - POST   /register        - `{name, images: [base64]}`
//! - POST   /recognize       - `{image: base64}`
//! - DELETE /persons/{name}  - remove a registered person

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::application::register::ImageSource;
use crate::domain::entities::recognition::Recognition;
use crate::domain::error::DomainError;
use crate::FaceId;

/// Base64 image as sent by clients; decoded only when registration needs it.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct Base64Image(pub String);

impl ImageSource for Base64Image {
    fn bytes(&self) -> Result<Cow<'_, [u8]>, DomainError> {
        decode_image(&self.0).map(Cow::Owned)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub images: Vec<Base64Image>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionRequest {
    pub image: String,
}

/// Error rendered as `{"detail": ..}` with a matching status code.
pub enum ApiError {
    Domain(DomainError),
    /// Body could not be read or parsed; keeps axum's status (400/413/415/422).
    Rejected(JsonRejection),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::Domain(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        ApiError::Rejected(r)
    }
}

fn domain_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::AlreadyRegistered(_) => StatusCode::CONFLICT,
        DomainError::NoUsableSamples(_) | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Extractor(_) => StatusCode::BAD_GATEWAY,
        DomainError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Domain(e) => {
                if e.is_upstream() {
                    error!(error = %e, "upstream failure");
                }
                let detail = match &e {
                    DomainError::NoUsableSamples(_) => "Couldn't extract embeddings from the images".to_string(),
                    other => other.to_string(),
                };
                (domain_status(&e), detail)
            }
            ApiError::Rejected(r) => {
                debug!(status = %r.status(), "rejected request body");
                (r.status(), r.body_text())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

fn decode_image(data: &str) -> Result<Vec<u8>, DomainError> {
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| DomainError::InvalidInput(format!("Invalid base64 image: {e}")))
}

pub fn router(app: Arc<FaceId>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/recognize", post(recognize))
        .route("/persons/{name}", delete(delete_person))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(app)
}

/// Bind `addr` and serve until the process exits. A bare `:port` binds all
/// interfaces.
pub async fn serve(addr: &str, app: Arc<FaceId>, max_body_bytes: usize) -> std::io::Result<()> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    };
    let listener = TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, max_body_bytes, "listening");
    axum::serve(listener, router(app, max_body_bytes)).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

async fn register(
    State(app): State<Arc<FaceId>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let registration = app.register(&req.name, &req.images).await?;
    Ok(Json(json!({
        "status": "success",
        "message": registration.message(),
    })))
}

async fn recognize(
    State(app): State<Arc<FaceId>>,
    payload: Result<Json<RecognitionRequest>, JsonRejection>,
) -> Result<Json<Recognition>, ApiError> {
    let Json(req) = payload?;
    let image = decode_image(&req.image)?;
    Ok(Json(app.recognize(&image).await?))
}

async fn delete_person(
    State(app): State<Arc<FaceId>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app.delete_person(&name).await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Person '{name}' deleted"),
        "deleted": outcome.deleted_flag(),
    })))
}

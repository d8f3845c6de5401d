use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use todo_core::{handlers, ApiResponse, HandlerError, TodoStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub type SharedStore = Arc<dyn TodoStore>;

pub fn create_app(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn list_todos(State(store): State<SharedStore>) -> Result<ApiReply, ApiError> {
    Ok(ApiReply(handlers::list_todos(store.as_ref()).await?))
}

async fn create_todo(State(store): State<SharedStore>, body: Bytes) -> Result<ApiReply, ApiError> {
    Ok(ApiReply(handlers::create_todo(store.as_ref(), &body).await?))
}

async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiReply, ApiError> {
    Ok(ApiReply(handlers::update_todo(store.as_ref(), &id, &body).await?))
}

async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<ApiReply, ApiError> {
    Ok(ApiReply(handlers::delete_todo(store.as_ref(), &id).await?))
}

pub struct ApiReply(pub ApiResponse);

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        let ApiResponse {
            status_code,
            headers,
            body,
        } = self.0;

        let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = match body {
            Some(text) => (status, text).into_response(),
            None => (status, Body::empty()).into_response(),
        };

        for (name, value) in headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

pub struct ApiError(pub HandlerError);

impl From<HandlerError> for ApiError {
    fn from(err: HandlerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");

        let body = Json(serde_json::json!({
            "error": self.0.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

//! Request handlers shared by the lambda binaries and the dev server.
//!
//! Each handler performs one store call and returns an [`ApiResponse`].
//! Store failures are returned as `Err` and left to the caller's platform
//! (a failed Lambda invocation, or a 500 from the dev server).

use std::collections::BTreeMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{HandlerError, StoreError};
use crate::item::{NewTodo, Number, TodoChanges};
use crate::store::TodoStore;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const CONTENT_TYPE: &str = "Content-Type";

/// HTTP-shaped handler result: `{statusCode, headers, body?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApiResponse {
    /// An empty response carrying the permissive CORS header.
    pub fn new(status_code: u16) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            status_code,
            headers,
            body: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    /// A 200 response with `value` as its JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(value)?;
        Ok(Self::ok().with_json_body(body))
    }

    /// A response with `{"error": message}` as its body.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() }).to_string();
        Self::new(status_code).with_json_body(body)
    }

    fn with_json_body(mut self, body: String) -> Self {
        self.headers
            .insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Deletes the item with `id`. Always 200, whether or not the item existed.
pub async fn delete_todo<S>(store: &S, id: &str) -> Result<ApiResponse, HandlerError>
where
    S: TodoStore + ?Sized,
{
    store.delete_item(id).await?;
    Ok(ApiResponse::ok())
}

/// Returns all items as a JSON array.
pub async fn list_todos<S>(store: &S) -> Result<ApiResponse, HandlerError>
where
    S: TodoStore + ?Sized,
{
    let items = store.get_items().await?;
    Ok(ApiResponse::json(&items)?)
}

pub async fn create_todo<S>(store: &S, body: &[u8]) -> Result<ApiResponse, HandlerError>
where
    S: TodoStore + ?Sized,
{
    let new_todo: NewTodo = match parse_object(body) {
        Ok(new_todo) => new_todo,
        Err(err) => {
            tracing::warn!(error = %err, "rejected todo creation");
            return Ok(ApiResponse::error(
                400,
                format!("Couldn't create the todo item: {err}"),
            ));
        }
    };

    let item = new_todo.into_item(Uuid::new_v4().to_string(), Utc::now());
    store.put_item(item.clone()).await?;
    Ok(ApiResponse::json(&item)?)
}

pub async fn update_todo<S>(store: &S, id: &str, body: &[u8]) -> Result<ApiResponse, HandlerError>
where
    S: TodoStore + ?Sized,
{
    let changes: TodoChanges = match parse_object(body) {
        Ok(changes) => changes,
        Err(err) => {
            tracing::warn!(id, error = %err, "rejected todo update");
            return Ok(ApiResponse::error(
                400,
                format!("Couldn't update the todo item: {err}"),
            ));
        }
    };
    if changes.is_empty() {
        return Ok(ApiResponse::error(
            400,
            "Couldn't update the todo item: nothing to change",
        ));
    }

    let updated_at = Number::from_timestamp(Utc::now());
    match store.update_item(id, &changes, updated_at).await {
        Ok(item) => Ok(ApiResponse::json(&item)?),
        Err(err @ StoreError::NotFound { .. }) => Ok(ApiResponse::error(404, err.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// Parses a request body that must be a JSON object.
fn parse_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("request body must be a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

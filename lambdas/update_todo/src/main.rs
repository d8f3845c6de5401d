use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use todo_core::lambda::{into_lambda_response, path_id};
use todo_core::{handlers, store, Config, TodoStore};

async fn function_handler(store: &dyn TodoStore, event: Request) -> Result<Response<Body>, Error> {
    let id = path_id(&event)?;
    tracing::info!(id = %id, "updating todo");

    let response = handlers::update_todo(store, &id, event.body().as_ref()).await?;

    Ok(into_lambda_response(response)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let store = store::open(&config).await?;
    let store = store.as_ref();

    run(service_fn(|event| function_handler(store, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::RequestExt;
    use serde_json::Value;
    use std::collections::HashMap;
    use todo_core::item::{Item, CHECKED, ID, TEXT};
    use todo_core::store::InMemoryStore;

    fn update_request(id: &str, body: &str) -> Request {
        Request::new(Body::from(body))
            .with_path_parameters(HashMap::from([("id".to_string(), id.to_string())]))
    }

    #[tokio::test]
    async fn checks_off_an_item() {
        let store =
            InMemoryStore::with_items([Item::new().with(ID, "a").with(TEXT, "buy milk").with(CHECKED, false)]);

        let response = function_handler(&store, update_request("a", r#"{"checked": "true"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        let updated: Value = match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("unexpected body: {other:?}"),
        };
        assert_eq!(updated["checked"], true);
        assert_eq!(updated["text"], "buy milk");
        assert!(updated["updatedAt"].is_number());
    }

    #[tokio::test]
    async fn unknown_item_is_404() {
        let response = function_handler(&InMemoryStore::new(), update_request("x", r#"{"text": "y"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn missing_id_fails_the_invocation() {
        let event = Request::new(Body::from(r#"{"text": "y"}"#));
        assert!(function_handler(&InMemoryStore::new(), event).await.is_err());
    }
}

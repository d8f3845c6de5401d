use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use todo_core::lambda::into_lambda_response;
use todo_core::{handlers, store, Config, TodoStore};

async fn function_handler(store: &dyn TodoStore, _event: Request) -> Result<Response<Body>, Error> {
    let response = handlers::list_todos(store).await?;

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
    use serde_json::{json, Value};
    use todo_core::item::{Item, Number, CHECKED, CREATED_AT, ID, TEXT};
    use todo_core::store::InMemoryStore;

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap(),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn lists_all_items() {
        let store = InMemoryStore::with_items([
            Item::new()
                .with(ID, "a")
                .with(TEXT, "buy milk")
                .with(CHECKED, true)
                .with(CREATED_AT, Number::parse("1705314600.5").unwrap()),
            Item::new()
                .with(ID, "b")
                .with(TEXT, "walk the dog")
                .with(CHECKED, false)
                .with(CREATED_AT, Number::parse("1705314700").unwrap()),
        ]);

        let response = function_handler(&store, Request::default()).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            body_json(&response),
            json!([
                { "id": "a", "text": "buy milk", "checked": true, "createdAt": 1705314600.5 },
                { "id": "b", "text": "walk the dog", "checked": false, "createdAt": 1705314700 },
            ])
        );
    }

    #[tokio::test]
    async fn empty_table_is_an_empty_array() {
        let response = function_handler(&InMemoryStore::new(), Request::default())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), json!([]));
    }
}

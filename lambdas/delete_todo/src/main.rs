use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use todo_core::lambda::{into_lambda_response, path_id};
use todo_core::{handlers, store, Config, TodoStore};

async fn function_handler(store: &dyn TodoStore, event: Request) -> Result<Response<Body>, Error> {
    let id = path_id(&event)?;
    tracing::info!(id = %id, "deleting todo");

    let response = handlers::delete_todo(store, &id).await?;

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

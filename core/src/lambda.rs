//! Glue between `lambda_http` events and the handlers.

use lambda_http::http;
use lambda_http::{Body, Request, RequestExt, Response};

use crate::error::HandlerError;
use crate::handlers::ApiResponse;

/// The `id` path parameter of `event`.
pub fn path_id(event: &Request) -> Result<String, HandlerError> {
    event
        .path_parameters_ref()
        .and_then(|params| params.first("id"))
        .map(str::to_string)
        .ok_or(HandlerError::MissingPathParameter("id"))
}

pub fn into_lambda_response(response: ApiResponse) -> Result<Response<Body>, http::Error> {
    let mut builder = Response::builder().status(response.status_code);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let body = match response.body {
        Some(text) => Body::Text(text),
        None => Body::Empty,
    };
    builder.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_id_path_parameter() {
        let event = Request::default()
            .with_path_parameters(HashMap::from([("id".to_string(), "todo-1".to_string())]));
        assert_eq!(path_id(&event).unwrap(), "todo-1");
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = path_id(&Request::default()).unwrap_err();
        assert!(matches!(err, HandlerError::MissingPathParameter("id")));
    }

    #[test]
    fn converts_headers_and_body() {
        let response = into_lambda_response(ApiResponse::error(404, "gone")).unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        match response.body() {
            Body::Text(text) => assert_eq!(text, r#"{"error":"gone"}"#),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn empty_body_stays_empty() {
        let response = into_lambda_response(ApiResponse::ok()).unwrap();
        assert_eq!(response.status(), 200);
        assert!(matches!(response.body(), Body::Empty));
    }
}

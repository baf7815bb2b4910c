//! Test client helpers.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode},
};
use confvault_server::{AppState, create_router};
use confvault_service::{ConfigService, ServiceConfig};
use confvault_store::{ConfigStore, MemoryStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const BASE: &str = "/configuration";

/// Drives a router in-process.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self { app }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Vec::new(), Body::empty()).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: Vec<(&str, &str)>) -> TestResponse {
        self.send(Method::GET, uri, headers, Body::empty()).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Method::POST,
            uri,
            vec![("content-type", "application/json")],
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Vec::new(), Body::empty()).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: Vec<(&str, &str)>,
        body: Body,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("Request failed");

        TestResponse::from_response(response).await
    }
}

/// Collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Body is not valid UTF-8")
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        let value = self
            .header(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(value, expected, "Unexpected value for header '{}'", name);
        self
    }

    /// Asserts a 400 carrying the given error code.
    pub fn assert_error_code(&self, code: &str) -> &Self {
        self.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = self.json();
        assert_eq!(body["code"], code, "Unexpected error body: {}", body);
        self
    }
}

/// Client over an open in-memory store with caching enabled.
pub fn client() -> TestClient {
    client_with_store(Arc::new(MemoryStore::new()))
}

/// Client over the given store. The store is used as is, not opened.
pub fn client_with_store(store: Arc<dyn ConfigStore>) -> TestClient {
    let service = ConfigService::without_defaults(store, ServiceConfig::default());
    TestClient::new(create_router(AppState::new(service), BASE))
}

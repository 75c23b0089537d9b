#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use idm_console::config::{Config, DirectoryBackend, DocsConfig, Environment};
use idm_console::directory::InMemoryDirectory;
use idm_console::docs::{DocProvider, DocStructure, StaticDocumentation};
use idm_console::{web, AppState};
use serde_json::json;
use std::sync::Arc;

pub fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        directory: DirectoryBackend::Memory,
        http_connect_timeout_secs: 1,
        http_request_timeout_secs: 1,
        docs: DocsConfig {
            content_url: None,
            provider: DocProvider::Plain,
            branch: "master".to_string(),
            image_prefix_url: Some("https://docs.example.com/".to_string()),
            structure: DocStructure::new(json!({
                "identityProviders": { "edit": { "overview": "guides/idp/edit.md" } }
            })),
        },
    }
}

/// Router over the seeded directory; the directory handle is returned for inspection
pub fn test_app() -> (Router, Arc<InMemoryDirectory>) {
    test_app_with(InMemoryDirectory::sample())
}

pub fn test_app_with(directory: InMemoryDirectory) -> (Router, Arc<InMemoryDirectory>) {
    let directory = Arc::new(directory);
    let docs = StaticDocumentation::new()
        .with_document("guides/idp/edit.md", "# Editing\n![flow](./assets/flow.png)");

    let state = Arc::new(AppState {
        directory: directory.clone(),
        docs: Arc::new(docs),
        config: Arc::new(test_config()),
    });
    (web::create_router(state), directory)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn patch_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

//! Mock deposition repository built on wiremock

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bearer header every authenticated request must carry
pub const AUTH_HEADER: &str = "Bearer integration-token";

/// Base URL the client should use for `server`
pub fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

/// Deposition creation that always hands out `id`
pub async fn mount_create(server: &MockServer, id: u64) {
    Mock::given(method("POST"))
        .and(path("/api/deposit/depositions"))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": id })))
        .mount(server)
        .await;
}

/// Content upload and metadata attach for deposition `id`
pub async fn mount_upload_and_attach(server: &MockServer, id: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/api/deposit/depositions/{id}/files")))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "key": "file" })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/deposit/depositions/{id}")))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id })))
        .mount(server)
        .await;
}

/// Publish for deposition `id`, answering with `doi`
pub async fn mount_publish(server: &MockServer, id: u64, doi: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/api/deposit/depositions/{id}/actions/publish")))
        .and(header("Authorization", AUTH_HEADER))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": id, "doi": doi })))
        .mount(server)
        .await;
}

/// Record search answering with `hits` matching records
pub async fn mount_search(server: &MockServer, hits: usize) {
    let records: Vec<_> = (0..hits).map(|n| json!({ "id": n })).collect();
    Mock::given(method("GET"))
        .and(path("/api/records"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "hits": { "hits": records } })),
        )
        .mount(server)
        .await;
}

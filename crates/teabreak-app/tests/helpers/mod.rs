//! Test helpers for screen tests against a mock TeaBreak server.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use teabreak_app::App;
use teabreak_client::{ClientConfig, HttpBackend};
use teabreak_core::defaults::ADMIN_ROLE;
use teabreak_core::{RecordKey, Session, UserProfile};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Successful envelope around `data`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": data, "message": "success"}))
}

/// Backend rejection with the given code and message.
pub fn rejected(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": code, "data": null, "message": message}))
}

pub fn backend(server: &MockServer) -> Arc<HttpBackend> {
    Arc::new(HttpBackend::new(ClientConfig::new(server.uri()).with_timeout_secs(5)).unwrap())
}

pub fn app(server: &MockServer) -> App {
    App::with_backend(backend(server))
}

pub fn profile(id: &str, username: &str, role: i64) -> UserProfile {
    UserProfile {
        id: Some(RecordKey::new(id)),
        username: Some(username.to_string()),
        email: Some(format!("{}@tea.break", username)),
        role: Some(role),
        ..Default::default()
    }
}

pub fn reader() -> Session {
    Session::signed_in(profile("7", "reader", 1))
}

pub fn admin() -> Session {
    Session::signed_in(profile("1", "root", ADMIN_ROLE))
}

/// Serve `/Users/GetInfoById` for each of the given users.
pub async fn mount_users(server: &MockServer, users: &[(&str, &str)]) {
    for (id, username) in users {
        Mock::given(method("GET"))
            .and(path("/Users/GetInfoById"))
            .and(query_param("id", *id))
            .respond_with(ok(json!({
                "id": id,
                "username": username,
                "email": format!("{}@tea.break", username),
            })))
            .mount(server)
            .await;
    }
}

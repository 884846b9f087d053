//! Shared fixtures for the HTTP-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{
        header::{CONTENT_TYPE, ETAG},
        HeaderMap, Method, Request, StatusCode,
    },
    Router,
};
use chrono::{NaiveDate, TimeZone, Utc};
use habit_api::{
    cache::InMemoryEtagStore,
    config::Config,
    entries::{Entry, EntrySource},
    handlers::USER_ID_HEADER,
    repository::InMemorySource,
    server,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub const USER: &str = "u_test";
pub const OTHER_USER: &str = "u_other";
pub const BASE_URL: &str = "http://localhost:8080";

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

pub fn entry(id: &str, habit: &str, d: u32, value: i32) -> Entry {
    Entry {
        id: id.to_string(),
        user_id: USER.to_string(),
        habit_id: habit.to_string(),
        value,
        notes: None,
        source: EntrySource::Manual,
        external_id: None,
        is_archived: false,
        date: day(d),
        created_at_utc: Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap(),
        updated_at_utc: None,
    }
}

pub struct TestApp {
    pub router: Router,
    pub etags: Arc<InMemoryEtagStore>,
}

impl TestApp {
    pub fn new(entries: Vec<Entry>) -> Self {
        let etags = Arc::new(InMemoryEtagStore::new());
        let state = AppState::builder()
            .config(Config::default())
            .etag_store(etags.clone())
            .entries(InMemorySource::from_records(entries))
            .build()
            .unwrap();

        Self {
            router: server::app(state),
            etags,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request(Method::GET, uri).body(Body::empty()).unwrap())
            .await
    }
}

/// Request builder carrying the test user's identity
pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, USER)
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    request(method, uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// ETag header without its quotes
    pub fn etag(&self) -> Option<String> {
        self.headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string())
    }

    pub fn ids(&self) -> Vec<String> {
        self.json()["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap().to_string())
            .collect()
    }

    /// Path and query of the link with relation `rel`, if present
    pub fn link(&self, rel: &str) -> Option<String> {
        self.json()["links"]
            .as_array()?
            .iter()
            .find(|link| link["rel"] == rel)
            .and_then(|link| link["href"].as_str())
            .map(|href| href.trim_start_matches(BASE_URL).to_string())
    }
}

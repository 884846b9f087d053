//! Entries API integration tests
//!
//! Drive the full router in-process: owner scoping, sort and field
//! validation, shaping, offset and keyset pagination, links and the
//! write endpoints.

#![allow(clippy::unwrap_used)]

mod common;

use axum::{
    body::Body,
    http::{header::ACCEPT, header::LOCATION, Method, Request, StatusCode},
};
use common::{entry, json_request, request, TestApp, BASE_URL, OTHER_USER};
use habit_api::{entries::Entry, links::HATEOAS_MEDIA_TYPE, pagination::Cursor};
use serde_json::json;

fn fixture() -> Vec<Entry> {
    let mut archived = entry("e_04", "h_run", 5, 1);
    archived.is_archived = true;

    let mut foreign = entry("e_06", "h_run", 1, 3);
    foreign.user_id = OTHER_USER.to_string();

    let mut noted = entry("e_03", "h_read", 2, 9);
    noted.notes = Some("Finished the chapter".to_string());

    vec![
        entry("e_01", "h_run", 1, 5),
        entry("e_02", "h_run", 3, 2),
        noted,
        archived,
        entry("e_05", "h_read", 4, 7),
        foreign,
    ]
}

fn app() -> TestApp {
    TestApp::new(fixture())
}

fn hateoas_get(uri: &str) -> Request<Body> {
    request(Method::GET, uri)
        .header(ACCEPT, HATEOAS_MEDIA_TYPE)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let app = app();
    let response = app
        .send(Request::get("/entries").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_default_listing_is_owner_scoped_and_ordered_by_id() {
    let app = app();
    let response = app.get("/entries").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.ids(), vec!["e_01", "e_02", "e_03", "e_04", "e_05"]);

    let body = response.json();
    assert_eq!(body["totalCount"], 5);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert!(body.get("links").is_none());
}

#[tokio::test]
async fn test_offset_envelope() {
    let app = app();

    let first = app.get("/entries?page=1&pageSize=2").await.json();
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["hasPreviousPage"], false);
    assert_eq!(first["hasNextPage"], true);

    let last = app.get("/entries?page=3&pageSize=2").await;
    assert_eq!(last.ids(), vec!["e_05"]);
    assert_eq!(last.json()["hasNextPage"], false);
    assert_eq!(last.json()["hasPreviousPage"], true);

    let beyond = app.get("/entries?page=9&pageSize=2").await;
    assert!(beyond.ids().is_empty());
    assert_eq!(beyond.json()["totalCount"], 5);
}

#[tokio::test]
async fn test_non_positive_paging_values_are_clamped() {
    let app = app();
    let body = app.get("/entries?page=0&pageSize=0").await.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 1);
    assert_eq!(body["totalPages"], 5);
}

#[tokio::test]
async fn test_sorting_through_mappings() {
    let app = app();

    assert_eq!(
        app.get("/entries?sort=date%20desc").await.ids(),
        vec!["e_04", "e_05", "e_02", "e_03", "e_01"]
    );
    assert_eq!(
        app.get("/entries?sort=value+desc").await.ids(),
        vec!["e_03", "e_05", "e_01", "e_02", "e_04"]
    );
    // age ascending is date descending
    assert_eq!(
        app.get("/entries?sort=age").await.ids(),
        app.get("/entries?sort=date%20desc").await.ids()
    );
    assert_eq!(
        app.get("/entries?sort=AGE%20DESC").await.ids(),
        vec!["e_01", "e_03", "e_02", "e_05", "e_04"]
    );
}

#[tokio::test]
async fn test_invalid_sort_is_rejected() {
    let app = app();
    let response = app.get("/entries?sort=colour%20desc").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "The provided sort parameter isn't valid: 'colour desc'");
    assert_eq!(body["parameter"], "sort");
}

#[tokio::test]
async fn test_invalid_fields_are_rejected_everywhere() {
    let app = app();
    for uri in [
        "/entries?fields=id,colour",
        "/entries/cursor?fields=id,colour",
        "/entries/e_01?fields=id,colour",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.json()["error"],
            "The provided fields parameter isn't valid: 'id,colour'"
        );
    }
}

#[tokio::test]
async fn test_field_selection_follows_declaration_order() {
    let app = app();
    let body = app.get("/entries?fields=VALUE,%20id").await.json();
    let first = body["items"][0].as_object().unwrap();

    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "value"]);
    assert_eq!(first["value"], 5);
}

#[tokio::test]
async fn test_filters() {
    let app = app();

    assert_eq!(app.get("/entries?habitId=h_read").await.ids(), vec!["e_03", "e_05"]);
    assert_eq!(app.get("/entries?isArchived=true").await.ids(), vec!["e_04"]);
    assert_eq!(
        app.get("/entries?fromDate=2025-03-02&toDate=2025-03-04").await.ids(),
        vec!["e_02", "e_03", "e_05"]
    );
    assert_eq!(app.get("/entries?q=chapter").await.ids(), vec!["e_03"]);
    assert_eq!(app.get("/entries?source=fileImport").await.ids().len(), 0);
}

#[tokio::test]
async fn test_cursor_walk_covers_every_entry_once() {
    let app = app();

    let first = app.send(hateoas_get("/entries/cursor?limit=2")).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.ids(), vec!["e_04", "e_05"]);

    let next = first.link("next-page").expect("second page link");
    let token = next
        .split("cursor=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap();
    let cursor = Cursor::decode(token).unwrap();
    assert_eq!(cursor.id, "e_05");

    let second = app.send(hateoas_get(&next)).await;
    assert_eq!(second.ids(), vec!["e_02", "e_03"]);

    let third = app
        .send(hateoas_get(&second.link("next-page").unwrap()))
        .await;
    assert_eq!(third.ids(), vec!["e_01"]);
    assert!(third.link("next-page").is_none());
}

#[tokio::test]
async fn test_cursor_envelope_without_links() {
    let app = app();
    let body = app.get("/entries/cursor?limit=2").await.json();

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["items"]);
}

#[tokio::test]
async fn test_undecodable_cursor_starts_from_the_beginning() {
    let app = app();
    let response = app.get("/entries/cursor?limit=2&cursor=not-a-cursor").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.ids(), vec!["e_04", "e_05"]);
}

#[tokio::test]
async fn test_cursor_respects_filters() {
    let app = app();
    let response = app
        .send(hateoas_get("/entries/cursor?limit=1&habitId=h_read"))
        .await;
    assert_eq!(response.ids(), vec!["e_05"]);

    let next = response.link("next-page").unwrap();
    assert!(next.contains("habitId=h_read"));
    assert_eq!(app.send(hateoas_get(&next)).await.ids(), vec!["e_03"]);
}

#[tokio::test]
async fn test_hateoas_links_on_offset_page() {
    let app = app();
    let body = app
        .send(hateoas_get("/entries?page=2&pageSize=2&sort=date%20desc"))
        .await
        .json();

    let rels: Vec<&str> = body["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["self", "create", "previous-page", "next-page"]);
    assert_eq!(
        body["links"][3]["href"],
        format!("{BASE_URL}/entries?page=3&pageSize=2&sort=date+desc")
    );

    let item = body["items"][0].as_object().unwrap();
    assert_eq!(item.keys().last().map(String::as_str), Some("links"));
    assert_eq!(item["links"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_item_links_reflect_archive_state() {
    let app = app();

    let archived = app.send(hateoas_get("/entries/e_04")).await.json();
    assert_eq!(archived["links"][3]["rel"], "un-archive");

    let active = app.send(hateoas_get("/entries/e_01?fields=id")).await.json();
    assert_eq!(active["links"][3]["rel"], "archive");
    assert_eq!(active["links"][0]["href"], format!("{BASE_URL}/entries/e_01?fields=id"));
    assert_eq!(active.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_foreign_or_missing_entry_is_not_found() {
    let app = app();
    assert_eq!(app.get("/entries/e_06").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/entries/e_99").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_then_get() {
    let app = app();
    let response = app
        .send(json_request(
            Method::POST,
            "/entries",
            &json!({ "habitId": "h_run", "value": 4, "date": "2025-03-06", "notes": "easy" }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.etag().is_none());

    let location = response.headers.get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with(&format!("{BASE_URL}/entries/e_")));

    let created = response.json();
    assert_eq!(created["source"], "manual");
    assert_eq!(created["isArchived"], false);

    let fetched = app
        .get(location.trim_start_matches(BASE_URL))
        .await
        .json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_validation() {
    let app = app();
    let response = app
        .send(json_request(
            Method::POST,
            "/entries",
            &json!({ "habitId": "h_run", "value": 0, "date": "2025-03-06" }),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Value must be greater than 0.");
}

#[tokio::test]
async fn test_archive_and_unarchive() {
    let app = app();

    let archive = request(Method::PUT, "/entries/e_01/archive")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(archive).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/entries?isArchived=true").await.ids(), vec!["e_01", "e_04"]);

    let unarchive = request(Method::PUT, "/entries/e_04/un-archive")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(unarchive).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/entries?isArchived=true").await.ids(), vec!["e_01"]);

    let foreign = request(Method::PUT, "/entries/e_06/archive")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(foreign).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete() {
    let app = app();
    let delete = request(Method::DELETE, "/entries/e_02")
        .body(Body::empty())
        .unwrap();

    assert_eq!(app.send(delete).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/entries/e_02").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/entries").await.json()["totalCount"], 4);
}

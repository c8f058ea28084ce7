use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, User, TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::HOST, "canvas.test")
        .header(http::header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    authed("POST", uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn multipart_request(uri: &str, key: &str, contents: &str) -> Request<String> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"key\"\r\n\r\n{key}\r\n\
         --{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n{contents}\r\n--{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap()
}

async fn start_upload(app: &Router) -> Value {
    let resp = app
        .clone()
        .oneshot(form_request(
            "/api/v1/courses/1/files",
            "name=notes.txt&size=5&parent_folder_path=handouts&on_duplicate=rename",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/courses/1/users")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], "Invalid access token.");
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/courses/1/users")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- pagination ---

#[tokio::test]
async fn first_page_links_to_second() {
    let resp = app()
        .oneshot(authed("GET", "/api/v1/courses/1/users").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let link = resp.headers()[http::header::LINK].to_str().unwrap().to_string();
    assert_eq!(
        link,
        "<http://canvas.test/api/v1/courses/1/users?page=2&per_page=2>; rel=\"next\""
    );
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].login_id, "ada");
}

#[tokio::test]
async fn last_page_has_no_link() {
    let resp = app()
        .oneshot(
            authed("GET", "/api/v1/courses/1/users?page=2&per_page=2")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.headers().get(http::header::LINK).is_none());
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].login_id, "alan");
}

#[tokio::test]
async fn unknown_course_returns_404() {
    let resp = app()
        .oneshot(authed("GET", "/api/v1/courses/99/users").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- users ---

#[tokio::test]
async fn profile_by_sis_login_id() {
    let resp = app()
        .oneshot(
            authed("GET", "/api/v1/users/sis_login_id:grace/profile")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, 102);
}

// --- calendar ---

#[tokio::test]
async fn created_event_is_listed_and_deleted() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(form_request(
            "/api/v1/calendar_events.json",
            "calendar_event%5Bcontext_code%5D=course_1&calendar_event%5Btitle%5D=Lecture+1\
             &calendar_event%5Bstart_at%5D=2024-01-08T10%3A00%3A00Z\
             &calendar_event%5Bend_at%5D=2024-01-08T11%3A15%3A00Z",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let event: Value = body_json(resp).await;
    assert_eq!(event["title"], "Lecture 1");
    let id = event["id"].as_u64().unwrap();

    let resp = app
        .clone()
        .oneshot(
            authed("GET", "/api/v1/calendar_events.json?context_codes%5B%5D=course_1")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let events: Vec<Value> = body_json(resp).await;
    assert_eq!(events.len(), 1);

    let resp = app
        .oneshot(
            authed("DELETE", &format!("/api/v1/calendar_events/{id}?cancel_reason=snow"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let deleted: Value = body_json(resp).await;
    assert_eq!(deleted["workflow_state"], "deleted");
    assert_eq!(deleted["cancel_reason"], "snow");
}

#[tokio::test]
async fn event_without_title_returns_400() {
    let resp = app()
        .oneshot(form_request(
            "/api/v1/calendar_events.json",
            "calendar_event%5Bcontext_code%5D=course_1",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- upload ---

#[tokio::test]
async fn upload_init_points_back_at_server() {
    let init = start_upload(&app()).await;
    let url = init["upload_url"].as_str().unwrap();
    let key = init["upload_params"]["key"].as_str().unwrap();
    assert_eq!(url, format!("http://canvas.test/files_api/upload/{key}"));
    assert_eq!(init["upload_params"]["filename"], "notes.txt");
}

#[tokio::test]
async fn upload_stores_file_once() {
    let app = app();
    let init = start_upload(&app).await;
    let key = init["upload_params"]["key"].as_str().unwrap();
    let uri = format!("/files_api/upload/{key}");

    let resp = app
        .clone()
        .oneshot(multipart_request(&uri, key, "hello"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let file: Value = body_json(resp).await;
    assert_eq!(file["display_name"], "notes.txt");
    assert_eq!(file["size"], 5);
    assert_eq!(file["content-type"], "text/plain");
    assert_eq!(file["folder"], "handouts");

    let resp = app
        .clone()
        .oneshot(multipart_request(&uri, key, "again"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(
            authed("GET", "/api/v1/courses/1/files?search_term=notes")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let files: Vec<Value> = body_json(resp).await;
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn upload_with_mismatched_key_returns_403() {
    let app = app();
    let init = start_upload(&app).await;
    let key = init["upload_params"]["key"].as_str().unwrap();

    let resp = app
        .oneshot(multipart_request(&format!("/files_api/upload/{key}"), "forged", "hello"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("do not match"));
}

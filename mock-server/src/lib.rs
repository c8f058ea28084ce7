//! In-memory stand-in for the parts of the Canvas API the client's
//! integration tests exercise: bearer auth, Link-header pagination, form
//! bodies, and the two-step file upload.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// The only access token the server accepts.
pub const TOKEN: &str = "mock-token";

/// Course that the seeded users are enrolled in.
pub const COURSE: u64 = 1;

const DEFAULT_PER_PAGE: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub login_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub context_code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_at: String,
    pub end_at: String,
    pub workflow_state: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: u64,
    pub display_name: String,
    pub folder: String,
    pub size: usize,
    #[serde(rename = "content-type")]
    pub content_type: String,
}

#[derive(Debug)]
struct PendingUpload {
    course: u64,
    name: String,
    folder: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    users: Vec<User>,
    enrollments: Vec<Value>,
    events: Vec<CalendarEvent>,
    pending: HashMap<String, PendingUpload>,
    files: HashMap<u64, Vec<StoredFile>>,
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

fn seeded() -> Store {
    let users = [("Ada Lovelace", "ada"), ("Grace Hopper", "grace"), ("Alan Turing", "alan")]
        .into_iter()
        .enumerate()
        .map(|(i, (name, login))| User {
            id: 101 + i as u64,
            name: name.to_string(),
            login_id: login.to_string(),
        })
        .collect();
    Store {
        next_id: 1000,
        users,
        ..Store::default()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seeded()));
    let api = Router::new()
        .route("/api/v1/courses/{course}/users", get(list_users))
        .route("/api/v1/users/{user}/profile", get(user_profile))
        .route("/api/v1/courses/{course}/enrollments", post(enroll))
        .route(
            "/api/v1/calendar_events.json",
            get(list_events).post(create_event),
        )
        .route("/api/v1/calendar_events/{id}", delete(delete_event))
        .route(
            "/api/v1/courses/{course}/files",
            get(list_files).post(start_upload),
        )
        .route_layer(middleware::from_fn(require_token));
    Router::new()
        .merge(api)
        .route("/files_api/upload/{key}", post(receive_upload))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn canvas_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errors": [{ "message": message }] }))).into_response()
}

async fn require_token(request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented != Some(TOKEN) {
        return canvas_error(StatusCode::UNAUTHORIZED, "Invalid access token.");
    }
    next.run(request).await
}

/// One page of `items` plus a `Link` header when more remain.
fn paginate<T: Serialize + Clone>(
    items: &[T],
    query: &HashMap<String, String>,
    headers: &HeaderMap,
    path: &str,
) -> Response {
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let per_page: usize = query
        .get("per_page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PER_PAGE)
        .max(1);
    let start = (page - 1) * per_page;
    let chunk: Vec<T> = items.iter().skip(start).take(per_page).cloned().collect();

    let mut response = Json(chunk).into_response();
    if start + per_page < items.len() {
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        let link = format!(
            "<http://{host}{path}?page={}&per_page={per_page}>; rel=\"next\"",
            page + 1
        );
        if let Ok(value) = link.parse() {
            response.headers_mut().insert(header::LINK, value);
        }
    }
    response
}

async fn list_users(
    State(db): State<Db>,
    Path(course): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if course != COURSE {
        return canvas_error(StatusCode::NOT_FOUND, "The specified resource does not exist.");
    }
    let store = db.read().await;
    paginate(&store.users, &query, &headers, &format!("/api/v1/courses/{course}/users"))
}

async fn user_profile(State(db): State<Db>, Path(user): Path<String>) -> Response {
    let Some(login) = user.strip_prefix("sis_login_id:") else {
        return canvas_error(StatusCode::BAD_REQUEST, "Only sis_login_id lookups are supported.");
    };
    let store = db.read().await;
    match store.users.iter().find(|u| u.login_id == login) {
        Some(found) => Json(found).into_response(),
        None => canvas_error(StatusCode::NOT_FOUND, "The specified resource does not exist."),
    }
}

async fn enroll(
    State(db): State<Db>,
    Path(course): Path<u64>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let Some(user_id) = form.get("enrollment[user_id]").and_then(|id| id.parse::<u64>().ok()) else {
        return canvas_error(StatusCode::BAD_REQUEST, "enrollment[user_id] is required");
    };
    let mut store = db.write().await;
    let id = store.allocate_id();
    let enrollment = json!({
        "id": id,
        "course_id": course,
        "user_id": user_id,
        "enrollment_state": form.get("enrollment[enrollment_state]").cloned().unwrap_or_else(|| "invited".to_string()),
        "type": "StudentEnrollment",
    });
    store.enrollments.push(enrollment.clone());
    Json(enrollment).into_response()
}

async fn list_events(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let store = db.read().await;
    let matching: Vec<CalendarEvent> = store
        .events
        .iter()
        .filter(|e| query.get("context_codes[]").map_or(true, |c| *c == e.context_code))
        .cloned()
        .collect();
    paginate(&matching, &query, &headers, "/api/v1/calendar_events.json")
}

async fn create_event(State(db): State<Db>, Form(form): Form<HashMap<String, String>>) -> Response {
    let field = |name: &str| form.get(&format!("calendar_event[{name}]")).cloned();
    let (Some(context_code), Some(title), Some(start_at), Some(end_at)) =
        (field("context_code"), field("title"), field("start_at"), field("end_at"))
    else {
        return canvas_error(StatusCode::BAD_REQUEST, "missing calendar_event fields");
    };
    let mut store = db.write().await;
    let event = CalendarEvent {
        id: store.allocate_id(),
        context_code,
        title,
        description: field("description").unwrap_or_default(),
        start_at,
        end_at,
        workflow_state: "active".to_string(),
    };
    store.events.push(event.clone());
    (StatusCode::CREATED, Json(event)).into_response()
}

async fn delete_event(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut store = db.write().await;
    let Some(index) = store.events.iter().position(|e| e.id == id) else {
        return canvas_error(StatusCode::NOT_FOUND, "The specified resource does not exist.");
    };
    let mut event = serde_json::to_value(store.events.remove(index)).unwrap_or_default();
    event["workflow_state"] = json!("deleted");
    event["cancel_reason"] = json!(query.get("cancel_reason"));
    Json(event).into_response()
}

async fn list_files(
    State(db): State<Db>,
    Path(course): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let store = db.read().await;
    let term = query.get("search_term").map(String::as_str).unwrap_or("");
    let matching: Vec<StoredFile> = store
        .files
        .get(&course)
        .into_iter()
        .flatten()
        .filter(|f| f.display_name.contains(term))
        .cloned()
        .collect();
    paginate(&matching, &query, &headers, &format!("/api/v1/courses/{course}/files"))
}

/// Step one of an upload: hand out a one-time URL and signed params.
async fn start_upload(
    State(db): State<Db>,
    Path(course): Path<u64>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let Some(name) = form.get("name").cloned() else {
        return canvas_error(StatusCode::BAD_REQUEST, "name is required");
    };
    let folder = form.get("parent_folder_path").cloned().unwrap_or_default();
    let key = Uuid::new_v4().simple().to_string();
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    db.write().await.pending.insert(
        key.clone(),
        PendingUpload {
            course,
            name: name.clone(),
            folder,
        },
    );
    Json(json!({
        "upload_url": format!("http://{host}/files_api/upload/{key}"),
        "upload_params": { "key": key, "filename": name },
    }))
    .into_response()
}

/// Step two: the file store. Takes no bearer token, only the signed key.
async fn receive_upload(State(db): State<Db>, Path(key): Path<String>, mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    let mut contents = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return canvas_error(StatusCode::BAD_REQUEST, &e.to_string()),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            match field.bytes().await {
                Ok(bytes) => contents = Some((content_type, bytes)),
                Err(e) => return canvas_error(StatusCode::BAD_REQUEST, &e.to_string()),
            }
        } else {
            match field.text().await {
                Ok(text) => {
                    fields.insert(name, text);
                }
                Err(e) => return canvas_error(StatusCode::BAD_REQUEST, &e.to_string()),
            }
        }
    }

    if fields.get("key") != Some(&key) {
        return canvas_error(StatusCode::FORBIDDEN, "upload params do not match the upload URL");
    }
    let Some((content_type, bytes)) = contents else {
        return canvas_error(StatusCode::BAD_REQUEST, "file part is missing");
    };
    let mut store = db.write().await;
    let Some(pending) = store.pending.remove(&key) else {
        return canvas_error(StatusCode::NOT_FOUND, "upload URL already used");
    };
    let file = StoredFile {
        id: store.allocate_id(),
        display_name: pending.name,
        folder: pending.folder,
        size: bytes.len(),
        content_type,
    };
    store.files.entry(pending.course).or_default().push(file.clone());
    (StatusCode::CREATED, Json(file)).into_response()
}

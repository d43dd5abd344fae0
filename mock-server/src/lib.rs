//! In-memory stand-in for the Graylog REST API.
//!
//! Serves the client's endpoint catalog under `/api`, checks Basic auth
//! (`<token>:token`) on every catalog route, and keeps users in memory so
//! create/read/status/delete flows can be exercised over real HTTP. The
//! `/api/mock/*` routes misbehave on purpose.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token accepted by `app()`.
pub const API_TOKEN: &str = "mock-api-token";

/// Id of the single node in the mock cluster.
pub const NODE_ID: &str = "2b3c4d5e-0000-4000-8000-000000000001";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub account_status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn first_page() -> usize {
    1
}

fn default_per_page() -> usize {
    50
}

pub type Db = Arc<RwLock<HashMap<String, User>>>;

#[derive(Clone)]
struct AppState {
    authorization: Arc<String>,
    users: Db,
}

type ApiFailure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(json!({"type": "ApiError", "message": message.into()})),
    )
}

/// Router accepting `API_TOKEN`.
pub fn app() -> Router {
    app_with_token(API_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        authorization: Arc::new(format!("Basic {}", STANDARD.encode(format!("{token}:token")))),
        users: Arc::new(RwLock::new(HashMap::new())),
    };

    let api = Router::new()
        .route("/authz/grants-overview", get(grants_overview))
        .route("/authz/roles", get(roles))
        .route("/authz/roles/user/{username}", get(roles_of_user))
        .route("/authz/roles/{role_id}", get(role_by_id))
        .route("/authz/roles/{role_id}/assignees", get(assignees_of_role))
        .route("/ca", get(ca))
        .route("/certificates", get(certificates))
        .route("/cluster", get(cluster))
        .route("/cluster/processbufferdump", get(local_process_buffer_dump))
        .route("/cluster/{node_id}/processbufferdump", get(process_buffer_dump))
        .route("/cluster/{node_id}/jvm", get(jvm))
        .route("/streams", get(streams))
        .route("/users", get(list_users).post(create_user))
        .route("/users/paginated", get(list_users_paginated))
        .route("/users/id/{user_id}", get(get_user_by_id).delete(delete_user_by_id))
        .route(
            "/users/{user}",
            get(get_user_by_username).delete(delete_user_by_username),
        )
        .route("/users/{user}/tokens", get(user_tokens))
        .route("/users/{user}/status/{status}", put(change_user_status))
        .route("/views", get(views))
        .route("/views/{view_id}", get(view_by_id))
        .route("/mock/not-json", get(not_json))
        .route("/mock/html-error", get(html_error))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .fallback(not_found)
        .with_state(state);

    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(state.authorization.as_str()) {
        tracing::debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(request).await
}

async fn not_found() -> ApiFailure {
    failure(StatusCode::NOT_FOUND, "HTTP 404 Not Found")
}

// --- authz ---

async fn grants_overview() -> Json<Value> {
    Json(json!({"grants": [], "missing_grantees": []}))
}

fn admin_role() -> Value {
    json!({"id": "admin-role", "name": "Admin", "read_only": true})
}

async fn roles(Query(page): Query<Page>) -> Json<Value> {
    Json(json!({"total": 1, "page": page.page, "per_page": page.per_page, "roles": [admin_role()]}))
}

async fn roles_of_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let users = state.users.read().await;
    if !users.values().any(|u| u.username == username) {
        return Err(failure(StatusCode::NOT_FOUND, format!("User <{username}> not found.")));
    }
    Ok(Json(json!({"total": 1, "roles": [admin_role()]})))
}

async fn role_by_id(Path(role_id): Path<String>) -> Result<Json<Value>, ApiFailure> {
    if role_id == "admin-role" {
        Ok(Json(admin_role()))
    } else {
        Err(failure(StatusCode::NOT_FOUND, format!("Role <{role_id}> not found.")))
    }
}

async fn assignees_of_role(Path(role_id): Path<String>) -> Json<Value> {
    Json(json!({"role_id": role_id, "total": 0, "users": []}))
}

// --- ca / certificates ---

async fn ca() -> Json<Value> {
    Json(json!({"id": "graylog-ca", "type": "GENERATED"}))
}

async fn certificates() -> Json<Value> {
    Json(json!({"certificates": []}))
}

// --- cluster ---

async fn cluster() -> Json<Value> {
    Json(json!({NODE_ID: {"node_id": NODE_ID, "is_leader": true, "lifecycle": "running"}}))
}

async fn local_process_buffer_dump() -> Json<Value> {
    Json(json!({"processbuffer_dump": {"ProcessBufferProcessor #0": "idle"}}))
}

async fn process_buffer_dump(Path(node_id): Path<String>) -> Result<Json<Value>, ApiFailure> {
    if node_id != NODE_ID {
        return Err(failure(StatusCode::NOT_FOUND, format!("Node {node_id} not found.")));
    }
    Ok(Json(json!({"node_id": node_id, "processbuffer_dump": {}})))
}

async fn jvm(Path(node_id): Path<String>) -> Result<Json<Value>, ApiFailure> {
    if node_id != NODE_ID {
        return Err(failure(StatusCode::NOT_FOUND, format!("Node {node_id} not found.")));
    }
    Ok(Json(json!({"node_id": node_id, "info": "OpenJDK 17", "used_memory": {"bytes": 1024}})))
}

// --- streams / views ---

async fn streams() -> Json<Value> {
    Json(json!({"total": 1, "streams": [{"id": "000000000000000000000001", "title": "Default Stream"}]}))
}

async fn views(Query(page): Query<Page>) -> Json<Value> {
    Json(json!({"total": 0, "page": page.page, "per_page": page.per_page, "views": []}))
}

async fn view_by_id(Path(view_id): Path<String>) -> ApiFailure {
    failure(StatusCode::NOT_FOUND, format!("View {view_id} not found."))
}

// --- users ---

async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let users = state.users.read().await;
    let mut all: Vec<User> = users.values().cloned().collect();
    all.sort_by(|a, b| a.username.cmp(&b.username));
    Json(json!({"users": all}))
}

async fn list_users_paginated(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Json<Value> {
    let users = state.users.read().await;
    let mut all: Vec<User> = users.values().cloned().collect();
    all.sort_by(|a, b| a.username.cmp(&b.username));
    let total = all.len();
    let start = page.page.saturating_sub(1).saturating_mul(page.per_page);
    let slice: Vec<User> = all.into_iter().skip(start).take(page.per_page).collect();
    Json(json!({"total": total, "page": page.page, "per_page": page.per_page, "users": slice}))
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    if input.password.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "Password must not be empty."));
    }
    let mut users = state.users.write().await;
    if users.values().any(|u| u.username == input.username) {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            format!("User {} already exists.", input.username),
        ));
    }
    let user = User {
        id: Uuid::new_v4().simple().to_string(),
        username: input.username,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        permissions: input.permissions,
        account_status: "enabled".to_string(),
        extra: input.extra,
    };
    tracing::debug!(id = %user.id, username = %user.username, "created user");
    users.insert(user.id.clone(), user.clone());
    Ok((StatusCode::CREATED, Json(json!({"id": user.id}))))
}

async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiFailure> {
    let users = state.users.read().await;
    users
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Couldn't find user {user_id}")))
}

async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiFailure> {
    let users = state.users.read().await;
    users
        .values()
        .find(|u| u.username == username)
        .cloned()
        .map(Json)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Couldn't find user {username}")))
}

async fn user_tokens(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, ApiFailure> {
    let users = state.users.read().await;
    if !users.contains_key(&user_id) {
        return Err(failure(StatusCode::NOT_FOUND, format!("Couldn't find user {user_id}")));
    }
    Ok(Json(json!({"tokens": []})))
}

/// Graylog answers deletes with 204 and no body.
async fn delete_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let mut users = state.users.write().await;
    users
        .remove(&user_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Couldn't find user {user_id}")))
}

async fn delete_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let mut users = state.users.write().await;
    let id = users
        .values()
        .find(|u| u.username == username)
        .map(|u| u.id.clone())
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Couldn't find user {username}")))?;
    users.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn change_user_status(
    State(state): State<AppState>,
    Path((user_id, status)): Path<(String, String)>,
) -> Result<Json<User>, ApiFailure> {
    if !matches!(status.as_str(), "enabled" | "disabled" | "deleted") {
        return Err(failure(StatusCode::BAD_REQUEST, format!("Invalid status {status}")));
    }
    let mut users = state.users.write().await;
    let user = users
        .get_mut(&user_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("Couldn't find user {user_id}")))?;
    user.account_status = status;
    Ok(Json(user.clone()))
}

// --- deliberately malformed ---

async fn not_json() -> (StatusCode, &'static str) {
    (StatusCode::OK, "this is not json")
}

async fn html_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>Internal Server Error</body></html>",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_extra_fields_inline() {
        let mut extra = Map::new();
        extra.insert("timezone".into(), json!("UTC"));
        let user = User {
            id: "abc".to_string(),
            username: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.org".to_string(),
            permissions: Vec::new(),
            account_status: "enabled".to_string(),
            extra,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["timezone"], "UTC");
        assert_eq!(json["account_status"], "enabled");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn create_user_defaults_permissions_to_empty() {
        let input: CreateUser = serde_json::from_str(
            r#"{"username":"jdoe","first_name":"Jane","last_name":"Doe","email":"j@x","password":"pw"}"#,
        )
        .unwrap();
        assert!(input.permissions.is_empty());
        assert!(input.extra.is_empty());
    }

    #[test]
    fn create_user_keeps_unknown_fields() {
        let input: CreateUser = serde_json::from_str(
            r#"{"username":"jdoe","first_name":"J","last_name":"D","email":"j@x","password":"pw","timezone":"UTC"}"#,
        )
        .unwrap();
        assert_eq!(input.extra["timezone"], "UTC");
    }

    #[test]
    fn create_user_rejects_missing_username() {
        let result: Result<CreateUser, _> = serde_json::from_str(
            r#"{"first_name":"J","last_name":"D","email":"j@x","password":"pw"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn page_defaults() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 50);
    }
}

//! Request handlers for the mock admin API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use oscode_records::{
    Ack, ContactMessage, DashboardOverview, DashboardStats, ErrorBody, Event, LoginRequest,
    LoginResponse, LogoutRequest, TeamMember, UploadResponse, VerifyResponse,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{new_id, MockState};
use crate::resource::{Resource, ResourceKind};

type Rejection = (StatusCode, Json<ErrorBody>);
type Reply<T> = Result<Json<T>, Rejection>;

fn reject(status: StatusCode, detail: impl Into<String>) -> Rejection {
    (status, Json(ErrorBody::new(detail)))
}

fn not_found(kind: ResourceKind) -> Rejection {
    let label = kind.label();
    let mut chars = label.chars();
    let label = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    reject(StatusCode::NOT_FOUND, format!("{} not found", label))
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionQuery {
    session_id: Option<String>,
}

impl MockState {
    /// Resolve the query's session or fail with 401.
    async fn require_session(&self, query: &SessionQuery) -> Result<String, Rejection> {
        let Some(token) = query.session_id.as_deref() else {
            return Err(reject(StatusCode::UNAUTHORIZED, "Session required"));
        };
        self.session_user(token)
            .await
            .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid or expired session"))
    }
}

fn resource_kind(path: &str) -> Result<ResourceKind, Rejection> {
    ResourceKind::from_path(path).ok_or_else(|| reject(StatusCode::NOT_FOUND, "Not found"))
}

/// Check `body` against the record type for `kind` and return the stored
/// form, without `id`/`created_at`.
fn normalize(kind: ResourceKind, body: Value) -> Result<Value, Rejection> {
    match kind {
        ResourceKind::TeamMember => normalize_as::<TeamMember>(body),
        ResourceKind::Event => normalize_as::<Event>(body),
        ResourceKind::ContactMessage => normalize_as::<ContactMessage>(body),
    }
}

fn normalize_as<R: Resource>(body: Value) -> Result<Value, Rejection> {
    let record: R = serde_json::from_value(body).map_err(|e| {
        reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Invalid {}: {}", R::KIND.label(), e),
        )
    })?;
    if let Some(spec) = record.missing_required() {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{} is required", spec.label),
        ));
    }

    let mut value = serde_json::to_value(record)
        .map_err(|e| reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("id");
        obj.remove("created_at");
    }
    Ok(value)
}

fn decode_all<R: DeserializeOwned>(values: &[Value]) -> Vec<R> {
    values
        .iter()
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

fn is_active(value: &Value) -> bool {
    value.get("is_active").and_then(Value::as_bool).unwrap_or(true)
}

impl MockState {
    /// Store `record` under a fresh id; returns the id.
    async fn insert(&self, kind: ResourceKind, mut record: Value) -> String {
        let id = new_id();
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.clone()));
            obj.insert(
                "created_at".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
        self.store
            .write()
            .await
            .collections
            .entry(kind)
            .or_default()
            .push(record);
        id
    }

    async fn snapshot(&self, kind: ResourceKind) -> Vec<Value> {
        self.store
            .read()
            .await
            .collections
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

// ---- auth ----

pub(super) async fn login(
    State(state): State<MockState>,
    Json(req): Json<LoginRequest>,
) -> Reply<LoginResponse> {
    if !state.check_password(&req.username, &req.password) {
        warn!("Rejected login for {}", req.username);
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    let session_id = state.open_session(&req.username).await;
    info!("Opened session for {}", req.username);
    Ok(Json(LoginResponse {
        session_id,
        username: Some(req.username),
        message: Some("Login successful".to_string()),
    }))
}

pub(super) async fn verify(
    State(state): State<MockState>,
    Query(query): Query<SessionQuery>,
) -> Reply<VerifyResponse> {
    let username = state.require_session(&query).await?;
    Ok(Json(VerifyResponse {
        username,
        valid: true,
    }))
}

pub(super) async fn logout(
    State(state): State<MockState>,
    Json(req): Json<LogoutRequest>,
) -> Json<Ack> {
    if state.close_session(&req.session_id).await {
        info!("Closed session");
    }
    Json(Ack::message("Logged out successfully"))
}

// ---- admin collections ----

pub(super) async fn list(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Reply<Vec<Value>> {
    let kind = resource_kind(&resource)?;
    state.require_session(&query).await?;
    Ok(Json(state.snapshot(kind).await))
}

pub(super) async fn create(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    Query(query): Query<SessionQuery>,
    Json(body): Json<Value>,
) -> Reply<Ack> {
    let kind = resource_kind(&resource)?;
    state.require_session(&query).await?;
    if !kind.is_editable() {
        return Err(reject(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }

    let record = normalize(kind, body)?;
    let id = state.insert(kind, record).await;
    debug!(%kind, %id, "Created record");
    Ok(Json(Ack {
        message: Some(format!("{} created successfully", kind.label())),
        id: Some(id),
    }))
}

pub(super) async fn update(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, String)>,
    Query(query): Query<SessionQuery>,
    Json(body): Json<Value>,
) -> Reply<Ack> {
    let kind = resource_kind(&resource)?;
    state.require_session(&query).await?;
    if !kind.is_editable() {
        return Err(reject(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"));
    }
    let mut record = normalize(kind, body)?;

    let mut store = state.store.write().await;
    let existing = store
        .collections
        .get_mut(&kind)
        .and_then(|records| {
            records
                .iter_mut()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
        })
        .ok_or_else(|| not_found(kind))?;

    if let Some(obj) = record.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.clone()));
        if let Some(created_at) = existing.get("created_at") {
            obj.insert("created_at".to_string(), created_at.clone());
        }
    }
    *existing = record;
    debug!(%kind, %id, "Updated record");
    Ok(Json(Ack::message(format!("{} updated successfully", kind.label()))))
}

pub(super) async fn delete(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, String)>,
    Query(query): Query<SessionQuery>,
) -> Reply<Ack> {
    let kind = resource_kind(&resource)?;
    state.require_session(&query).await?;

    let mut store = state.store.write().await;
    let records = store.collections.entry(kind).or_default();
    let before = records.len();
    records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
    if records.len() == before {
        return Err(not_found(kind));
    }
    debug!(%kind, %id, "Deleted record");
    Ok(Json(Ack::message(format!("{} deleted successfully", kind.label()))))
}

pub(super) async fn dashboard(
    State(state): State<MockState>,
    Query(query): Query<SessionQuery>,
) -> Reply<DashboardOverview> {
    state.require_session(&query).await?;

    let events: Vec<Event> = decode_all(&state.snapshot(ResourceKind::Event).await);
    let members = state.snapshot(ResourceKind::TeamMember).await;
    let contacts: Vec<ContactMessage> =
        decode_all(&state.snapshot(ResourceKind::ContactMessage).await);

    let stats = DashboardStats {
        total_events: events.len() as u64,
        active_events: events.iter().filter(|e| e.is_active).count() as u64,
        total_team_members: members.len() as u64,
        total_contacts: contacts.len() as u64,
    };

    Ok(Json(DashboardOverview {
        stats,
        recent_contacts: contacts.into_iter().rev().take(5).collect(),
        recent_events: events.into_iter().rev().take(3).collect(),
    }))
}

// ---- uploads ----

fn bad_multipart(e: MultipartError) -> Rejection {
    reject(StatusCode::BAD_REQUEST, e.body_text())
}

/// Stored name: random stem, extension from the original file name or the
/// content type.
fn stored_name(file_name: Option<&str>, content_type: &str) -> String {
    let ext = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(content_type)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        });

    match ext {
        Some(ext) => format!("{}.{}", new_id(), ext),
        None => new_id(),
    }
}

pub(super) async fn upload_image(
    State(state): State<MockState>,
    mut multipart: Multipart,
) -> Reply<UploadResponse> {
    let mut session_id = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name() {
            Some("session_id") => {
                session_id = Some(field.text().await.map_err(bad_multipart)?);
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    state
        .require_session(&SessionQuery { session_id })
        .await?;
    let Some((file_name, content_type, bytes)) = file else {
        return Err(reject(StatusCode::BAD_REQUEST, "No file provided"));
    };
    if !content_type.to_ascii_lowercase().starts_with("image/") {
        warn!("Refused upload with content type {:?}", content_type);
        return Err(reject(StatusCode::BAD_REQUEST, "File must be an image"));
    }

    let name = stored_name(file_name.as_deref(), &content_type);
    info!("Stored upload {} ({} bytes)", name, bytes.len());
    state
        .store
        .write()
        .await
        .uploads
        .insert(name.clone(), bytes.to_vec());

    Ok(Json(UploadResponse {
        image_url: format!("/uploads/{}", name),
    }))
}

pub(super) async fn serve_upload(
    State(state): State<MockState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let bytes = state
        .store
        .read()
        .await
        .uploads
        .get(&name)
        .cloned()
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "File not found"))?;

    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}

// ---- public site ----

pub(super) async fn public_team(State(state): State<MockState>) -> Json<Vec<Value>> {
    let members = state.snapshot(ResourceKind::TeamMember).await;
    Json(members.into_iter().filter(is_active).collect())
}

pub(super) async fn public_events(State(state): State<MockState>) -> Json<Vec<Value>> {
    let events = state.snapshot(ResourceKind::Event).await;
    Json(events.into_iter().filter(is_active).collect())
}

pub(super) async fn submit_contact(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> Reply<Ack> {
    let record = normalize(ResourceKind::ContactMessage, body)?;
    let id = state.insert(ResourceKind::ContactMessage, record).await;
    info!(%id, "Received contact message");
    Ok(Json(Ack {
        message: Some("Message sent successfully".to_string()),
        id: Some(id),
    }))
}

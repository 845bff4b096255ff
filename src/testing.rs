//! In-memory [`AdminApi`] for unit tests.

use async_trait::async_trait;
use oscode_records::{
    Ack, ContactMessage, DashboardOverview, DashboardStats, Event, LoginRequest, LoginResponse,
    TeamMember, UploadResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{Mutex, MutexGuard};

use crate::api::{AdminApi, ApiError, ApiResult, CallContext};
use crate::resource::ResourceKind;
use crate::session::SessionContext;
use crate::upload::ImageAsset;

pub(crate) const PASSWORD: &str = "oscode2024";

/// A team member with every required field filled.
pub(crate) fn member(name: &str) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        role: "Member".to_string(),
        year: "1st Year".to_string(),
        department: "CSE".to_string(),
        bio: format!("{} writes code", name),
        ..Default::default()
    }
}

pub(crate) fn event(title: &str) -> Event {
    Event {
        title: title.to_string(),
        description: "Hands-on session".to_string(),
        date: "2024-03-01".to_string(),
        time: "17:00".to_string(),
        venue: "Lab 2".to_string(),
        ..Default::default()
    }
}

#[derive(Default)]
struct FakeState {
    /// token -> username
    sessions: HashMap<String, String>,
    records: HashMap<ResourceKind, Vec<Value>>,
    calls: HashMap<&'static str, usize>,
    uploads: Vec<String>,
    offline: bool,
    next_id: u64,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn with_id(&mut self, kind: ResourceKind, mut value: Value) -> Value {
        if let Value::Object(map) = &mut value {
            if !map.contains_key("id") {
                let id = self.next_id(kind.path());
                map.insert("id".to_string(), Value::String(id));
            }
        }
        value
    }

    fn username(&self, token: &str) -> ApiResult<String> {
        self.sessions
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Status(StatusCode::UNAUTHORIZED, "Invalid session".to_string()))
    }

    fn collection(&mut self, kind: ResourceKind) -> &mut Vec<Value> {
        self.records.entry(kind).or_default()
    }

    fn decoded<R: DeserializeOwned>(&self, kind: ResourceKind) -> Vec<R> {
        self.records
            .get(&kind)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn id_of(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn not_found(kind: ResourceKind) -> ApiError {
    ApiError::Status(
        StatusCode::NOT_FOUND,
        format!("{} not found", kind.label()),
    )
}

/// Admin API that keeps everything in memory and counts calls per
/// operation. Behaves like the real service for the contract the console
/// relies on: 401 for unknown tokens, 404 for unknown ids, ids assigned on
/// create.
#[derive(Default)]
pub(crate) struct FakeAdminApi {
    state: Mutex<FakeState>,
}

impl FakeAdminApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session directly, skipping `login`.
    pub async fn open_session(&self, username: &str) -> SessionContext {
        let mut state = self.state.lock().await;
        let token = state.next_id("token");
        state.sessions.insert(token.clone(), username.to_string());
        SessionContext::new(token, Some(username.to_string()))
    }

    /// Replace the server-side collection, assigning ids where missing.
    pub async fn seed<R: Serialize>(&self, kind: ResourceKind, records: Vec<R>) {
        let mut state = self.state.lock().await;
        let mut values = Vec::with_capacity(records.len());
        for record in records {
            let value = serde_json::to_value(record).unwrap_or(Value::Null);
            values.push(state.with_id(kind, value));
        }
        state.records.insert(kind, values);
    }

    pub async fn records<R: DeserializeOwned>(&self, kind: ResourceKind) -> Vec<R> {
        self.state.lock().await.decoded(kind)
    }

    pub async fn calls(&self, op: &str) -> usize {
        self.state.lock().await.calls.get(op).copied().unwrap_or(0)
    }

    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.values().sum()
    }

    /// Every subsequent request fails as if the server were unreachable.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Drop all server-side sessions; tokens held by callers stop working.
    pub async fn expire_all(&self) {
        self.state.lock().await.sessions.clear();
    }

    pub async fn uploads(&self) -> Vec<String> {
        self.state.lock().await.uploads.clone()
    }

    /// Count the call, then apply cancellation and the offline switch.
    async fn enter(
        &self,
        op: &'static str,
        ctx: &CallContext,
    ) -> ApiResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().await;
        *state.calls.entry(op).or_insert(0) += 1;
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        if state.offline {
            return Err(ApiError::Timeout);
        }
        Ok(state)
    }
}

#[async_trait]
impl AdminApi for FakeAdminApi {
    async fn login(
        &self,
        credentials: &LoginRequest,
        ctx: &CallContext,
    ) -> ApiResult<LoginResponse> {
        let mut state = self.enter("login", ctx).await?;
        if credentials.username != "admin" || credentials.password != PASSWORD {
            return Err(ApiError::Status(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".to_string(),
            ));
        }
        let token = state.next_id("token");
        state
            .sessions
            .insert(token.clone(), credentials.username.clone());
        Ok(LoginResponse {
            session_id: token,
            username: Some(credentials.username.clone()),
            message: Some("Login successful".to_string()),
        })
    }

    async fn verify(&self, token: &str, ctx: &CallContext) -> ApiResult<Option<String>> {
        let state = self.enter("verify", ctx).await?;
        state.username(token).map(Some)
    }

    async fn logout(&self, token: &str, ctx: &CallContext) -> ApiResult<()> {
        let mut state = self.enter("logout", ctx).await?;
        state.sessions.remove(token);
        Ok(())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        token: &str,
        ctx: &CallContext,
    ) -> ApiResult<Vec<Value>> {
        let mut state = self.enter("list", ctx).await?;
        state.username(token)?;
        Ok(state.collection(kind).clone())
    }

    async fn create(
        &self,
        kind: ResourceKind,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let mut state = self.enter("create", ctx).await?;
        state.username(token)?;
        let mut value = record.clone();
        if let Value::Object(map) = &mut value {
            map.remove("id");
        }
        let value = state.with_id(kind, value);
        let id = id_of(&value).map(str::to_string);
        state.collection(kind).push(value);
        Ok(Ack {
            message: Some("Created".to_string()),
            id,
        })
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        record: &Value,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let mut state = self.enter("update", ctx).await?;
        state.username(token)?;
        let slot = state
            .collection(kind)
            .iter_mut()
            .find(|value| id_of(value) == Some(id))
            .ok_or_else(|| not_found(kind))?;
        let mut value = record.clone();
        if let Value::Object(map) = &mut value {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        *slot = value;
        Ok(Ack::message("Updated"))
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        id: &str,
        token: &str,
        ctx: &CallContext,
    ) -> ApiResult<Ack> {
        let mut state = self.enter("delete", ctx).await?;
        state.username(token)?;
        let items = state.collection(kind);
        let before = items.len();
        items.retain(|value| id_of(value) != Some(id));
        if items.len() == before {
            return Err(not_found(kind));
        }
        Ok(Ack::message("Deleted"))
    }

    async fn upload_image(
        &self,
        token: &str,
        asset: &ImageAsset,
        ctx: &CallContext,
    ) -> ApiResult<UploadResponse> {
        let mut state = self.enter("upload", ctx).await?;
        state.username(token)?;
        let path = format!("/uploads/{}-{}", state.next_id("img"), asset.file_name);
        state.uploads.push(path.clone());
        Ok(UploadResponse { image_url: path })
    }

    async fn dashboard(&self, token: &str, ctx: &CallContext) -> ApiResult<DashboardOverview> {
        let state = self.enter("dashboard", ctx).await?;
        state.username(token)?;
        let events: Vec<Event> = state.decoded(ResourceKind::Event);
        let members: Vec<TeamMember> = state.decoded(ResourceKind::TeamMember);
        let contacts: Vec<ContactMessage> = state.decoded(ResourceKind::ContactMessage);

        Ok(DashboardOverview {
            stats: DashboardStats {
                total_events: events.len() as u64,
                active_events: events.iter().filter(|e| e.is_active).count() as u64,
                total_team_members: members.len() as u64,
                total_contacts: contacts.len() as u64,
            },
            recent_contacts: contacts.into_iter().rev().take(5).collect(),
            recent_events: events.into_iter().rev().take(3).collect(),
        })
    }
}

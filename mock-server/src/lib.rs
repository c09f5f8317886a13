use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-key";

/// Points needed to complete the single demo step (and with it the circuit).
pub const STEP_THRESHOLD: i64 = 3;

pub const CIRCUIT_NAME: &str = "Onboarding";
pub const REWARD_NAME: &str = "Onboarding complete";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndUser {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInput {
    pub user_id: String,
    pub event_name: String,
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResult {
    pub success: bool,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub step_completed: bool,
    pub circuit_completed: bool,
    pub already_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    pub rewards: Vec<RewardName>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardName {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub metadata: Map<String, Value>,
    pub progressions: Vec<Circuit>,
    pub rewards: Vec<Reward>,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub created_at: String,
    pub last_login: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub points: i64,
    pub status: String,
    pub start_date: Option<String>,
    pub completed_at: Option<String>,
    pub step_progressions: Vec<Step>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub status: String,
    pub completed_at: Option<String>,
    pub completion_threshold: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub obtained_at: String,
    pub step_id: Option<String>,
    pub step_name: Option<String>,
    pub circuit_id: String,
    pub circuit_name: String,
    pub unlock_on_circuit_completion: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInput {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionInput {
    pub user_id: String,
    pub circuit_id: String,
    pub amount: i64,
}

struct StoredUser {
    user: EndUser,
    circuit_id: String,
    step_id: String,
    points: i64,
    started_at: Option<String>,
    completed_at: Option<String>,
    rewards: Vec<Reward>,
    current_streak: i64,
    longest_streak: i64,
    created_at: String,
    last_login: String,
}

impl StoredUser {
    fn new(user: EndUser) -> Self {
        let now = now();
        Self {
            user,
            circuit_id: Uuid::new_v4().to_string(),
            step_id: Uuid::new_v4().to_string(),
            points: 0,
            started_at: None,
            completed_at: None,
            rewards: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            created_at: now.clone(),
            last_login: now,
        }
    }

    fn progress(&mut self, amount: i64, at: String) -> TrackingResult {
        if self.completed_at.is_some() {
            return TrackingResult {
                success: true,
                updated: false,
                message: Some("Circuit already completed".to_string()),
                step_completed: false,
                circuit_completed: false,
                already_completed: true,
                points: None,
                rewards: Vec::new(),
            };
        }

        self.started_at.get_or_insert_with(|| at.clone());
        self.points += amount;

        if self.points < STEP_THRESHOLD {
            return TrackingResult {
                success: true,
                updated: true,
                message: Some("Progress recorded".to_string()),
                step_completed: false,
                circuit_completed: false,
                already_completed: false,
                points: Some(self.points),
                rewards: Vec::new(),
            };
        }

        self.completed_at = Some(at.clone());
        self.rewards.push(Reward {
            id: Uuid::new_v4().to_string(),
            name: REWARD_NAME.to_string(),
            description: "Finished the onboarding circuit".to_string(),
            obtained_at: at,
            step_id: None,
            step_name: None,
            circuit_id: self.circuit_id.clone(),
            circuit_name: CIRCUIT_NAME.to_string(),
            unlock_on_circuit_completion: Some(true),
        });
        TrackingResult {
            success: true,
            updated: true,
            message: Some("Circuit completed".to_string()),
            step_completed: true,
            circuit_completed: true,
            already_completed: false,
            points: Some(self.points),
            rewards: vec![RewardName {
                name: REWARD_NAME.to_string(),
            }],
        }
    }

    fn profile(&self) -> Profile {
        let (circuit_status, step_status) = match (&self.started_at, &self.completed_at) {
            (_, Some(_)) => ("completed", "completed"),
            (Some(_), None) => ("in_progress", "in_progress"),
            (None, None) => ("not_started", "not_started"),
        };
        Profile {
            id: self.user.id.clone(),
            full_name: self.user.full_name.clone(),
            email: self.user.email.clone(),
            picture: self.user.picture.clone(),
            metadata: self.user.metadata.clone(),
            progressions: vec![Circuit {
                id: self.circuit_id.clone(),
                name: CIRCUIT_NAME.to_string(),
                kind: "points".to_string(),
                points: self.points,
                status: circuit_status.to_string(),
                start_date: self.started_at.clone(),
                completed_at: self.completed_at.clone(),
                step_progressions: vec![Step {
                    id: self.step_id.clone(),
                    name: "First steps".to_string(),
                    points: self.points.min(STEP_THRESHOLD),
                    status: step_status.to_string(),
                    completed_at: self.completed_at.clone(),
                    completion_threshold: STEP_THRESHOLD,
                }],
            }],
            rewards: self.rewards.clone(),
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            created_at: self.created_at.clone(),
            last_login: self.last_login.clone(),
        }
    }
}

type Db = Arc<RwLock<HashMap<String, StoredUser>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    db: Db,
}

/// Error response carrying a `{"message": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/api/end-user", post(create_end_user))
        .route("/api/end-user/{id}", get(get_profile))
        .route("/api/tracking", post(track_event))
        .route("/api/user", post(add_user))
        .route("/api/user/logged", post(user_logged))
        .route("/api/user/{id}", delete(delete_user))
        .route("/api/progression", post(user_progression))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = format!("Bearer {}", state.api_key);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

async fn upsert(state: &AppState, user: EndUser) {
    let mut db = state.db.write().await;
    match db.get_mut(&user.id) {
        Some(stored) => stored.user = user,
        None => {
            db.insert(user.id.clone(), StoredUser::new(user));
        }
    }
}

async fn create_end_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(user): Json<EndUser>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    debug!(user_id = %user.id, "registering end user");
    upsert(&state, user).await;
    Ok(StatusCode::CREATED)
}

async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    authorize(&state, &headers)?;
    let db = state.db.read().await;
    db.get(&id)
        .map(|stored| Json(stored.profile()))
        .ok_or_else(ApiError::not_found)
}

async fn track_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<TrackingInput>,
) -> Result<Json<TrackingResult>, ApiError> {
    authorize(&state, &headers)?;
    debug!(user_id = %input.user_id, event = %input.event_name, "tracking event");
    let mut db = state.db.write().await;
    let stored = db.get_mut(&input.user_id).ok_or_else(ApiError::not_found)?;
    let amount = input.value.map(|v| v.round() as i64).unwrap_or(1);
    let at = input
        .timestamp
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(now);
    Ok(Json(stored.progress(amount, at)))
}

async fn add_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(user): Json<EndUser>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let id = user.id.clone();
    upsert(&state, user).await;
    Ok(Json(json!({ "id": id })))
}

async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    db.remove(&id).ok_or_else(ApiError::not_found)?;
    Ok(Json(json!({ "deleted": true })))
}

async fn user_logged(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoggedInput>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let stored = db.get_mut(&input.user_id).ok_or_else(ApiError::not_found)?;
    stored.last_login = now();
    stored.current_streak += 1;
    stored.longest_streak = stored.longest_streak.max(stored.current_streak);
    Ok(Json(json!({ "currentStreak": stored.current_streak })))
}

async fn user_progression(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ProgressionInput>,
) -> Result<Json<TrackingResult>, ApiError> {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let stored = db.get_mut(&input.user_id).ok_or_else(ApiError::not_found)?;
    if stored.circuit_id != input.circuit_id {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "circuit not found"));
    }
    Ok(Json(stored.progress(input.amount, now())))
}

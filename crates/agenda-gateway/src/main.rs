use agenda_core::validate::{validate_date, validate_time};
use agenda_core::{Event, FieldUpdate};
use agenda_storage::{CalendarStore, StorageError};
use agenda_wizard::dispatch::handle_message;
use agenda_wizard::Wizard;
use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "agenda-gateway")]
#[command(about = "HTTP gateway for the Agenda calendar bot", long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
    /// Path to the SQLite database.
    #[arg(long, default_value = "agenda.db")]
    db: String,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

struct AppState {
    wizard: Mutex<Wizard>,
}

type SharedState = Arc<AppState>;

enum ApiError {
    BadRequest(String),
    NotFound,
    Internal,
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        error!(error = %err, "storage failure");
        ApiError::Internal
    }
}

impl From<agenda_wizard::WizardError> for ApiError {
    fn from(err: agenda_wizard::WizardError) -> Self {
        error!(error = %err, "wizard failure");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "event not found".to_string()),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageRequest {
    owner_id: i64,
    text: String,
}

#[derive(Serialize)]
struct MessageResponse {
    replies: Vec<String>,
}

#[derive(Deserialize)]
struct OwnerQuery {
    owner_id: i64,
}

#[derive(Deserialize)]
struct CreateEventRequest {
    owner_id: i64,
    name: String,
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// PATCH body. A missing field is a no-op; an explicit `null` on `time`
/// or `details` clears the field to absent.
#[derive(Debug, Default, Deserialize)]
struct UpdateEventRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_explicit")]
    time: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_explicit")]
    details: Option<Option<String>>,
}

/// Keeps "field present but null" distinguishable from "field absent".
fn deserialize_explicit<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn updates_from_request(body: &UpdateEventRequest) -> Result<Vec<FieldUpdate>, ApiError> {
    let mut updates = Vec::new();

    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        updates.push(FieldUpdate::Name(name.trim().to_string()));
    }
    if let Some(date) = &body.date {
        validate_date(date).map_err(|err| ApiError::BadRequest(err.to_string()))?;
        updates.push(FieldUpdate::Date(date.clone()));
    }
    if let Some(time) = &body.time {
        if let Some(value) = time {
            validate_time(value).map_err(|err| ApiError::BadRequest(err.to_string()))?;
        }
        updates.push(FieldUpdate::Time(time.clone()));
    }
    if let Some(details) = &body.details {
        updates.push(FieldUpdate::Details(details.clone()));
    }

    if updates.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".to_string()));
    }
    Ok(updates)
}

fn with_wizard<T>(
    state: &SharedState,
    f: impl FnOnce(&Wizard) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let wizard = state.wizard.lock().map_err(|_| {
        error!("wizard mutex poisoned");
        ApiError::Internal
    })?;
    f(&wizard)
}

async fn post_message(
    State(state): State<SharedState>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let replies = with_wizard(&state, |wizard| {
        Ok(handle_message(wizard, body.owner_id, &body.text)?)
    })?;
    Ok(Json(MessageResponse { replies }))
}

async fn list_events(
    State(state): State<SharedState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = with_wizard(&state, |wizard| {
        Ok(wizard.store().events_for_owner(query.owner_id)?)
    })?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<SharedState>,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    validate_date(&body.date).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    if let Some(time) = &body.time {
        validate_time(time).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    }

    let event = with_wizard(&state, |wizard| {
        let id = wizard.store().create_event(
            body.owner_id,
            name,
            &body.date,
            body.time.as_deref(),
            body.details.as_deref(),
        )?;
        wizard
            .store()
            .event(body.owner_id, id)?
            .ok_or(ApiError::Internal)
    })?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(state): State<SharedState>,
    Path(event_id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Event>, ApiError> {
    let event = with_wizard(&state, |wizard| {
        Ok(wizard.store().event(query.owner_id, event_id)?)
    })?;
    event.map(Json).ok_or(ApiError::NotFound)
}

async fn patch_event(
    State(state): State<SharedState>,
    Path(event_id): Path<i64>,
    Query(query): Query<OwnerQuery>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let updates = updates_from_request(&body)?;

    let event = with_wizard(&state, |wizard| {
        let affected = wizard
            .store()
            .update_event_fields(query.owner_id, event_id, &updates)?;
        if !affected {
            return Err(ApiError::NotFound);
        }
        wizard
            .store()
            .event(query.owner_id, event_id)?
            .ok_or(ApiError::Internal)
    })?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<SharedState>,
    Path(event_id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = with_wizard(&state, |wizard| {
        Ok(wizard.store().delete_event(query.owner_id, event_id)?)
    })?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    Ok(Json(serde_json::json!({ "message": "event deleted" })))
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/message", axum::routing::post(post_message))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).patch(patch_event).delete(delete_event),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install ctrl-c handler");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let store = CalendarStore::open(&args.db)
        .with_context(|| format!("failed to open database at {}", args.db))?;
    let state = Arc::new(AppState {
        wizard: Mutex::new(Wizard::new(store)),
    });

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %args.addr, db = %args.db, "agenda gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_body_distinguishes_null_from_absent() {
        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"time": null}"#).expect("deserialize");
        assert_eq!(body.time, Some(None));
        assert_eq!(body.details, None);

        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"time": "14:30"}"#).expect("deserialize");
        assert_eq!(body.time, Some(Some("14:30".to_string())));
    }

    #[test]
    fn patch_with_no_fields_is_rejected() {
        let body = UpdateEventRequest::default();
        assert!(matches!(
            updates_from_request(&body),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn explicit_null_becomes_a_clear_update() {
        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"details": null, "date": "2025-12-16"}"#)
                .expect("deserialize");
        let updates = match updates_from_request(&body) {
            Ok(updates) => updates,
            Err(_) => panic!("expected valid updates"),
        };
        assert!(updates.contains(&FieldUpdate::Details(None)));
        assert!(updates.contains(&FieldUpdate::Date("2025-12-16".to_string())));
    }

    #[test]
    fn patch_validates_field_formats() {
        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"date": "2025-13-01"}"#).expect("deserialize");
        assert!(matches!(
            updates_from_request(&body),
            Err(ApiError::BadRequest(_))
        ));

        let body: UpdateEventRequest =
            serde_json::from_str(r#"{"time": "25:00"}"#).expect("deserialize");
        assert!(matches!(
            updates_from_request(&body),
            Err(ApiError::BadRequest(_))
        ));
    }
}

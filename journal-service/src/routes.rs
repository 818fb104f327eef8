//! Axum route handlers for the journal API.
//!
//! Every resource gets the same verb table on `/api/<resource>`:
//! GET lists, POST creates, PUT replaces by id, DELETE removes by id.

use crate::config::Config;
use crate::error::{ApiError, StoreError, StoreResult};
use crate::store::CollectionStore;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use journal_types::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

pub struct AppState {
    pub entries: Arc<CollectionStore<JournalEntry>>,
    pub tasks: Arc<CollectionStore<Task>>,
    pub meetings: Arc<CollectionStore<Meeting>>,
    pub stickynotes: Arc<CollectionStore<StickyNote>>,
    pub data_dir: PathBuf,
    pub start_time: Instant,
    pub started_at: String,
}

impl AppState {
    /// Opens all four collections under the configured data directory.
    pub async fn open(config: &Config) -> StoreResult<Self> {
        let dir = config.data_dir.as_path();
        let dedupe = config.reject_duplicate_ids;
        Ok(Self {
            entries: Arc::new(CollectionStore::open(dir, dedupe).await?),
            tasks: Arc::new(CollectionStore::open(dir, dedupe).await?),
            meetings: Arc::new(CollectionStore::open(dir, dedupe).await?),
            stickynotes: Arc::new(CollectionStore::open(dir, dedupe).await?),
            data_dir: config.data_dir.clone(),
            start_time: Instant::now(),
            started_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/backup/export", get(backup_export))
        .with_state(state.clone())
        .merge(collection_routes(state.entries.clone()))
        .merge(collection_routes(state.tasks.clone()))
        .merge(collection_routes(state.meetings.clone()))
        .merge(collection_routes(state.stickynotes.clone()))
}

/// Binds the verb table for one collection at `/api/<resource>`.
pub fn collection_routes<R: Record>(store: Arc<CollectionStore<R>>) -> Router {
    let path = format!("/api/{}", R::KIND.segment());
    Router::new()
        .route(
            &path,
            get(list::<R>)
                .post(create::<R>)
                .put(update::<R>)
                .delete(remove::<R>)
                .fallback(method_not_allowed),
        )
        .with_state(store)
}

fn invalid_body<R: Record>(rejection: JsonRejection) -> ApiError {
    log::warn!("Rejected {} payload: {}", R::KIND, rejection.body_text());
    ApiError(StoreError::InvalidInput(rejection.body_text()))
}

// =====================================================
// Collection Endpoints
// =====================================================

// GET /api/<resource>
async fn list<R: Record>(
    State(store): State<Arc<CollectionStore<R>>>,
) -> Result<Json<Vec<R>>, ApiError> {
    Ok(Json(store.list().await?))
}

// POST /api/<resource>
async fn create<R: Record>(
    State(store): State<Arc<CollectionStore<R>>>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    let Json(record) = payload.map_err(invalid_body::<R>)?;
    let created = store.create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/<resource>
async fn update<R: Record>(
    State(store): State<Arc<CollectionStore<R>>>,
    payload: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(record) = payload.map_err(invalid_body::<R>)?;
    Ok(Json(store.update(record).await?))
}

// DELETE /api/<resource>
async fn remove<R: Record>(
    State(store): State<Arc<CollectionStore<R>>>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_body::<R>)?;
    let id = store.remove(&req.id).await?;
    Ok(Json(DeleteResponse { id }))
}

async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {} Not Allowed", method),
    )
}

// =====================================================
// Service Endpoints
// =====================================================

async fn collection_status<R: Record>(store: &CollectionStore<R>) -> StoreResult<CollectionStatus> {
    Ok(CollectionStatus {
        resource: store.kind(),
        file: store.path().display().to_string(),
        records: store.list().await?.len(),
    })
}

// GET /api/status
async fn status(State(state): State<Arc<AppState>>) -> Result<Json<ServiceStatus>, ApiError> {
    let collections = vec![
        collection_status(&state.entries).await?,
        collection_status(&state.tasks).await?,
        collection_status(&state.meetings).await?,
        collection_status(&state.stickynotes).await?,
    ];
    Ok(Json(ServiceStatus {
        running: true,
        started_at: state.started_at.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        data_dir: state.data_dir.display().to_string(),
        collections,
    }))
}

// GET /api/backup/export
async fn backup_export(State(state): State<Arc<AppState>>) -> Result<Json<JournalBackup>, ApiError> {
    let backup = JournalBackup {
        exported_at: chrono::Utc::now().to_rfc3339(),
        entries: state.entries.list().await?,
        tasks: state.tasks.list().await?,
        meetings: state.meetings.list().await?,
        stickynotes: state.stickynotes.list().await?,
    };
    log::info!(
        "Exported backup: {} entries, {} tasks, {} meetings, {} notes",
        backup.entries.len(),
        backup.tasks.len(),
        backup.meetings.len(),
        backup.stickynotes.len()
    );
    Ok(Json(backup))
}

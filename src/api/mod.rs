//! HTTP endpoint layer.
//!
//! Resource routes are served both at the root (`/notes`, `/tasks`) and under
//! `/api`, matching the two ways the frontend is deployed.

mod error;
mod form;
mod notes;
mod tasks;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use notebook_core::ServiceError;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const BANNER: &str = "Student Notebook Backend API. Use /notes for operations.";

pub fn create_router(state: AppState) -> Router {
    let resources = resource_routes();

    let mut router = Router::new()
        .route("/", get(root))
        .merge(resources.clone())
        .nest("/api", resources)
        .nest_service("/uploads", ServeDir::new(state.notes.attachments().dir()));

    if let Some(frontend_dir) = &state.config.frontend_dir {
        router = router.nest_service("/app", ServeDir::new(frontend_dir));
    }

    router
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/notes/{id}/attachments", post(notes::add_attachments))
        .route(
            "/notes/{id}/attachments/{attachment_id}",
            delete(notes::delete_attachment),
        )
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            delete(tasks::delete_task).patch(tasks::set_done),
        )
}

async fn root() -> &'static str {
    BANNER
}

/// Run a blocking service call off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!("Blocking task failed: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

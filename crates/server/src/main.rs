use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{ContactSubmission, Project, Skill, SkillCategory, SubmissionId},
    error::{ApiError, ErrorCode},
    protocol::{ContactAccepted, ContactFailure, ContactForm, ContentBundle},
};
use storage::{MemoryStore, SubmissionStore};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{
    content_bundle, list_projects, list_skills, list_submissions, load_submission,
    submit_contact, ApiContext, SubmitError,
};
use app_state::AppState;
use config::load_settings;

#[derive(Debug, Deserialize)]
struct ProjectsQuery {
    featured: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SkillsQuery {
    category: Option<SkillCategory>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&settings.log_filter)?)
        .init();

    let store: Arc<dyn SubmissionStore> = match settings.max_submissions {
        Some(limit) => Arc::new(MemoryStore::with_capacity_limit(limit)),
        None => Arc::new(MemoryStore::new()),
    };
    let state = AppState {
        api: ApiContext { store },
        max_body_bytes: settings.max_body_bytes,
        expose_submissions: settings.expose_submissions,
    };
    if settings.expose_submissions {
        warn!("submission read routes are enabled; keep this server off public networks");
    }
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, max_body_bytes = settings.max_body_bytes, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;
    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/contact", post(http_submit_contact))
        .route("/api/content", get(http_content))
        .route("/api/content/projects", get(http_projects))
        .route("/api/content/skills", get(http_skills));
    // Visitor names, emails and messages; unauthenticated, so opt-in only.
    if state.expose_submissions {
        router = router
            .route("/api/contact/submissions", get(http_list_submissions))
            .route("/api/contact/submissions/:id", get(http_load_submission));
    }
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_submit_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            warn!(
                status = %rejection.status(),
                reason = %rejection.body_text(),
                "unreadable contact payload"
            );
            let body = ContactFailure {
                error: rejection.body_text(),
                details: Vec::new(),
            };
            return (rejection.status(), Json(body)).into_response();
        }
    };

    match submit_contact(&state.api, form).await {
        Ok(submission) => {
            (StatusCode::OK, Json(ContactAccepted::new(submission.id))).into_response()
        }
        Err(SubmitError::Invalid(validation)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ContactFailure::validation(validation.issues)),
        )
            .into_response(),
        Err(SubmitError::Store(error)) => {
            error!(%error, "contact form error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactFailure::internal()),
            )
                .into_response()
        }
    }
}

async fn http_list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContactSubmission>>, (StatusCode, Json<ApiError>)> {
    list_submissions(&state.api)
        .await
        .map(Json)
        .map_err(|e| (map_error(&e), Json(e)))
}

async fn http_load_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SubmissionId>,
) -> Result<Json<ContactSubmission>, (StatusCode, Json<ApiError>)> {
    load_submission(&state.api, id)
        .await
        .map(Json)
        .map_err(|e| (map_error(&e), Json(e)))
}

async fn http_content() -> Json<ContentBundle> {
    Json(content_bundle())
}

async fn http_projects(
    query: Result<Query<ProjectsQuery>, QueryRejection>,
) -> Result<Json<Vec<Project>>, (StatusCode, Json<ApiError>)> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Json(list_projects(query.featured)))
}

async fn http_skills(
    query: Result<Query<SkillsQuery>, QueryRejection>,
) -> Result<Json<Vec<Skill>>, (StatusCode, Json<ApiError>)> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Json(list_skills(query.category)))
}

fn bad_query(rejection: QueryRejection) -> (StatusCode, Json<ApiError>) {
    let err = ApiError::new(ErrorCode::Validation, rejection.body_text());
    (map_error(&err), Json(err))
}

fn map_error(err: &ApiError) -> StatusCode {
    match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

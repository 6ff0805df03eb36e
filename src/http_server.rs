//! HTTP API for the assessment frontend
//!
//! Endpoints:
//! - GET  /api/courses, /api/assignments, /api/assignment - Canvas pass-through
//! - GET  /api/submissions - submissions merged with U-number and section
//! - GET  /api/analytics/assignment - grade stats per section
//! - GET  /api/submission/{user_id}, PUT /api/grade - grading page
//! - POST /api/upload_roster - roster PDF -> { U-number: {name, major} }
//! - GET  /health
//!
//! `/` and `/static` serve the frontend. Every endpoint takes the caller's
//! Canvas token as a `token` query parameter and forwards it unchanged.

use crate::analytics::{self, AssignmentAnalytics, SubmissionRow};
use crate::canvas::{CanvasClient, CanvasError};
use crate::roster::{self, ExtractionOptions, Roster, RosterError};
use crate::settings::Settings;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

// ============================================================================
// AppState
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub canvas: CanvasClient,
    pub roster_opts: Arc<ExtractionOptions>,
    pub start_time: Instant,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self, CanvasError> {
        let canvas = CanvasClient::new(
            &settings.api_base(),
            Duration::from_secs(settings.upstream_timeout_secs),
        )?;
        Ok(Self {
            canvas,
            roster_opts: Arc::new(settings.roster.clone()),
            start_time: Instant::now(),
        })
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub struct AppError(pub StatusCode, pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({"error": self.1}))).into_response()
    }
}

impl From<CanvasError> for AppError {
    fn from(e: CanvasError) -> Self {
        match e {
            CanvasError::Upstream { status, body } => AppError(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
            CanvasError::InvalidBaseUrl(_) => AppError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            other => AppError(StatusCode::BAD_GATEWAY, other.to_string()),
        }
    }
}

impl From<RosterError> for AppError {
    fn from(e: RosterError) -> Self {
        let status = match e {
            RosterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RosterError::DocumentParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError(status, e.to_string())
    }
}

fn bad_request(msg: impl Into<String>) -> AppError {
    AppError(StatusCode::BAD_REQUEST, msg.into())
}

// ============================================================================
// Request / Response types
// ============================================================================

#[derive(Deserialize)]
struct TokenQuery {
    token: String,
}

#[derive(Deserialize)]
struct CourseQuery {
    course_id: u64,
    token: String,
}

#[derive(Deserialize)]
struct AssignmentQuery {
    course_id: u64,
    assignment_id: u64,
    token: String,
}

#[derive(Deserialize)]
struct GradeQuery {
    course_id: u64,
    assignment_id: u64,
    user_id: u64,
    score: f64,
    comment: Option<String>,
    token: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

// ============================================================================
// Handlers
// ============================================================================

// GET /api/courses?token=
async fn courses_handler(
    State(state): State<AppState>,
    Query(q): Query<TokenQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.canvas.list_courses(&q.token).await?))
}

// GET /api/assignments?course_id=&token=
async fn assignments_handler(
    State(state): State<AppState>,
    Query(q): Query<CourseQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    Ok(Json(state.canvas.list_assignments(&q.token, q.course_id).await?))
}

// GET /api/assignment?course_id=&assignment_id=&token=
async fn assignment_handler(
    State(state): State<AppState>,
    Query(q): Query<AssignmentQuery>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.canvas.get_assignment(&q.token, q.course_id, q.assignment_id).await?))
}

// GET /api/submissions?course_id=&assignment_id=&token=
async fn submissions_handler(
    State(state): State<AppState>,
    Query(q): Query<AssignmentQuery>,
) -> Result<Json<Vec<SubmissionRow>>, AppError> {
    let canvas = &state.canvas;
    let (enrollments, sections, submissions) = tokio::try_join!(
        canvas.list_enrollments(&q.token, q.course_id),
        canvas.list_sections(&q.token, q.course_id),
        canvas.list_submissions(&q.token, q.course_id, q.assignment_id, true),
    )?;

    let rows = analytics::submission_rows(&submissions, &enrollments, &sections);
    tracing::info!(course_id = q.course_id, assignment_id = q.assignment_id, rows = rows.len(), "submissions merged");
    Ok(Json(rows))
}

// GET /api/analytics/assignment?course_id=&assignment_id=&token=
async fn analytics_handler(
    State(state): State<AppState>,
    Query(q): Query<AssignmentQuery>,
) -> Result<Json<AssignmentAnalytics>, AppError> {
    let canvas = &state.canvas;
    let (sections, enrollments, submissions) = tokio::try_join!(
        canvas.list_sections(&q.token, q.course_id),
        canvas.list_enrollments(&q.token, q.course_id),
        canvas.list_submissions(&q.token, q.course_id, q.assignment_id, false),
    )?;

    Ok(Json(analytics::assignment_analytics(&submissions, &enrollments, &sections)))
}

// GET /api/submission/{user_id}?course_id=&assignment_id=&token=
async fn single_submission_handler(
    State(state): State<AppState>,
    Path(user_id): Path<u64>,
    Query(q): Query<AssignmentQuery>,
) -> Result<Json<Value>, AppError> {
    let submission = state
        .canvas
        .get_submission(&q.token, q.course_id, q.assignment_id, user_id)
        .await?;
    Ok(Json(submission))
}

// PUT /api/grade?course_id=&assignment_id=&user_id=&score=&comment=&token=
async fn grade_handler(
    State(state): State<AppState>,
    Query(q): Query<GradeQuery>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .canvas
        .put_grade(&q.token, q.course_id, q.assignment_id, q.user_id, q.score, q.comment.as_deref())
        .await?;
    Ok(Json(updated))
}

// POST /api/upload_roster (multipart, field "file")
async fn upload_roster_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Roster>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read upload: {}", e)))?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) = upload.ok_or_else(|| bad_request("Missing 'file' field"))?;
    tracing::info!(%filename, bytes = bytes.len(), "roster upload received");

    let opts = state.roster_opts.clone();
    let roster = tokio::task::spawn_blocking(move || roster::roster_from_upload(&filename, &bytes, &opts))
        .await
        .map_err(|e| AppError(StatusCode::INTERNAL_SERVER_ERROR, format!("PDF parsing failed: {}", e)))??;

    Ok(Json(roster))
}

// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState, settings: &Settings) -> Router {
    // Credentialed requests cannot use `*`, so echo whatever the caller sent
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let frontend = &settings.frontend_dir;

    Router::new()
        .route("/api/courses", get(courses_handler))
        .route("/api/assignments", get(assignments_handler))
        .route("/api/assignment", get(assignment_handler))
        .route("/api/submissions", get(submissions_handler))
        .route("/api/analytics/assignment", get(analytics_handler))
        .route("/api/submission/{user_id}", get(single_submission_handler))
        .route("/api/grade", put(grade_handler))
        .route("/api/upload_roster", post(upload_roster_handler))
        .route("/health", get(health_handler))
        .route_service("/", ServeFile::new(frontend.join("index.html")))
        .nest_service("/static", ServeDir::new(frontend))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Handlers for the student CRUD endpoints.
//!
//! Thin glue: parse the path id, validate the payload, call the
//! repository, wrap the result in the response envelope. Validation
//! failures are reported before any storage call.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use roster_core::types::DbId;
use roster_db::models::student::{CreateStudent, UpdateStudent};
use roster_db::repositories::StudentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Parse a path id, rejecting non-numeric and non-positive values before
/// anything touches storage.
fn parse_student_id(raw: &str) -> Result<DbId, AppError> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest("Invalid student ID".into()))
}

/// GET /students
///
/// List every student, newest enrollment first.
pub async fn list_students(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let students = StudentRepo::list_all(&state.pool).await?;

    Ok(Json(DataResponse::new(students)))
}

/// POST /students
///
/// Validate and store a new student; 201 with the stored record.
pub async fn create_student(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateStudent>,
) -> AppResult<impl IntoResponse> {
    let new_student = input.validated().map_err(AppError::Validation)?;
    let student = StudentRepo::create(&state.pool, &new_student).await?;

    tracing::info!(student_id = student.id, email = %student.email, "Student created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(student))))
}

/// GET /students/{id}
///
/// Retrieve a single student by id.
pub async fn get_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_student_id(&raw_id)?;

    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound {
            entity: "Student",
            id,
        })?;

    Ok(Json(DataResponse::new(student)))
}

/// PUT /students/{id}
///
/// Partially update a student; only supplied fields change.
pub async fn update_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateStudent>,
) -> AppResult<impl IntoResponse> {
    let id = parse_student_id(&raw_id)?;
    let patch = input.validated().map_err(AppError::Validation)?;

    let student = StudentRepo::update(&state.pool, id, &patch)
        .await?
        .ok_or(AppError::NotFound {
            entity: "Student",
            id,
        })?;

    tracing::info!(student_id = id, "Student updated");

    Ok(Json(DataResponse::new(student)))
}

/// DELETE /students/{id}
///
/// Delete a student; 404 when the id has no matching row.
pub async fn delete_student(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_student_id(&raw_id)?;

    let deleted = StudentRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound {
            entity: "Student",
            id,
        });
    }

    tracing::info!(student_id = id, "Student deleted");

    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

//! Course routes. Courses are reference data; there is no write endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::course::CourseResponse;
use domain::models::Course;
use persistence::repositories::CourseRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// List all courses.
///
/// GET /api/v1/courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let repo = CourseRepository::new(state.pool.clone());
    let courses = repo
        .list_courses()
        .await?
        .into_iter()
        .map(|entity| Course::from(entity).into())
        .collect();
    Ok(Json(courses))
}

/// Fetch one course.
///
/// GET /api/v1/courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let repo = CourseRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
    let course: Course = entity.into();
    Ok(Json(course.into()))
}

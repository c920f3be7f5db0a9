// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course catalog routes: browse, enroll, complete.

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Course, Difficulty, UserProfile};
use crate::services::CourseFilter;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Catalog routes (require an authenticated session).
/// The session guard is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/courses", get(list_courses))
        .route("/api/courses/{id}", get(get_course))
        .route("/api/courses/{id}/enroll", post(enroll))
        .route("/api/courses/{id}/complete", post(complete))
}

// ─── Browse ──────────────────────────────────────────────────

/// Query parameters for the course list.
#[derive(Deserialize, Default)]
pub struct CourseListParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

/// One course in the list view. Sections are omitted; the detail
/// route carries the syllabus.
#[derive(Serialize)]
pub struct CourseSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub duration: String,
    pub rating: f32,
    pub reviews_count: u32,
    pub students_count: String,
    pub instructor: crate::models::Instructor,
    pub enrolled: bool,
    pub completed: bool,
}

impl CourseSummary {
    fn from_course(course: &Course, enrolled: &BTreeSet<u32>, completed: &BTreeSet<u32>) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            cover_image: course.cover_image.clone(),
            category: course.category.clone(),
            difficulty: course.difficulty,
            duration: course.duration.clone(),
            rating: course.rating,
            reviews_count: course.reviews_count,
            students_count: course.students_count.clone(),
            instructor: course.instructor.clone(),
            enrolled: enrolled.contains(&course.id),
            completed: completed.contains(&course.id),
        }
    }
}

#[derive(Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseSummary>,
    pub total: usize,
    pub categories: Vec<String>,
}

/// List courses, optionally filtered by search text, category, and
/// difficulty. Filters combine conjunctively.
async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CourseListParams>,
) -> Json<CourseListResponse> {
    let filter = CourseFilter {
        search: params.search,
        category: params.category,
        difficulty: params.difficulty,
    };
    let (enrolled, completed) = enrollment_sets(&state);
    let courses: Vec<CourseSummary> = state
        .catalog
        .search(&filter)
        .into_iter()
        .map(|course| CourseSummary::from_course(course, &enrolled, &completed))
        .collect();

    Json(CourseListResponse {
        total: courses.len(),
        categories: state
            .catalog
            .categories()
            .into_iter()
            .map(String::from)
            .collect(),
        courses,
    })
}

/// Course detail response: the full record plus the caller's
/// relationship to it.
#[derive(Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub course: Course,
    pub enrolled: bool,
    pub completed: bool,
}

/// Get one course with its syllabus.
async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CourseDetailResponse>> {
    let course = state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Course {id} not found")))?
        .clone();
    let (enrolled, completed) = enrollment_sets(&state);

    Ok(Json(CourseDetailResponse {
        enrolled: enrolled.contains(&course.id),
        completed: completed.contains(&course.id),
        course,
    }))
}

/// Enrollment sets from the current snapshot. Empty until the profile
/// record has loaded.
fn enrollment_sets(state: &AppState) -> (BTreeSet<u32>, BTreeSet<u32>) {
    let snapshot = state.session.snapshot();
    match snapshot.profile() {
        Some(profile) => (
            profile.enrolled_courses.clone(),
            profile.completed_courses.clone(),
        ),
        None => (BTreeSet::new(), BTreeSet::new()),
    }
}

// ─── Enrollment ──────────────────────────────────────────────

/// Enroll the signed-in user in a course.
async fn enroll(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u32>,
) -> Result<Json<UserProfile>> {
    let course = state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Course {id} not found")))?;
    let course_id = course.id;

    let uid = &user.identity.uid;
    let mut profile = state
        .store
        .read_profile(uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {uid} not found")))?;

    if !profile.enroll(course_id) {
        return Err(AppError::BadRequest(format!(
            "Already enrolled in or completed course {course_id}"
        )));
    }

    state.store.write_profile(&profile).await?;
    if let Err(error) = state.session.load_profile(uid).await {
        tracing::warn!(uid = %uid, error = %error, "snapshot refresh after enrollment failed");
    }

    tracing::info!(uid = %uid, course_id, "enrolled in course");
    Ok(Json(profile))
}

/// Mark a course completed, awarding points and recomputing level.
async fn complete(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<u32>,
) -> Result<Json<UserProfile>> {
    let course = state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Course {id} not found")))?;
    let course_id = course.id;

    let uid = &user.identity.uid;
    let mut profile = state
        .store
        .read_profile(uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {uid} not found")))?;

    if !profile.complete(course_id) {
        return Err(AppError::BadRequest(format!(
            "Course {course_id} is not in progress"
        )));
    }

    state.store.write_profile(&profile).await?;
    if let Err(error) = state.session.load_profile(uid).await {
        tracing::warn!(uid = %uid, error = %error, "snapshot refresh after completion failed");
    }

    tracing::info!(uid = %uid, course_id, points = profile.points, "course completed");
    Ok(Json(profile))
}

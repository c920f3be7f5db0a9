// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course catalog API tests: browsing, filtering, enrollment, and
//! completion over the real shipped catalog.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, wait_until, TestApp};
use learnsphere::models::UserProfile;
use learnsphere::session::Identity;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap()
}

/// Sign in a seeded user and wait for the profile to load.
async fn signed_in_app() -> (TestApp, Identity) {
    let app = create_test_app();
    let identity = app
        .provider
        .seed_account("maya@example.com", "hunter22", "Maya");
    app.store.seed_profile(UserProfile::with_defaults(
        &identity.uid,
        "maya@example.com",
        "Maya",
    ));
    app.provider.emit(Some(identity.clone()));
    wait_until(&app.state.session, |s| s.profile().is_some()).await;
    (app, identity)
}

#[tokio::test]
async fn test_course_list_returns_full_catalog() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 8);
    assert_eq!(json["courses"][0]["id"], 1);
    assert_eq!(json["courses"][0]["title"], "Introduction to Web Development");
    assert_eq!(json["courses"][0]["enrolled"], false);
    assert_eq!(
        json["categories"],
        serde_json::json!([
            "Web Development",
            "Data Science",
            "Mobile Development",
            "Design"
        ])
    );
}

#[tokio::test]
async fn test_course_list_filters_combine() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get(
            "/api/courses?category=Web%20Development&difficulty=Advanced",
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["courses"][0]["title"], "Advanced JavaScript Concepts");

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses?search=swift"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["courses"][0]["id"], 8);

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses?search=nothing%20matches%20this"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
}

#[tokio::test]
async fn test_course_detail_includes_syllabus() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["enrolled"], false);
    assert_eq!(json["instructor"]["name"], "Alex Morgan");

    let sections = json["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 4);
    assert_eq!(sections[0]["title"], "Getting Started with HTML");
    assert_eq!(sections[3]["title"], "Building Interactive Web Projects");

    let lectures = sections[0]["lectures"].as_array().unwrap();
    assert_eq!(lectures.len(), 5);
    assert_eq!(lectures[0]["type"], "video");
    assert_eq!(lectures[0]["free"], true);
    assert_eq!(lectures[4]["type"], "quiz");
    assert_eq!(lectures[4]["free"], false);

    // Courses without a published syllabus serialize an empty list.
    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses/2"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["sections"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_course_is_404() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses/99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");
}

#[tokio::test]
async fn test_enroll_updates_profile_everywhere() {
    let (app, identity) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/2/enroll"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["enrolled_courses"], serde_json::json!([2]));

    // The store, the published snapshot, and the course views all
    // agree after the refresh.
    assert!(app
        .store
        .stored(&identity.uid)
        .unwrap()
        .enrolled_courses
        .contains(&2));

    let response = app.router.clone().oneshot(get("/api/me")).await.unwrap();
    let me = body_json(response).await;
    assert_eq!(me["profile"]["enrolled_courses"], serde_json::json!([2]));

    let response = app
        .router
        .clone()
        .oneshot(get("/api/courses/2"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["enrolled"], true);
}

#[tokio::test]
async fn test_enroll_twice_is_rejected() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/2/enroll"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/2/enroll"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_enroll_unknown_course_is_404() {
    let (app, _) = signed_in_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/42/enroll"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_awards_points_and_levels() {
    let (app, _) = signed_in_app().await;

    // Completion requires enrollment.
    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/1/complete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for id in [1, 2, 3] {
        let response = app
            .router
            .clone()
            .oneshot(post(&format!("/api/courses/{id}/enroll")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/1/complete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["points"], 100);
    assert_eq!(json["level"], 1);
    assert_eq!(json["completed_courses"], serde_json::json!([1]));
    assert_eq!(json["enrolled_courses"], serde_json::json!([2, 3]));

    // Two more completions cross the level threshold.
    for id in [2, 3] {
        let response = app
            .router
            .clone()
            .oneshot(post(&format!("/api/courses/{id}/complete")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.router.clone().oneshot(get("/api/me")).await.unwrap();
    let me = body_json(response).await;
    assert_eq!(me["profile"]["points"], 300);
    assert_eq!(me["profile"]["level"], 2);

    // A completed course cannot be completed or re-enrolled.
    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/1/complete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = app
        .router
        .clone()
        .oneshot(post("/api/courses/1/enroll"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

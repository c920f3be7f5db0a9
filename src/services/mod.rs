// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod firebase_auth;
pub mod password;
pub mod tutor;

pub use catalog::{CatalogError, CatalogService, CourseFilter};
pub use firebase_auth::FirebaseAuthClient;
pub use password::StrengthReport;
pub use tutor::TutorService;

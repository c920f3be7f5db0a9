// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod course;
pub mod profile;

pub use course::{Course, CourseSection, Difficulty, Instructor, Lecture, LectureKind};
pub use profile::{Preferences, Theme, UserProfile};

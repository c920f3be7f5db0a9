// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Course catalog models for storage and API.

use serde::{Deserialize, Serialize};

/// Course entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Catalog-unique course ID
    pub id: u32,
    /// Course title
    pub title: String,
    /// Short description shown in listings
    pub description: String,
    /// Cover image URL
    pub cover_image: String,
    /// Category (e.g. "Web Development")
    pub category: String,
    /// Difficulty tier
    pub difficulty: Difficulty,
    /// Human-readable length (e.g. "8 weeks")
    pub duration: String,
    /// Average review rating
    pub rating: f32,
    /// Number of reviews
    pub reviews_count: u32,
    /// Approximate enrollment (e.g. "2.5k+")
    pub students_count: String,
    /// Instructor summary
    pub instructor: Instructor,
    /// Syllabus, when published
    #[serde(default)]
    pub sections: Vec<CourseSection>,
}

/// Instructor shown on course cards and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Syllabus section grouping lectures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSection {
    pub id: u32,
    pub title: String,
    pub lectures: Vec<Lecture>,
}

/// Single lecture within a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub id: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LectureKind,
    /// Length as "MM:SS"
    pub duration: String,
    /// Whether the lecture is available without enrollment
    #[serde(default)]
    pub free: bool,
}

/// Lecture content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LectureKind {
    Video,
    Quiz,
    Assignment,
}

/// Difficulty tier used for catalog filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

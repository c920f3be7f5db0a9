// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course catalog loading and filtering service.

use std::fs;
use std::path::Path;

use crate::models::{Course, Difficulty};

/// In-memory course catalog, loaded once at startup.
#[derive(Default, Clone)]
pub struct CatalogService {
    courses: Vec<Course>,
}

/// Listing filters. All present filters must match.
#[derive(Debug, Default, Clone)]
pub struct CourseFilter {
    /// Case-insensitive substring match on title or description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact difficulty match.
    pub difficulty: Option<Difficulty>,
}

impl CatalogService {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let courses: Vec<Course> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let mut ids = std::collections::HashSet::new();
        for course in &courses {
            if !ids.insert(course.id) {
                return Err(CatalogError::DuplicateId(course.id));
            }
        }

        tracing::info!(count = courses.len(), "Loaded course catalog");
        Ok(Self { courses })
    }

    /// All courses, in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Look up a course by ID.
    pub fn get(&self, id: u32) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Courses matching the filter, in catalog order.
    pub fn search(&self, filter: &CourseFilter) -> Vec<&Course> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.courses
            .iter()
            .filter(|course| {
                if let Some(needle) = &needle {
                    let matched = course.title.to_lowercase().contains(needle)
                        || course.description.to_lowercase().contains(needle);
                    if !matched {
                        return false;
                    }
                }
                if let Some(category) = &filter.category {
                    if &course.category != category {
                        return false;
                    }
                }
                if let Some(difficulty) = filter.difficulty {
                    if course.difficulty != difficulty {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Distinct category names, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for course in &self.courses {
            if !seen.contains(&course.category.as_str()) {
                seen.push(course.category.as_str());
            }
        }
        seen
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),

    #[error("Duplicate course id {0} in catalog")]
    DuplicateId(u32),
}

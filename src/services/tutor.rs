// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Study tutor reply service.
//!
//! Replies are chosen by a keyword heuristic over the student's
//! message, checked in priority order. When the request names a course
//! the reply weaves the course title in.

/// Message intent, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorTopic {
    /// Student is stuck and asking for help.
    Guidance,
    /// Student wants a concept explained.
    Concept,
    /// Student wants a worked example.
    Example,
    /// Student wants practice material.
    Practice,
    /// Anything else.
    General,
}

/// Stateless tutor reply generator.
#[derive(Default, Clone)]
pub struct TutorService;

impl TutorService {
    /// Opening message for a fresh chat.
    pub const GREETING: &'static str =
        "Hello! I'm your AI tutor. How can I help you with your learning today?";

    pub fn new() -> Self {
        Self
    }

    /// Classify a message. Earlier topics win when keywords overlap.
    pub fn classify(message: &str) -> TutorTopic {
        let lower = message.to_lowercase();
        if lower.contains("help") || lower.contains("stuck") {
            TutorTopic::Guidance
        } else if lower.contains("concept") || lower.contains("understand") {
            TutorTopic::Concept
        } else if lower.contains("example") {
            TutorTopic::Example
        } else if lower.contains("practice") || lower.contains("exercise") {
            TutorTopic::Practice
        } else {
            TutorTopic::General
        }
    }

    /// Produce a reply for the message, optionally tied to a course.
    pub fn reply(&self, message: &str, course_title: Option<&str>) -> String {
        let topic = Self::classify(message);
        tracing::debug!(?topic, course = course_title, "tutor reply");
        match (topic, course_title) {
            (TutorTopic::Guidance, Some(course)) => format!(
                "I see you're having trouble. Let's break this down step by step. \
                 Can you tell me specifically which part of {course} you're struggling with?"
            ),
            (TutorTopic::Guidance, None) => "I see you're having trouble. Let's break this down \
                 step by step. Can you tell me specifically which part you're struggling with?"
                .to_string(),
            (TutorTopic::Concept, Some(course)) => format!(
                "That's a great question about this concept! The key idea is to connect it \
                 with what you already know from {course}. Does that help clarify things?"
            ),
            (TutorTopic::Concept, None) => "That's a great question about this concept! The key \
                 idea is to connect it with what you already know. Does that help clarify things?"
                .to_string(),
            (TutorTopic::Example, Some(course)) => format!(
                "I'd be happy to provide an example. Here's a practical application of this \
                 concept from {course}. Try working through it step by step."
            ),
            (TutorTopic::Example, None) => "I'd be happy to provide an example. Here's a \
                 practical application of this concept. Try working through it step by step."
                .to_string(),
            (TutorTopic::Practice, Some(course)) => format!(
                "Practice is essential for mastery! Here's an exercise based on your progress \
                 in {course}. Once you've attempted it, we can discuss your approach."
            ),
            (TutorTopic::Practice, None) => "Practice is essential for mastery! Here's an \
                 exercise based on your progress. Once you've attempted it, we can discuss \
                 your approach."
                .to_string(),
            (TutorTopic::General, Some(course)) => format!(
                "That's an interesting question! I'd suggest focusing on the fundamentals of \
                 {course} first. Would you like me to explain any specific concept in more detail?"
            ),
            (TutorTopic::General, None) => "That's an interesting question! I'd suggest focusing \
                 on understanding the fundamentals first. Would you like me to explain any \
                 specific concept in more detail?"
                .to_string(),
        }
    }
}

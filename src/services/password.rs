// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Advisory password strength scoring for the registration form.
//!
//! Four criteria, one point each. The provider enforces its own policy
//! at registration time; this report only drives the strength meter.

use serde::Serialize;

/// Strength report for a candidate password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrengthReport {
    /// Number of satisfied criteria (0-4)
    pub score: u8,
    /// Human-readable label for the score
    pub label: &'static str,
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_digit: bool,
    pub has_symbol: bool,
}

/// Score a candidate password.
pub fn evaluate(password: &str) -> StrengthReport {
    let long_enough = password.chars().count() >= 8;
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let score = [long_enough, has_uppercase, has_digit, has_symbol]
        .iter()
        .filter(|&&met| met)
        .count() as u8;

    StrengthReport {
        score,
        label: label_for(score),
        long_enough,
        has_uppercase,
        has_digit,
        has_symbol,
    }
}

fn label_for(score: u8) -> &'static str {
    match score {
        0 => "Too weak",
        1 => "Weak",
        2 => "Medium",
        3 => "Strong",
        _ => "Very strong",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_password_scores_zero() {
        let report = evaluate("");
        assert_eq!(report.score, 0);
        assert_eq!(report.label, "Too weak");
        assert!(!report.long_enough);
    }

    #[test]
    fn test_lowercase_only_is_weak() {
        // Long enough, nothing else.
        let report = evaluate("abcdefgh");
        assert_eq!(report.score, 1);
        assert_eq!(report.label, "Weak");
    }

    #[test]
    fn test_each_criterion_counts() {
        // Short, but uppercase + digit + symbol.
        let report = evaluate("Ab1!");
        assert_eq!(report.score, 3);
        assert_eq!(report.label, "Strong");
        assert!(!report.long_enough);
        assert!(report.has_uppercase);
        assert!(report.has_digit);
        assert!(report.has_symbol);
    }

    #[test]
    fn test_all_criteria_is_very_strong() {
        let report = evaluate("Str0ng!pwd");
        assert_eq!(report.score, 4);
        assert_eq!(report.label, "Very strong");
    }

    #[test]
    fn test_medium_label() {
        let report = evaluate("abcdefg1");
        assert_eq!(report.score, 2);
        assert_eq!(report.label, "Medium");
    }
}

// ABOUTME: Weighted program health score with letter grade and recommendations
// ABOUTME: Five components from story approval to requirement coverage, each a 0-100 percentage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Program Health Score
//!
//! | Component            | Ratio                                   | Weight |
//! |----------------------|-----------------------------------------|--------|
//! | Story Approval       | approved stories / stories              | 0.30   |
//! | Test Coverage        | stories with a test / stories           | 0.25   |
//! | Test Execution       | executed tests / tests                  | 0.20   |
//! | Pass Rate            | passed tests / executed tests           | 0.15   |
//! | Requirement Coverage | requirements with a story / requirements | 0.10   |
//!
//! A ratio with a zero denominator scores 0.

use std::fmt;

use serde::Serialize;

use crate::models::requirements::HealthInputs;

/// Components under this score produce a recommendation
pub const RECOMMENDATION_THRESHOLD: u32 = 70;

/// Letter grade for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthGrade {
    /// 90 and above
    A,
    /// 80 to 89
    B,
    /// 70 to 79
    C,
    /// 60 to 69
    D,
    /// Below 60
    F,
}

impl HealthGrade {
    /// Grade for a 0-100 score
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    /// Single-letter form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weighted component of the score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthComponent {
    /// Display name
    pub name: &'static str,
    /// Integer percentage
    pub score: u32,
    /// Fraction of the overall score
    pub weight: f64,
    #[serde(skip)]
    advice: &'static str,
}

impl HealthComponent {
    fn new(name: &'static str, part: i64, whole: i64, weight: f64, advice: &'static str) -> Self {
        Self {
            name,
            score: ratio_percent(part, whole),
            weight,
            advice,
        }
    }

    /// Ten-cell bar, one filled cell per 10 points
    #[must_use]
    pub fn bar(&self) -> String {
        let filled = (self.score / 10).min(10) as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
    }

    /// Weight as a whole percentage
    #[must_use]
    pub fn weight_percent(&self) -> u32 {
        (self.weight * 100.0).round() as u32
    }
}

/// Overall score, grade and per-component breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramHealth {
    /// Rounded weighted sum, 0-100
    pub score: u32,
    /// Letter grade
    pub grade: HealthGrade,
    /// Components in display order
    pub components: Vec<HealthComponent>,
    /// One entry per component under the threshold
    pub recommendations: Vec<String>,
}

impl ProgramHealth {
    /// Score a program from its counts
    #[must_use]
    pub fn score(inputs: &HealthInputs) -> Self {
        let components = vec![
            HealthComponent::new(
                "Story Approval",
                inputs.approved_stories,
                inputs.story_count,
                0.30,
                "Move more stories through review to approval",
            ),
            HealthComponent::new(
                "Test Coverage",
                inputs.stories_with_tests,
                inputs.story_count,
                0.25,
                "Write test cases for stories that have none",
            ),
            HealthComponent::new(
                "Test Execution",
                inputs.executed_tests,
                inputs.test_count,
                0.20,
                "Execute the outstanding test cases",
            ),
            HealthComponent::new(
                "Pass Rate",
                inputs.passed_tests,
                inputs.executed_tests,
                0.15,
                "Investigate failing tests and fix the underlying defects",
            ),
            HealthComponent::new(
                "Requirement Coverage",
                inputs.covered_requirements,
                inputs.requirement_count,
                0.10,
                "Create stories for requirements that have none",
            ),
        ];

        let weighted: f64 = components
            .iter()
            .map(|component| f64::from(component.score) * component.weight)
            .sum();
        let score = weighted.round() as u32;

        let recommendations = components
            .iter()
            .filter(|component| component.score < RECOMMENDATION_THRESHOLD)
            .map(|component| {
                format!(
                    "{} is {}%: {}",
                    component.name,
                    component.score,
                    component.advice
                )
            })
            .collect();

        Self {
            score,
            grade: HealthGrade::from_score(score),
            components,
            recommendations,
        }
    }
}

fn ratio_percent(part: i64, whole: i64) -> u32 {
    if whole <= 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> HealthInputs {
        HealthInputs {
            story_count: 6,
            approved_stories: 2,
            stories_with_tests: 3,
            test_count: 5,
            executed_tests: 3,
            passed_tests: 2,
            requirement_count: 4,
            covered_requirements: 3,
        }
    }

    #[test]
    fn test_weighted_score_and_grade() {
        let health = ProgramHealth::score(&inputs());
        let scores: Vec<u32> = health.components.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![33, 50, 60, 67, 75]);
        assert_eq!(health.score, 52);
        assert_eq!(health.grade, HealthGrade::F);
        assert_eq!(health.recommendations.len(), 4);
        assert!(health.recommendations[0].starts_with("Story Approval is 33%"));
    }

    #[test]
    fn test_empty_program_scores_zero() {
        let health = ProgramHealth::score(&HealthInputs::default());
        assert_eq!(health.score, 0);
        assert_eq!(health.grade, HealthGrade::F);
        assert_eq!(health.recommendations.len(), 5);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(HealthGrade::from_score(100), HealthGrade::A);
        assert_eq!(HealthGrade::from_score(90), HealthGrade::A);
        assert_eq!(HealthGrade::from_score(89), HealthGrade::B);
        assert_eq!(HealthGrade::from_score(70), HealthGrade::C);
        assert_eq!(HealthGrade::from_score(60), HealthGrade::D);
        assert_eq!(HealthGrade::from_score(59), HealthGrade::F);
    }

    #[test]
    fn test_bar_rendering() {
        let component = HealthComponent::new("Pass Rate", 2, 3, 0.15, "");
        assert_eq!(component.bar(), "██████░░░░");
        assert_eq!(component.weight_percent(), 15);
    }
}

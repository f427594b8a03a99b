// src/analytics/report.rs

//! Read-only views over aggregated performance state.
//!
//! Every query here is a pure function of the current state; unknown users
//! get empty or zeroed results instead of errors, and all divisions are
//! guarded so no input can raise.

use std::cmp::Ordering;

use serde::Serialize;

use super::{PerformanceAnalytics, percentage};
use crate::models::question::Difficulty;

/// Summary metrics across every test a user has taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverallPerformance {
    pub tests_taken: usize,
    pub average_score: f64,
    pub high_score: f64,
    pub low_score: f64,
    /// Percent change from the chronologically first to the last score.
    /// Zero with fewer than two tests or a zero first score.
    pub improvement_rate: f64,
}

/// Aggregated standing in one topic bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicPerformance {
    pub topic: String,
    pub score: f64,
    pub total_questions: u32,
}

/// Aggregated standing in one difficulty bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyPerformance {
    pub difficulty: Difficulty,
    pub score: f64,
    pub total_questions: u32,
}

/// One point of the recent-score series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub test: String,
    pub score: f64,
    pub date: String,
}

/// Formatted strong and weak topics, strongest/weakest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrengthsAndWeaknesses {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Topics need at least this many answered questions before they count
/// toward strengths or weaknesses.
const MIN_QUESTIONS_FOR_CLASSIFICATION: u32 = 5;

/// Score threshold separating a strength from a weakness.
const STRENGTH_THRESHOLD: f64 = 60.0;

impl PerformanceAnalytics {
    pub fn overall_performance(&self, user_id: &str) -> OverallPerformance {
        let Some(state) = self.user(user_id) else {
            return OverallPerformance::default();
        };
        if state.tests.is_empty() {
            return OverallPerformance::default();
        }

        let scores: Vec<f64> = state.tests.iter().map(|t| t.score).collect();

        let average_score = scores.iter().sum::<f64>() / scores.len() as f64;
        let high_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low_score = scores.iter().copied().fold(f64::INFINITY, f64::min);

        // Compare insertion-order first and last; a zero baseline yields 0
        // rather than a division fault.
        let improvement_rate = match scores.as_slice() {
            [first, .., last] if *first > 0.0 => (last - first) / first * 100.0,
            _ => 0.0,
        };

        OverallPerformance {
            tests_taken: scores.len(),
            average_score,
            high_score,
            low_score,
            improvement_rate,
        }
    }

    /// Per-topic standing, summed over all snapshots, best score first.
    pub fn topic_performance(&self, user_id: &str) -> Vec<TopicPerformance> {
        let Some(state) = self.user(user_id) else {
            return Vec::new();
        };

        let mut aggregated: Vec<TopicPerformance> = state
            .topic_performance
            .iter()
            .map(|(topic, snapshots)| {
                let correct: u32 = snapshots.iter().map(|s| s.correct).sum();
                let total: u32 = snapshots.iter().map(|s| s.total).sum();
                TopicPerformance {
                    topic: topic.clone(),
                    score: percentage(correct, total),
                    total_questions: total,
                }
            })
            .collect();

        aggregated.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        aggregated
    }

    /// Per-difficulty standing, sorted by difficulty name.
    pub fn difficulty_performance(&self, user_id: &str) -> Vec<DifficultyPerformance> {
        let Some(state) = self.user(user_id) else {
            return Vec::new();
        };

        let mut aggregated: Vec<DifficultyPerformance> = state
            .difficulty_performance
            .iter()
            .map(|(difficulty, snapshots)| {
                let correct: u32 = snapshots.iter().map(|s| s.correct).sum();
                let total: u32 = snapshots.iter().map(|s| s.total).sum();
                DifficultyPerformance {
                    difficulty: *difficulty,
                    score: percentage(correct, total),
                    total_questions: total,
                }
            })
            .collect();

        aggregated.sort_by(|a, b| a.difficulty.as_str().cmp(b.difficulty.as_str()));
        aggregated
    }

    /// The recent-score window, newest first.
    pub fn performance_trend(&self, user_id: &str) -> Vec<TrendPoint> {
        let Some(state) = self.user(user_id) else {
            return Vec::new();
        };

        state
            .recent_performance
            .iter()
            .map(|entry| TrendPoint {
                test: entry.test_name.clone(),
                score: entry.score,
                date: entry.timestamp.clone(),
            })
            .collect()
    }

    /// Classifies topics with enough data into strengths and weaknesses.
    ///
    /// Both lists are drawn from the same score-descending list: strengths
    /// from the top three entries scoring at or above the threshold,
    /// weaknesses from the bottom three scoring below it. With fewer than
    /// six qualifying topics a topic can appear in both lists, or in
    /// neither.
    pub fn strengths_and_weaknesses(&self, user_id: &str) -> StrengthsAndWeaknesses {
        let valid: Vec<TopicPerformance> = self
            .topic_performance(user_id)
            .into_iter()
            .filter(|t| t.total_questions >= MIN_QUESTIONS_FOR_CLASSIFICATION)
            .collect();

        if valid.is_empty() {
            return StrengthsAndWeaknesses::default();
        }

        let strengths = valid
            .iter()
            .take(3)
            .filter(|t| t.score >= STRENGTH_THRESHOLD)
            .map(format_topic)
            .collect();

        let weaknesses = valid[valid.len().saturating_sub(3)..]
            .iter()
            .filter(|t| t.score < STRENGTH_THRESHOLD)
            .map(format_topic)
            .collect();

        StrengthsAndWeaknesses {
            strengths,
            weaknesses,
        }
    }
}

fn format_topic(t: &TopicPerformance) -> String {
    format!("{} ({:.1}%)", t.topic, t.score)
}

// src/analytics/recommend.rs

//! Rule-based study recommendations derived from the performance reports.

use super::PerformanceAnalytics;
use crate::models::question::Difficulty;

/// Topics scoring below this are candidates for a focus recommendation.
const WEAK_TOPIC_THRESHOLD: f64 = 60.0;

/// Minimum attempts before a topic's score is trusted enough to call weak.
const WEAK_TOPIC_MIN_QUESTIONS: u32 = 3;

impl PerformanceAnalytics {
    /// Produces an ordered list of human-readable suggestions.
    ///
    /// The rules run in a fixed order and each appends at most once, so the
    /// output is deterministic and bounded; an empty rule pass falls back
    /// to a single generic prompt.
    pub fn recommendations(&self, user_id: &str) -> Vec<String> {
        if self.user(user_id).is_none() {
            return vec!["Take some tests to get personalized recommendations.".to_string()];
        }

        let mut recommendations = Vec::new();

        let topic_performance = self.topic_performance(user_id);
        let difficulty_performance = self.difficulty_performance(user_id);
        let overall = self.overall_performance(user_id);

        // Up to the two weakest topics, in the report's own order.
        let weak_topics = topic_performance
            .iter()
            .filter(|t| t.score < WEAK_TOPIC_THRESHOLD && t.total_questions >= WEAK_TOPIC_MIN_QUESTIONS)
            .take(2);
        for topic in weak_topics {
            recommendations.push(format!(
                "Focus on improving your knowledge of {} (current score: {:.1}%).",
                topic.topic, topic.score
            ));
        }

        let score_for = |difficulty: Difficulty| {
            difficulty_performance
                .iter()
                .find(|d| d.difficulty == difficulty)
                .map(|d| d.score)
        };

        if score_for(Difficulty::Easy).is_some_and(|score| score < 80.0) {
            recommendations.push(
                "Work on mastering the basic concepts before moving to more advanced topics."
                    .to_string(),
            );
        }

        if score_for(Difficulty::Hard).is_some_and(|score| score < 50.0)
            && score_for(Difficulty::Medium).unwrap_or(0.0) >= 70.0
        {
            recommendations.push(
                "You're doing well with medium difficulty questions. Challenge yourself with more advanced questions."
                    .to_string(),
            );
        }

        if overall.tests_taken < 5 {
            recommendations
                .push("Take more tests to get more accurate performance analytics.".to_string());
        }

        if overall.improvement_rate < 0.0 {
            recommendations.push(
                "Your performance is declining. Consider reviewing the fundamentals again."
                    .to_string(),
            );
        } else if overall.improvement_rate > 20.0 {
            recommendations.push("Great improvement! Keep up the good work.".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Continue practicing to improve your performance.".to_string());
        }

        recommendations
    }
}

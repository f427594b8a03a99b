// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::question::{Difficulty, PublicQuestion, Question, default_topic};

/// A generated quiz as stored in `quizzes.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub test_name: String,
    pub subject: String,
    pub topics: Vec<String>,
    pub difficulty: Difficulty,

    /// Whether the next difficulty should follow the taker's accuracy.
    pub adaptive: bool,

    pub questions: Vec<Question>,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for requesting quiz generation.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(min = 1, max = 100, message = "Test name must not be empty."))]
    pub test_name: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    #[validate(length(min = 1, message = "Select at least one topic."))]
    pub topics: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    #[serde(default = "default_adaptive")]
    pub adaptive: bool,

    /// Educational content the questions should be based on.
    #[serde(default)]
    pub content: Option<String>,
    /// Free-form description of the kind of questions wanted.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_num_questions() -> usize {
    10
}

fn default_adaptive() -> bool {
    true
}

/// DTO for submitting quiz answers.
///
/// Keys are question indexes within the quiz, values are the chosen option
/// text. Indexes outside the quiz are ignored during grading.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: BTreeMap<usize, String>,
}

/// Quiz payload returned to the client; hides correct answers.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub id: String,
    pub test_name: String,
    pub subject: String,
    pub topics: Vec<String>,
    pub difficulty: Difficulty,
    pub adaptive: bool,
    pub questions: Vec<PublicQuestion>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Quiz> for QuizResponse {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            test_name: quiz.test_name.clone(),
            subject: quiz.subject.clone(),
            topics: quiz.topics.clone(),
            difficulty: quiz.difficulty,
            adaptive: quiz.adaptive,
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
            created_at: quiz.created_at,
        }
    }
}

/// One-line quiz listing entry.
#[derive(Debug, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub test_name: String,
    pub subject: String,
    pub difficulty: Difficulty,
    pub num_questions: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            test_name: quiz.test_name.clone(),
            subject: quiz.subject.clone(),
            difficulty: quiz.difficulty,
            num_questions: quiz.questions.len(),
            created_at: quiz.created_at,
        }
    }
}

/// One graded answer within a test result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

fn unknown_test() -> String {
    "Unknown Test".to_string()
}

/// One completed quiz attempt, as stored in `results.json` and consumed by
/// the analytics aggregator. Immutable once created.
///
/// Deserialization substitutes defaults for missing fields rather than
/// failing; an absent `answers` list means topic and difficulty stats are
/// not updated for this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default)]
    pub test_id: String,
    #[serde(default = "unknown_test")]
    pub test_name: String,
    #[serde(default)]
    pub total_questions: usize,
    #[serde(default)]
    pub correct_answers: usize,
    #[serde(default)]
    pub score: f64,
    /// RFC 3339 submission time; lexicographic order is chronological.
    /// May be empty for records that predate timestamping.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub answers: Option<Vec<AnswerRecord>>,
}

/// Coarse performance label shown with a graded submission.
pub fn performance_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent"
    } else if score >= 60.0 {
        "Good"
    } else if score >= 40.0 {
        "Average"
    } else {
        "Needs Improvement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_defaults_for_missing_fields() {
        let result: TestResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.test_name, "Unknown Test");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.timestamp, "");
        assert!(result.answers.is_none());
    }

    #[test]
    fn performance_label_boundaries() {
        assert_eq!(performance_label(80.0), "Excellent");
        assert_eq!(performance_label(79.9), "Good");
        assert_eq!(performance_label(60.0), "Good");
        assert_eq!(performance_label(40.0), "Average");
        assert_eq!(performance_label(39.9), "Needs Improvement");
    }
}

// src/models/question.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Question difficulty level.
///
/// Serialized as the capitalized name ("Easy", "Medium", "Hard"), which is
/// also the bucket key used by the analytics difficulty reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn default_topic() -> String {
    "General".to_string()
}

/// A generated multiple-choice question.
///
/// Deserialization is permissive about `topic` and `difficulty` since older
/// model outputs omit them; they default to the catch-all bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,

    /// Candidate answers, including the correct one.
    pub options: Vec<String>,

    /// The correct option, matched by exact text.
    pub correct_answer: String,

    #[serde(default = "default_topic")]
    pub topic: String,

    #[serde(default)]
    pub difficulty: Difficulty,
}

/// DTO for sending a question to the client (excludes the correct answer).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub topic: String,
    pub difficulty: Difficulty,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            question: q.question.clone(),
            options: q.options.clone(),
            topic: q.topic.clone(),
            difficulty: q.difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_as_capitalized_name() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Easy).unwrap(),
            "\"Easy\""
        );
    }

    #[test]
    fn question_defaults_topic_and_difficulty() {
        let q: Question = serde_json::from_str(
            r#"{"question":"2+2?","options":["3","4"],"correct_answer":"4"}"#,
        )
        .unwrap();
        assert_eq!(q.topic, "General");
        assert_eq!(q.difficulty, Difficulty::Medium);
    }

    #[test]
    fn public_question_has_no_answer_field() {
        let q = Question {
            question: "2+2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            correct_answer: "4".to_string(),
            topic: "Algebra".to_string(),
            difficulty: Difficulty::Easy,
        };
        let public = serde_json::to_value(PublicQuestion::from(&q)).unwrap();
        assert!(public.get("correct_answer").is_none());
    }
}

// src/generator/mod.rs

//! Question generation behind a narrow, injectable interface.
//!
//! The live implementation calls the Cohere generate API and falls back to
//! a small built-in bank when the model misbehaves; tests inject their own
//! [`QuestionGenerator`] so nothing upstream leaks into the rest of the
//! app.

pub mod cohere;
pub mod fallback;

use std::fmt;

use async_trait::async_trait;

use crate::models::question::{Difficulty, Question};

pub use cohere::CohereClient;

/// Errors surfaced by question generation.
#[derive(Debug)]
pub enum GeneratorError {
    /// The upstream API call failed (network, auth, 5xx).
    Upstream(String),

    /// The model responded but no usable question list could be parsed.
    InvalidResponse(String),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::Upstream(msg) => write!(f, "upstream generation failed: {}", msg),
            GeneratorError::InvalidResponse(msg) => {
                write!(f, "unusable generation response: {}", msg)
            }
        }
    }
}

impl std::error::Error for GeneratorError {}

impl From<reqwest::Error> for GeneratorError {
    fn from(err: reqwest::Error) -> Self {
        GeneratorError::Upstream(err.to_string())
    }
}

/// Everything a generator needs to produce one quiz's questions.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub subject: String,
    pub topics: Vec<String>,
    pub difficulty: Difficulty,
    pub num_questions: usize,
    pub content: Option<String>,
    pub description: Option<String>,
}

/// The AI collaborator boundary. Implementations must be side-effect free
/// from the caller's perspective: a failure is an explicit error, never a
/// partially recorded quiz.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
    -> Result<Vec<Question>, GeneratorError>;
}

/// Production generator: Cohere first, built-in bank when the model fails.
pub struct McqGenerator {
    client: CohereClient,
}

impl McqGenerator {
    pub fn new(client: CohereClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuestionGenerator for McqGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>, GeneratorError> {
        match self.client.generate(request).await {
            Ok(questions) if !questions.is_empty() => Ok(questions),
            Ok(_) => {
                tracing::warn!("AI generation returned no questions, using fallback bank");
                Ok(fallback::fallback_questions(request))
            }
            Err(e) => {
                tracing::warn!("AI generation failed ({}), using fallback bank", e);
                Ok(fallback::fallback_questions(request))
            }
        }
    }
}

/// Steps the difficulty for an adaptive quiz based on accuracy (0.0 to 1.0):
/// up at 80% or better, down at 40% or worse, otherwise unchanged.
pub fn adjust_difficulty(current: Difficulty, accuracy: f64) -> Difficulty {
    if accuracy >= 0.8 {
        match current {
            Difficulty::Easy => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    } else if accuracy <= 0.4 {
        match current {
            Difficulty::Hard => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_accuracy_steps_up() {
        assert_eq!(adjust_difficulty(Difficulty::Easy, 0.9), Difficulty::Medium);
        assert_eq!(adjust_difficulty(Difficulty::Medium, 0.8), Difficulty::Hard);
    }

    #[test]
    fn low_accuracy_steps_down() {
        assert_eq!(adjust_difficulty(Difficulty::Hard, 0.3), Difficulty::Medium);
        assert_eq!(adjust_difficulty(Difficulty::Medium, 0.4), Difficulty::Easy);
    }

    #[test]
    fn difficulty_clamps_at_the_ends() {
        assert_eq!(adjust_difficulty(Difficulty::Hard, 1.0), Difficulty::Hard);
        assert_eq!(adjust_difficulty(Difficulty::Easy, 0.0), Difficulty::Easy);
    }

    #[test]
    fn middling_accuracy_holds() {
        assert_eq!(adjust_difficulty(Difficulty::Medium, 0.6), Difficulty::Medium);
    }
}

// src/generator/fallback.rs

//! Built-in question bank used when AI generation fails.
//!
//! Deliberately small: it exists so a quiz can still be produced offline,
//! not to compete with the model. Selection prefers the requested
//! difficulty and pads from the other levels when short.

use rand::seq::SliceRandom;
use rand::thread_rng;

use super::GenerationRequest;
use crate::models::question::{Difficulty, Question};

struct BankEntry {
    subject: &'static str,
    topic: &'static str,
    difficulty: Difficulty,
    question: &'static str,
    options: [&'static str; 4],
    correct_answer: &'static str,
}

const BANK: &[BankEntry] = &[
    BankEntry {
        subject: "Mathematics",
        topic: "Algebra",
        difficulty: Difficulty::Easy,
        question: "What is 2 + 2?",
        options: ["3", "4", "5", "6"],
        correct_answer: "4",
    },
    BankEntry {
        subject: "Mathematics",
        topic: "Algebra",
        difficulty: Difficulty::Medium,
        question: "If 3x - 5 = 10, what is x?",
        options: ["3", "4", "5", "15"],
        correct_answer: "5",
    },
    BankEntry {
        subject: "Computer Science",
        topic: "Programming",
        difficulty: Difficulty::Easy,
        question: "Which of the following is a programming language?",
        options: ["HTML", "Python", "CSS", "JSON"],
        correct_answer: "Python",
    },
    BankEntry {
        subject: "Computer Science",
        topic: "Algorithms",
        difficulty: Difficulty::Medium,
        question: "What is the time complexity of binary search?",
        options: ["O(1)", "O(log n)", "O(n)", "O(n log n)"],
        correct_answer: "O(log n)",
    },
    BankEntry {
        subject: "Science",
        topic: "Physics",
        difficulty: Difficulty::Easy,
        question: "What is the SI unit of force?",
        options: ["Newton", "Joule", "Watt", "Pascal"],
        correct_answer: "Newton",
    },
];

impl BankEntry {
    fn to_question(&self) -> Question {
        Question {
            question: self.question.to_string(),
            options: self.options.iter().map(|o| o.to_string()).collect(),
            correct_answer: self.correct_answer.to_string(),
            topic: self.topic.to_string(),
            difficulty: self.difficulty,
        }
    }

    fn matches(&self, request: &GenerationRequest) -> bool {
        self.subject == request.subject && request.topics.iter().any(|t| t == self.topic)
    }
}

/// Serves built-in questions for the request, shuffled, with each
/// question's option order shuffled too. The correct answer is tracked by
/// text, so reordering options is safe.
pub fn fallback_questions(request: &GenerationRequest) -> Vec<Question> {
    let mut questions: Vec<Question> = BANK
        .iter()
        .filter(|entry| entry.matches(request) && entry.difficulty == request.difficulty)
        .map(BankEntry::to_question)
        .collect();

    // Pad from other difficulty levels when the requested one runs dry.
    if questions.len() < request.num_questions {
        questions.extend(
            BANK.iter()
                .filter(|entry| entry.matches(request) && entry.difficulty != request.difficulty)
                .map(BankEntry::to_question),
        );
    }

    let mut rng = thread_rng();
    questions.shuffle(&mut rng);
    questions.truncate(request.num_questions);

    for question in &mut questions {
        question.options.shuffle(&mut rng);
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(subject: &str, topics: &[&str], difficulty: Difficulty) -> GenerationRequest {
        GenerationRequest {
            subject: subject.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            difficulty,
            num_questions: 10,
            content: None,
            description: None,
        }
    }

    #[test]
    fn unknown_subject_yields_nothing() {
        let questions = fallback_questions(&request("History", &["World Wars"], Difficulty::Easy));
        assert!(questions.is_empty());
    }

    #[test]
    fn selection_respects_subject_and_topic() {
        let questions =
            fallback_questions(&request("Mathematics", &["Algebra"], Difficulty::Easy));
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|q| q.topic == "Algebra"));
    }

    #[test]
    fn pads_from_other_difficulties_when_short() {
        // Only one Easy Algebra entry exists; asking for more pulls in the
        // Medium one as well.
        let questions =
            fallback_questions(&request("Mathematics", &["Algebra"], Difficulty::Easy));
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn correct_answer_survives_option_shuffle() {
        for _ in 0..20 {
            let questions =
                fallback_questions(&request("Science", &["Physics"], Difficulty::Easy));
            for question in &questions {
                assert!(question.options.contains(&question.correct_answer));
            }
        }
    }

    #[test]
    fn respects_requested_count() {
        let mut req = request("Mathematics", &["Algebra"], Difficulty::Easy);
        req.num_questions = 1;
        assert_eq!(fallback_questions(&req).len(), 1);
    }
}

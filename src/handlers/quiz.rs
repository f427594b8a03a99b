// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Claims,
    error::AppError,
    generator::{GenerationRequest, adjust_difficulty},
    models::quiz::{
        AnswerRecord, GenerateQuizRequest, Quiz, QuizResponse, QuizSummary, SubmitQuizRequest,
        TestResult, performance_label,
    },
    state::AppState,
};

/// Generates a new quiz through the AI collaborator and stores it.
///
/// The response hides the correct answers; grading happens server-side on
/// submission.
pub async fn generate_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let request = GenerationRequest {
        subject: payload.subject.clone(),
        topics: payload.topics.clone(),
        difficulty: payload.difficulty,
        num_questions: payload.num_questions,
        content: payload.content,
        description: payload.description,
    };

    let questions = state.generator.generate(&request).await?;
    if questions.is_empty() {
        return Err(AppError::UpstreamError(
            "Question generation produced no questions".to_string(),
        ));
    }

    let quiz = Quiz {
        id: Uuid::new_v4().to_string(),
        test_name: payload.test_name,
        subject: payload.subject,
        topics: payload.topics,
        difficulty: payload.difficulty,
        adaptive: payload.adaptive,
        questions,
        created_by: claims.sub.clone(),
        created_at: chrono::Utc::now(),
    };

    state.store.create_quiz(quiz.clone()).await?;
    tracing::info!(
        "Generated quiz '{}' ({} questions) for '{}'",
        quiz.test_name,
        quiz.questions.len(),
        quiz.created_by
    );

    Ok((StatusCode::CREATED, Json(QuizResponse::from(&quiz))))
}

/// Lists the caller's quizzes in creation order.
pub async fn list_quizzes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = state.store.quizzes_for(&claims.sub).await;
    let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();

    Ok(Json(summaries))
}

/// Fetches one quiz for taking; answers stay hidden.
pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = fetch_owned_quiz(&state, &claims, &id).await?;

    Ok(Json(QuizResponse::from(&quiz)))
}

/// Grades a submission, persists the result and feeds it to analytics.
///
/// * Compares each submitted option text against the stored answer key.
/// * Unanswered questions count as incorrect; indexes outside the quiz are
///   ignored.
/// * For adaptive quizzes the response suggests the next difficulty level.
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = fetch_owned_quiz(&state, &claims, &id).await?;

    if payload.answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let mut answers = Vec::with_capacity(quiz.questions.len());
    let mut correct_count = 0usize;

    for (index, question) in quiz.questions.iter().enumerate() {
        let user_answer = payload.answers.get(&index).cloned().unwrap_or_default();
        let is_correct = user_answer == question.correct_answer;
        if is_correct {
            correct_count += 1;
        }

        answers.push(AnswerRecord {
            question: question.question.clone(),
            user_answer,
            correct_answer: question.correct_answer.clone(),
            is_correct,
            topic: question.topic.clone(),
            difficulty: question.difficulty,
        });
    }

    let total_questions = quiz.questions.len();
    let accuracy = if total_questions > 0 {
        correct_count as f64 / total_questions as f64
    } else {
        0.0
    };
    let score = accuracy * 100.0;

    let result = TestResult {
        test_id: quiz.id.clone(),
        test_name: quiz.test_name.clone(),
        total_questions,
        correct_answers: correct_count,
        score,
        timestamp: chrono::Utc::now().to_rfc3339(),
        answers: Some(answers.clone()),
    };

    state.store.save_result(&claims.sub, &quiz.id, result.clone()).await?;
    state.analytics.write().await.ingest(&claims.sub, &result);

    let next_difficulty = quiz
        .adaptive
        .then(|| adjust_difficulty(quiz.difficulty, accuracy));

    Ok(Json(serde_json::json!({
        "score": score,
        "correct_answers": correct_count,
        "total_questions": total_questions,
        "performance": performance_label(score),
        "next_difficulty": next_difficulty,
        "answers": answers,
    })))
}

/// Looks up a quiz and checks the caller owns it. Quizzes of other users
/// are reported as missing rather than forbidden.
async fn fetch_owned_quiz(
    state: &AppState,
    claims: &Claims,
    id: &str,
) -> Result<Quiz, AppError> {
    let quiz = state
        .store
        .get_quiz(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", id)))?;

    if quiz.created_by != claims.sub {
        return Err(AppError::NotFound(format!("Quiz '{}' not found", id)));
    }

    Ok(quiz)
}

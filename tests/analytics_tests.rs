// tests/analytics_tests.rs

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use quizforge::analytics::PerformanceAnalytics;
use quizforge::config::Config;
use quizforge::generator::{GenerationRequest, GeneratorError, QuestionGenerator};
use quizforge::models::question::Question;
use quizforge::routes;
use quizforge::state::AppState;
use quizforge::store::FileStore;
use tokio::sync::RwLock;

/// Canned question generator; answer key is always option "A".
struct StaticGenerator;

#[async_trait]
impl QuestionGenerator for StaticGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>, GeneratorError> {
        let topic = request
            .topics
            .first()
            .cloned()
            .unwrap_or_else(|| "General".to_string());

        Ok((0..request.num_questions)
            .map(|i| Question {
                question: format!("Question {}?", i),
                options: vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                ],
                correct_answer: "A".to_string(),
                topic: topic.clone(),
                difficulty: request.difficulty,
            })
            .collect())
    }
}

/// Spawns the app against `data_path`, replaying stored results into the
/// analytics state the same way the binary does at startup. Spawning twice
/// against the same directory simulates a restart.
async fn spawn_app(data_path: &Path) -> String {
    let store = FileStore::open(data_path).expect("Failed to open data store");

    let mut analytics = PerformanceAnalytics::new();
    for (user_id, result) in store.results_for_replay().await {
        analytics.ingest(&user_id, &result);
    }

    let config = Config {
        bind_addr: "127.0.0.1:0".to_string(),
        data_dir: data_path.display().to_string(),
        jwt_secret: "analytics_test_secret".to_string(),
        jwt_expiration: 600,
        cohere_api_key: "unused-in-tests".to_string(),
        cohere_model: "command".to_string(),
        rust_log: "error".to_string(),
    };

    let state = AppState {
        store: Arc::new(store),
        analytics: Arc::new(RwLock::new(analytics)),
        generator: Arc::new(StaticGenerator),
        config,
    };

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn register_and_login(client: &reqwest::Client, address: &str, username: &str) -> String {
    let password = "password123";

    client
        .post(format!("{}/api/auth/register", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .unwrap();

    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    login["token"].as_str().unwrap().to_string()
}

/// Generates a quiz and submits it with `correct` of `total` answers right.
async fn take_quiz(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    topic: &str,
    difficulty: &str,
    correct: usize,
    total: usize,
) {
    let quiz = client
        .post(format!("{}/api/quizzes", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "test_name": format!("{} Test", topic),
            "subject": "Mathematics",
            "topics": [topic],
            "difficulty": difficulty,
            "num_questions": total
        }))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    let mut answers = serde_json::Map::new();
    for i in 0..total {
        let choice = if i < correct { "A" } else { "B" };
        answers.insert(i.to_string(), serde_json::json!(choice));
    }

    let response = client
        .post(format!(
            "{}/api/quizzes/{}/submit",
            address,
            quiz["id"].as_str().unwrap()
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "answers": answers }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_analytics_complex_flow() {
    // Arrange
    let data_dir = tempfile::tempdir().unwrap();
    let address = spawn_app(data_dir.path()).await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "carol").await;

    // 1. A weak Easy Algebra attempt, then a perfect Medium Geometry one
    take_quiz(&client, &address, &token, "Algebra", "Easy", 1, 5).await;
    take_quiz(&client, &address, &token, "Geometry", "Medium", 5, 5).await;

    // 2. Overview covers both attempts
    let overview = client
        .get(format!("{}/api/analytics/overview", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(overview["tests_taken"], 2);
    assert_eq!(overview["average_score"], 60.0);
    assert_eq!(overview["high_score"], 100.0);
    assert_eq!(overview["low_score"], 20.0);
    // 20% -> 100% is a +400% improvement
    assert_eq!(overview["improvement_rate"], 400.0);

    // 3. Topics ranked best score first
    let topics = client
        .get(format!("{}/api/analytics/topics", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], "Geometry");
    assert_eq!(topics[0]["score"], 100.0);
    assert_eq!(topics[1]["topic"], "Algebra");
    assert_eq!(topics[1]["score"], 20.0);

    // 4. Difficulties ranked by name
    let difficulties = client
        .get(format!("{}/api/analytics/difficulties", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert_eq!(difficulties.len(), 2);
    assert_eq!(difficulties[0]["difficulty"], "Easy");
    assert_eq!(difficulties[1]["difficulty"], "Medium");

    // 5. Trend lists the newest attempt first
    let trend = client
        .get(format!("{}/api/analytics/trend", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0]["test"], "Geometry Test");
    assert_eq!(trend[1]["test"], "Algebra Test");

    // 6. Both topics cleared the five-question floor
    let sw = client
        .get(format!("{}/api/analytics/strengths", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(sw["strengths"], serde_json::json!(["Geometry (100.0%)"]));
    assert_eq!(sw["weaknesses"], serde_json::json!(["Algebra (20.0%)"]));

    // 7. The rule engine fires on the weak topic, the weak Easy bucket,
    // the short history and the big improvement
    let recommendations = client
        .get(format!("{}/api/analytics/recommendations", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<Vec<String>>()
        .await
        .unwrap();
    assert!(recommendations.contains(
        &"Focus on improving your knowledge of Algebra (current score: 20.0%).".to_string()
    ));
    assert!(recommendations.contains(
        &"Work on mastering the basic concepts before moving to more advanced topics."
            .to_string()
    ));
    assert!(recommendations
        .contains(&"Take more tests to get more accurate performance analytics.".to_string()));
    assert!(recommendations.contains(&"Great improvement! Keep up the good work.".to_string()));
    assert!(!recommendations.iter().any(|r| r.contains("declining")));
}

#[tokio::test]
async fn analytics_state_survives_restart() {
    let data_dir = tempfile::tempdir().unwrap();
    let client = reqwest::Client::new();

    // First instance: take one quiz
    let address = spawn_app(data_dir.path()).await;
    let token = register_and_login(&client, &address, "dave").await;
    take_quiz(&client, &address, &token, "Algebra", "Medium", 3, 4).await;

    // Second instance on the same data directory rebuilds analytics by
    // replaying stored results
    let address = spawn_app(data_dir.path()).await;
    let login = client
        .post(format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": "dave", "password": "password123"}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    let token = login["token"].as_str().unwrap();

    let overview = client
        .get(format!("{}/api/analytics/overview", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(overview["tests_taken"], 1);
    assert_eq!(overview["average_score"], 75.0);

    let trend = client
        .get(format!("{}/api/analytics/trend", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json::<Vec<serde_json::Value>>()
        .await
        .unwrap();
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0]["test"], "Algebra Test");
}

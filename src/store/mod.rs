// src/store/mod.rs

//! JSON-file backed storage for users, quizzes and test results.
//!
//! The whole data set lives in memory behind one `RwLock`; every mutation
//! rewrites the affected JSON file before releasing the lock, so
//! read-modify-write sequences are serialized. Loading is permissive:
//! missing, empty or corrupt files come up as empty maps with a logged
//! warning, mirroring how the data directory behaves on first boot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::quiz::{Quiz, TestResult};
use crate::models::user::User;

const USERS_FILE: &str = "users.json";
const QUIZZES_FILE: &str = "quizzes.json";
const RESULTS_FILE: &str = "results.json";

#[derive(Default)]
struct StoreData {
    users: HashMap<String, User>,
    quizzes: HashMap<String, Quiz>,
    /// user id -> quiz id -> latest result (a retake overwrites).
    results: HashMap<String, HashMap<String, TestResult>>,
}

pub struct FileStore {
    data_dir: PathBuf,
    data: RwLock<StoreData>,
}

impl FileStore {
    /// Opens the store under `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let data = StoreData {
            users: load_map(&data_dir.join(USERS_FILE)),
            quizzes: load_map(&data_dir.join(QUIZZES_FILE)),
            results: load_map(&data_dir.join(RESULTS_FILE)),
        };

        Ok(Self {
            data_dir,
            data: RwLock::new(data),
        })
    }

    pub async fn user_exists(&self, username: &str) -> bool {
        self.data.read().await.users.contains_key(username)
    }

    pub async fn get_user(&self, username: &str) -> Option<User> {
        self.data.read().await.users.get(username).cloned()
    }

    /// Adds a new user; fails with `Conflict` when the username is taken.
    pub async fn insert_user(&self, user: User) -> Result<(), AppError> {
        let mut data = self.data.write().await;

        if data.users.contains_key(&user.username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        data.users.insert(user.username.clone(), user);
        self.write_file(USERS_FILE, &data.users).await
    }

    /// Stores a quiz and registers its id on the owning user.
    pub async fn create_quiz(&self, quiz: Quiz) -> Result<(), AppError> {
        let mut data = self.data.write().await;

        let Some(user) = data.users.get_mut(&quiz.created_by) else {
            return Err(AppError::NotFound(format!(
                "User '{}' not found",
                quiz.created_by
            )));
        };
        user.quizzes.push(quiz.id.clone());

        data.quizzes.insert(quiz.id.clone(), quiz);
        self.write_file(QUIZZES_FILE, &data.quizzes).await?;
        self.write_file(USERS_FILE, &data.users).await
    }

    pub async fn get_quiz(&self, id: &str) -> Option<Quiz> {
        self.data.read().await.quizzes.get(id).cloned()
    }

    /// The user's quizzes in creation order.
    pub async fn quizzes_for(&self, username: &str) -> Vec<Quiz> {
        let data = self.data.read().await;

        let Some(user) = data.users.get(username) else {
            return Vec::new();
        };

        user.quizzes
            .iter()
            .filter_map(|id| data.quizzes.get(id).cloned())
            .collect()
    }

    /// Records a submission; a retake of the same quiz overwrites the
    /// previous result.
    pub async fn save_result(
        &self,
        username: &str,
        quiz_id: &str,
        result: TestResult,
    ) -> Result<(), AppError> {
        let mut data = self.data.write().await;

        if !data.users.contains_key(username) {
            return Err(AppError::NotFound(format!("User '{}' not found", username)));
        }
        if !data.quizzes.contains_key(quiz_id) {
            return Err(AppError::NotFound(format!("Quiz '{}' not found", quiz_id)));
        }

        data.results
            .entry(username.to_string())
            .or_default()
            .insert(quiz_id.to_string(), result);
        self.write_file(RESULTS_FILE, &data.results).await
    }

    /// All stored results as (user id, result) pairs in timestamp order,
    /// for replaying through the analytics aggregator at startup.
    pub async fn results_for_replay(&self) -> Vec<(String, TestResult)> {
        let data = self.data.read().await;

        let mut results: Vec<(String, TestResult)> = data
            .results
            .iter()
            .flat_map(|(user_id, per_quiz)| {
                per_quiz
                    .values()
                    .map(|result| (user_id.clone(), result.clone()))
            })
            .collect();

        results.sort_by(|a, b| a.1.timestamp.cmp(&b.1.timestamp));
        results
    }

    async fn write_file<T: Serialize>(&self, name: &str, value: &T) -> Result<(), AppError> {
        let contents = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        tokio::fs::write(self.data_dir.join(name), contents).await?;
        Ok(())
    }
}

fn load_map<T: DeserializeOwned>(path: &Path) -> HashMap<String, T> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return HashMap::new(),
    };

    if contents.trim().is_empty() {
        return HashMap::new();
    }

    match serde_json::from_str(&contents) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("Could not parse {}: {}; starting empty", path.display(), e);
            HashMap::new()
        }
    }
}

// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cohere_api_key: String,
    pub cohere_model: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let cohere_api_key = env::var("COHERE_API_KEY").expect("COHERE_API_KEY must be set");

        let cohere_model = env::var("COHERE_MODEL").unwrap_or_else(|_| "command".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            bind_addr,
            data_dir,
            jwt_secret,
            jwt_expiration,
            cohere_api_key,
            cohere_model,
            rust_log,
        }
    }
}

// src/generator/cohere.rs

//! HTTP client for the Cohere generate API.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationRequest, GeneratorError};
use crate::models::question::Question;

pub struct CohereClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Deserialize)]
struct Generation {
    text: String,
}

impl CohereClient {
    const API_URL: &'static str = "https://api.cohere.com/v1/generate";

    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
        }
    }

    /// Asks the model for a batch of questions and parses its output.
    ///
    /// The model is instructed to answer with a JSON array; anything it
    /// wraps around the array is discarded before parsing.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>, GeneratorError> {
        let prompt = build_prompt(request);

        let response = self
            .client
            .post(Self::API_URL)
            .bearer_auth(&self.api_key)
            .json(&GenerateBody {
                model: &self.model,
                prompt: &prompt,
                max_tokens: 3000,
                temperature: 0.3,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Upstream(format!("{}: {}", status, message)));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        let text = parsed
            .generations
            .first()
            .map(|g| g.text.as_str())
            .unwrap_or_default();

        extract_questions(text, request.num_questions)
    }
}

fn build_prompt(request: &GenerationRequest) -> String {
    let topics = request.topics.join(", ");

    let mut prompt = format!(
        "Generate {} multiple-choice questions (MCQs) with the following specifications:\n\n\
         Subject: {}\nTopics: {}\nDifficulty Level: {}\n",
        request.num_questions, request.subject, topics, request.difficulty
    );

    if let Some(description) = request.description.as_deref().filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!(
            "\nIMPORTANT CUSTOM REQUIREMENTS (MUST FOLLOW EXACTLY): {}\n\n\
             CRITICAL: The questions MUST strictly follow the custom requirements above. \
             Do not deviate from the specified topic or requirements.\n",
            description
        ));
    }

    if let Some(content) = request.content.as_deref().filter(|c| c.trim().len() > 50) {
        prompt.push_str(&format!(
            "Base the questions on this educational content: {}\n",
            content
        ));
    }

    // A custom description outranks the generic topic list as the focus.
    let focus = request
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| topics.clone());

    prompt.push_str(&format!(
        "\nRequirements for each question:\n\
         1. Create exactly {count} questions\n\
         2. Each question should have exactly 4 multiple choice options\n\
         3. Mark the correct answer clearly\n\
         4. Make sure the difficulty is {difficulty}\n\
         5. Tag each question with the single topic it tests, chosen from: {topics}\n\
         6. Questions should be educational and test understanding of: {focus}\n\
         7. STRICTLY FOLLOW the custom requirements if provided - do not include questions about other topics\n\n\
         Format your response as a valid JSON array like this example:\n\
         [\n\
             {{\n\
                 \"question\": \"What is the time complexity of binary search?\",\n\
                 \"options\": [\"O(1)\", \"O(log n)\", \"O(n)\", \"O(n\u{b2})\"],\n\
                 \"correct_answer\": \"O(log n)\",\n\
                 \"topic\": \"Algorithms\",\n\
                 \"difficulty\": \"{difficulty}\"\n\
             }}\n\
         ]\n\n\
         Generate the questions now:",
        count = request.num_questions,
        difficulty = request.difficulty,
        topics = topics,
        focus = focus,
    ));

    prompt
}

/// Pulls the outermost JSON array out of the model's text and keeps only
/// entries that form a complete question, up to `limit`.
pub(crate) fn extract_questions(
    text: &str,
    limit: usize,
) -> Result<Vec<Question>, GeneratorError> {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Err(GeneratorError::InvalidResponse(
            "no JSON array in model output".to_string(),
        ));
    };
    if end < start {
        return Err(GeneratorError::InvalidResponse(
            "no JSON array in model output".to_string(),
        ));
    }

    let raw: Vec<serde_json::Value> = serde_json::from_str(&text[start..=end])
        .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

    let mut questions: Vec<Question> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<Question>(value).ok())
        .filter(|q| !q.question.is_empty() && !q.options.is_empty() && !q.correct_answer.is_empty())
        .collect();
    questions.truncate(limit);

    Ok(questions)
}

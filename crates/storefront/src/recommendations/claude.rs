//! Anthropic Messages API ranker.

use std::fmt::Write as _;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::RecommendationConfig;

use super::{MAX_RECOMMENDATIONS, ProductRanker, RankingRequest, RankingResponse, RecommendationError};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

/// Ranks products by asking Claude.
#[derive(Clone)]
pub struct ClaudeRanker {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl ClaudeRanker {
    /// Create a new ranker.
    #[must_use]
    pub fn new(config: &RecommendationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Map a non-success response to an error.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> RecommendationError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return RecommendationError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return RecommendationError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => RecommendationError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                },
                Err(_) => RecommendationError::Api {
                    error_type: "unknown".to_string(),
                    message: body,
                },
            },
            Err(e) => RecommendationError::Http(e),
        }
    }
}

#[async_trait]
impl ProductRanker for ClaudeRanker {
    #[instrument(skip_all, fields(model = %self.model, product_id = %request.current_product.id))]
    async fn rank(&self, request: &RankingRequest) -> Result<RankingResponse, RecommendationError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: build_prompt(request),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let text = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| RecommendationError::Parse(format!("Failed to parse response: {e}")))?;

        let reply = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| RecommendationError::Parse("no text in response".to_string()))?;

        parse_reply(&reply)
    }
}

/// The instruction sent to the model.
fn build_prompt(request: &RankingRequest) -> String {
    let current = &request.current_product;
    let mut prompt = String::from("You are an assistant that recommends similar products.\n\n");

    let _ = writeln!(prompt, "The user is currently viewing the following product:");
    let _ = writeln!(prompt, "- ID: {}", current.id);
    let _ = writeln!(prompt, "- Name: {}", current.name);
    let _ = writeln!(prompt, "- Description: {}", current.description);
    let _ = writeln!(prompt, "- Category: {}", current.category);
    let _ = writeln!(prompt, "\nHere is a list of all available products:");
    for product in &request.all_products {
        let _ = writeln!(prompt, "- ID: {}, Name: {}", product.id, product.name);
    }
    let _ = write!(
        prompt,
        "\nBased on the current product, recommend up to {MAX_RECOMMENDATIONS} similar products \
         from the list. Do not recommend the current product itself. Reply with only a JSON \
         object of the form {{\"recommendedProductIds\": [\"id\", ...]}} and no other text."
    );

    prompt
}

/// Parse the first JSON object in a model reply.
fn parse_reply(reply: &str) -> Result<RankingResponse, RecommendationError> {
    let start = reply
        .find('{')
        .ok_or_else(|| RecommendationError::Parse("no JSON object in reply".to_string()))?;

    let mut stream =
        serde_json::Deserializer::from_str(&reply[start..]).into_iter::<RankingResponse>();
    match stream.next() {
        Some(Ok(response)) => Ok(response),
        Some(Err(e)) => Err(RecommendationError::Parse(format!("invalid reply: {e}"))),
        None => Err(RecommendationError::Parse("empty reply".to_string())),
    }
}

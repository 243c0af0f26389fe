use crate::error::{Error, Result};
use crate::parse::steps_from_reply;
use async_trait::async_trait;
use scout_core::{Plan, PlannerConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SYSTEM_PROMPT: &str = "Return ONLY a JSON array of steps, or {\"steps\":[...]}. \
Each step MUST include an 'action' field. \
Use selectors that appear in the provided page snapshot; prefer attribute \
selectors over bare tag names. \
Allowed actions: navigate{url}, click{selector}, fill{selector,value}, \
press_enter, wait_for_selector{selector}, extract_result{selector}. \
The final step MUST be extract_result.";

/// Anything that can produce a plan for the current goal. The orchestrator
/// treats any error as "no plan provided" and falls back deterministically.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    async fn fetch_plan(
        &self,
        goal: &str,
        query: &str,
        snapshot: Option<&serde_json::Value>,
    ) -> Result<Plan>;
}

/// Plan source backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiPlanner {
    client: reqwest::Client,
    config: PlannerConfig,
}

impl OpenAiPlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PlanProvider for OpenAiPlanner {
    async fn fetch_plan(
        &self,
        goal: &str,
        query: &str,
        snapshot: Option<&serde_json::Value>,
    ) -> Result<Plan> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let user = json!({
            "goal": goal,
            "query": query,
            "page": snapshot.unwrap_or(&serde_json::Value::Null),
        });
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(Error::Endpoint { status, body });
        }

        let reply: ChatCompletionResponse = response.json().await?;
        let content = reply
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();
        tracing::debug!(
            reply = %content.chars().take(400).collect::<String>(),
            "planner raw reply"
        );

        let steps = steps_from_reply(content)?;
        tracing::info!(steps = steps.len(), "planner proposed a plan");
        Ok(Plan::from_ai(steps))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    #[serde(default)]
    content: String,
}

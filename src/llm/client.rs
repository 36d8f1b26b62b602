use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::models::{Argument, ArgumentAnalysis, Relation, Segment};

use super::prompts::{
    build_classification_prompt, build_merge_prompt, build_relations_prompt,
    classification_response_schema, merge_response_schema, relations_response_schema,
    MergedSegmentsResponse, RelationsResponse, ANALYSIS_SYSTEM_PROMPT, MERGE_SYSTEM_PROMPT,
};
use super::{Gateway, GatewayOutcome};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key (from OPENAI_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "gpt-4o-2024-08-06")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Chat completions endpoint
    pub api_url: String,
}

impl OpenAiConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            AnalysisError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        Ok(Self {
            api_key,
            model: "gpt-4o-2024-08-06".to_string(),
            temperature: 0.2,
            api_url: OPENAI_API_URL.to_string(),
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.2,
            api_url: OPENAI_API_URL.to_string(),
        }
    }
}

/// OpenAI chat-completions client with schema-constrained responses
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send one structured-output request and classify the response into the
    /// three-arm outcome. Transport and API-status failures are errors; a
    /// refusal or an undecodable payload is a normal outcome variant.
    async fn structured<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<GatewayOutcome<T>> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            temperature: Some(self.config.temperature),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: schema_name.to_string(),
                    strict: true,
                    schema,
                },
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Gateway { status, body });
        }

        let response: ChatResponse = response.json().await?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Ok(GatewayOutcome::Unparsed);
        };

        if let Some(refusal) = choice.message.refusal {
            return Ok(GatewayOutcome::Refused(refusal));
        }

        let Some(content) = choice.message.content.filter(|c| !c.is_empty()) else {
            return Ok(GatewayOutcome::Unparsed);
        };

        match serde_json::from_str::<T>(&content) {
            Ok(payload) => Ok(GatewayOutcome::Parsed(payload)),
            Err(e) => {
                warn!("response for {} did not decode: {}", schema_name, e);
                Ok(GatewayOutcome::Unparsed)
            }
        }
    }
}

impl Gateway for OpenAiClient {
    async fn refine_segments(
        &self,
        segments: &[Segment],
    ) -> Result<GatewayOutcome<Vec<Segment>>> {
        debug!("requesting merge refinement for {} segments", segments.len());
        let outcome: GatewayOutcome<MergedSegmentsResponse> = self
            .structured(
                MERGE_SYSTEM_PROMPT,
                &build_merge_prompt(segments),
                "merged_segments",
                merge_response_schema(),
            )
            .await?;

        Ok(match outcome {
            GatewayOutcome::Parsed(response) => GatewayOutcome::Parsed(response.final_answer),
            GatewayOutcome::Refused(reason) => GatewayOutcome::Refused(reason),
            GatewayOutcome::Unparsed => GatewayOutcome::Unparsed,
        })
    }

    async fn classify_argument(
        &self,
        segment: &Segment,
    ) -> Result<GatewayOutcome<ArgumentAnalysis>> {
        debug!("classifying segment from speaker {}", segment.speaker);
        self.structured(
            ANALYSIS_SYSTEM_PROMPT,
            &build_classification_prompt(segment),
            "argument_analysis",
            classification_response_schema(),
        )
        .await
    }

    async fn infer_relations(
        &self,
        arguments: &[Argument],
    ) -> Result<GatewayOutcome<Vec<Relation>>> {
        debug!("inferring relations over {} arguments", arguments.len());
        let outcome: GatewayOutcome<RelationsResponse> = self
            .structured(
                ANALYSIS_SYSTEM_PROMPT,
                &build_relations_prompt(arguments),
                "relations",
                relations_response_schema(),
            )
            .await?;

        Ok(match outcome {
            GatewayOutcome::Parsed(response) => GatewayOutcome::Parsed(response.relations),
            GatewayOutcome::Refused(reason) => GatewayOutcome::Refused(reason),
            GatewayOutcome::Unparsed => GatewayOutcome::Unparsed,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

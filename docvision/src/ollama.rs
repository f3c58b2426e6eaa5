use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisRequest, DocumentAnalyzer};
use crate::config::OllamaConfig;
use crate::error::AnalysisError;

const SYSTEM_PROMPT: &str = "You are a document processing analyst. You receive a batch of \
files with their names, types and text excerpts. Summarize what each document contains, \
classify it, and point out notable entities, dates and amounts. Respond with a concise \
structured report covering every document.";

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: OllamaConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AnalysisError::Connection {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { client, config })
    }

    /// Generate a non-streaming chat response
    pub async fn generate_simple(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String, AnalysisError> {
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));

        let request = OllamaChatRequest {
            model: model.to_string(),
            messages,
            stream: false,
            options: Some(OllamaOptions {
                temperature: Some(self.config.temperature),
            }),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Connection {
                url: url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();

            if message.contains("model") && message.contains("not found") {
                return Err(AnalysisError::ModelNotFound {
                    model: model.to_string(),
                });
            }

            return Err(AnalysisError::Generation { status, message });
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse { source: e })?;

        Ok(chat_response.message.content)
    }
}

impl DocumentAnalyzer for OllamaClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        if !self.config.enabled {
            return Err(AnalysisError::Disabled);
        }

        debug!(
            model = %self.config.model,
            documents = request.documents.len(),
            "Sending analysis request to Ollama"
        );

        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt(request)?),
        ];

        self.generate_simple(&self.config.model, messages).await
    }
}

fn user_prompt(request: &AnalysisRequest) -> Result<String, AnalysisError> {
    let documents =
        serde_json::to_string_pretty(&request.documents).map_err(AnalysisError::Encode)?;
    Ok(format!("{}\n\nDocuments:\n{}", request.instructions, documents))
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Internal Ollama API types

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DEFAULT_INSTRUCTIONS, DocumentContent};
    use std::path::PathBuf;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            documents: vec![DocumentContent {
                file_name: "invoice.pdf".to_string(),
                file_path: PathBuf::from("in/invoice.pdf"),
                file_type_label: "PDF Document".to_string(),
                text_content: "Total due: 42".to_string(),
            }],
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    #[test]
    fn test_user_prompt_contains_instructions_and_documents() {
        let prompt = user_prompt(&request()).unwrap();
        assert!(prompt.starts_with(DEFAULT_INSTRUCTIONS));
        assert!(prompt.contains("\"file_name\": \"invoice.pdf\""));
        assert!(prompt.contains("Total due: 42"));
    }

    #[test]
    fn test_chat_request_serialization() {
        let request = OllamaChatRequest {
            model: "llama3.2".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            stream: false,
            options: Some(OllamaOptions {
                temperature: Some(0.0),
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.2");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["options"]["temperature"], 0.0);
    }

    #[test]
    fn test_chat_response_parsing() {
        let response: OllamaChatResponse = serde_json::from_str(
            r#"{"model":"llama3.2","message":{"role":"assistant","content":"Two invoices."},"done":true}"#,
        )
        .unwrap();
        assert_eq!(response.message.content, "Two invoices.");
    }

    #[test]
    fn test_disabled_client_refuses() {
        let client = OllamaClient::new(OllamaConfig {
            enabled: false,
            ..OllamaConfig::default()
        })
        .unwrap();

        let result = tokio_test::block_on(client.analyze(&request()));
        assert!(matches!(result, Err(AnalysisError::Disabled)));
    }

    #[test]
    fn test_unreachable_server_is_connection_error() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            ..OllamaConfig::default()
        })
        .unwrap();

        let result = tokio_test::block_on(client.analyze(&request()));
        assert!(matches!(result, Err(AnalysisError::Connection { .. })));
    }
}

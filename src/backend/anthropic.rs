use serde::{Deserialize, Serialize};

use super::{BackendOptions, GenerationBackend, GenerationResult, Message, ProviderError, Role};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Adapter for the Anthropic messages API. Plain mode only: the factory
/// registers it without structured support.
pub struct AnthropicBackend {
    http: ureq::Agent,
    endpoint: String,
    model: String,
    temperature: f32,
    stop: Vec<String>,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<&'a [String]>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicBackend {
    pub fn new(options: &BackendOptions, api_key: String) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .build();

        Self {
            http: config.into(),
            endpoint: options
                .endpoint
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            model: options.model.clone(),
            temperature: options.temperature,
            stop: options.stop.clone(),
            api_key,
        }
    }
}

impl GenerationBackend for AnthropicBackend {
    fn generate(&self, messages: &[Message]) -> Result<GenerationResult, ProviderError> {
        // The messages API takes system text as a top-level field, not a
        // message role.
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: self.temperature,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: messages
                .iter()
                .filter(|m| m.role != Role::System)
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stop_sequences: (!self.stop.is_empty()).then_some(self.stop.as_slice()),
        };

        let response: MessagesResponse = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(&request)?
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = response
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(GenerationResult { text })
    }

    fn generate_structured(
        &self,
        _messages: &[Message],
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        Err(ProviderError::SchemaViolation(
            "anthropic adapter has no schema-constrained decoding".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_messages_are_lifted_out_of_the_message_list() {
        let messages = [
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];

        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        let wire: Vec<&str> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| m.content.as_str())
            .collect();

        assert_eq!(system, ["be brief"]);
        assert_eq!(wire, ["hello", "hi"]);
    }

    #[test]
    fn response_parsing_joins_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}"#;
        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        let text: String = response.content.into_iter().map(|b| b.text).collect();
        assert_eq!(text, "ab");
    }
}

use serde::{Deserialize, Serialize};

use super::{
    BackendOptions, GenerationBackend, GenerationResult, Message, ProviderError, check_required,
};

const OLLAMA_API_URL: &str = "http://localhost:11434/api/chat";

/// Adapter for a local (or remote) Ollama server's native chat API.
pub struct OllamaBackend {
    http: ureq::Agent,
    endpoint: String,
    model: String,
    temperature: f32,
    stop: Vec<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: Options<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct Options<'a> {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaBackend {
    pub fn new(options: &BackendOptions) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .build();

        Self {
            http: config.into(),
            endpoint: options
                .endpoint
                .clone()
                .unwrap_or_else(|| OLLAMA_API_URL.to_string()),
            model: options.model.clone(),
            temperature: options.temperature,
            stop: options.stop.clone(),
        }
    }

    fn chat(
        &self,
        messages: &[Message],
        format: Option<&'static str>,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: false,
            options: Options {
                temperature: self.temperature,
                stop: (!self.stop.is_empty()).then_some(self.stop.as_slice()),
            },
            format,
        };

        let response: ChatResponse = self
            .http
            .post(&self.endpoint)
            .send_json(&request)?
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if response.message.content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(response.message.content)
    }
}

impl GenerationBackend for OllamaBackend {
    fn generate(&self, messages: &[Message]) -> Result<GenerationResult, ProviderError> {
        let text = self.chat(messages, None)?;
        Ok(GenerationResult { text })
    }

    fn generate_structured(
        &self,
        messages: &[Message],
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let text = self.chat(messages, Some("json"))?;

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::SchemaViolation(format!("not valid JSON: {e}")))?;
        check_required(&value, schema)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_format_only_in_json_mode() {
        let request = ChatRequest {
            model: "llama3",
            messages: vec![],
            stream: false,
            options: Options {
                temperature: 0.0,
                stop: None,
            },
            format: Some("json"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn response_parsing_reads_message_content() {
        let body = r#"{"model":"llama3","message":{"role":"assistant","content":"hi"},"done":true}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.content, "hi");
    }
}

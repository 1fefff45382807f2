use serde::{Deserialize, Serialize};

use super::{
    BackendOptions, GenerationBackend, GenerationResult, Message, ProviderError, check_required,
};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible chat-completions adapter.
///
/// Also serves Groq and self-hosted vLLM, which speak the same wire format
/// behind a different endpoint; the factory registers those names with the
/// matching endpoint preset.
pub struct OpenAiBackend {
    http: ureq::Agent,
    endpoint: String,
    model: String,
    temperature: f32,
    stop: Vec<String>,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(options: &BackendOptions) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(options.timeout))
            .build();

        Self {
            http: config.into(),
            endpoint: options
                .endpoint
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            model: options.model.clone(),
            temperature: options.temperature,
            stop: options.stop.clone(),
            api_key: options.api_key.clone(),
        }
    }

    fn complete(
        &self,
        messages: &[Message],
        response_format: Option<serde_json::Value>,
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
            temperature: self.temperature,
            stop: (!self.stop.is_empty()).then_some(self.stop.as_slice()),
            response_format,
        };

        let mut req = self.http.post(&self.endpoint);
        if let Some(key) = &self.api_key {
            let bearer = format!("Bearer {key}");
            req = req.header("Authorization", bearer.as_str());
        }

        let response: ChatResponse = req
            .send_json(&request)?
            .body_mut()
            .read_json()
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

impl GenerationBackend for OpenAiBackend {
    fn generate(&self, messages: &[Message]) -> Result<GenerationResult, ProviderError> {
        let text = self.complete(messages, None)?;
        Ok(GenerationResult { text })
    }

    fn generate_structured(
        &self,
        messages: &[Message],
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let format = serde_json::json!({ "type": "json_object" });
        let text = self.complete(messages, Some(format))?;

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
    fn request_serializes_expected_fields() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                WireMessage {
                    role: "system",
                    content: "be brief",
                },
                WireMessage {
                    role: "user",
                    content: "hello",
                },
            ],
            temperature: 0.0,
            stop: None,
            response_format: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
        // empty stop and absent response_format are omitted from the wire
        assert!(value.get("stop").is_none());
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn response_parsing_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn unreachable_endpoint_is_a_provider_error() {
        let options = BackendOptions::new("m")
            .endpoint("http://localhost:1/v1/chat/completions")
            .timeout(std::time::Duration::from_millis(200));
        let backend = OpenAiBackend::new(&options);

        let err = backend.generate(&[Message::user("hi")]).err().unwrap();
        assert!(matches!(err, ProviderError::Http(_)));
    }
}

//! Uniform interface to text-generation providers.
//!
//! Every provider adapter implements [`GenerationBackend`]; the rest of the
//! crate never sees provider-specific types. Callers pick plain or
//! structured output explicitly through [`Mode`] when resolving a backend
//! from the [`BackendFactory`] — the two are never auto-detected.

mod anthropic;
mod factory;
mod ollama;
mod openai;

pub use anthropic::AnthropicBackend;
pub use factory::{BackendFactory, ProviderSpec};
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use std::fmt;
use std::time::Duration;

/// Who said what in a generation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry in the ordered prompt passed to a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Output of a plain-mode generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationResult {
    pub text: String,
}

/// Output shape a caller requires from a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Unstructured text.
    Plain,
    /// JSON validated against a caller-supplied schema.
    Structured,
}

/// Provider-agnostic configuration for a backend instance.
#[derive(Clone, Debug)]
pub struct BackendOptions {
    pub model: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f32,
    /// Stop sequences, passed through where the provider supports them.
    pub stop: Vec<String>,
    /// Override the provider's default endpoint (self-hosted vLLM, remote
    /// Ollama, proxies).
    pub endpoint: Option<String>,
    /// Per-call deadline. The executor has no cancellation of its own, so a
    /// hung provider call is cut off here.
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl BackendOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
            stop: Vec::new(),
            endpoint: None,
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// A text-generation provider.
///
/// Adapters issue one network call per method invocation and hold no mutable
/// state, so a backend can be shared across concurrent runs. A failed call
/// is always reported as a [`ProviderError`]; adapters never substitute a
/// default value.
pub trait GenerationBackend: Send + Sync {
    /// Generate unstructured text from an ordered prompt.
    fn generate(&self, messages: &[Message]) -> Result<GenerationResult, ProviderError>;

    /// Generate JSON validated against `schema`. Only available on backends
    /// the factory registers with structured support.
    fn generate_structured(
        &self,
        messages: &[Message],
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Check structured output against the schema's `required` property list.
///
/// This is deliberately shallow: providers with native JSON modes already
/// guarantee well-formed JSON, so the remaining failure worth catching is a
/// response that dropped a required field.
pub(crate) fn check_required(
    value: &serde_json::Value,
    schema: &serde_json::Value,
) -> Result<(), ProviderError> {
    let Some(required) = schema.get("required").and_then(|r| r.as_array()) else {
        return Ok(());
    };

    let obj = value
        .as_object()
        .ok_or_else(|| ProviderError::SchemaViolation("output is not a JSON object".into()))?;

    for key in required.iter().filter_map(|k| k.as_str()) {
        if !obj.contains_key(key) {
            return Err(ProviderError::SchemaViolation(format!(
                "missing required field: {key}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// A failed generation call, in terms of what went wrong rather than which
/// provider it came from.
#[derive(Debug)]
pub enum ProviderError {
    /// Transport failure: connect, TLS, timeout.
    Http(String),
    /// The provider answered with a non-success status.
    Api { status: u16, message: String },
    /// The call succeeded but carried no usable text.
    EmptyResponse,
    /// The response body did not match the provider's documented shape.
    MalformedResponse(String),
    /// Structured-mode output failed schema validation.
    SchemaViolation(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "http: {msg}"),
            Self::Api { status, message } => write!(f, "provider returned {status}: {message}"),
            Self::EmptyResponse => write!(f, "provider returned an empty response"),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            Self::SchemaViolation(msg) => write!(f, "schema violation: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<ureq::Error> for ProviderError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(status) => ProviderError::Api {
                status,
                message: "request rejected".into(),
            },
            other => ProviderError::Http(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> Self {
        ProviderError::Http(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A backend could not be resolved. Raised by [`BackendFactory::resolve`]
/// before any run starts, never during one.
#[derive(Debug)]
pub enum ConfigError {
    /// No provider registered under this name.
    UnknownProvider(String),
    /// Structured mode requested from a provider without schema-constrained
    /// decoding.
    StructuredUnsupported(&'static str),
    /// The provider needs an API key and none was configured.
    MissingApiKey(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProvider(name) => write!(f, "unknown provider: {name}"),
            Self::StructuredUnsupported(name) => {
                write!(f, "provider '{name}' does not support structured output")
            }
            Self::MissingApiKey(name) => write!(f, "provider '{name}' requires an API key"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::system("a").role, Role::System);
        assert_eq!(Message::user("b").role, Role::User);
        assert_eq!(Message::assistant("c").role, Role::Assistant);
    }

    #[test]
    fn temperature_is_clamped() {
        assert_eq!(BackendOptions::new("m").temperature(1.7).temperature, 1.0);
        assert_eq!(BackendOptions::new("m").temperature(-0.3).temperature, 0.0);
    }

    #[test]
    fn check_required_accepts_complete_object() {
        let schema = json!({"required": ["title", "url"]});
        let value = json!({"title": "t", "url": "u", "extra": 1});
        assert!(check_required(&value, &schema).is_ok());
    }

    #[test]
    fn check_required_rejects_missing_field() {
        let schema = json!({"required": ["title", "url"]});
        let value = json!({"title": "t"});
        let err = check_required(&value, &schema).err().unwrap();
        assert!(matches!(err, ProviderError::SchemaViolation(msg) if msg.contains("url")));
    }

    #[test]
    fn check_required_rejects_non_object() {
        let schema = json!({"required": ["title"]});
        let err = check_required(&json!([1, 2]), &schema).err().unwrap();
        assert!(matches!(err, ProviderError::SchemaViolation(_)));
    }

    #[test]
    fn schema_without_required_list_passes_anything() {
        let schema = json!({"type": "object"});
        assert!(check_required(&json!("free text"), &schema).is_ok());
    }

    #[test]
    fn display_api_error() {
        let err = ProviderError::Api {
            status: 429,
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "provider returned 429: rate limited");
    }
}

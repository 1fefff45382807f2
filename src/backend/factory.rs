use std::collections::HashMap;

use super::{
    AnthropicBackend, BackendOptions, ConfigError, GenerationBackend, Mode, OllamaBackend,
    OpenAiBackend,
};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const VLLM_DEFAULT_URL: &str = "http://localhost:8000/v1/chat/completions";

type Constructor = fn(&BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError>;

/// How to build one named provider, registered with the [`BackendFactory`].
pub struct ProviderSpec {
    /// Builds the backend from resolved options.
    pub build: Constructor,
    /// Whether the provider can honor [`Mode::Structured`].
    pub structured: bool,
}

/// Resolves a `(provider name, mode)` pair to a ready-to-use backend.
///
/// This is the single extension point for providers: new ones are added with
/// [`register`](Self::register), never by branching on names at call sites.
/// Resolution fails before any workflow runs — an unknown name or an
/// unsupported mode never makes it into a graph.
pub struct BackendFactory {
    registry: HashMap<&'static str, ProviderSpec>,
}

fn build_openai(options: &BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError> {
    if options.api_key.is_none() {
        return Err(ConfigError::MissingApiKey("openai"));
    }
    Ok(Box::new(OpenAiBackend::new(options)))
}

fn build_groq(options: &BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError> {
    if options.api_key.is_none() {
        return Err(ConfigError::MissingApiKey("groq"));
    }
    let mut options = options.clone();
    if options.endpoint.is_none() {
        options.endpoint = Some(GROQ_API_URL.to_string());
    }
    Ok(Box::new(OpenAiBackend::new(&options)))
}

fn build_vllm(options: &BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError> {
    let mut options = options.clone();
    if options.endpoint.is_none() {
        options.endpoint = Some(VLLM_DEFAULT_URL.to_string());
    }
    Ok(Box::new(OpenAiBackend::new(&options)))
}

fn build_ollama(options: &BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError> {
    Ok(Box::new(OllamaBackend::new(options)))
}

fn build_claude(options: &BackendOptions) -> Result<Box<dyn GenerationBackend>, ConfigError> {
    let Some(key) = options.api_key.clone() else {
        return Err(ConfigError::MissingApiKey("claude"));
    };
    Ok(Box::new(AnthropicBackend::new(options, key)))
}

impl BackendFactory {
    /// An empty factory with no providers registered.
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
        }
    }

    /// A factory preloaded with the stock providers: `openai`, `groq`,
    /// `vllm`, `ollama` (all structured-capable) and `claude` (plain only).
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(
            "openai",
            ProviderSpec {
                build: build_openai,
                structured: true,
            },
        );
        factory.register(
            "groq",
            ProviderSpec {
                build: build_groq,
                structured: true,
            },
        );
        factory.register(
            "vllm",
            ProviderSpec {
                build: build_vllm,
                structured: true,
            },
        );
        factory.register(
            "ollama",
            ProviderSpec {
                build: build_ollama,
                structured: true,
            },
        );
        factory.register(
            "claude",
            ProviderSpec {
                build: build_claude,
                structured: false,
            },
        );
        factory
    }

    /// Register (or replace) a provider under `name`.
    pub fn register(&mut self, name: &'static str, spec: ProviderSpec) {
        self.registry.insert(name, spec);
    }

    /// Names of all registered providers, for diagnostics.
    pub fn providers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.registry.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve `name` + `mode` into a backend, or fail with a
    /// [`ConfigError`] before anything is constructed.
    pub fn resolve(
        &self,
        name: &str,
        mode: Mode,
        options: &BackendOptions,
    ) -> Result<Box<dyn GenerationBackend>, ConfigError> {
        let (key, spec) = self
            .registry
            .get_key_value(name)
            .ok_or_else(|| ConfigError::UnknownProvider(name.to_string()))?;

        if mode == Mode::Structured && !spec.structured {
            return Err(ConfigError::StructuredUnsupported(*key));
        }

        (spec.build)(options)
    }
}

impl Default for BackendFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

use crate::agent::{Agent, AgentError, AgentParams};
use crate::backend::{GenerationBackend, Message};
use crate::state::{Summary, WorkflowState};

const SYSTEM_PROMPT: &str = "Create a weekly AI/ML news report for the general public. \
Format it with:\n1. A brief introduction\n2. The main news items with their summaries\n\
3. Links for further reading\n\nMake it engaging and accessible to non-technical readers.";

/// Compiles all summaries into one report with a single plain-mode
/// generation call and writes it to `report`. Persisting the report is the
/// report sink's job, after the run completes.
pub struct Publisher {
    backend: Box<dyn GenerationBackend>,
}

impl Publisher {
    pub fn new(backend: Box<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    fn render(summaries: &[Summary]) -> String {
        summaries
            .iter()
            .map(|s| {
                format!(
                    "Title: {}\nSummary: {}\nSource: {}",
                    s.title, s.summary, s.url
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Agent for Publisher {
    fn name(&self) -> &'static str {
        "publisher"
    }

    fn invoke(
        &self,
        state: &WorkflowState,
        params: &AgentParams,
    ) -> Result<WorkflowState, AgentError> {
        let summaries = state
            .summaries
            .as_ref()
            .ok_or(AgentError::MissingInput("summaries"))?;
        let system = params.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);

        let messages = [Message::system(system), Message::user(Self::render(summaries))];
        let result = self.backend.generate(&messages)?;

        Ok(state.clone().with_report(result.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GenerationResult, ProviderError};

    struct FixedBackend(&'static str);

    impl GenerationBackend for FixedBackend {
        fn generate(&self, _messages: &[Message]) -> Result<GenerationResult, ProviderError> {
            Ok(GenerationResult {
                text: self.0.to_string(),
            })
        }

        fn generate_structured(
            &self,
            _messages: &[Message],
            _schema: &serde_json::Value,
        ) -> Result<serde_json::Value, ProviderError> {
            unimplemented!("not used by the publisher")
        }
    }

    fn summaries() -> Vec<Summary> {
        vec![
            Summary {
                title: "A".into(),
                summary: "about A".into(),
                url: "https://a".into(),
            },
            Summary {
                title: "B".into(),
                summary: "about B".into(),
                url: "https://b".into(),
            },
        ]
    }

    #[test]
    fn writes_the_generated_report() {
        let agent = Publisher::new(Box::new(FixedBackend("the weekly report")));
        let state = WorkflowState::new("q").with_summaries(summaries());
        let out = agent.invoke(&state, &AgentParams::default()).unwrap();

        assert_eq!(out.report.as_deref(), Some("the weekly report"));
        // upstream fields survive untouched
        assert_eq!(out.summaries.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn missing_summaries_is_missing_input() {
        let agent = Publisher::new(Box::new(FixedBackend("r")));
        let err = agent
            .invoke(&WorkflowState::new("q"), &AgentParams::default())
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::MissingInput("summaries")));
    }

    #[test]
    fn render_joins_title_summary_source_blocks() {
        let rendered = Publisher::render(&summaries());
        assert!(rendered.starts_with("Title: A\nSummary: about A\nSource: https://a"));
        assert!(rendered.contains("\n\nTitle: B\n"));
    }

    #[test]
    fn backend_failure_surfaces_as_provider_error() {
        struct Down;
        impl GenerationBackend for Down {
            fn generate(&self, _m: &[Message]) -> Result<GenerationResult, ProviderError> {
                Err(ProviderError::Http("timeout".into()))
            }
            fn generate_structured(
                &self,
                _m: &[Message],
                _s: &serde_json::Value,
            ) -> Result<serde_json::Value, ProviderError> {
                unimplemented!()
            }
        }

        let agent = Publisher::new(Box::new(Down));
        let state = WorkflowState::new("q").with_summaries(summaries());
        let err = agent.invoke(&state, &AgentParams::default()).err().unwrap();
        assert!(matches!(err, AgentError::Provider(_)));
    }
}

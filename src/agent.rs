use std::fmt;

use crate::backend::ProviderError;
use crate::state::WorkflowState;
use crate::tools::CollaboratorError;

/// Per-node configuration, fixed at graph-construction time and stored in
/// the node record. Keeping this as plain data (rather than captured
/// closures) means a node's behavior is visible in the graph definition.
#[derive(Clone, Debug)]
pub struct AgentParams {
    /// Cap on articles consumed from the search collaborator.
    pub result_limit: usize,
    /// Recency window handed to the search collaborator, in days.
    pub recency_days: u32,
    /// Override the agent's built-in system instruction.
    pub system_prompt: Option<String>,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            result_limit: 5,
            recency_days: 7,
            system_prompt: None,
        }
    }
}

impl AgentParams {
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    pub fn recency_days(mut self, days: u32) -> Self {
        self.recency_days = days;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A unit of work bound to the shared workflow state.
///
/// Implementations read the fields they need from `state`, do their work
/// (possibly through a generation backend or a collaborator), and return a
/// new state with their own fields added or overwritten. The input state is
/// never mutated, so an invocation that fails partway leaves nothing behind.
pub trait Agent: Send + Sync {
    /// A unique name for this agent; doubles as its node id in the graph.
    fn name(&self) -> &'static str;

    /// Run once against the current state.
    fn invoke(
        &self,
        state: &WorkflowState,
        params: &AgentParams,
    ) -> Result<WorkflowState, AgentError>;
}

/// Why an agent invocation failed. Every failure an agent can produce maps
/// to exactly one of these; there is no catch-all.
#[derive(Debug)]
pub enum AgentError {
    /// A state field this agent needs was never written upstream.
    MissingInput(&'static str),
    /// A generation backend call failed.
    Provider(ProviderError),
    /// A search or persistence collaborator call failed.
    Collaborator(CollaboratorError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(field) => write!(f, "missing input: {field}"),
            Self::Provider(e) => write!(f, "provider: {e}"),
            Self::Collaborator(e) => write!(f, "collaborator: {e}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingInput(_) => None,
            Self::Provider(e) => Some(e),
            Self::Collaborator(e) => Some(e),
        }
    }
}

impl From<ProviderError> for AgentError {
    fn from(e: ProviderError) -> Self {
        AgentError::Provider(e)
    }
}

impl From<CollaboratorError> for AgentError {
    fn from(e: CollaboratorError) -> Self {
        AgentError::Collaborator(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params() {
        let params = AgentParams::default();
        assert_eq!(params.result_limit, 5);
        assert_eq!(params.recency_days, 7);
        assert!(params.system_prompt.is_none());
    }

    #[test]
    fn builder_style_overrides() {
        let params = AgentParams::default()
            .result_limit(3)
            .recency_days(30)
            .system_prompt("be terse");
        assert_eq!(params.result_limit, 3);
        assert_eq!(params.recency_days, 30);
        assert_eq!(params.system_prompt.as_deref(), Some("be terse"));
    }

    #[test]
    fn display_missing_input() {
        let err = AgentError::MissingInput("articles");
        assert_eq!(err.to_string(), "missing input: articles");
    }

    #[test]
    fn from_provider_error() {
        let err: AgentError = ProviderError::EmptyResponse.into();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[test]
    fn from_collaborator_error() {
        let err: AgentError = CollaboratorError::Http("refused".into()).into();
        assert!(matches!(err, AgentError::Collaborator(_)));
        assert!(err.to_string().contains("refused"));
    }
}

//! The concrete agents of the news-report pipeline.
//!
//! Each agent owns the collaborator or backend it talks to and writes
//! exactly one state field; see [`news_pipeline`](crate::news_pipeline)
//! for the canonical wiring.

mod publisher;
mod searcher;
mod summarizer;

pub use publisher::Publisher;
pub use searcher::NewsSearcher;
pub use summarizer::Summarizer;

use crate::agent::{Agent, AgentError, AgentParams};
use crate::state::WorkflowState;

/// Terminal node: marks the state as done and touches nothing else.
pub struct EndAgent;

impl Agent for EndAgent {
    fn name(&self) -> &'static str {
        "end"
    }

    fn invoke(
        &self,
        state: &WorkflowState,
        _params: &AgentParams,
    ) -> Result<WorkflowState, AgentError> {
        Ok(state.clone().finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_agent_only_sets_done() {
        let state = WorkflowState::new("q").with_report("r");
        let out = EndAgent.invoke(&state, &AgentParams::default()).unwrap();

        assert!(out.done);
        assert_eq!(out.query, state.query);
        assert_eq!(out.report, state.report);
        assert!(!state.done);
    }
}

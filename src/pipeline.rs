use std::fmt;

use crate::agent::AgentParams;
use crate::agents::{EndAgent, NewsSearcher, Publisher, Summarizer};
use crate::backend::{BackendFactory, BackendOptions, ConfigError, Mode};
use crate::graph::{GraphError, WorkflowGraph};
use crate::tools::SearchProvider;

/// The pipeline could not be assembled. Both variants are fatal before any
/// run starts.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigError),
    Graph(GraphError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::Graph(e) => write!(f, "graph: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Graph(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e)
    }
}

impl From<GraphError> for PipelineError {
    fn from(e: GraphError) -> Self {
        PipelineError::Graph(e)
    }
}

/// Assemble the canonical four-node news pipeline:
///
/// ```text
/// news_searcher -> summarizer -> publisher -> end
/// ```
///
/// Two plain-mode backends are resolved up front through the factory, so a
/// bad provider name or mode surfaces here, never mid-run.
pub fn news_pipeline(
    factory: &BackendFactory,
    provider: &str,
    options: &BackendOptions,
    search: Box<dyn SearchProvider>,
    params: AgentParams,
) -> Result<WorkflowGraph, PipelineError> {
    let summarizer = factory.resolve(provider, Mode::Plain, options)?;
    let publisher = factory.resolve(provider, Mode::Plain, options)?;

    let graph = WorkflowGraph::builder("news_report")
        .node(NewsSearcher::new(search), params.clone())
        .node(Summarizer::new(summarizer), params.clone())
        .node(Publisher::new(publisher), params)
        .node(EndAgent, AgentParams::default())
        .edge("news_searcher", "summarizer")
        .edge("summarizer", "publisher")
        .edge("publisher", "end")
        .entry("news_searcher")
        .terminal("end")
        .build()?;

    Ok(graph)
}

//! A graph-driven agent pipeline library for AI news reports.
//!
//! Declare agents as graph nodes, wire them with edges, and let the executor
//! walk the graph from entry to terminal, threading one shared
//! [`WorkflowState`] through every node. Generation providers sit behind the
//! [`GenerationBackend`] trait and are resolved by name through the
//! [`BackendFactory`], so any node can talk to any configured provider.
//!
//! # Quick start
//!
//! ```rust
//! use newsflow::{
//!     Agent, AgentError, AgentParams, WorkflowGraph, WorkflowState, run_workflow,
//! };
//!
//! struct Shout;
//! impl Agent for Shout {
//!     fn name(&self) -> &'static str { "shout" }
//!     fn invoke(&self, state: &WorkflowState, _params: &AgentParams)
//!         -> Result<WorkflowState, AgentError>
//!     {
//!         let report = state.query.to_uppercase();
//!         Ok(state.clone().with_report(report))
//!     }
//! }
//!
//! let graph = WorkflowGraph::builder("demo")
//!     .node(Shout, AgentParams::default())
//!     .entry("shout")
//!     .terminal("shout")
//!     .build()
//!     .unwrap();
//!
//! let out = run_workflow(&graph, WorkflowState::new("ai news")).unwrap();
//! assert_eq!(out.report.as_deref(), Some("AI NEWS"));
//! ```
//!
//! The built-in news pipeline (`news_searcher -> summarizer -> publisher ->
//! end`) is assembled by [`news_pipeline`].

mod agent;
pub mod agents;
pub mod backend;
mod executor;
mod graph;
mod pipeline;
mod state;
pub mod tools;

pub use agent::{Agent, AgentError, AgentParams};
pub use backend::{
    BackendFactory, BackendOptions, ConfigError, GenerationBackend, GenerationResult, Message,
    Mode, ProviderError, Role,
};
pub use executor::{ErrorEvent, Executor, RunError, RunFailure, StepEvent, run_workflow};
pub use graph::{EdgeSelector, GraphError, Node, NodeId, WorkflowGraph, WorkflowGraphBuilder};
pub use pipeline::{PipelineError, news_pipeline};
pub use state::{Article, Summary, WorkflowState};
pub use tools::CollaboratorError;

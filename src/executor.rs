use std::fmt;
use std::time::{Duration, Instant};

use crate::agent::AgentError;
use crate::graph::{NodeId, WorkflowGraph};
use crate::state::WorkflowState;

/// Passed to the `on_step` hook after each successful node invocation.
pub struct StepEvent<'a> {
    pub node: NodeId,
    pub duration: Duration,
    pub step_number: usize,
    pub state: &'a WorkflowState,
}

/// Passed to the `on_error` hook when a node's agent fails.
pub struct ErrorEvent<'a> {
    pub node: NodeId,
    pub error: &'a RunError,
    pub step_number: usize,
}

/// What stopped a run.
#[derive(Debug)]
pub enum RunError {
    /// The node's agent returned an error.
    Agent(AgentError),
    /// A branch selector picked an id that is not one of the node's declared
    /// successors. Selectors are opaque functions, so this structural fault
    /// can only surface at run time.
    BadRoute { from: NodeId, to: NodeId },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(e) => write!(f, "{e}"),
            Self::BadRoute { from, to } => {
                write!(f, "selector on '{from}' routed to non-successor '{to}'")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Agent(e) => Some(e),
            Self::BadRoute { .. } => None,
        }
    }
}

/// The `Failed` terminal outcome of a run: which node failed, why, and the
/// last state produced before it, for diagnostics.
#[derive(Debug)]
pub struct RunFailure {
    pub node: NodeId,
    pub error: RunError,
    pub last_state: WorkflowState,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node '{}' failed: {}", self.node, self.error)
    }
}

impl std::error::Error for RunFailure {}

/// Walks a [`WorkflowGraph`] from entry to terminal, threading one owned
/// [`WorkflowState`] through the nodes.
///
/// Execution is synchronous: each agent invocation, network calls included,
/// blocks until it returns. A node is invoked at most once per run. On
/// failure the executor stops immediately — no retries — and hands back the
/// error together with the last good state.
pub struct Executor<'g> {
    graph: &'g WorkflowGraph,
    on_step: Option<Box<dyn FnMut(&StepEvent) + 'g>>,
    on_error: Option<Box<dyn FnMut(&ErrorEvent) + 'g>>,
}

impl<'g> Executor<'g> {
    pub fn new(graph: &'g WorkflowGraph) -> Self {
        Self {
            graph,
            on_step: None,
            on_error: None,
        }
    }

    /// Register a callback that fires after each successful node.
    pub fn on_step(mut self, cb: impl FnMut(&StepEvent) + 'g) -> Self {
        self.on_step = Some(Box::new(cb));
        self
    }

    /// Register a callback that fires when a node fails.
    pub fn on_error(mut self, cb: impl FnMut(&ErrorEvent) + 'g) -> Self {
        self.on_error = Some(Box::new(cb));
        self
    }

    /// Set both hooks to print step transitions and errors to stderr.
    pub fn with_tracing(self) -> Self {
        self.on_step(|e| {
            eprintln!(
                "[step {}] {} ({:.3}s)",
                e.step_number,
                e.node,
                e.duration.as_secs_f64()
            );
        })
        .on_error(|e| {
            eprintln!("[error] {} at step {}: {}", e.node, e.step_number, e.error);
        })
    }

    /// Run the graph to completion, or to the first failure.
    pub fn run(&mut self, initial: WorkflowState) -> Result<WorkflowState, RunFailure> {
        let mut current = self.graph.entry();
        let mut state = initial;
        let mut step_number = 0usize;

        // Acyclicity is validated at construction, so a run can take at most
        // one step per node; the bound backstops that.
        for _ in 0..self.graph.len() {
            step_number += 1;

            // Entry and every edge target are validated to exist.
            let node = self
                .graph
                .node(current)
                .unwrap_or_else(|| unreachable!("validated graph lost node '{current}'"));

            let start = Instant::now();
            let result = node.agent.invoke(&state, &node.params);
            let duration = start.elapsed();

            let next_state = match result {
                Ok(next_state) => next_state,
                Err(err) => return Err(self.fail(current, RunError::Agent(err), state, step_number)),
            };

            if let Some(cb) = &mut self.on_step {
                cb(&StepEvent {
                    node: current,
                    duration,
                    step_number,
                    state: &next_state,
                });
            }
            state = next_state;

            if current == self.graph.terminal() {
                return Ok(state);
            }

            let candidates = self.graph.outgoing(current);
            let next = match self.graph.selector(current) {
                Some(select) if candidates.len() > 1 => {
                    let picked = select(&state, candidates);
                    if !candidates.contains(&picked) {
                        let err = RunError::BadRoute {
                            from: current,
                            to: picked,
                        };
                        return Err(self.fail(current, err, state, step_number));
                    }
                    picked
                }
                _ => candidates[0],
            };
            current = next;
        }

        // Only reachable if the terminal was never hit within one step per
        // node, which acyclicity rules out.
        unreachable!("graph '{}' revisited a node", self.graph.name())
    }

    fn fail(
        &mut self,
        node: NodeId,
        error: RunError,
        last_state: WorkflowState,
        step_number: usize,
    ) -> RunFailure {
        if let Some(cb) = &mut self.on_error {
            cb(&ErrorEvent {
                node,
                error: &error,
                step_number,
            });
        }
        RunFailure {
            node,
            error,
            last_state,
        }
    }
}

/// Run `graph` once over `initial`. `Ok` carries the completed final state;
/// `Err` names the failing node, the error, and the last good state.
pub fn run_workflow(
    graph: &WorkflowGraph,
    initial: WorkflowState,
) -> Result<WorkflowState, RunFailure> {
    Executor::new(graph).run(initial)
}

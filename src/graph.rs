use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::agent::{Agent, AgentParams};
use crate::state::WorkflowState;

/// Graph vertices are identified by their agent's name.
pub type NodeId = &'static str;

/// Picks the next node from a node's declared successors, based on the
/// current state. Candidates are passed in edge-declaration order; the
/// selector must return one of them.
pub type EdgeSelector = fn(&WorkflowState, &[NodeId]) -> NodeId;

/// A graph vertex: an agent binding plus the parameters it runs with.
pub struct Node {
    pub id: NodeId,
    pub agent: Box<dyn Agent>,
    pub params: AgentParams,
}

// ---------------------------------------------------------------------------
// GraphError
// ---------------------------------------------------------------------------

/// Why a [`WorkflowGraph`] failed validation. Raised at construction; an
/// invalid graph value never exists.
#[derive(Debug, PartialEq, Eq)]
pub enum GraphError {
    DuplicateNode(NodeId),
    /// An edge, entry, or terminal references a node id that was never added.
    UnknownNode(NodeId),
    MissingEntry,
    MissingTerminal,
    /// A non-entry node with no incoming edges.
    OrphanNode(NodeId),
    /// A node the entry cannot reach by following edges.
    Unreachable(NodeId),
    /// The graph contains a cycle through this node.
    Cycle(NodeId),
    /// A node with more than one outgoing edge but no selector.
    AmbiguousEdges(NodeId),
    /// A non-terminal node with no outgoing edges: a run reaching it could
    /// never get to the terminal.
    DeadEnd(NodeId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode(id) => write!(f, "duplicate node id: {id}"),
            Self::UnknownNode(id) => write!(f, "unknown node id: {id}"),
            Self::MissingEntry => write!(f, "graph has no entry node"),
            Self::MissingTerminal => write!(f, "graph has no terminal node"),
            Self::OrphanNode(id) => write!(f, "node '{id}' has no incoming edges"),
            Self::Unreachable(id) => write!(f, "node '{id}' is unreachable from the entry"),
            Self::Cycle(id) => write!(f, "graph has a cycle through node '{id}'"),
            Self::AmbiguousEdges(id) => {
                write!(f, "node '{id}' has multiple outgoing edges but no selector")
            }
            Self::DeadEnd(id) => {
                write!(f, "non-terminal node '{id}' has no outgoing edges")
            }
        }
    }
}

impl std::error::Error for GraphError {}

// ---------------------------------------------------------------------------
// WorkflowGraphBuilder
// ---------------------------------------------------------------------------

pub struct WorkflowGraphBuilder {
    name: &'static str,
    nodes: Vec<Node>,
    edges: Vec<(NodeId, NodeId)>,
    selectors: HashMap<NodeId, EdgeSelector>,
    entry: Option<NodeId>,
    terminal: Option<NodeId>,
    duplicate: Option<NodeId>,
}

impl WorkflowGraphBuilder {
    /// Add a node running `agent` with `params`. The node id is the agent's
    /// name.
    pub fn node(mut self, agent: impl Agent + 'static, params: AgentParams) -> Self {
        let id = agent.name();
        if self.nodes.iter().any(|n| n.id == id) {
            self.duplicate = Some(id);
        }
        self.nodes.push(Node {
            id,
            agent: Box::new(agent),
            params,
        });
        self
    }

    /// Add a directed edge `from -> to`.
    pub fn edge(mut self, from: NodeId, to: NodeId) -> Self {
        self.edges.push((from, to));
        self
    }

    /// Attach a branch selector to `node`, consulted when it has more than
    /// one outgoing edge.
    pub fn selector(mut self, node: NodeId, selector: EdgeSelector) -> Self {
        self.selectors.insert(node, selector);
        self
    }

    pub fn entry(mut self, id: NodeId) -> Self {
        self.entry = Some(id);
        self
    }

    pub fn terminal(mut self, id: NodeId) -> Self {
        self.terminal = Some(id);
        self
    }

    /// Validate every structural invariant and produce the graph. Checks,
    /// in order: duplicates, entry/terminal presence and existence, edge
    /// endpoints, fan-out without a selector, dead ends, orphans,
    /// reachability, cycles.
    pub fn build(self) -> Result<WorkflowGraph, GraphError> {
        if let Some(id) = self.duplicate {
            return Err(GraphError::DuplicateNode(id));
        }

        let entry = self.entry.ok_or(GraphError::MissingEntry)?;
        let terminal = self.terminal.ok_or(GraphError::MissingTerminal)?;

        let ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        for id in [entry, terminal] {
            if !ids.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        for &(from, to) in &self.edges {
            for id in [from, to] {
                if !ids.contains(id) {
                    return Err(GraphError::UnknownNode(id));
                }
            }
        }

        // Adjacency in edge-declaration order.
        let mut outgoing: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut incoming: HashMap<NodeId, usize> = HashMap::new();
        for &(from, to) in &self.edges {
            outgoing.entry(from).or_default().push(to);
            *incoming.entry(to).or_default() += 1;
        }

        for node in &self.nodes {
            let fan_out = outgoing.get(node.id).map_or(0, Vec::len);
            if fan_out > 1 && !self.selectors.contains_key(node.id) {
                return Err(GraphError::AmbiguousEdges(node.id));
            }
            if fan_out == 0 && node.id != terminal {
                return Err(GraphError::DeadEnd(node.id));
            }
            if node.id != entry && incoming.get(node.id).copied().unwrap_or(0) == 0 {
                return Err(GraphError::OrphanNode(node.id));
            }
        }

        // Reachability from the entry; covers the terminal as well.
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut queue = VecDeque::from([entry]);
        seen.insert(entry);
        while let Some(id) = queue.pop_front() {
            for &next in outgoing.get(id).map_or(&[][..], Vec::as_slice) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        if let Some(node) = self.nodes.iter().find(|n| !seen.contains(n.id)) {
            return Err(GraphError::Unreachable(node.id));
        }

        // Cycle detection: repeatedly strip nodes with no remaining incoming
        // edges; anything left sits on a cycle.
        let mut degree = incoming.clone();
        let mut ready: VecDeque<NodeId> = self
            .nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| degree.get(id).copied().unwrap_or(0) == 0)
            .collect();
        let mut stripped = 0usize;
        while let Some(id) = ready.pop_front() {
            stripped += 1;
            for &next in outgoing.get(id).map_or(&[][..], Vec::as_slice) {
                // every edge target has an entry in `incoming`
                if let Some(d) = degree.get_mut(next) {
                    *d -= 1;
                    if *d == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }
        if stripped < self.nodes.len() {
            let on_cycle = self
                .nodes
                .iter()
                .map(|n| n.id)
                .find(|id| degree.get(id).copied().unwrap_or(0) > 0)
                .unwrap_or(entry);
            return Err(GraphError::Cycle(on_cycle));
        }

        Ok(WorkflowGraph {
            name: self.name,
            nodes: self.nodes.into_iter().map(|n| (n.id, n)).collect(),
            outgoing,
            selectors: self.selectors,
            entry,
            terminal,
        })
    }
}

// ---------------------------------------------------------------------------
// WorkflowGraph (validated, only constructed via build())
// ---------------------------------------------------------------------------

/// A validated, immutable workflow graph. Safe to share read-only across
/// concurrent runs; all mutation happens in each run's own state.
pub struct WorkflowGraph {
    name: &'static str,
    nodes: HashMap<NodeId, Node>,
    outgoing: HashMap<NodeId, Vec<NodeId>>,
    selectors: HashMap<NodeId, EdgeSelector>,
    entry: NodeId,
    terminal: NodeId,
}

impl WorkflowGraph {
    pub fn builder(name: &'static str) -> WorkflowGraphBuilder {
        WorkflowGraphBuilder {
            name,
            nodes: Vec::new(),
            edges: Vec::new(),
            selectors: HashMap::new(),
            entry: None,
            terminal: None,
            duplicate: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn terminal(&self) -> NodeId {
        self.terminal
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Successors of `id` in edge-declaration order.
    pub fn outgoing(&self, id: NodeId) -> &[NodeId] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn selector(&self, id: NodeId) -> Option<EdgeSelector> {
        self.selectors.get(id).copied()
    }
}

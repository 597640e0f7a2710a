use crate::error::{BlueprintError, ExecutionError};
use crate::value::serialize_sorted;
use ahash::AHashMap;
use serde::Serialize;

mod conversion;
mod definition;

pub use conversion::*;
pub use definition::*;

/// What to do when two nodes share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The node that appears later replaces the earlier one.
    #[default]
    LastWins,
    /// Construction fails with `BlueprintError::DuplicateNodeId`.
    Reject,
}

/// The graph for a single evaluation request: nodes by id plus the incoming
/// edges of every target node, in request order.
///
/// Edge endpoints are not checked here. An edge pointing at a missing node is
/// reported as `ExecutionError::NodeNotFound` when evaluation reaches it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Blueprint {
    #[serde(serialize_with = "serialize_sorted")]
    nodes: AHashMap<String, Node>,
    #[serde(rename = "edges", serialize_with = "serialize_sorted")]
    incoming: AHashMap<String, Vec<Edge>>,
}

pub struct BlueprintBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    duplicate_policy: DuplicatePolicy,
}

impl BlueprintBuilder {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn build(self) -> Result<Blueprint, BlueprintError> {
        let mut nodes: AHashMap<String, Node> = AHashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if self.duplicate_policy == DuplicatePolicy::Reject && nodes.contains_key(&node.id) {
                return Err(BlueprintError::DuplicateNodeId(node.id));
            }
            insert_last_wins(&mut nodes, node);
        }

        Ok(Blueprint {
            nodes,
            incoming: index_incoming(self.edges),
        })
    }
}

impl Blueprint {
    /// Builds a blueprint with the default `LastWins` duplicate policy.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut nodes_by_id: AHashMap<String, Node> = AHashMap::with_capacity(nodes.len());
        for node in nodes {
            insert_last_wins(&mut nodes_by_id, node);
        }

        Self {
            nodes: nodes_by_id,
            incoming: index_incoming(edges),
        }
    }

    pub fn builder(nodes: Vec<Node>, edges: Vec<Edge>) -> BlueprintBuilder {
        BlueprintBuilder::new(nodes, edges)
    }

    /// Returns an owned copy of the node with the given id.
    pub fn get_node(&self, id: &str) -> Result<Node, ExecutionError> {
        self.node(id)
            .cloned()
            .ok_or_else(|| ExecutionError::NodeNotFound(id.to_string()))
    }

    pub(crate) fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Incoming edges of `id` in insertion order. Empty for unknown ids.
    pub fn incoming_edges(&self, id: &str) -> &[Edge] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.incoming.values().map(Vec::len).sum()
    }
}

/// Inserts `node`, replacing and logging any earlier node with the same id.
fn insert_last_wins(nodes: &mut AHashMap<String, Node>, node: Node) {
    if let Some(previous) = nodes.insert(node.id.clone(), node) {
        tracing::warn!(node_id = %previous.id, "duplicate node id, keeping the later node");
    }
}

/// Groups edges by target, keeping request order within each group.
fn index_incoming(edges: Vec<Edge>) -> AHashMap<String, Vec<Edge>> {
    let mut incoming: AHashMap<String, Vec<Edge>> = AHashMap::new();
    for edge in edges {
        incoming.entry(edge.target.clone()).or_default().push(edge);
    }
    incoming
}

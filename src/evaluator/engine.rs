use crate::blueprint::{Blueprint, Edge, Node};
use crate::error::ExecutionError;
use crate::executor::{Executor, ExecutorRegistry, ResolvedInputs};
use crate::value::{Handles, Value};
use ahash::AHashMap;

/// Progress of a node within one `execute` call. Unvisited nodes have no entry.
#[derive(Debug)]
enum NodeState {
    InProgress,
    Done(Handles),
    Failed(ExecutionError),
}

/// A node on the current dependency path, waiting for its incoming edges.
struct Frame<'a> {
    node: &'a Node,
    executor: &'a dyn Executor,
    edges: &'a [Edge],
    next_edge: usize,
    inputs: Handles,
}

/// The per-call engine: owns the result cache and the current dependency path.
/// Dropped when the call returns, so nothing leaks between calls.
///
/// Evaluation runs on an explicit stack of frames, so the length of a
/// dependency chain is bounded by memory, not by the thread's call stack.
pub(super) struct ExecutionEngine<'a> {
    registry: &'a ExecutorRegistry,
    blueprint: &'a Blueprint,
    max_depth: Option<usize>,
    states: AHashMap<String, NodeState>,
    path: Vec<Frame<'a>>,
}

impl<'a> ExecutionEngine<'a> {
    pub(super) fn new(
        registry: &'a ExecutorRegistry,
        blueprint: &'a Blueprint,
        max_depth: Option<usize>,
    ) -> Self {
        Self {
            registry,
            blueprint,
            max_depth,
            states: AHashMap::new(),
            path: Vec::new(),
        }
    }

    /// Evaluates `node_id` and, on demand, everything upstream of it.
    pub(super) fn evaluate(&mut self, node_id: &str) -> Result<Handles, ExecutionError> {
        if let Some(cached) = self.lookup(node_id) {
            return cached;
        }
        let frame = self.enter(node_id)?;
        self.path.push(frame);

        while let Some(frame) = self.path.last() {
            let (edges, next_edge) = (frame.edges, frame.next_edge);
            let Some(edge) = edges.get(next_edge) else {
                let Some(frame) = self.path.pop() else { break };
                match self.finish(frame) {
                    Ok(outputs) if self.path.is_empty() => return Ok(outputs),
                    Ok(_) => continue,
                    Err(error) => return Err(self.unwind(error)),
                }
            };

            match self.lookup(&edge.source) {
                Some(Ok(upstream)) => {
                    let value = upstream
                        .get(&edge.source_handle)
                        .cloned()
                        .unwrap_or(Value::Null);
                    if let Some(frame) = self.path.last_mut() {
                        frame.inputs.insert(edge.target_handle.clone(), value);
                        frame.next_edge += 1;
                    }
                }
                Some(Err(error)) => return Err(self.unwind(error)),
                None => match self.enter(&edge.source) {
                    Ok(frame) => self.path.push(frame),
                    Err(error) => return Err(self.unwind(error)),
                },
            }
        }

        // The target frame only leaves the path through one of the returns above.
        Err(ExecutionError::NodeNotFound(node_id.to_string()))
    }

    /// The outcome for `node_id` if it has already been visited in this call.
    /// An in-progress node is a cycle.
    fn lookup(&self, node_id: &str) -> Option<Result<Handles, ExecutionError>> {
        match self.states.get(node_id)? {
            NodeState::Done(outputs) => {
                tracing::trace!(node_id, "reusing cached outputs");
                Some(Ok(outputs.clone()))
            }
            NodeState::Failed(error) => Some(Err(error.clone())),
            NodeState::InProgress => Some(Err(self.cycle_error(node_id))),
        }
    }

    /// Starts a node: checks the depth limit, resolves its definition and
    /// executor, and clones its input template. Lookup failures are cached.
    fn enter(&mut self, node_id: &str) -> Result<Frame<'a>, ExecutionError> {
        if let Some(limit) = self.max_depth.filter(|&limit| self.path.len() >= limit) {
            return Err(ExecutionError::DepthLimitExceeded {
                node_id: node_id.to_string(),
                limit,
            });
        }

        match self.resolve(node_id) {
            Ok(frame) => {
                self.states
                    .insert(node_id.to_string(), NodeState::InProgress);
                Ok(frame)
            }
            Err(error) => {
                self.states
                    .insert(node_id.to_string(), NodeState::Failed(error.clone()));
                Err(error)
            }
        }
    }

    fn resolve(&self, node_id: &str) -> Result<Frame<'a>, ExecutionError> {
        let (blueprint, registry) = (self.blueprint, self.registry);
        let node = blueprint
            .node(node_id)
            .ok_or_else(|| ExecutionError::NodeNotFound(node_id.to_string()))?;
        let executor =
            registry
                .get(&node.node_type)
                .ok_or_else(|| ExecutionError::UnknownNodeType {
                    type_name: node.node_type.clone(),
                    node_id: node_id.to_string(),
                })?;

        tracing::debug!(node_id, node_type = %node.node_type, "running execution on node");

        // The template is cloned, never written to, so repeated runs stay pure.
        Ok(Frame {
            node,
            executor,
            edges: blueprint.incoming_edges(node_id),
            next_edge: 0,
            inputs: node.data.inputs.clone(),
        })
    }

    /// Runs the executor of a frame whose inputs are all bound and caches the result.
    fn finish(&mut self, frame: Frame<'a>) -> Result<Handles, ExecutionError> {
        let node_id = frame.node.id.as_str();
        tracing::debug!(node_id, inputs = ?frame.inputs, "resolved inputs");
        let resolved = ResolvedInputs::new(node_id, frame.inputs);
        let result = frame.executor.execute(frame.node, &resolved);

        let state = match &result {
            Ok(outputs) => {
                tracing::debug!(node_id, outputs = ?outputs, "created outputs");
                NodeState::Done(outputs.clone())
            }
            Err(error) => NodeState::Failed(error.clone()),
        };
        self.states.insert(node_id.to_string(), state);
        result
    }

    /// Propagates a failure down the current path, wrapping it once per waiting node.
    fn unwind(&mut self, mut error: ExecutionError) -> ExecutionError {
        while let Some(frame) = self.path.pop() {
            error = ExecutionError::upstream(&frame.node.id, error);
            self.states
                .insert(frame.node.id.clone(), NodeState::Failed(error.clone()));
        }
        error
    }

    /// The cycle runs from the first visit of `node_id` on the current path back to it.
    fn cycle_error(&self, node_id: &str) -> ExecutionError {
        let start = self
            .path
            .iter()
            .position(|frame| frame.node.id == node_id)
            .unwrap_or(0);
        let mut path: Vec<String> = self.path[start..]
            .iter()
            .map(|frame| frame.node.id.clone())
            .collect();
        path.push(node_id.to_string());
        ExecutionError::Cycle { path }
    }
}

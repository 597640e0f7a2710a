use crate::blueprint::Blueprint;
use crate::error::ExecutionError;
use crate::executor::ExecutorRegistry;
use crate::value::Handles;

mod engine;

use engine::ExecutionEngine;

/// Executes blueprint nodes on demand against an executor registry.
///
/// An `Evaluator` holds no per-run state. Every call to [`Evaluator::execute`]
/// gets its own result cache and cycle guard, so one evaluator can be shared
/// across threads and reused for any number of blueprints.
#[derive(Clone, Copy)]
pub struct Evaluator<'r> {
    registry: &'r ExecutorRegistry,
    max_depth: Option<usize>,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r ExecutorRegistry) -> Self {
        Self {
            registry,
            max_depth: None,
        }
    }

    /// Caps the length of a dependency chain. Deeper chains fail with
    /// `ExecutionError::DepthLimitExceeded`. Unbounded by default.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth.max(1));
        self
    }

    pub fn registry(&self) -> &'r ExecutorRegistry {
        self.registry
    }

    /// Evaluates `target` and returns its outputs.
    ///
    /// Upstream nodes are evaluated on demand through the target's incoming
    /// edges, in the order the edges were given. Each node runs at most once per
    /// call, even when several paths lead to it.
    ///
    /// # Errors
    ///
    /// * `NodeNotFound` if `target`, or an edge source, is not in the blueprint.
    /// * `UnknownNodeType` if a node's type has no registered executor.
    /// * `Cycle` if the dependency chain loops back on itself.
    /// * `DepthLimitExceeded` if a limit was set and the chain is longer.
    /// * Any error returned by an executor.
    ///
    /// Failures below the target are wrapped in `Upstream` once per level, so the
    /// message reads as a path from `target` down to the failing node.
    pub fn execute(&self, blueprint: &Blueprint, target: &str) -> Result<Handles, ExecutionError> {
        let mut engine = ExecutionEngine::new(self.registry, blueprint, self.max_depth);
        let result = engine.evaluate(target);
        if let Err(error) = &result {
            tracing::debug!(target_node = target, %error, "execution failed");
        }
        result
    }
}

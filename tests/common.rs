//! Common test utilities for building blueprints and executors.
use bprun::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `stringLit` node emitting `value`.
#[allow(dead_code)]
pub fn lit(id: &str, value: &str) -> Node {
    Node::new(id, "stringLit").with_output("value", value)
}

/// An edge from `source.source_handle` to `target.target_handle`.
#[allow(dead_code)]
pub fn edge(source: &str, source_handle: &str, target: &str, target_handle: &str) -> Edge {
    Edge::new(source, source_handle, target, target_handle)
}

/// `A("x")` and `B("y")` wired into `C = concat(a, b)`.
#[allow(dead_code)]
pub fn create_concat_blueprint() -> Blueprint {
    Blueprint::new(
        vec![lit("A", "x"), lit("B", "y"), Node::new("C", "concat")],
        vec![edge("A", "value", "C", "a"), edge("B", "value", "C", "b")],
    )
}

/// Diamond: `D` feeds `E` and `F`, which both feed `G`.
///
/// `D` is a `counted` node, `E`/`F`/`G` are `concat`.
#[allow(dead_code)]
pub fn create_diamond_blueprint() -> Blueprint {
    Blueprint::new(
        vec![
            Node::new("D", "counted").with_output("value", "d"),
            Node::new("E", "concat").with_input("b", "e"),
            Node::new("F", "concat").with_input("b", "f"),
            Node::new("G", "concat"),
        ],
        vec![
            edge("D", "value", "E", "a"),
            edge("D", "value", "F", "a"),
            edge("E", "out", "G", "a"),
            edge("F", "out", "G", "b"),
        ],
    )
}

/// Behaves like `stringLit` under the type `counted` and records every call.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingExecutor {
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingExecutor {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Executor for CountingExecutor {
    fn node_type(&self) -> &str {
        "counted"
    }

    fn execute(&self, node: &Node, _inputs: &ResolvedInputs) -> Result<Handles, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = node.data.outputs.get("value").cloned().unwrap_or_default();
        Ok(Handles::from([("value".to_string(), value)]))
    }
}

/// Always fails with an `Executor` error.
#[allow(dead_code)]
pub struct FailingExecutor;

impl Executor for FailingExecutor {
    fn node_type(&self) -> &str {
        "fail"
    }

    fn execute(&self, node: &Node, _inputs: &ResolvedInputs) -> Result<Handles, ExecutionError> {
        Err(ExecutionError::Executor {
            node_id: node.id.clone(),
            message: "boom".to_string(),
        })
    }
}

/// The default registry plus a `counted` executor sharing `calls`.
#[allow(dead_code)]
pub fn registry_with_counter(calls: Arc<AtomicUsize>) -> ExecutorRegistry {
    ExecutorRegistry::builder()
        .with_executor(Box::new(CountingExecutor { calls }))
        .with_executor(Box::new(FailingExecutor))
        .build()
}

/// Shorthand for a string `Value`.
#[allow(dead_code)]
pub fn s(text: &str) -> Value {
    Value::from(text)
}

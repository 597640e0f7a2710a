//! Tests for demand-driven execution: wiring, caching, cycles and error paths.
mod common;
use bprun::prelude::*;
use common::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

#[test]
fn test_leaf_uses_static_outputs() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(vec![lit("hi", "hi")], vec![]);

    let outputs = Evaluator::new(&registry).execute(&blueprint, "hi").unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs["value"], s("hi"));
}

#[test]
fn test_dependency_wiring() {
    let registry = ExecutorRegistry::default();
    let blueprint = create_concat_blueprint();

    let outputs = Evaluator::new(&registry).execute(&blueprint, "C").unwrap();
    assert_eq!(outputs["out"], s("xy"));
}

#[test]
fn test_repeated_execution_is_deterministic() {
    let registry = ExecutorRegistry::default();
    let blueprint = create_concat_blueprint();
    let evaluator = Evaluator::new(&registry);

    let first = evaluator.execute(&blueprint, "C").unwrap();
    let second = evaluator.execute(&blueprint, "C").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_split_through_edges() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![lit("src", "a=b=c"), lit("sep", "="), Node::new("split", "split")],
        vec![
            edge("src", "value", "split", "src"),
            edge("sep", "value", "split", "around"),
        ],
    );

    let outputs = Evaluator::new(&registry).execute(&blueprint, "split").unwrap();
    assert_eq!(outputs["before"], s("a"));
    assert_eq!(outputs["after"], s("b=c"));
}

#[test]
fn test_template_inputs_fill_unwired_handles() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![
            lit("A", "x"),
            Node::new("C", "concat")
                .with_input("a", "template-a")
                .with_input("b", "template-b"),
        ],
        vec![edge("A", "value", "C", "a")],
    );

    let outputs = Evaluator::new(&registry).execute(&blueprint, "C").unwrap();
    assert_eq!(outputs["out"], s("xtemplate-b"));
}

#[test]
fn test_template_is_not_mutated() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![lit("A", "x"), Node::new("C", "concat").with_input("a", "template")],
        vec![edge("A", "value", "C", "a")],
    );

    Evaluator::new(&registry).execute(&blueprint, "C").unwrap();
    let stored = blueprint.get_node("C").unwrap();
    assert_eq!(stored.data.inputs["a"], s("template"));
    assert!(!stored.data.inputs.contains_key("b"));
}

#[test]
fn test_last_edge_wins_on_shared_handle() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![lit("first", "1"), lit("second", "2"), Node::new("C", "concat")],
        vec![
            edge("first", "value", "C", "a"),
            edge("second", "value", "C", "a"),
        ],
    );

    let outputs = Evaluator::new(&registry).execute(&blueprint, "C").unwrap();
    assert_eq!(outputs["out"], s("2<nil>"));

    let reversed = Blueprint::new(
        vec![lit("first", "1"), lit("second", "2"), Node::new("C", "concat")],
        vec![
            edge("second", "value", "C", "a"),
            edge("first", "value", "C", "a"),
        ],
    );
    let outputs = Evaluator::new(&registry).execute(&reversed, "C").unwrap();
    assert_eq!(outputs["out"], s("1<nil>"));
}

#[test]
fn test_missing_source_handle_binds_null() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![lit("A", "x"), Node::new("C", "concat").with_input("a", "template")],
        vec![edge("A", "no-such-handle", "C", "a")],
    );

    let outputs = Evaluator::new(&registry).execute(&blueprint, "C").unwrap();
    assert_eq!(outputs["out"], s("<nil><nil>"));
}

#[test]
fn test_missing_target_node() {
    let registry = ExecutorRegistry::default();
    let blueprint = create_concat_blueprint();

    let err = Evaluator::new(&registry)
        .execute(&blueprint, "no-such-id")
        .unwrap_err();
    assert_eq!(err, ExecutionError::NodeNotFound("no-such-id".to_string()));
    assert_eq!(err.to_string(), "node 'no-such-id' not found");
}

#[test]
fn test_edge_from_missing_node_fails_lazily() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![Node::new("C", "concat"), lit("other", "fine")],
        vec![edge("ghost", "value", "C", "a")],
    );

    // Unrelated nodes still evaluate.
    assert!(Evaluator::new(&registry).execute(&blueprint, "other").is_ok());

    let err = Evaluator::new(&registry).execute(&blueprint, "C").unwrap_err();
    assert_eq!(err.to_string(), "exe:C -> node 'ghost' not found");
    assert_eq!(
        err.root_cause(),
        &ExecutionError::NodeNotFound("ghost".to_string())
    );
}

#[test]
fn test_unknown_node_type() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(vec![Node::new("n1", "doesNotExist")], vec![]);

    let err = Evaluator::new(&registry).execute(&blueprint, "n1").unwrap_err();
    match err {
        ExecutionError::UnknownNodeType { type_name, node_id } => {
            assert_eq!(type_name, "doesNotExist");
            assert_eq!(node_id, "n1");
        }
        other => panic!("Expected UnknownNodeType error, got {:?}", other),
    }
}

#[test]
fn test_two_node_cycle_is_rejected() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![Node::new("P", "concat"), Node::new("Q", "concat")],
        vec![edge("Q", "out", "P", "a"), edge("P", "out", "Q", "a")],
    );

    let err = Evaluator::new(&registry).execute(&blueprint, "P").unwrap_err();
    assert_eq!(err.trail(), vec!["P", "Q"]);
    match err.root_cause() {
        ExecutionError::Cycle { path } => assert_eq!(path, &["P", "Q", "P"]),
        other => panic!("Expected Cycle error, got {:?}", other),
    }
}

#[test]
fn test_self_loop_is_rejected() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![Node::new("loop", "concat")],
        vec![edge("loop", "out", "loop", "a")],
    );

    let err = Evaluator::new(&registry).execute(&blueprint, "loop").unwrap_err();
    assert_eq!(err.to_string(), "exe:loop -> cycle detected: loop -> loop");
}

#[test]
fn test_cycle_below_target_reports_only_the_loop() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(
        vec![
            Node::new("top", "concat"),
            Node::new("X", "concat"),
            Node::new("Y", "concat"),
        ],
        vec![
            edge("X", "out", "top", "a"),
            edge("Y", "out", "X", "a"),
            edge("X", "out", "Y", "a"),
        ],
    );

    let err = Evaluator::new(&registry).execute(&blueprint, "top").unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ExecutionError::Cycle { path } if path == &["X", "Y", "X"]
    ));
}

#[test]
fn test_diamond_dependency_runs_shared_node_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = registry_with_counter(calls.clone());
    let blueprint = create_diamond_blueprint();

    let outputs = Evaluator::new(&registry).execute(&blueprint, "G").unwrap();
    assert_eq!(outputs["out"], s("dedf"));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn test_cache_is_scoped_to_one_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = registry_with_counter(calls.clone());
    let blueprint = create_diamond_blueprint();
    let evaluator = Evaluator::new(&registry);

    evaluator.execute(&blueprint, "G").unwrap();
    evaluator.execute(&blueprint, "G").unwrap();
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[test]
fn test_error_trail_is_cumulative() {
    let registry = registry_with_counter(Arc::new(AtomicUsize::new(0)));
    let blueprint = Blueprint::new(
        vec![
            Node::new("root", "fail"),
            Node::new("B", "concat"),
            Node::new("C", "concat"),
        ],
        vec![edge("root", "value", "B", "a"), edge("B", "out", "C", "a")],
    );

    let err = Evaluator::new(&registry).execute(&blueprint, "C").unwrap_err();
    assert_eq!(
        err.to_string(),
        "exe:C -> exe:B -> Executor for node 'root' failed: boom"
    );
    assert_eq!(err.trail(), vec!["C", "B"]);
}

#[test]
fn test_executor_error_on_target_is_not_wrapped() {
    let registry = ExecutorRegistry::default();
    let blueprint = Blueprint::new(vec![Node::new("split", "split")], vec![]);

    let err = Evaluator::new(&registry).execute(&blueprint, "split").unwrap_err();
    assert_eq!(
        err,
        ExecutionError::TypeMismatch {
            node_id: "split".to_string(),
            handle: "src".to_string(),
            expected: ValueKind::String,
            found: ValueKind::Null,
        }
    );
    assert!(err.trail().is_empty());
}

fn create_chain_blueprint(len: usize) -> Blueprint {
    let mut nodes = vec![lit("n0", "x")];
    let mut edges = Vec::new();
    for i in 1..len {
        nodes.push(Node::new(format!("n{}", i), "concat").with_input("b", "y"));
        let prev = format!("n{}", i - 1);
        let handle = if i == 1 { "value" } else { "out" };
        edges.push(Edge::new(prev, handle, format!("n{}", i), "a"));
    }
    Blueprint::new(nodes, edges)
}

#[test]
fn test_depth_limit() {
    let registry = ExecutorRegistry::default();
    let blueprint = create_chain_blueprint(10);

    let shallow = Evaluator::new(&registry).with_max_depth(5);
    let err = shallow.execute(&blueprint, "n9").unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ExecutionError::DepthLimitExceeded { limit: 5, .. }
    ));

    let outputs = Evaluator::new(&registry).execute(&blueprint, "n9").unwrap();
    assert!(outputs["out"].as_str().unwrap().starts_with('x'));
}

#[test]
fn test_long_chain_evaluates_without_a_limit() {
    let registry = ExecutorRegistry::default();
    let blueprint = create_chain_blueprint(5000);

    let outputs = Evaluator::new(&registry).execute(&blueprint, "n4999").unwrap();
    let out = outputs["out"].as_str().unwrap();
    assert_eq!(out.len(), 5000);
    assert!(out.starts_with("xy"));
    assert!(out.ends_with("yy"));
}

#[test]
fn test_long_chain_error_wraps_every_level() {
    let registry = ExecutorRegistry::default();
    let nodes: Vec<Node> = create_chain_blueprint(300)
        .nodes()
        .filter(|node| node.id != "n0")
        .cloned()
        .collect();
    let edges = (1..300)
        .map(|i| {
            let handle = if i == 1 { "value" } else { "out" };
            Edge::new(format!("n{}", i - 1), handle, format!("n{}", i), "a")
        })
        .collect();
    let blueprint = Blueprint::new(nodes, edges);

    let err = Evaluator::new(&registry).execute(&blueprint, "n299").unwrap_err();
    assert_eq!(err.root_cause(), &ExecutionError::NodeNotFound("n0".to_string()));
    assert_eq!(err.trail().len(), 299);
    assert_eq!(err.trail()[0], "n299");
}

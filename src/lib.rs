//! # bprun - Blueprint Execution Engine
//!
//! **bprun** evaluates graphs built in a visual node editor. A graph (a
//! *blueprint*) is a set of typed nodes connected by edges between named
//! *handles*. Evaluation is pulled from a single target node: its inputs are
//! resolved by evaluating the upstream nodes wired into it, then the executor
//! registered for its type computes its outputs.
//!
//! ## Core Workflow
//!
//! 1.  **Load the request**: parse the editor payload into a [`RunRequest`] (or
//!     convert your own format with [`IntoBlueprint`]).
//! 2.  **Build the blueprint**: nodes are indexed by id and edges are grouped by
//!     the node they feed, keeping their request order.
//! 3.  **Create a registry**: [`ExecutorRegistry::builder`] starts with the
//!     built-in node types and accepts custom [`Executor`]s. The registry is
//!     frozen once built.
//! 4.  **Execute**: [`Evaluator::execute`] walks the dependencies of the target,
//!     evaluating each node at most once and rejecting cycles.
//!
//! ## Quick Start
//!
//! ```rust
//! use bprun::prelude::*;
//!
//! let nodes = vec![
//!     Node::new("greeting", "stringLit").with_output("value", "Hello, "),
//!     Node::new("name", "stringLit").with_output("value", "world"),
//!     Node::new("joined", "concat"),
//! ];
//! let edges = vec![
//!     Edge::new("greeting", "value", "joined", "a"),
//!     Edge::new("name", "value", "joined", "b"),
//! ];
//!
//! let registry = ExecutorRegistry::builder().build();
//! let blueprint = Blueprint::new(nodes, edges);
//!
//! let outputs = Evaluator::new(&registry).execute(&blueprint, "joined")?;
//! assert_eq!(outputs["out"], Value::from("Hello, world"));
//! # Ok::<(), ExecutionError>(())
//! ```
//!
//! Errors carry the dependency path that led to them:
//!
//! ```rust
//! use bprun::prelude::*;
//!
//! let nodes = vec![
//!     Node::new("bad", "split").with_input("src", 42.0).with_input("around", "="),
//!     Node::new("joined", "concat"),
//! ];
//! let edges = vec![Edge::new("bad", "before", "joined", "a")];
//! let registry = ExecutorRegistry::default();
//!
//! let err = Evaluator::new(&registry)
//!     .execute(&Blueprint::new(nodes, edges), "joined")
//!     .unwrap_err();
//! assert!(err.to_string().starts_with("exe:joined -> Type mismatch"));
//! assert!(matches!(err.root_cause(), ExecutionError::TypeMismatch { .. }));
//! ```

pub mod blueprint;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod prelude;
pub mod request;
pub mod value;

pub use blueprint::{Blueprint, Edge, IntoBlueprint, Node, NodeData};
pub use evaluator::Evaluator;
pub use executor::{Executor, ExecutorRegistry, ResolvedInputs};
pub use request::{RunRequest, run};
pub use value::{Handles, Value, ValueKind};

//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build a blueprint, register executors and run
//! an evaluation.
//!
//! # Example
//!
//! ```rust,no_run
//! use bprun::prelude::*;
//!
//! # fn run_example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let request = RunRequest::from_file("path/to/request.json")?;
//! let registry = ExecutorRegistry::default();
//!
//! let outputs = run(&registry, request)?;
//! println!("{}", serde_json::to_string_pretty(&outputs)?);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::blueprint::{Blueprint, DuplicatePolicy, Edge, IntoBlueprint, Node, NodeData};

// Execution
pub use crate::evaluator::Evaluator;
pub use crate::executor::{
    Executor, ExecutorRegistry, ExecutorRegistryBuilder, NullRendering, ResolvedInputs,
};
pub use crate::request::{RunRequest, run};

// Values
pub use crate::value::{Handles, Value, ValueKind};

// Error types
pub use crate::error::{BlueprintError, ExecutionError, RequestError, RunError};

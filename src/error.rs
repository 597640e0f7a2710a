use crate::value::ValueKind;
use itertools::Itertools;
use thiserror::Error;

/// Errors that can occur while building a `Blueprint`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlueprintError {
    #[error("Node id '{0}' appears more than once in the blueprint")]
    DuplicateNodeId(String),
}

/// Errors that can occur while loading a run request.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Could not read request file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse request JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while executing a node and its upstream dependencies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("Unable to find node type '{type_name}' for node '{node_id}'")]
    UnknownNodeType { type_name: String, node_id: String },

    #[error("cycle detected: {}", path.iter().join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("Type mismatch on node '{node_id}' input '{handle}': expected {expected}, but found {found}")]
    TypeMismatch {
        node_id: String,
        handle: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Executor for node '{node_id}' failed: {message}")]
    Executor { node_id: String, message: String },

    #[error("Dependency chain below node '{node_id}' exceeds the depth limit of {limit}")]
    DepthLimitExceeded { node_id: String, limit: usize },

    #[error("exe:{node_id} -> {source}")]
    Upstream {
        node_id: String,
        source: Box<ExecutionError>,
    },
}

impl ExecutionError {
    /// Strips every `Upstream` layer and returns the error that started the failure.
    pub fn root_cause(&self) -> &ExecutionError {
        let mut current = self;
        while let ExecutionError::Upstream { source, .. } = current {
            current = source;
        }
        current
    }

    /// Node ids of the `Upstream` layers, from the requested target down to the
    /// last node before the root cause.
    pub fn trail(&self) -> Vec<&str> {
        let mut trail = Vec::new();
        let mut current = self;
        while let ExecutionError::Upstream { node_id, source } = current {
            trail.push(node_id.as_str());
            current = source;
        }
        trail
    }

    pub(crate) fn upstream(node_id: &str, source: ExecutionError) -> Self {
        ExecutionError::Upstream {
            node_id: node_id.to_string(),
            source: Box::new(source),
        }
    }
}

/// Any failure of the end-to-end run operation.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Blueprint(#[from] BlueprintError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

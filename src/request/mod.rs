use crate::blueprint::{Blueprint, DuplicatePolicy, Edge, IntoBlueprint, Node};
use crate::error::{BlueprintError, RequestError, RunError};
use crate::evaluator::Evaluator;
use crate::executor::ExecutorRegistry;
use crate::value::Handles;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The payload the node editor sends: the whole graph plus the node to evaluate.
///
/// Editor-only fields such as node positions or edge styling are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub target: String,
}

impl RunRequest {
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RequestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Builds the blueprint while keeping the request's target around.
    pub fn into_parts(
        self,
        policy: DuplicatePolicy,
    ) -> Result<(Blueprint, String), BlueprintError> {
        let blueprint = Blueprint::builder(self.nodes, self.edges)
            .with_duplicate_policy(policy)
            .build()?;
        Ok((blueprint, self.target))
    }
}

impl IntoBlueprint for RunRequest {
    fn into_blueprint(self) -> Result<Blueprint, BlueprintError> {
        Ok(Blueprint::new(self.nodes, self.edges))
    }
}

/// Builds the request's blueprint and executes its target.
///
/// This is the single operation a transport layer needs: it owns nothing
/// beyond the call and returns the target's outputs.
pub fn run(registry: &ExecutorRegistry, request: RunRequest) -> Result<Handles, RunError> {
    let (blueprint, target) = request.into_parts(DuplicatePolicy::LastWins)?;
    tracing::info!(
        target_node = %target,
        nodes = blueprint.node_count(),
        edges = blueprint.edge_count(),
        "executing blueprint"
    );
    Ok(Evaluator::new(registry).execute(&blueprint, &target)?)
}

use crate::value::{Handles, Value, serialize_sorted};
use serde::{Deserialize, Serialize};

/// A single computation node in the blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: NodeData,
}

/// Static data attached to a node by the editor.
///
/// `inputs` is a template of default input values: handles without an incoming
/// edge keep the template value. `outputs` holds literal values for source nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, serialize_with = "serialize_sorted")]
    pub inputs: Handles,
    #[serde(default, serialize_with = "serialize_sorted")]
    pub outputs: Handles,
}

/// Routes the value on `source_handle` of `source` into `target_handle` of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            data: NodeData::default(),
        }
    }

    /// Sets a default value on the input template.
    pub fn with_input(mut self, handle: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.inputs.insert(handle.into(), value.into());
        self
    }

    /// Sets a literal output value.
    pub fn with_output(mut self, handle: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.outputs.insert(handle.into(), value.into());
        self
    }
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: source_handle.into(),
            target_handle: target_handle.into(),
        }
    }
}

use super::Blueprint;
use crate::error::BlueprintError;

/// A trait for payload formats that can be turned into a `Blueprint`.
///
/// The engine only understands its own `Node`/`Edge` model. Editors that emit a
/// different JSON shape implement this trait on their own structs to provide the
/// translation layer.
///
/// # Example
///
/// ```rust
/// use bprun::blueprint::{Blueprint, Edge, IntoBlueprint, Node};
/// use bprun::error::BlueprintError;
///
/// struct Literal { id: String, text: String }
/// struct Document { literals: Vec<Literal>, joiner: String }
///
/// impl IntoBlueprint for Document {
///     fn into_blueprint(self) -> Result<Blueprint, BlueprintError> {
///         let mut nodes = vec![Node::new(self.joiner.clone(), "concat")];
///         let mut edges = Vec::new();
///         for (literal, handle) in self.literals.into_iter().zip(["a", "b"]) {
///             edges.push(Edge::new(literal.id.clone(), "value", self.joiner.clone(), handle));
///             nodes.push(Node::new(literal.id, "stringLit").with_output("value", literal.text));
///         }
///         Ok(Blueprint::new(nodes, edges))
///     }
/// }
///
/// let doc = Document {
///     literals: vec![
///         Literal { id: "l1".into(), text: "foo".into() },
///         Literal { id: "l2".into(), text: "bar".into() },
///     ],
///     joiner: "join".into(),
/// };
/// let blueprint = doc.into_blueprint().unwrap();
/// assert_eq!(blueprint.node_count(), 3);
/// assert_eq!(blueprint.incoming_edges("join").len(), 2);
/// ```
pub trait IntoBlueprint {
    /// Consumes the object and converts it into an executable blueprint.
    fn into_blueprint(self) -> Result<Blueprint, BlueprintError>;
}

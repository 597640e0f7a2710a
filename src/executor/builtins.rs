use super::{Executor, ResolvedInputs};
use crate::blueprint::Node;
use crate::error::ExecutionError;
use crate::value::{Handles, Value};

/// Text `concat` emits for an absent or null input under `NullRendering::Marker`.
pub const NULL_MARKER: &str = "<nil>";

/// How `concat` renders an input that is absent or null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullRendering {
    /// Renders as the literal `<nil>`.
    #[default]
    Marker,
    /// Renders as nothing.
    Empty,
}

/// Settings shared by every built-in executor the registry builder creates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct BuiltinOptions {
    pub(super) null_rendering: NullRendering,
}

/// `{out: a + b}`, with both inputs stringified.
#[derive(Debug, Default)]
pub struct ConcatExecutor {
    null_rendering: NullRendering,
}

impl ConcatExecutor {
    pub fn new(null_rendering: NullRendering) -> Self {
        Self { null_rendering }
    }

    fn configured(options: &BuiltinOptions) -> Self {
        Self::new(options.null_rendering)
    }

    fn render(&self, value: &Value) -> String {
        match (value, self.null_rendering) {
            (Value::Null, NullRendering::Marker) => NULL_MARKER.to_string(),
            (Value::Null, NullRendering::Empty) => String::new(),
            (other, _) => other.to_string(),
        }
    }
}

impl Executor for ConcatExecutor {
    fn node_type(&self) -> &str {
        "concat"
    }

    fn execute(&self, _node: &Node, inputs: &ResolvedInputs) -> Result<Handles, ExecutionError> {
        let mut out = self.render(inputs.get("a"));
        out.push_str(&self.render(inputs.get("b")));
        Ok(Handles::from([("out".to_string(), Value::String(out))]))
    }
}

/// Emits its static `outputs.value` and ignores every input.
#[derive(Debug, Default)]
pub struct StringLitExecutor;

impl StringLitExecutor {
    fn configured(_options: &BuiltinOptions) -> Self {
        Self
    }
}

impl Executor for StringLitExecutor {
    fn node_type(&self) -> &str {
        "stringLit"
    }

    fn execute(&self, node: &Node, _inputs: &ResolvedInputs) -> Result<Handles, ExecutionError> {
        let value = node.data.outputs.get("value").cloned().unwrap_or_default();
        Ok(Handles::from([("value".to_string(), value)]))
    }
}

/// Splits `src` around the first occurrence of `around` into `{before, after}`.
#[derive(Debug, Default)]
pub struct SplitExecutor;

impl SplitExecutor {
    fn configured(_options: &BuiltinOptions) -> Self {
        Self
    }
}

impl Executor for SplitExecutor {
    fn node_type(&self) -> &str {
        "split"
    }

    fn execute(&self, _node: &Node, inputs: &ResolvedInputs) -> Result<Handles, ExecutionError> {
        let src = inputs.require_str("src")?;
        let around = inputs.require_str("around")?;
        let (before, after) = src.split_once(around).unwrap_or((src, ""));
        Ok(Handles::from([
            ("before".to_string(), Value::from(before)),
            ("after".to_string(), Value::from(after)),
        ]))
    }
}

/// Defines the list of built-in type names and their by-name construction.
macro_rules! define_builtin_executors {
    ( $( ($struct_name:ident, $node_type:literal) ),* $(,)? ) => {
        pub(super) const BUILTIN_TYPES: &[&str] = &[ $( $node_type ),* ];

        pub(super) fn create_executor_by_name(
            name: &str,
            options: &BuiltinOptions,
        ) -> Option<Box<dyn Executor>> {
            match name {
                $( $node_type => Some(Box::new($struct_name::configured(options))), )*
                _ => None,
            }
        }
    };
}

define_builtin_executors! {
    (ConcatExecutor, "concat"),
    (StringLitExecutor, "stringLit"),
    (SplitExecutor, "split"),
}

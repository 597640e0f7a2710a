use crate::blueprint::Node;
use crate::error::ExecutionError;
use crate::value::{Handles, Value, ValueKind};
use ahash::AHashMap;

mod builtins;

pub use builtins::{ConcatExecutor, NULL_MARKER, NullRendering, SplitExecutor, StringLitExecutor};
use builtins::{BUILTIN_TYPES, BuiltinOptions, create_executor_by_name};

/// Defines the contract for running one node type.
///
/// Implementations must be pure: the outputs depend only on the node's static
/// data and the resolved inputs.
pub trait Executor: Send + Sync {
    /// The `type` string of the nodes this executor handles.
    fn node_type(&self) -> &str;

    fn execute(&self, node: &Node, inputs: &ResolvedInputs) -> Result<Handles, ExecutionError>;
}

/// The inputs of one node for one execution: its input template merged with
/// the values routed in over incoming edges.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    node_id: String,
    values: Handles,
}

static NULL: Value = Value::Null;

impl ResolvedInputs {
    pub fn new(node_id: impl Into<String>, values: Handles) -> Self {
        Self {
            node_id: node_id.into(),
            values,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// The value bound to `handle`, or `Value::Null` if nothing is bound.
    pub fn get(&self, handle: &str) -> &Value {
        self.values.get(handle).unwrap_or(&NULL)
    }

    /// The string bound to `handle`. Anything else is a `TypeMismatch`.
    pub fn require_str(&self, handle: &str) -> Result<&str, ExecutionError> {
        let value = self.get(handle);
        value.as_str().ok_or_else(|| self.mismatch(handle, ValueKind::String, value))
    }

    pub fn require_number(&self, handle: &str) -> Result<f64, ExecutionError> {
        let value = self.get(handle);
        value
            .as_number()
            .ok_or_else(|| self.mismatch(handle, ValueKind::Number, value))
    }

    pub fn require_bool(&self, handle: &str) -> Result<bool, ExecutionError> {
        let value = self.get(handle);
        value.as_bool().ok_or_else(|| self.mismatch(handle, ValueKind::Bool, value))
    }

    pub fn values(&self) -> &Handles {
        &self.values
    }

    fn mismatch(&self, handle: &str, expected: ValueKind, found: &Value) -> ExecutionError {
        ExecutionError::TypeMismatch {
            node_id: self.node_id.clone(),
            handle: handle.to_string(),
            expected,
            found: found.kind(),
        }
    }
}

/// Maps node type names to their executors. Read-only once built.
pub struct ExecutorRegistry {
    executors: AHashMap<String, Box<dyn Executor>>,
}

pub struct ExecutorRegistryBuilder {
    executors: AHashMap<String, Box<dyn Executor>>,
    /// Registered type name -> the built-in it runs, for rebuilding on reconfiguration.
    builtin_aliases: AHashMap<String, String>,
    options: BuiltinOptions,
}

impl ExecutorRegistryBuilder {
    /// Starts from the built-in executors.
    pub fn new() -> Self {
        BUILTIN_TYPES
            .iter()
            .fold(Self::empty(), |builder, name| builder.with_type_mapping(name, name))
    }

    /// Starts with no executors at all.
    pub fn empty() -> Self {
        Self {
            executors: AHashMap::new(),
            builtin_aliases: AHashMap::new(),
            options: BuiltinOptions::default(),
        }
    }

    /// Makes nodes of `user_type_name` run with the built-in `builtin_type_name`,
    /// configured with the builder's current options. Unknown built-in names are ignored.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        if let Some(executor) = create_executor_by_name(builtin_type_name, &self.options) {
            self.executors.insert(user_type_name.to_string(), executor);
            self.builtin_aliases
                .insert(user_type_name.to_string(), builtin_type_name.to_string());
        }
        self
    }

    /// Registers an executor under its own `node_type()`, replacing any previous one.
    pub fn with_executor(mut self, executor: Box<dyn Executor>) -> Self {
        let node_type = executor.node_type().to_string();
        self.builtin_aliases.remove(&node_type);
        self.executors.insert(node_type, executor);
        self
    }

    /// Sets how `concat` renders absent or null inputs. Applies to every type
    /// name registered with a built-in, before or after this call.
    pub fn with_null_rendering(mut self, rendering: NullRendering) -> Self {
        self.options.null_rendering = rendering;
        for (user_type_name, builtin_type_name) in &self.builtin_aliases {
            if let Some(executor) = create_executor_by_name(builtin_type_name, &self.options) {
                self.executors.insert(user_type_name.clone(), executor);
            }
        }
        self
    }

    pub fn build(self) -> ExecutorRegistry {
        ExecutorRegistry {
            executors: self.executors,
        }
    }
}

impl Default for ExecutorRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorRegistry {
    pub fn builder() -> ExecutorRegistryBuilder {
        ExecutorRegistryBuilder::new()
    }

    pub fn get(&self, node_type: &str) -> Option<&dyn Executor> {
        self.executors.get(node_type).map(|executor| &**executor)
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.executors.contains_key(node_type)
    }

    /// Registered type names, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.executors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        ExecutorRegistryBuilder::new().build()
    }
}

//! Method registry: the table of operations exposed to the content view.
//!
//! Capabilities declare their operations once, at construction, into an
//! [`ExposureTable`]. The table is validated and frozen into a
//! [`MethodRegistry`]; nothing is added or changed afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use wito_common::{is_reserved_name, is_script_identifier, BridgeError, RegistryError};

use crate::args::Args;

/// Argument name carried by property writes.
pub const PROPERTY_VALUE_ARG: &str = "value";

/// Type-erased operation body. Results are already in wire form.
pub type Handler = Arc<dyn Fn(&Args) -> Result<Value, BridgeError> + Send + Sync>;

/// Where an operation runs. Fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Inline on the main context.
    Synchronous,
    /// On the shared worker pool, settling later.
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Method,
    ReadOnlyProperty,
    ReadWriteProperty,
}

impl AccessKind {
    pub fn is_property(self) -> bool {
        !matches!(self, Self::Method)
    }
}

/// A named, registered unit of host functionality.
#[derive(Clone)]
pub struct Operation {
    name: String,
    params: Vec<String>,
    mode: ExecutionMode,
    access: AccessKind,
    handler: Handler,
    setter: Option<Handler>,
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn access(&self) -> AccessKind {
        self.access
    }

    /// Pick the body for a call.
    ///
    /// Properties read with no `value` argument and write with one; writing
    /// a read-only property is an error.
    pub fn select_handler(&self, args: &Args) -> Result<Handler, BridgeError> {
        match self.access {
            AccessKind::Method => Ok(Arc::clone(&self.handler)),
            AccessKind::ReadOnlyProperty | AccessKind::ReadWriteProperty => {
                if !args.contains(PROPERTY_VALUE_ARG) {
                    return Ok(Arc::clone(&self.handler));
                }
                self.setter
                    .as_ref()
                    .map(Arc::clone)
                    .ok_or_else(|| BridgeError::ReadOnlyProperty(self.name.clone()))
            }
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("mode", &self.mode)
            .field("access", &self.access)
            .finish()
    }
}

/// A source of exposed operations.
///
/// Handlers typically capture a clone of the `Arc` so they can reach the
/// capability's state from any thread.
pub trait Capability: Send + Sync + 'static {
    fn expose(self: Arc<Self>, table: &mut ExposureTable);
}

/// Declarative list of exposures collected from capabilities.
#[derive(Default)]
pub struct ExposureTable {
    entries: Vec<Operation>,
}

impl ExposureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a method that runs inline on the main context.
    pub fn method<R, F>(&mut self, name: &str, params: &[&str], body: F) -> &mut Self
    where
        R: Serialize,
        F: Fn(&Args) -> Result<R, BridgeError> + Send + Sync + 'static,
    {
        self.push(name, params, ExecutionMode::Synchronous, AccessKind::Method, erase(body), None)
    }

    /// Expose a method that runs on the worker pool.
    pub fn background<R, F>(&mut self, name: &str, params: &[&str], body: F) -> &mut Self
    where
        R: Serialize,
        F: Fn(&Args) -> Result<R, BridgeError> + Send + Sync + 'static,
    {
        self.push(name, params, ExecutionMode::Background, AccessKind::Method, erase(body), None)
    }

    /// Expose a read-only property.
    pub fn read_only<R, G>(&mut self, name: &str, getter: G) -> &mut Self
    where
        R: Serialize,
        G: Fn() -> Result<R, BridgeError> + Send + Sync + 'static,
    {
        let get = erase(move |_: &Args| getter());
        self.push(name, &[], ExecutionMode::Synchronous, AccessKind::ReadOnlyProperty, get, None)
    }

    /// Expose a read/write property. The setter receives the `value` argument.
    pub fn read_write<R, W, T, G, S>(&mut self, name: &str, getter: G, setter: S) -> &mut Self
    where
        R: Serialize,
        W: Serialize,
        T: DeserializeOwned,
        G: Fn() -> Result<R, BridgeError> + Send + Sync + 'static,
        S: Fn(T) -> Result<W, BridgeError> + Send + Sync + 'static,
    {
        let get = erase(move |_: &Args| getter());
        let set = erase(move |args: &Args| setter(args.get::<T>(PROPERTY_VALUE_ARG)?));
        self.push(
            name,
            &[],
            ExecutionMode::Synchronous,
            AccessKind::ReadWriteProperty,
            get,
            Some(set),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(
        &mut self,
        name: &str,
        params: &[&str],
        mode: ExecutionMode,
        access: AccessKind,
        handler: Handler,
        setter: Option<Handler>,
    ) -> &mut Self {
        self.entries.push(Operation {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            mode,
            access,
            handler,
            setter,
        });
        self
    }
}

/// Wrap a typed body so its result is converted to wire form.
///
/// A result that cannot be represented becomes a serialization error rather
/// than a dropped call.
fn erase<R, F>(body: F) -> Handler
where
    R: Serialize,
    F: Fn(&Args) -> Result<R, BridgeError> + Send + Sync + 'static,
{
    Arc::new(move |args: &Args| {
        body(args).and_then(|r| serde_json::to_value(r).map_err(BridgeError::result_serialization))
    })
}

/// Collects capabilities before freezing them into a registry.
#[derive(Default)]
pub struct RegistryBuilder {
    table: ExposureTable,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every exposure of `capability`.
    pub fn with<C: Capability>(mut self, capability: Arc<C>) -> Self {
        capability.expose(&mut self.table);
        self
    }

    /// Add exposures declared directly on a table.
    pub fn with_table(mut self, table: ExposureTable) -> Self {
        self.table.entries.extend(table.entries);
        self
    }

    /// Validate and freeze.
    ///
    /// Fails on names that are not script identifiers (reserved words
    /// included), names reserved by the script runtime, and any name exposed
    /// twice.
    pub fn build(self) -> Result<MethodRegistry, RegistryError> {
        let mut operations = HashMap::with_capacity(self.table.entries.len());
        let mut order = Vec::with_capacity(self.table.entries.len());

        for op in self.table.entries {
            if !is_script_identifier(&op.name) {
                return Err(RegistryError::InvalidName(op.name));
            }
            if is_reserved_name(&op.name) {
                return Err(RegistryError::Reserved(op.name));
            }
            if let Some(bad) = op.params.iter().find(|p| !is_script_identifier(p)) {
                return Err(RegistryError::InvalidParameter {
                    operation: op.name.clone(),
                    param: bad.clone(),
                });
            }
            if operations.contains_key(&op.name) {
                return Err(RegistryError::DuplicateName(op.name));
            }

            debug!(name = %op.name, mode = ?op.mode, access = ?op.access, "registered operation");
            order.push(op.name.clone());
            operations.insert(op.name.clone(), op);
        }

        Ok(MethodRegistry { operations, order })
    }
}

/// Immutable name → operation table.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    operations: HashMap<String, Operation>,
    /// Declaration order, for deterministic binding output.
    order: Vec<String>,
}

impl MethodRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry of a single capability.
    pub fn from_capability<C: Capability>(capability: Arc<C>) -> Result<Self, RegistryError> {
        Self::builder().with(capability).build()
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// All operations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.order.iter().filter_map(|name| self.operations.get(name))
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Operation> + '_ {
        self.iter().filter(|op| op.access == AccessKind::Method)
    }

    /// Properties and their access kind, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, AccessKind)> + '_ {
        self.iter()
            .filter(|op| op.access.is_property())
            .map(|op| (op.name.as_str(), op.access))
    }

    /// Operation names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

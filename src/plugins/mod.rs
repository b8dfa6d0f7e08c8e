// ABOUTME: Plugin registry mapping plugin names to task factories
// ABOUTME: Materializes declarative task descriptions into executable task trees

pub mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::error::{ConfigError, Result};
use crate::engine::task::Task;
use crate::parser::TaskSpec;

/// Plugin-specific parameters: every description key that is not one of
/// the reserved `plugin` / `name` / `tasks` keys.
pub type TaskParams = serde_json::Map<String, serde_json::Value>;

/// A factory producing a Task from a name, pre-materialized children, and
/// plugin-specific parameters. Leaf plugins receive an empty child vector.
pub type PluginFactory =
    Arc<dyn Fn(&str, Vec<Box<dyn Task>>, &TaskParams) -> Result<Box<dyn Task>> + Send + Sync>;

/// String-keyed map of plugin factories. Lookup is exact-match only: no
/// ordering, no precedence, no wildcards. Host code owns populating it
/// beyond the builtins.
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// A registry with the builtin `serial` and `parallel` group plugins.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("serial", builtin::serial_group);
        registry.register("parallel", builtin::parallel_group);
        registry
    }

    /// A registry with no plugins at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under a plugin name, replacing any previous one.
    pub fn register<F>(&mut self, plugin: &str, factory: F)
    where
        F: Fn(&str, Vec<Box<dyn Task>>, &TaskParams) -> Result<Box<dyn Task>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(plugin.to_string(), Arc::new(factory));
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.factories.contains_key(plugin)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Convert a declarative description into a Task. Children are
    /// materialized depth-first before the factory runs, so group
    /// factories always receive fully built child tasks. The reserved
    /// `plugin` and `tasks` keys are never forwarded.
    pub fn materialize(&self, spec: &TaskSpec) -> Result<Box<dyn Task>> {
        let factory = self
            .factories
            .get(&spec.plugin)
            .ok_or_else(|| ConfigError::UnknownPlugin {
                plugin: spec.plugin.clone(),
            })?;

        let children = match &spec.tasks {
            Some(specs) => specs
                .iter()
                .map(|child| self.materialize(child))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        factory(&spec.name, children, &spec.params)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}

// ABOUTME: Flow root container and the Executor handle passed to running tasks
// ABOUTME: Owns the plugin registry and top-level tasks; run() yields the outcome map

use indexmap::IndexMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::context::Context;
use super::error::ConfigError;
use super::result::Outcome;
use super::serial::run_serial;
use super::task::{derive_slug, Task};
use crate::parser::TaskSpec;
use crate::plugins::{PluginRegistry, TaskParams};

/// Handle to the flow root, cloned into every running task. Provides the
/// plugin registry and per-run metadata; cheap to clone and `'static`, so
/// callables can move it into spawned futures.
#[derive(Clone)]
pub struct Executor {
    flow: Arc<str>,
    run_id: Arc<str>,
    registry: Arc<PluginRegistry>,
}

impl Executor {
    pub(crate) fn new(flow: &str, run_id: &str, registry: Arc<PluginRegistry>) -> Self {
        Self {
            flow: flow.into(),
            run_id: run_id.into(),
            registry,
        }
    }

    pub fn flow_name(&self) -> &str {
        &self.flow
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Materialize a declarative description through the flow's registry.
    /// Lets a running callable build nested task trees on the fly.
    pub fn data_to_task(&self, spec: &TaskSpec) -> Result<Box<dyn Task>, ConfigError> {
        self.registry.materialize(spec)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("flow", &self.flow)
            .field("run_id", &self.run_id)
            .finish()
    }
}

/// The root of a task tree: a serial group with a plugin registry
/// attached. Top-level tasks run in declaration order and the run stops at
/// the first top-level failure, exactly like a nested serial group — but
/// the root records no slug of its own; its result is the returned map.
///
/// `run` consumes the flow, so a finished run cannot be restarted.
pub struct Flow {
    name: String,
    slug: String,
    registry: PluginRegistry,
    tasks: Vec<Box<dyn Task>>,
}

impl Flow {
    /// A flow with the builtin registry (`serial` and `parallel` plugins).
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        Self::with_registry(name, PluginRegistry::new())
    }

    /// A flow with a host-supplied registry.
    pub fn with_registry(name: &str, registry: PluginRegistry) -> Result<Self, ConfigError> {
        let slug = derive_slug(name)?;
        Ok(Self {
            name: name.to_string(),
            slug,
            registry,
            tasks: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn tasks(&self) -> &[Box<dyn Task>] {
        &self.tasks
    }

    /// Register (or replace) a plugin factory on the flow's registry.
    pub fn register<F>(&mut self, plugin: &str, factory: F)
    where
        F: Fn(&str, Vec<Box<dyn Task>>, &TaskParams) -> Result<Box<dyn Task>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(plugin, factory);
    }

    /// Append a top-level task. Duplicate slugs among the current
    /// top-level tasks are rejected.
    pub fn add_task(&mut self, task: Box<dyn Task>) -> Result<(), ConfigError> {
        if self.tasks.iter().any(|existing| existing.slug() == task.slug()) {
            return Err(ConfigError::DuplicateTask {
                group: self.name.clone(),
                name: task.name().to_string(),
                slug: task.slug().to_string(),
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Materialize a declarative description into a Task.
    pub fn data_to_task(&self, spec: &TaskSpec) -> Result<Box<dyn Task>, ConfigError> {
        self.registry.materialize(spec)
    }

    /// Materialize a description and append it as a top-level task.
    pub fn add_spec(&mut self, spec: &TaskSpec) -> Result<(), ConfigError> {
        let task = self.data_to_task(spec)?;
        self.add_task(task)
    }

    /// Execute the flow. Returns the final context snapshot: one entry per
    /// leaf task that ran, plus one per serial group that mirrored a child
    /// failure. Runtime failures are `Err` values in the map; they never
    /// propagate out of `run`.
    #[instrument(skip(self), fields(flow = %self.name))]
    pub async fn run(self) -> IndexMap<String, Outcome> {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        info!(%run_id, tasks = self.tasks.len(), "starting flow run");

        let executor = Executor::new(&self.name, &run_id, Arc::new(self.registry));
        let context = Context::new();

        if let Err(failure) = run_serial(&self.tasks, &executor, &context).await {
            warn!(task = %failure.task, "flow stopped at first failed task");
        }

        info!(
            elapsed = ?started.elapsed(),
            results = context.len().await,
            "flow run finished"
        );

        context.snapshot().await
    }
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

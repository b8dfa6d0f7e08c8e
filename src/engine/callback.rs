// ABOUTME: Leaf task wrapping a user-supplied callable, sync or async
// ABOUTME: Captures callable errors as outcome values and records them

use futures::future::BoxFuture;
use std::future::Future;
use tracing::{debug, warn};

use async_trait::async_trait;

use super::context::Context;
use super::error::ConfigError;
use super::flow::Executor;
use super::result::{Outcome, TaskFailure};
use super::task::{derive_slug, Task};

type Callback =
    Box<dyn Fn(Executor, Context) -> BoxFuture<'static, crate::Result<serde_json::Value>> + Send + Sync>;

/// A Task that owns a callable with signature
/// `(executor, context) -> value`. Async callables are the native form;
/// synchronous callables are adapted at construction so a single task type
/// covers trivial glue and I/O-bound work alike.
pub struct CallbackTask {
    name: String,
    slug: String,
    callback: Callback,
}

impl CallbackTask {
    /// Wrap an async callable.
    pub fn new<F, Fut>(name: &str, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(Executor, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<serde_json::Value>> + Send + 'static,
    {
        let slug = derive_slug(name)?;
        Ok(Self {
            name: name.to_string(),
            slug,
            callback: Box::new(move |executor, context| Box::pin(callback(executor, context))),
        })
    }

    /// Wrap a synchronous callable. The result is computed eagerly at
    /// invocation and carried in an already-resolved future.
    pub fn from_sync<F>(name: &str, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Executor, &Context) -> crate::Result<serde_json::Value> + Send + Sync + 'static,
    {
        Self::new(name, move |executor, context| {
            let result = callback(&executor, &context);
            async move { result }
        })
    }
}

#[async_trait]
impl Task for CallbackTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    async fn run(&self, executor: Executor, context: Context) -> Outcome {
        debug!(task = %self.name, "running callback task");

        let outcome = match (self.callback)(executor, context.clone()).await {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(task = %self.name, error = %format!("{error:#}"), "callback task failed");
                Err(TaskFailure::from_error(&self.slug, &error))
            }
        };

        context.record(&self.slug, outcome.clone()).await;
        outcome
    }
}

impl std::fmt::Debug for CallbackTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTask")
            .field("name", &self.name)
            .field("slug", &self.slug)
            .finish()
    }
}

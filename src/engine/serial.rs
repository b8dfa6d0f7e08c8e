// ABOUTME: Serial task group running children in declaration order
// ABOUTME: Stops at the first failed child and mirrors that failure upward

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::context::Context;
use super::error::ConfigError;
use super::flow::Executor;
use super::result::Outcome;
use super::task::{derive_slug, validate_children, Task};

/// Runs its children one at a time, in declaration order. Child *i+1*
/// begins only after child *i* has terminated and written its outcome, so
/// later children observe all earlier writes. On the first child failure
/// the remaining children are skipped entirely; they never appear in the
/// context.
pub struct SerialTaskGroup {
    name: String,
    slug: String,
    children: Vec<Box<dyn Task>>,
}

impl SerialTaskGroup {
    pub fn new(name: &str, children: Vec<Box<dyn Task>>) -> Result<Self, ConfigError> {
        let slug = derive_slug(name)?;
        validate_children(name, &children)?;
        Ok(Self {
            name: name.to_string(),
            slug,
            children,
        })
    }
}

/// Shared serial discipline: await each child in order, stop at the first
/// failure. Resolves to the success sentinel (`Value::Null`) when every
/// child succeeds or there are no children.
pub(crate) async fn run_serial(
    children: &[Box<dyn Task>],
    executor: &Executor,
    context: &Context,
) -> Outcome {
    for child in children {
        if let Err(failure) = child.run(executor.clone(), context.clone()).await {
            debug!(task = %child.name(), "serial run stopped at failed task");
            return Err(failure);
        }
    }
    Ok(Value::Null)
}

#[async_trait]
impl Task for SerialTaskGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    async fn run(&self, executor: Executor, context: Context) -> Outcome {
        debug!(group = %self.name, tasks = self.children.len(), "running serial group");

        match run_serial(&self.children, &executor, &context).await {
            Ok(sentinel) => Ok(sentinel),
            Err(failure) => {
                warn!(group = %self.name, task = %failure.task, "serial group failed");
                // The group's slot carries the child's failure so parents
                // and the final outcome map see it under the group name too.
                context.record(&self.slug, Err(failure.clone())).await;
                Err(failure)
            }
        }
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }
}

impl std::fmt::Debug for SerialTaskGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTaskGroup")
            .field("name", &self.name)
            .field("tasks", &self.children.len())
            .finish()
    }
}

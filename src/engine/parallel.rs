// ABOUTME: Parallel task group multiplexing children on the cooperative scheduler
// ABOUTME: Every child runs to completion; peer failures cancel nothing

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use super::context::Context;
use super::error::ConfigError;
use super::flow::Executor;
use super::result::Outcome;
use super::task::{derive_slug, validate_children, Task};

/// Runs all children concurrently and blocks until every child has
/// terminated. A failing child does not cancel its siblings; each child's
/// outcome lands in the context regardless of what its peers do.
///
/// The group itself resolves to the success sentinel (`Value::Null`) so a
/// downstream serial stage still runs after a partially failed fan-out.
/// The first failure in declaration order is logged at WARN; consumers
/// read the children's context slots for the full picture.
///
/// Siblings are mutually unordered. A sibling must not read another
/// sibling's context slot; readers belong in a downstream serial stage.
pub struct ParallelTaskGroup {
    name: String,
    slug: String,
    children: Vec<Box<dyn Task>>,
}

impl ParallelTaskGroup {
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

#[async_trait]
impl Task for ParallelTaskGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    async fn run(&self, executor: Executor, context: Context) -> Outcome {
        debug!(group = %self.name, tasks = self.children.len(), "running parallel group");

        let outcomes = join_all(
            self.children
                .iter()
                .map(|child| child.run(executor.clone(), context.clone())),
        )
        .await;

        let first_failure = self
            .children
            .iter()
            .zip(&outcomes)
            .find_map(|(child, outcome)| outcome.as_ref().err().map(|f| (child, f)));

        if let Some((child, failure)) = first_failure {
            warn!(
                group = %self.name,
                task = %child.name(),
                error = %failure,
                "parallel group finished with failures"
            );
        }

        Ok(Value::Null)
    }

    fn children(&self) -> &[Box<dyn Task>] {
        &self.children
    }
}

impl std::fmt::Debug for ParallelTaskGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelTaskGroup")
            .field("name", &self.name)
            .field("tasks", &self.children.len())
            .finish()
    }
}

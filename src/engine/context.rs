// ABOUTME: Shared per-run context mapping task slugs to outcomes
// ABOUTME: Write-once per slug; reads are unordered and available to any task

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::result::Outcome;

/// The shared, per-run, slug-keyed map of task outcomes. Cheap to clone;
/// all clones observe the same slots. Insertion order is preserved, so the
/// final snapshot reads in completion order.
#[derive(Debug, Clone, Default)]
pub struct Context {
    slots: Arc<RwLock<IndexMap<String, Outcome>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a task outcome under its slug. Each slug is written exactly
    /// once per run; a second write is an engine invariant violation and
    /// aborts with a message naming the slug.
    pub async fn record(&self, slug: &str, outcome: Outcome) {
        let mut slots = self.slots.write().await;
        if slots.contains_key(slug) {
            panic!("context slug '{slug}' written twice in one run");
        }
        slots.insert(slug.to_string(), outcome);
    }

    /// Outcome for a slug, if the task has terminated.
    pub async fn outcome(&self, slug: &str) -> Option<Outcome> {
        self.slots.read().await.get(slug).cloned()
    }

    /// Success value for a slug. `None` if the task has not terminated or
    /// terminated with a failure.
    pub async fn value(&self, slug: &str) -> Option<Value> {
        self.slots
            .read()
            .await
            .get(slug)
            .and_then(|outcome| outcome.as_ref().ok().cloned())
    }

    pub async fn contains(&self, slug: &str) -> bool {
        self.slots.read().await.contains_key(slug)
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Ordered copy of every recorded outcome.
    pub async fn snapshot(&self) -> IndexMap<String, Outcome> {
        self.slots.read().await.clone()
    }
}

// ABOUTME: Core Task trait and slug derivation for context keys
// ABOUTME: Every unit of work implements Task; groups expose their children

use async_trait::async_trait;

use super::context::Context;
use super::error::ConfigError;
use super::flow::Executor;
use super::result::Outcome;

/// A named unit of work with exactly one outcome per run.
///
/// Leaf tasks record their outcome in the context under their slug before
/// `run` returns. Failures never propagate out of `run`; they are captured
/// into the returned `Outcome`.
#[async_trait]
pub trait Task: Send + Sync + std::fmt::Debug {
    /// Human-readable name, free-form.
    fn name(&self) -> &str;

    /// Canonical context key derived from the name.
    fn slug(&self) -> &str;

    /// Execute the task. `executor` is the handle to the flow root
    /// (registry, run metadata); `context` is the shared outcome map.
    async fn run(&self, executor: Executor, context: Context) -> Outcome;

    /// Child tasks, in declaration order. Empty for leaf tasks.
    fn children(&self) -> &[Box<dyn Task>] {
        &[]
    }
}

/// Canonical lowercase-alphanumeric form of a task name: every run of
/// characters outside `[a-z0-9]` collapses to a single underscore, with
/// leading and trailing underscores stripped. Idempotent.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut gap = false;

    for ch in name.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('_');
            }
            gap = false;
            slug.push(ch);
        } else {
            gap = true;
        }
    }

    slug
}

/// Slug for a task under construction; an empty slug cannot key the context.
pub(crate) fn derive_slug(name: &str) -> Result<String, ConfigError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(ConfigError::EmptySlug {
            name: name.to_string(),
        });
    }
    Ok(slug)
}

/// Reject sibling slug collisions within a group.
pub(crate) fn validate_children(
    group: &str,
    children: &[Box<dyn Task>],
) -> Result<(), ConfigError> {
    let mut seen = std::collections::HashSet::new();
    for child in children {
        if !seen.insert(child.slug()) {
            return Err(ConfigError::DuplicateTask {
                group: group.to_string(),
                name: child.name().to_string(),
                slug: child.slug().to_string(),
            });
        }
    }
    Ok(())
}

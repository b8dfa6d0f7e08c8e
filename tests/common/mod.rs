// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides callback constructors and task-tree inspection helpers

#![allow(dead_code)]

use std::sync::Once;

use flowline::{CallbackTask, Task};
use serde_json::Value;

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary; respects RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Synchronous callback returning a fixed value.
pub fn sync_value(name: &str, value: Value) -> Box<dyn Task> {
    Box::new(
        CallbackTask::from_sync(name, move |_executor, _context| Ok(value.clone())).unwrap(),
    )
}

/// Synchronous callback that always fails.
pub fn sync_failure(name: &str, message: &'static str) -> Box<dyn Task> {
    Box::new(
        CallbackTask::from_sync(name, move |_executor, _context| {
            Err(anyhow::anyhow!(message))
        })
        .unwrap(),
    )
}

/// Asynchronous callback returning a fixed value after yielding once.
pub fn async_value(name: &str, value: Value) -> Box<dyn Task> {
    Box::new(
        CallbackTask::new(name, move |_executor, _context| {
            let value = value.clone();
            async move {
                tokio::task::yield_now().await;
                Ok(value)
            }
        })
        .unwrap(),
    )
}

/// Asynchronous callback that fails after yielding once.
pub fn async_failure(name: &str, message: &'static str) -> Box<dyn Task> {
    Box::new(
        CallbackTask::new(name, move |_executor, _context| async move {
            tokio::task::yield_now().await;
            Err(anyhow::anyhow!(message))
        })
        .unwrap(),
    )
}

/// All slugs in a task tree, preorder.
pub fn collect_slugs(task: &dyn Task) -> Vec<String> {
    let mut slugs = vec![task.slug().to_string()];
    for child in task.children() {
        slugs.extend(collect_slugs(child.as_ref()));
    }
    slugs
}

/// Child counts per node, preorder. Two trees with equal shapes and equal
/// slug lists are structurally identical.
pub fn tree_shape(task: &dyn Task) -> Vec<usize> {
    let mut shape = vec![task.children().len()];
    for child in task.children() {
        shape.extend(tree_shape(child.as_ref()));
    }
    shape
}

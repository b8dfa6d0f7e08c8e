// ABOUTME: Integration tests for plugin dispatch and task materialization
// ABOUTME: Covers factory calling conventions, registry errors, and tree shape

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use flowline::{
    CallbackTask, ConfigError, Flow, PluginRegistry, Task, TaskParams, TaskSpec,
};
use serde_json::{json, Value};

mod common;
use common::{collect_slugs, init_tracing, tree_shape};

/// Registry with a `test` plugin that records every factory call and
/// builds a callback returning the description's `content` value.
fn registry_with_probe(calls: Arc<Mutex<Vec<(String, TaskParams)>>>) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register("test", move |name, _children, params| {
        calls.lock().unwrap().push((name.to_string(), params.clone()));
        let content = params.get("content").cloned().unwrap_or(Value::Null);
        Ok(Box::new(CallbackTask::from_sync(name, move |_executor, _context| {
            Ok(content.clone())
        })?))
    });
    registry
}

#[tokio::test]
async fn test_plugin_dispatch_builds_a_running_serial_group() {
    init_tracing();

    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_probe(Arc::clone(&calls));

    let spec = TaskSpec::from_value(json!({
        "plugin": "serial",
        "name": "s",
        "tasks": [
            { "plugin": "test", "name": "t1", "content": "c1" },
            { "plugin": "test", "name": "t2", "content": "c2" },
        ]
    }))
    .unwrap();

    let mut flow = Flow::with_registry("Dispatch", registry).unwrap();
    flow.add_spec(&spec).unwrap();

    // The factory saw each leaf in declaration order, with only the
    // plugin-specific keys
    {
        let recorded = calls.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].0, "t1");
        assert_eq!(recorded[0].1.get("content"), Some(&json!("c1")));
        assert_eq!(recorded[1].0, "t2");
        assert_eq!(recorded[1].1.get("content"), Some(&json!("c2")));
        for (_, params) in recorded.iter() {
            assert!(!params.contains_key("plugin"));
            assert!(!params.contains_key("name"));
            assert!(!params.contains_key("tasks"));
        }
    }

    // The materialized group has two children and serial behavior
    assert_eq!(flow.tasks().len(), 1);
    assert_eq!(flow.tasks()[0].children().len(), 2);

    let outcomes = flow.run().await;
    assert_eq!(outcomes["t1"], Ok(Value::from("c1")));
    assert_eq!(outcomes["t2"], Ok(Value::from("c2")));
}

#[test]
fn test_unknown_plugin_fails_before_anything_runs() {
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);

    let mut registry = PluginRegistry::new();
    registry.register("counted", move |name, _children, _params| {
        let counter = Arc::clone(&counter);
        Ok(Box::new(CallbackTask::from_sync(name, move |_executor, _context| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        })?))
    });

    let spec = TaskSpec::from_value(json!({
        "plugin": "serial",
        "name": "s",
        "tasks": [
            { "plugin": "counted", "name": "early" },
            { "plugin": "nonexistent", "name": "late" },
        ]
    }))
    .unwrap();

    let flow = Flow::with_registry("Broken", registry).unwrap();
    let err = flow.data_to_task(&spec).unwrap_err();

    assert!(matches!(err, ConfigError::UnknownPlugin { ref plugin } if plugin == "nonexistent"));
    assert!(err.to_string().contains("nonexistent"));
    // Materialization failed before any callable ran
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[test]
fn test_duplicate_sibling_names_fail_at_construction() {
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);

    let mut registry = PluginRegistry::new();
    registry.register("counted", move |name, _children, _params| {
        let counter = Arc::clone(&counter);
        Ok(Box::new(CallbackTask::from_sync(name, move |_executor, _context| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Null)
        })?))
    });

    let spec = TaskSpec::from_value(json!({
        "plugin": "serial",
        "name": "s",
        "tasks": [
            { "plugin": "counted", "name": "x" },
            { "plugin": "counted", "name": "x" },
        ]
    }))
    .unwrap();

    let flow = Flow::with_registry("Duplicates", registry).unwrap();
    let err = flow.data_to_task(&spec).unwrap_err();

    assert!(matches!(err, ConfigError::DuplicateTask { .. }));
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[test]
fn test_materialization_is_repeatable() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_probe(Arc::clone(&calls));

    let spec = TaskSpec::from_value(json!({
        "plugin": "parallel",
        "name": "root group",
        "tasks": [
            { "plugin": "test", "name": "leaf a", "content": 1 },
            {
                "plugin": "serial",
                "name": "inner",
                "tasks": [
                    { "plugin": "test", "name": "leaf b", "content": 2 },
                ]
            },
        ]
    }))
    .unwrap();

    let first = registry.materialize(&spec).unwrap();
    let second = registry.materialize(&spec).unwrap();

    assert_eq!(collect_slugs(first.as_ref()), collect_slugs(second.as_ref()));
    assert_eq!(tree_shape(first.as_ref()), tree_shape(second.as_ref()));
    assert_eq!(
        collect_slugs(first.as_ref()),
        vec!["root_group", "leaf_a", "inner", "leaf_b"]
    );
}

#[tokio::test]
async fn test_runtime_materialization_through_executor() {
    init_tracing();

    let builder = CallbackTask::new("Build and run", |executor, context| async move {
        let spec = TaskSpec::leaf("serial", "made at runtime");
        let task = executor.data_to_task(&spec)?;
        task.run(executor.clone(), context.clone()).await.ok();
        Ok(Value::from("built"))
    })
    .unwrap();

    let mut flow = Flow::new("Dynamic").unwrap();
    flow.add_task(Box::new(builder)).unwrap();

    let outcomes = flow.run().await;
    assert_eq!(outcomes["build_and_run"], Ok(Value::from("built")));
}

#[test]
fn test_registered_plugins_are_visible_to_hosts() {
    let mut registry = PluginRegistry::new();
    registry.register("shell", |name, _children, _params| {
        Ok(Box::new(CallbackTask::from_sync(name, |_executor, _context| {
            Ok(Value::Null)
        })?))
    });

    assert_eq!(registry.plugin_names(), vec!["parallel", "serial", "shell"]);
    assert!(registry.contains("shell"));
    assert!(!registry.contains("python"));
}

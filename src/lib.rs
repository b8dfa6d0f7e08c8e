// ABOUTME: Main library module for the flowline task-queue engine
// ABOUTME: Exports all core modules and provides the public API

pub mod engine;
pub mod parser;
pub mod plugins;

// Re-export commonly used types
pub use engine::{
    CallbackTask, ConfigError, Context, Executor, Flow, Outcome, ParallelTaskGroup,
    SerialTaskGroup, Task, TaskFailure,
};
pub use parser::{ParserError, TaskSpec};
pub use plugins::{PluginFactory, PluginRegistry, TaskParams};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

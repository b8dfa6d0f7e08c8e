// ABOUTME: Task execution engine module for the flowline task-queue engine
// ABOUTME: Defines tasks, groups, the shared context, and the flow root

pub mod callback;
pub mod context;
pub mod error;
pub mod flow;
pub mod parallel;
pub mod result;
pub mod serial;
pub mod task;

pub use callback::CallbackTask;
pub use context::Context;
pub use error::ConfigError;
pub use flow::{Executor, Flow};
pub use parallel::ParallelTaskGroup;
pub use result::{Outcome, TaskFailure};
pub use serial::SerialTaskGroup;
pub use task::{slugify, Task};

// ABOUTME: Configuration error types raised before a flow starts running
// ABOUTME: Covers plugin lookup, task naming, and description shape problems

use thiserror::Error;

/// Fatal construction-time errors. A flow that trips one of these never
/// starts; runtime failures are `TaskFailure` values in the context instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown plugin: {plugin}")]
    UnknownPlugin { plugin: String },

    #[error("Duplicate task '{name}' in group '{group}' (slug '{slug}')")]
    DuplicateTask {
        group: String,
        name: String,
        slug: String,
    },

    #[error("Task name '{name}' produces an empty slug")]
    EmptySlug { name: String },

    #[error("Plugin '{plugin}' does not accept parameter '{param}'")]
    UnexpectedParameter { plugin: String, param: String },

    #[error("Invalid task description: {0}")]
    InvalidDescription(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

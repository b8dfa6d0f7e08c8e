// ABOUTME: Declarative task description model and loaders
// ABOUTME: Defines TaskSpec trees parsed from values, JSON, YAML, or files

pub mod error;

pub use error::{ParserError, Result};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;

/// One node of a declarative task tree. `plugin` and `name` are required;
/// the presence of `tasks` marks a group; every other key is passed to the
/// plugin factory untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub plugin: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskSpec>>,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl TaskSpec {
    /// A leaf description with no children and no parameters.
    pub fn leaf(plugin: &str, name: &str) -> Self {
        Self {
            plugin: plugin.to_string(),
            name: name.to_string(),
            tasks: None,
            params: Map::new(),
        }
    }

    /// A group description with the given children.
    pub fn group(plugin: &str, name: &str, tasks: Vec<TaskSpec>) -> Self {
        Self {
            plugin: plugin.to_string(),
            name: name.to_string(),
            tasks: Some(tasks),
            params: Map::new(),
        }
    }

    /// Add a plugin-specific parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn is_group(&self) -> bool {
        self.tasks.is_some()
    }

    /// Parse a description from an already-decoded value tree.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        Self::from_value(value)
    }

    /// Load a description from a file, dispatching on the extension:
    /// `.json` parses as JSON, anything else as YAML.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ABOUTME: Builtin group plugins available in every default registry
// ABOUTME: Maps the serial and parallel plugin names to the group types

use crate::engine::error::{ConfigError, Result};
use crate::engine::parallel::ParallelTaskGroup;
use crate::engine::serial::SerialTaskGroup;
use crate::engine::task::Task;

use super::TaskParams;

/// Factory for the `serial` plugin.
pub fn serial_group(
    name: &str,
    children: Vec<Box<dyn Task>>,
    params: &TaskParams,
) -> Result<Box<dyn Task>> {
    reject_params("serial", params)?;
    Ok(Box::new(SerialTaskGroup::new(name, children)?))
}

/// Factory for the `parallel` plugin.
pub fn parallel_group(
    name: &str,
    children: Vec<Box<dyn Task>>,
    params: &TaskParams,
) -> Result<Box<dyn Task>> {
    reject_params("parallel", params)?;
    Ok(Box::new(ParallelTaskGroup::new(name, children)?))
}

// Group plugins take no configuration beyond name and children.
fn reject_params(plugin: &str, params: &TaskParams) -> Result<()> {
    if let Some(param) = params.keys().next() {
        return Err(ConfigError::UnexpectedParameter {
            plugin: plugin.to_string(),
            param: param.clone(),
        });
    }
    Ok(())
}

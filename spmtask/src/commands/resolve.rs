//! Resolution of a host-supplied task definition.

use anyhow::{anyhow, Result};
use spmtask_core::{TaskDefinition, TaskRequest};

use super::print_tasks;

pub fn cmd_resolve(task: String, target: Option<String>, args: Vec<String>) -> Result<()> {
    let request = TaskRequest {
        task: Some(task),
        args,
        target,
    };

    let resolved = TaskDefinition::resolve(&request).ok_or_else(|| {
        anyhow!(
            "Cannot resolve task '{}'. Expected build, test, or run with --target.",
            request.task.as_deref().unwrap_or_default()
        )
    })?;

    print_tasks(&[resolved], true)
}

//! Command implementations for the CLI.

mod discover;
mod resolve;
mod watch;

use std::path::Path;

use anyhow::Result;
use spmtask_core::{Config, TaskDefinition};

use crate::formatting::print_task_table;

pub use discover::cmd_discover;
pub use resolve::cmd_resolve;
pub use watch::cmd_watch;

fn load_config(root: &Path, timeout_ms: Option<u64>) -> Result<Config> {
    let config = Config::load(root)?;
    Ok(match timeout_ms {
        Some(timeout_ms) => config.with_timeout_ms(timeout_ms),
        None => config,
    })
}

fn print_tasks(tasks: &[TaskDefinition], json: bool) -> Result<()> {
    if json {
        let host: Vec<_> = tasks.iter().map(TaskDefinition::to_host).collect();
        println!("{}", serde_json::to_string_pretty(&host)?);
    } else {
        print_task_table(tasks);
    }
    Ok(())
}

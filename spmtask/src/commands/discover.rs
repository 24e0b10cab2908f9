//! One-shot task discovery.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use spmtask_core::{DiscoveryEngine, OutputChannel, ShellRunner, MANIFEST_FILE};

use crate::formatting::{
    print_diagnostics, print_error, print_key_value, print_section_header, print_warning,
    SectionStyle,
};

use super::{load_config, print_tasks};

pub async fn cmd_discover(root: PathBuf, json: bool, timeout_ms: Option<u64>) -> Result<()> {
    let config = load_config(&root, timeout_ms)?;
    let channel = Arc::new(OutputChannel::new());
    let runner = ShellRunner::new().with_timeout(config.describe_timeout());
    let engine = DiscoveryEngine::new(Arc::new(runner), channel.clone());

    let tasks = engine.discover(&root).await;
    print_diagnostics(&channel.lines(), channel.was_revealed());

    if json {
        return print_tasks(&tasks, true);
    }

    print_section_header("[Swift Package Tasks]", SectionStyle::Primary);
    print_key_value("Root", &root.display().to_string());
    println!();

    if tasks.is_empty() {
        if channel.was_revealed() {
            print_error("Task detection failed");
        } else if !root.join(MANIFEST_FILE).exists() {
            print_warning(&format!("No {} found", MANIFEST_FILE));
        } else {
            print_warning("No tasks detected");
        }
    } else {
        print_tasks(&tasks, false)?;
    }
    println!();

    Ok(())
}

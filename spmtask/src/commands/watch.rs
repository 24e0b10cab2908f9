//! Watch mode command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use spmtask_core::{DiscoverySession, ManifestEvent, OutputChannel, MANIFEST_FILE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStdout;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::formatting::{
    print_diagnostics, print_info, print_key_value, print_section_header, print_success,
    print_warning, SectionStyle,
};

use super::{load_config, print_tasks};

pub async fn cmd_watch(
    root: PathBuf,
    timeout_ms: Option<u64>,
    debounce_ms: u64,
    server: bool,
) -> Result<()> {
    let mut config = load_config(&root, timeout_ms)?;
    if server {
        config = config.with_server_enabled(true);
    }

    let channel = Arc::new(OutputChannel::new());
    let mut session = DiscoverySession::new(&root, config, channel.clone());
    session.start()?;
    let mut events = session.subscribe();

    print_section_header("Watch Mode", SectionStyle::Primary);
    print_key_value("Watching", &root.join(MANIFEST_FILE).display().to_string());
    let server_path = session.config().server.path.clone();
    // Held open so the server does not see end of input.
    let _server_stdin = match session.language_server_mut().and_then(|s| s.take_stdio()) {
        Some((stdin, stdout)) => {
            print_key_value("Server", &server_path);
            tokio::spawn(drain_server_output(stdout));
            Some(stdin)
        }
        None => None,
    };
    println!("  Press Ctrl+C to stop");
    println!();

    let debounce = Duration::from_millis(debounce_ms);
    let mut cursor = ChannelCursor::default();
    show_tasks(&session, &channel, &mut cursor).await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                print_warning("Stopping watch mode...");
                break;
            }
            event = events.recv() => {
                match event {
                    Ok(event) => print_info(&format!("{} {}", MANIFEST_FILE, describe(event))),
                    Err(RecvError::Lagged(_)) => print_info(&format!("{} changed", MANIFEST_FILE)),
                    Err(RecvError::Closed) => break,
                }
                // Coalesce the burst of events a single save produces.
                while let Ok(Ok(_)) = tokio::time::timeout(debounce, events.recv()).await {}
                show_tasks(&session, &channel, &mut cursor).await?;
            }
        }
    }

    session.stop().await?;
    print_section_header("Session stopped", SectionStyle::Secondary);
    Ok(())
}

/// How much of the output channel has already been shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ChannelCursor {
    lines: usize,
    reveals: usize,
}

impl ChannelCursor {
    /// Returns the lines appended since the last call and whether the
    /// channel was revealed in between.
    fn advance(&mut self, channel: &OutputChannel) -> (Vec<String>, bool) {
        let lines = channel.lines();
        let reveals = channel.reveal_count();

        let fresh = lines[self.lines.min(lines.len())..].to_vec();
        let failed = reveals > self.reveals;

        self.lines = lines.len();
        self.reveals = reveals;
        (fresh, failed)
    }
}

async fn show_tasks(
    session: &DiscoverySession,
    channel: &OutputChannel,
    cursor: &mut ChannelCursor,
) -> Result<()> {
    let tasks = session.provide_tasks().await;

    let (lines, failed) = cursor.advance(channel);
    print_diagnostics(&lines, failed);

    if tasks.is_empty() {
        print_warning("No tasks detected");
    } else {
        print_tasks(&tasks, false)?;
        print_success(&format!("{} tasks available", tasks.len()));
    }
    println!();

    Ok(())
}

async fn drain_server_output(stdout: ChildStdout) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(target: "spmtask::server", "{}", line);
    }
    debug!("language server output closed");
}

fn describe(event: ManifestEvent) -> &'static str {
    match event {
        ManifestEvent::Changed => "changed",
        ManifestEvent::Created => "created",
        ManifestEvent::Deleted => "deleted",
    }
}

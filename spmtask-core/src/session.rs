//! Discovery session lifecycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::discovery::DiscoveryEngine;
use crate::error::{Error, Result};
use crate::process::{ProcessRunner, ShellRunner};
use crate::server::LanguageServer;
use crate::task::{TaskDefinition, TaskRequest};
use crate::task_cache::{CacheStats, TaskCache};
use crate::watcher::{ManifestEvent, ManifestWatcher};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Stopped,
}

/// Owns everything task discovery needs for one project root.
///
/// `start()` begins watching the manifest (and launches the language server
/// when configured); `stop()` tears both down. A stopped session cannot be
/// started again.
pub struct DiscoverySession {
    root: PathBuf,
    config: Config,
    engine: DiscoveryEngine,
    cache: Arc<TaskCache>,
    events: broadcast::Sender<ManifestEvent>,
    watcher: Option<ManifestWatcher>,
    invalidator: Option<JoinHandle<()>>,
    server: Option<LanguageServer>,
    state: State,
}

impl DiscoverySession {
    /// Creates a session that runs the describe command through `sh`.
    pub fn new(root: impl AsRef<Path>, config: Config, sink: Arc<dyn DiagnosticSink>) -> Self {
        let runner = ShellRunner::new().with_timeout(config.describe_timeout());
        Self::with_runner(root, config, Arc::new(runner), sink)
    }

    pub fn with_runner(
        root: impl AsRef<Path>,
        config: Config,
        runner: Arc<dyn ProcessRunner>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let root = root.as_ref().to_path_buf();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            cache: Arc::new(TaskCache::new(&root)),
            engine: DiscoveryEngine::new(runner, sink),
            root,
            config,
            events,
            watcher: None,
            invalidator: None,
            server: None,
            state: State::Idle,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Starts watching the manifest. Must be called inside a Tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            State::Running => return Ok(()),
            State::Stopped => return Err(Error::SessionStopped),
            State::Idle => {}
        }

        let (watcher, mut rx) = ManifestWatcher::spawn(&self.root)?;
        let cache = Arc::clone(&self.cache);
        let events = self.events.clone();
        let invalidator = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                apply_event(&cache, &events, event);
            }
            debug!("manifest event stream closed");
        });

        if self.config.server.enabled {
            match LanguageServer::spawn(&self.config.server) {
                Ok(server) => self.server = Some(server),
                Err(e) => {
                    invalidator.abort();
                    return Err(e);
                }
            }
        }

        info!(manifest = %watcher.manifest_path().display(), "discovery session started");
        self.watcher = Some(watcher);
        self.invalidator = Some(invalidator);
        self.state = State::Running;
        Ok(())
    }

    /// Stops watching and shuts the language server down.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state == State::Stopped {
            return Ok(());
        }
        self.state = State::Stopped;

        self.watcher = None;
        if let Some(invalidator) = self.invalidator.take() {
            invalidator.abort();
        }
        if let Some(server) = self.server.take() {
            server.stop().await?;
        }

        info!(root = %self.root.display(), "discovery session stopped");
        Ok(())
    }

    /// Returns the tasks for the project root, discovering them on a cache miss.
    pub async fn provide_tasks(&self) -> Vec<TaskDefinition> {
        let engine = &self.engine;
        self.cache
            .get_or_compute(|root| async move { engine.try_discover(&root).await })
            .await
    }

    pub fn resolve_task(&self, request: &TaskRequest) -> Option<TaskDefinition> {
        TaskDefinition::resolve(request)
    }

    /// Feeds a manifest event in as if the watcher had reported it.
    pub fn notify(&self, event: ManifestEvent) {
        apply_event(&self.cache, &self.events, event);
    }

    /// Receives every manifest event seen after this call. Drop to unsubscribe.
    pub fn subscribe(&self) -> broadcast::Receiver<ManifestEvent> {
        self.events.subscribe()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn has_language_server(&self) -> bool {
        self.server.is_some()
    }

    pub fn language_server_mut(&mut self) -> Option<&mut LanguageServer> {
        self.server.as_mut()
    }
}

impl Drop for DiscoverySession {
    fn drop(&mut self) {
        if let Some(invalidator) = self.invalidator.take() {
            invalidator.abort();
        }
    }
}

fn apply_event(cache: &TaskCache, events: &broadcast::Sender<ManifestEvent>, event: ManifestEvent) {
    cache.invalidate();
    // No subscribers is fine.
    let _ = events.send(event);
}

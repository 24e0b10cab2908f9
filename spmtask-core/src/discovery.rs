//! Derives build, run and test tasks from `swift package describe`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::package::{self, PackageDescription, ParseError, MANIFEST_FILE};
use crate::process::{ProcessError, ProcessRunner};
use crate::task::TaskDefinition;

/// Command that prints the package description as JSON.
pub const DESCRIBE_COMMAND: &str = "swift package describe --type json";

/// Last line written to the diagnostic channel when discovery fails.
pub const FAILURE_NOTE: &str = "Auto detecting Swift Package Tasks failed.";

/// Runs the describe command and turns its output into tasks.
///
/// Failures are written to the diagnostic sink; callers of
/// [`DiscoveryEngine::discover`] only ever see a (possibly empty) list.
#[derive(Clone)]
pub struct DiscoveryEngine {
    runner: Arc<dyn ProcessRunner>,
    sink: Arc<dyn DiagnosticSink>,
}

impl DiscoveryEngine {
    pub fn new(runner: Arc<dyn ProcessRunner>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { runner, sink }
    }

    /// Discovers tasks for `root`, yielding an empty list on any failure.
    pub async fn discover(&self, root: &Path) -> Vec<TaskDefinition> {
        self.try_discover(root).await.unwrap_or_default()
    }

    /// Like [`DiscoveryEngine::discover`] but keeps the failure, which has
    /// already been reported to the sink by the time it is returned.
    ///
    /// A missing manifest is not a failure.
    pub async fn try_discover(&self, root: &Path) -> Result<Vec<TaskDefinition>> {
        let manifest = root.join(MANIFEST_FILE);
        if !tokio::fs::try_exists(&manifest).await.unwrap_or(false) {
            debug!(root = %root.display(), "no manifest, skipping discovery");
            return Ok(Vec::new());
        }

        let output = match self.runner.run(DESCRIBE_COMMAND, root).await {
            Ok(output) => output,
            Err(e) => {
                self.report_process_failure(&e);
                return Err(e.into());
            }
        };

        if !output.stderr.is_empty() {
            self.sink.append_line(output.stderr.trim_end());
        }

        if output.stdout.is_empty() {
            debug!(root = %root.display(), "describe produced no output");
            return Ok(Vec::new());
        }

        let description = match package::parse(&output.stdout) {
            Ok(description) => description,
            Err(e) => {
                self.report_parse_failure(&e);
                return Err(e.into());
            }
        };

        let tasks = derive_tasks(&description);
        info!(
            root = %root.display(),
            targets = description.targets.len(),
            tasks = tasks.len(),
            "discovered tasks"
        );
        Ok(tasks)
    }

    fn report_process_failure(&self, error: &ProcessError) {
        warn!("describe failed: {}", error);
        match error {
            ProcessError::Exited { stdout, stderr, .. } => {
                if !stderr.is_empty() {
                    self.sink.append_line(stderr.trim_end());
                }
                if !stdout.is_empty() {
                    self.sink.append_line(stdout.trim_end());
                }
            }
            other => self.sink.append_line(&other.to_string()),
        }
        self.sink.append_line(FAILURE_NOTE);
        self.sink.reveal();
    }

    fn report_parse_failure(&self, error: &ParseError) {
        warn!("describe output rejected: {}", error);
        self.sink
            .append_line(&format!("Invalid package description: {}", error));
        self.sink.append_line(FAILURE_NOTE);
        self.sink.reveal();
    }
}

/// Folds a package description into the ordered task list.
///
/// One build task, then a run task per executable target in declaration
/// order, then a single test task if any test target exists.
pub fn derive_tasks(description: &PackageDescription) -> Vec<TaskDefinition> {
    let mut tasks = Vec::with_capacity(description.targets.len() + 2);
    tasks.push(TaskDefinition::build(Vec::new()));

    tasks.extend(
        description
            .executables()
            .map(|target| TaskDefinition::run(target.name.as_str())),
    );

    if description.has_tests() {
        tasks.push(TaskDefinition::Test);
    }

    tasks
}

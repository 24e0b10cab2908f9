#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use spmtask_core::process::{ProcessError, ProcessOutput, ProcessRunner};
use tempfile::TempDir;

/// Canned outcome of one process invocation.
#[derive(Debug, Clone)]
pub enum Script {
    Success { stdout: String, stderr: String },
    Exit { code: i32, stdout: String, stderr: String },
    SpawnFailure,
    Timeout,
}

impl Script {
    pub fn stdout(stdout: &str) -> Self {
        Script::Success {
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

/// Process runner that replays a script and counts invocations.
pub struct ScriptedRunner {
    script: Mutex<Script>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    invocations: Mutex<Vec<(String, PathBuf)>>,
}

impl ScriptedRunner {
    pub fn new(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            delay: None,
            calls: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_script(&self, script: Script) {
        *self.script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<(String, PathBuf)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &str, cwd: &Path) -> Result<ProcessOutput, ProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.invocations
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.to_path_buf()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let script = self.script.lock().unwrap().clone();
        match script {
            Script::Success { stdout, stderr } => Ok(ProcessOutput { stdout, stderr }),
            Script::Exit {
                code,
                stdout,
                stderr,
            } => Err(ProcessError::Exited {
                command: command.to_string(),
                code: Some(code),
                stdout,
                stderr,
            }),
            Script::SpawnFailure => Err(ProcessError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "swift: not found"),
            }),
            Script::Timeout => Err(ProcessError::TimedOut {
                command: command.to_string(),
                after: Duration::from_millis(10),
            }),
        }
    }
}

/// Creates a project root, optionally containing a manifest.
pub fn create_project(with_manifest: bool) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    if with_manifest {
        fs::write(
            temp_dir.path().join("Package.swift"),
            "// swift-tools-version:5.9\nimport PackageDescription\n",
        )
        .unwrap();
    }
    temp_dir
}

/// Builds describe output JSON from `(name, type)` pairs.
pub fn describe_json(targets: &[(&str, &str)]) -> String {
    let targets: Vec<serde_json::Value> = targets
        .iter()
        .map(|(name, kind)| {
            serde_json::json!({
                "name": name,
                "type": kind,
                "c99name": name,
                "path": format!("Sources/{}", name),
                "sources": ["main.swift"],
            })
        })
        .collect();

    serde_json::json!({
        "name": "Example",
        "path": "/tmp/Example",
        "targets": targets,
    })
    .to_string()
}

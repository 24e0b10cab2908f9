//! Core library for Swift package task auto-detection.

pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod package;
pub mod process;
pub mod server;
pub mod session;
pub mod task;
pub mod task_cache;
pub mod watcher;

pub use config::{Config, DiscoveryConfig, ServerConfig};
pub use diagnostics::{DiagnosticSink, OutputChannel, TracingSink};
pub use discovery::{derive_tasks, DiscoveryEngine, DESCRIBE_COMMAND, FAILURE_NOTE};
pub use error::{Error, Result};
pub use package::{PackageDescription, ParseError, TargetDescriptor, TargetType, MANIFEST_FILE};
pub use process::{ProcessError, ProcessOutput, ProcessRunner, ShellRunner};
pub use server::LanguageServer;
pub use session::DiscoverySession;
pub use task::{HostTask, TaskDefinition, TaskGroup, TaskKind, TaskRequest, TASK_TYPE};
pub use task_cache::{CacheStats, TaskCache};
pub use watcher::{ManifestEvent, ManifestWatcher};

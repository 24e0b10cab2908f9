//! Task definitions handed to the task-execution host.

use serde::{Deserialize, Serialize};

/// Task type identifier registered with the host.
pub const TASK_TYPE: &str = "swift-package";

const SWIFT: &str = "swift";

/// Kind of a derived task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Build,
    Run,
    Test,
}

impl TaskKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Build => "build",
            TaskKind::Run => "run",
            TaskKind::Test => "test",
        }
    }
}

/// Host task group a definition is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskGroup {
    Build,
    Test,
}

/// A build, run or test action derived from the package description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskDefinition {
    Build { args: Vec<String> },
    Run { target: String },
    Test,
}

impl TaskDefinition {
    pub fn build(args: Vec<String>) -> Self {
        TaskDefinition::Build { args }
    }

    pub fn run(target: impl Into<String>) -> Self {
        TaskDefinition::Run {
            target: target.into(),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            TaskDefinition::Build { .. } => TaskKind::Build,
            TaskDefinition::Run { .. } => TaskKind::Run,
            TaskDefinition::Test => TaskKind::Test,
        }
    }

    /// Display name shown by the host, e.g. `run Foo`.
    pub fn label(&self) -> String {
        match self {
            TaskDefinition::Run { target } => format!("run {}", target),
            other => other.kind().as_str().to_string(),
        }
    }

    pub fn target_name(&self) -> Option<&str> {
        match self {
            TaskDefinition::Run { target } => Some(target),
            _ => None,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            TaskDefinition::Build { args } => args,
            _ => &[],
        }
    }

    /// The exact command line the host executes. Build args are quoted for
    /// a POSIX shell so each one reaches `swift` as a single argument.
    ///
    /// Run tasks invoke `swift run` without naming the target.
    pub fn shell_command(&self) -> String {
        let mut command = format!("{} {}", SWIFT, self.kind().as_str());
        for arg in self.args() {
            command.push(' ');
            command.push_str(&shell_words::quote(arg));
        }
        command
    }

    pub fn group(&self) -> Option<TaskGroup> {
        match self {
            TaskDefinition::Build { .. } => Some(TaskGroup::Build),
            TaskDefinition::Test => Some(TaskGroup::Test),
            TaskDefinition::Run { .. } => None,
        }
    }

    pub fn is_background(&self) -> bool {
        false
    }

    pub fn to_host(&self) -> HostTask {
        HostTask {
            task_type: TASK_TYPE,
            task: self.kind(),
            label: self.label(),
            target: self.target_name().map(str::to_string),
            args: self.args().to_vec(),
            command: self.shell_command(),
            group: self.group(),
            is_background: self.is_background(),
        }
    }

    /// Turns a host-supplied definition back into a task.
    ///
    /// `run` needs a target; unknown or missing task names resolve to `None`.
    pub fn resolve(request: &TaskRequest) -> Option<Self> {
        match request.task.as_deref()? {
            "build" => Some(TaskDefinition::build(request.args.clone())),
            "test" => Some(TaskDefinition::Test),
            "run" => request
                .target
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(TaskDefinition::run),
            _ => None,
        }
    }
}

/// Serializable view of a task as the host consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostTask {
    #[serde(rename = "type")]
    pub task_type: &'static str,
    pub task: TaskKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub args: Vec<String>,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<TaskGroup>,
    pub is_background: bool,
}

/// Task definition as stored by the host, e.g. in a tasks file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub target: Option<String>,
}

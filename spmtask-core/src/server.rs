//! Process handle for the language server started alongside discovery.

use std::process::Stdio;

use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Environment variable the server reads its toolchain location from.
pub const TOOLCHAIN_ENV: &str = "SOURCEKIT_TOOLCHAIN_PATH";

/// A running language server. Talking to it is up to the caller, which
/// takes the piped stdio with [`LanguageServer::take_stdio`] and must keep
/// reading stdout for as long as the server runs.
pub struct LanguageServer {
    child: Child,
    path: String,
}

impl LanguageServer {
    pub fn spawn(config: &ServerConfig) -> Result<Self> {
        let child = command(config)
            .spawn()
            .map_err(|e| Error::Server(format!("Failed to start {}: {}", config.path, e)))?;

        info!(path = %config.path, pid = ?child.id(), "language server started");
        Ok(Self {
            child,
            path: config.path.clone(),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Hands out the server's stdin and stdout. Returns `None` once taken.
    pub fn take_stdio(&mut self) -> Option<(ChildStdin, ChildStdout)> {
        let stdin = self.child.stdin.take()?;
        let stdout = self.child.stdout.take()?;
        Some((stdin, stdout))
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kills the server if it is still running and waits for it to exit.
    pub async fn stop(mut self) -> Result<()> {
        if self.is_running() {
            self.child
                .start_kill()
                .map_err(|e| Error::Server(format!("Failed to stop {}: {}", self.path, e)))?;
        }
        let status = self.child.wait().await?;
        debug!(path = %self.path, ?status, "language server exited");
        Ok(())
    }
}

fn command(config: &ServerConfig) -> Command {
    let mut command = Command::new(&config.path);
    command
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    if let Some(toolchain) = config.toolchain_path.as_deref().filter(|t| !t.is_empty()) {
        command.env(TOOLCHAIN_ENV, toolchain);
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn toolchain_env(command: &Command) -> Option<Option<&OsStr>> {
        command
            .as_std()
            .get_envs()
            .find(|(key, _)| *key == OsStr::new(TOOLCHAIN_ENV))
            .map(|(_, value)| value)
    }

    #[test]
    fn test_toolchain_path_is_exported() {
        let config = ServerConfig {
            toolchain_path: Some("/opt/swift/usr".to_string()),
            ..ServerConfig::default()
        };

        let command = command(&config);
        assert_eq!(
            toolchain_env(&command),
            Some(Some(OsStr::new("/opt/swift/usr")))
        );
        assert_eq!(command.as_std().get_program(), OsStr::new("sourcekit-lsp"));
    }

    #[test]
    fn test_empty_toolchain_path_is_not_exported() {
        let config = ServerConfig {
            toolchain_path: Some(String::new()),
            ..ServerConfig::default()
        };

        assert!(toolchain_env(&command(&config)).is_none());
    }

    #[tokio::test]
    async fn test_spawn_missing_binary_fails() {
        let config = ServerConfig {
            enabled: true,
            path: "/nonexistent/sourcekit-lsp".to_string(),
            ..ServerConfig::default()
        };

        let result = LanguageServer::spawn(&config);
        assert!(matches!(result, Err(Error::Server(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_kills_running_server() {
        let config = ServerConfig {
            enabled: true,
            path: "cat".to_string(),
            ..ServerConfig::default()
        };

        let mut server = LanguageServer::spawn(&config).unwrap();
        assert!(server.is_running());
        assert!(server.id().is_some());
        server.stop().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdio_reaches_the_server() {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        let config = ServerConfig {
            enabled: true,
            path: "cat".to_string(),
            ..ServerConfig::default()
        };

        let mut server = LanguageServer::spawn(&config).unwrap();
        let (mut stdin, stdout) = server.take_stdio().unwrap();
        assert!(server.take_stdio().is_none());

        stdin.write_all(b"Content-Length: 2\n").await.unwrap();
        stdin.flush().await.unwrap();

        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line).await.unwrap();
        assert_eq!(line, "Content-Length: 2\n");

        drop(stdin);
        server.stop().await.unwrap();
    }
}

//! Container runtime commands.
//!
//! Commands are built as structured values and executed through
//! [`CommandRunner`], so the health loop can run against a scripted runner
//! instead of a live Docker daemon.

use crate::error::ManagerError;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// A program plus its arguments. Executed directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// `docker info`; exits non-zero when the daemon is down.
    pub fn docker_info() -> Self {
        Self::new("docker").arg("info")
    }

    /// `<compose> -f FILE up --build -d`.
    ///
    /// `compose` is the compose invocation split into words, e.g.
    /// `["docker-compose"]` or `["docker", "compose"]`.
    pub fn compose_up(compose: &[String], compose_file: &Path) -> Self {
        let (program, leading) = match compose.split_first() {
            Some((program, leading)) => (program.as_str(), leading),
            None => ("docker-compose", &[][..]),
        };

        Self::new(program)
            .args(leading.iter().cloned())
            .arg("-f")
            .arg(compose_file.display().to_string())
            .args(["up", "--build", "-d"])
    }

    /// Names of containers whose status is `exited`, one per line.
    pub fn list_exited_containers() -> Self {
        Self::new("docker").args(["ps", "--filter", "status=exited", "--format", "{{.Names}}"])
    }

    pub fn restart_container(name: &str) -> Self {
        Self::new("docker").args(["restart", name])
    }

    pub fn system_prune() -> Self {
        Self::new("docker").args(["system", "prune", "-f"])
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout on success, `ManagerError::Command` otherwise.
    pub fn into_result(self, command: &ShellCommand) -> Result<String, ManagerError> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ManagerError::Command {
                command: command.to_string(),
                exit_code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion. Never fails: a command that cannot be
    /// started is reported as exit code 1 with the error in `stderr`.
    async fn run(&self, command: &ShellCommand) -> CommandOutput;
}

/// Runs commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &ShellCommand) -> CommandOutput {
        tracing::debug!(command = %command, "Running command");

        match tokio::process::Command::new(&command.program)
            .args(&command.args)
            .output()
            .await
        {
            Ok(output) => CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                // None means the process was killed by a signal
                exit_code: output.status.code().unwrap_or(-1),
            },
            Err(e) => {
                tracing::error!(command = %command, error = %e, "Error running command");
                CommandOutput::failed(1, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_up_supports_plugin_form() {
        let compose = vec!["docker".to_string(), "compose".to_string()];
        let command = ShellCommand::compose_up(&compose, Path::new("docker-compose.yml"));
        assert_eq!(
            command.to_string(),
            "docker compose -f docker-compose.yml up --build -d"
        );
    }

    #[test]
    fn compose_up_defaults_to_standalone_binary() {
        let command = ShellCommand::compose_up(&[], Path::new("stack.yml"));
        assert_eq!(command.program(), "docker-compose");
        assert_eq!(command.get_args()[..2], ["-f".to_string(), "stack.yml".to_string()]);
    }

    #[test]
    fn exited_listing_passes_format_verbatim() {
        let command = ShellCommand::list_exited_containers();
        assert_eq!(
            command.get_args(),
            ["ps", "--filter", "status=exited", "--format", "{{.Names}}"]
        );
    }

    #[test]
    fn failed_output_carries_command_and_stderr() {
        let command = ShellCommand::restart_container("web");
        let err = CommandOutput::failed(125, "No such container: web\n")
            .into_result(&command)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "command `docker restart web` exited with code 125: No such container: web"
        );
    }

    #[tokio::test]
    async fn missing_program_is_reported_as_failure() {
        let output = SystemCommandRunner
            .run(&ShellCommand::new("definitely-not-a-real-binary-4a1f"))
            .await;
        assert_eq!(output.exit_code, 1);
        assert!(!output.stderr.is_empty());
        assert!(!output.success());
    }
}

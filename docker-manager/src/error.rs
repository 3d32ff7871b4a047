use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    /// Docker unreachable or compose file missing. Aborts the run.
    #[error("preflight failed: {0}")]
    Preflight(String),

    #[error("command `{command}` exited with code {exit_code}: {stderr}")]
    Command {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("failed to build probe client: {0}")]
    Probe(#[from] reqwest::Error),

    #[error("failed to open log file '{}': {source}", .path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

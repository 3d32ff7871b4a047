use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "docker-manager")]
#[command(
    about = "Bring up the shopping-list stack, probe its endpoints and restart exited containers"
)]
#[command(version)]
pub struct Cli {
    /// Compose file to bring up
    #[arg(long, env = "DOCKER_COMPOSE_FILE", default_value = "docker-compose.yml")]
    pub compose_file: PathBuf,

    /// Compose invocation, e.g. "docker-compose" or "docker compose"
    #[arg(long, env = "COMPOSE_COMMAND", default_value = "docker-compose")]
    pub compose_command: String,

    /// Base URL of the shopping-list service
    #[arg(long, env = "SERVICE_BASE_URL", default_value = "http://127.0.0.1:5002")]
    pub base_url: String,

    /// Seconds to wait after bring-up before probing
    #[arg(long, env = "SETTLE_SECS", default_value_t = 10)]
    pub settle_secs: u64,

    /// Per-probe HTTP timeout in seconds
    #[arg(long, env = "PROBE_TIMEOUT_SECS", default_value_t = 10)]
    pub probe_timeout_secs: u64,

    /// File the run log is appended to
    #[arg(long, env = "DOCKER_MANAGER_LOG", default_value = "docker_manager.log")]
    pub log_file: PathBuf,

    /// Log to stdout only
    #[arg(long)]
    pub no_log_file: bool,

    /// Only restart exited containers whose name contains this text
    #[arg(long, env = "CONTAINER_FILTER")]
    pub container_filter: Option<String>,

    /// Skip `docker system prune`
    #[arg(long)]
    pub skip_cleanup: bool,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub compose_file: PathBuf,
    pub compose_command: Vec<String>,
    pub base_url: String,
    pub settle_delay: Duration,
    pub probe_timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub container_filter: Option<String>,
    pub skip_cleanup: bool,
    pub log_level: String,
}

impl From<Cli> for ManagerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            compose_file: cli.compose_file,
            compose_command: cli
                .compose_command
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            base_url: cli.base_url,
            settle_delay: Duration::from_secs(cli.settle_secs),
            probe_timeout: Duration::from_secs(cli.probe_timeout_secs),
            log_file: (!cli.no_log_file).then_some(cli.log_file),
            container_filter: cli.container_filter.filter(|f| !f.trim().is_empty()),
            skip_cleanup: cli.skip_cleanup,
            log_level: cli.log_level,
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            compose_file: PathBuf::from("docker-compose.yml"),
            compose_command: vec!["docker-compose".to_string()],
            base_url: "http://127.0.0.1:5002".to_string(),
            settle_delay: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(10),
            log_file: Some(PathBuf::from("docker_manager.log")),
            container_filter: None,
            skip_cleanup: false,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_local_stack() {
        let config = ManagerConfig::from(Cli::parse_from(["docker-manager"]));
        assert_eq!(config.base_url, "http://127.0.0.1:5002");
        assert_eq!(config.settle_delay, Duration::from_secs(10));
        assert_eq!(config.compose_command, ["docker-compose"]);
        assert_eq!(config.log_file, Some(PathBuf::from("docker_manager.log")));
        assert!(!config.skip_cleanup);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "docker-manager",
            "--compose-command",
            "docker compose",
            "--settle-secs",
            "0",
            "--container-filter",
            "shopping",
            "--no-log-file",
            "--skip-cleanup",
        ]);
        let config = ManagerConfig::from(cli);
        assert_eq!(config.compose_command, ["docker", "compose"]);
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.container_filter.as_deref(), Some("shopping"));
        assert!(config.log_file.is_none());
        assert!(config.skip_cleanup);
    }
}

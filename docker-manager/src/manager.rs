//! The operational health loop.
//!
//! One run walks `Preflight → BringUp → Settle → ProbeAll → RestartFailing →
//! Cleanup → Done`, each stage exactly once. Only preflight can abort the
//! run; every later failure is logged, recorded in the [`RunReport`] and the
//! loop moves on.

use crate::command::{CommandRunner, ShellCommand};
use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::probe::{HttpProber, ProbeOutcome, ServiceProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preflight,
    BringUp,
    Settle,
    ProbeAll,
    RestartFailing,
    Cleanup,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StepResult {
    Succeeded,
    Failed(String),
    #[default]
    Skipped,
}

impl StepResult {
    fn from_command(result: Result<String, ManagerError>) -> Self {
        match result {
            Ok(_) => StepResult::Succeeded,
            Err(e) => StepResult::Failed(e.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepResult::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartResult {
    pub container: String,
    pub result: StepResult,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Stages entered, in order.
    pub stages: Vec<Stage>,
    pub bring_up: StepResult,
    pub probes: Vec<ProbeOutcome>,
    /// Result of listing exited containers.
    pub exited_lookup: StepResult,
    pub restarts: Vec<RestartResult>,
    pub cleanup: StepResult,
}

impl RunReport {
    pub fn healthy_probes(&self) -> usize {
        self.probes.iter().filter(|p| p.status.is_healthy()).count()
    }

    pub fn failed_restarts(&self) -> usize {
        self.restarts.iter().filter(|r| r.result.is_failure()).count()
    }
}

pub struct DockerManager<R> {
    runner: R,
    prober: HttpProber,
    probes: Vec<ServiceProbe>,
    config: ManagerConfig,
}

impl<R: CommandRunner> DockerManager<R> {
    pub fn new(
        runner: R,
        prober: HttpProber,
        probes: Vec<ServiceProbe>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            runner,
            prober,
            probes,
            config,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn run(&self) -> Result<RunReport, ManagerError> {
        tracing::info!("Docker manager starting");
        let mut report = RunReport::default();

        enter(&mut report, Stage::Preflight);
        self.preflight().await?;

        enter(&mut report, Stage::BringUp);
        report.bring_up = self.bring_up().await;

        enter(&mut report, Stage::Settle);
        self.settle().await;

        enter(&mut report, Stage::ProbeAll);
        report.probes = self.probe_all().await;

        enter(&mut report, Stage::RestartFailing);
        let (lookup, restarts) = self.restart_failing().await;
        report.exited_lookup = lookup;
        report.restarts = restarts;

        enter(&mut report, Stage::Cleanup);
        report.cleanup = if self.config.skip_cleanup {
            tracing::info!("Skipping Docker cleanup");
            StepResult::Skipped
        } else {
            self.clean_up().await
        };

        enter(&mut report, Stage::Done);
        tracing::info!(
            healthy_probes = report.healthy_probes(),
            total_probes = report.probes.len(),
            restarted = report.restarts.len() - report.failed_restarts(),
            failed_restarts = report.failed_restarts(),
            "All tasks completed"
        );

        Ok(report)
    }

    async fn preflight(&self) -> Result<(), ManagerError> {
        let output = self.runner.run(&ShellCommand::docker_info()).await;
        if !output.success() {
            tracing::error!(
                stderr = %output.stderr.trim(),
                "Docker is not running. Please start Docker and try again."
            );
            return Err(ManagerError::Preflight(
                "Docker is not running".to_string(),
            ));
        }

        let compose_file = &self.config.compose_file;
        if !tokio::fs::try_exists(compose_file).await.unwrap_or(false) {
            tracing::error!(
                compose_file = %compose_file.display(),
                "Docker Compose file not found"
            );
            return Err(ManagerError::Preflight(format!(
                "Docker Compose file '{}' not found",
                compose_file.display()
            )));
        }

        Ok(())
    }

    async fn bring_up(&self) -> StepResult {
        tracing::info!("Starting Docker Compose");
        let command =
            ShellCommand::compose_up(&self.config.compose_command, &self.config.compose_file);
        let result = self.runner.run(&command).await.into_result(&command);

        match &result {
            Ok(_) => tracing::info!("Docker Compose started successfully"),
            Err(e) => tracing::error!(error = %e, "Failed to start Docker Compose"),
        }
        StepResult::from_command(result)
    }

    async fn settle(&self) {
        let delay = self.config.settle_delay;
        if delay.is_zero() {
            return;
        }
        tracing::info!(seconds = delay.as_secs_f64(), "Waiting for containers to initialize");
        tokio::time::sleep(delay).await;
    }

    async fn probe_all(&self) -> Vec<ProbeOutcome> {
        tracing::info!(count = self.probes.len(), "Checking all services");

        let mut outcomes = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let outcome = self.prober.probe(probe).await;
            outcome.log();
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn restart_failing(&self) -> (StepResult, Vec<RestartResult>) {
        tracing::info!("Restarting failing containers");

        let command = ShellCommand::list_exited_containers();
        let listing = match self.runner.run(&command).await.into_result(&command) {
            Ok(stdout) => stdout,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list exited containers");
                return (StepResult::Failed(e.to_string()), Vec::new());
            }
        };

        let containers: Vec<&str> = listing
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter(|name| match &self.config.container_filter {
                Some(filter) => name.contains(filter.as_str()),
                None => true,
            })
            .collect();

        if containers.is_empty() {
            tracing::info!("No failing containers found");
            return (StepResult::Succeeded, Vec::new());
        }

        let mut restarts = Vec::with_capacity(containers.len());
        for container in containers {
            tracing::info!(container = %container, "Restarting container");
            let command = ShellCommand::restart_container(container);
            let result = self.runner.run(&command).await.into_result(&command);

            match &result {
                Ok(_) => tracing::info!(container = %container, "Successfully restarted container"),
                Err(e) => tracing::error!(
                    container = %container,
                    error = %e,
                    "Failed to restart container"
                ),
            }
            restarts.push(RestartResult {
                container: container.to_string(),
                result: StepResult::from_command(result),
            });
        }

        (StepResult::Succeeded, restarts)
    }

    async fn clean_up(&self) -> StepResult {
        tracing::info!("Cleaning up unused Docker resources");
        let command = ShellCommand::system_prune();
        let result = self.runner.run(&command).await.into_result(&command);

        match &result {
            Ok(_) => tracing::info!("Docker cleanup complete"),
            Err(e) => tracing::error!(error = %e, "Docker cleanup failed"),
        }
        StepResult::from_command(result)
    }
}

fn enter(report: &mut RunReport, stage: Stage) {
    tracing::debug!(stage = ?stage, "Entering stage");
    report.stages.push(stage);
}

use async_trait::async_trait;
use docker_manager::{
    CommandOutput, CommandRunner, DockerManager, HttpProber, ManagerConfig, ServiceProbe,
    ShellCommand,
};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Fake container runtime. Answers commands by prefix and records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Vec<(String, CommandOutput)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` answer `output`. Unscripted commands
    /// succeed with empty output.
    pub fn on(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.push((prefix.to_string(), output));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|call| call.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &ShellCommand) -> CommandOutput {
        let rendered = command.to_string();
        self.calls.lock().unwrap().push(rendered.clone());

        self.responses
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default()
    }
}

pub struct TestManager {
    pub manager: DockerManager<ScriptedRunner>,
    // keeps the compose file alive for the run
    _compose_file: NamedTempFile,
}

impl TestManager {
    pub fn new(runner: ScriptedRunner, probes: Vec<ServiceProbe>) -> Self {
        Self::with_config(runner, probes, |_| {})
    }

    pub fn with_config(
        runner: ScriptedRunner,
        probes: Vec<ServiceProbe>,
        configure: impl FnOnce(&mut ManagerConfig),
    ) -> Self {
        let compose_file = NamedTempFile::new().expect("Failed to create compose file");

        let mut config = ManagerConfig {
            compose_file: compose_file.path().to_path_buf(),
            settle_delay: Duration::ZERO,
            probe_timeout: Duration::from_secs(2),
            log_file: None,
            ..ManagerConfig::default()
        };
        configure(&mut config);

        let prober = HttpProber::new(config.probe_timeout).expect("Failed to build prober");

        Self {
            manager: DockerManager::new(runner, prober, probes, config),
            _compose_file: compose_file,
        }
    }

    pub fn runner(&self) -> &ScriptedRunner {
        self.manager.runner()
    }
}

use clap::Parser;
use docker_manager::{
    default_probes, logging::init_logging, Cli, DockerManager, HttpProber, ManagerConfig,
    SystemCommandRunner,
};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = ManagerConfig::from(Cli::parse());

    if let Err(e) = init_logging(&config.log_level, config.log_file.as_deref()) {
        eprintln!("docker-manager: {}", e);
        return ExitCode::FAILURE;
    }

    let prober = match HttpProber::new(config.probe_timeout) {
        Ok(prober) => prober,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize probes");
            return ExitCode::FAILURE;
        }
    };

    let probes = default_probes(&config.base_url);
    let manager = DockerManager::new(SystemCommandRunner, prober, probes, config);

    match manager.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Docker manager aborted");
            ExitCode::FAILURE
        }
    }
}

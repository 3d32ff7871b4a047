pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod probe;

pub use command::{CommandOutput, CommandRunner, ShellCommand, SystemCommandRunner};
pub use config::{Cli, ManagerConfig};
pub use error::ManagerError;
pub use manager::{DockerManager, RunReport, Stage, StepResult};
pub use probe::{default_probes, HttpProber, ProbeOutcome, ProbeStatus, ServiceProbe};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::error::SupervisorError;
use crate::logs::LogTail;
use crate::types::*;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_LOG_NAME: &str = "maya";

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
	pub log_dir: PathBuf,
	pub log_name: String,
	pub poll_interval: Duration,
	pub restart: RestartPolicy,
}

impl SupervisorConfig {
	pub fn new(log_dir: impl Into<PathBuf>) -> Self {
		Self {
			log_dir: log_dir.into(),
			log_name: DEFAULT_LOG_NAME.to_string(),
			poll_interval: DEFAULT_POLL_INTERVAL,
			restart: RestartPolicy::default(),
		}
	}
}

pub struct Supervisor {
	pub config: SupervisorConfig,
}

impl Supervisor {
	pub fn new(config: SupervisorConfig) -> Self {
		Self { config }
	}

	/// Runs the child until it exits cleanly, echoing its log to stdout.
	pub async fn run(&self, spec: &LaunchSpec) -> Result<RunReport, SupervisorError> {
		let mut out = std::io::stdout();
		self.run_with(spec, &mut out).await
	}

	/// Like [`Supervisor::run`] but writes tailed log lines to `out`.
	pub async fn run_with<W: Write>(
		&self,
		spec: &LaunchSpec,
		out: &mut W,
	) -> Result<RunReport, SupervisorError> {
		let mut tail = LogTail::create(&self.config.log_dir, &self.config.log_name)?;
		tracing::info!(
			"[{}] {} (log {})",
			SupervisorState::Starting,
			spec.executable.display(),
			tail.path().display()
		);

		let mut spawns: u32 = 0;
		let mut crashes: u32 = 0;
		let mut child = match spawn_child(spec, tail.path()) {
			Ok(child) => child,
			Err(e) => {
				let _ = tail.remove();
				return Err(e);
			}
		};
		spawns += 1;
		log_running(&child);

		loop {
			tokio::time::sleep(self.config.poll_interval).await;

			let status = match child.try_wait() {
				Ok(None) => {
					echo(out, tail.poll());
					continue;
				}
				Ok(Some(status)) => status,
				Err(e) => {
					tracing::warn!("cannot query child status: {}", e);
					continue;
				}
			};

			if status.success() {
				echo(out, tail.drain());
				tracing::info!("[{}] after {} launch(es)", SupervisorState::ExitedClean, spawns);
				let log_path = tail.path().to_path_buf();
				if let Err(e) = tail.remove() {
					tracing::warn!("cannot remove {}: {}", log_path.display(), e);
				}
				tracing::info!("[{}]", SupervisorState::Stopped);
				return Ok(RunReport {
					spawns,
					crashes,
					log_path,
				});
			}

			echo(out, tail.poll());
			crashes += 1;
			let crashed = SupervisorState::Crashed {
				exit_code: status.code(),
				restarts: crashes,
			};

			if !self.config.restart.allows(crashes) {
				echo(out, tail.drain());
				tracing::error!("[{}] restart limit reached", crashed);
				return Err(SupervisorError::RetriesExhausted {
					spawns,
					log_path: tail.path().to_path_buf(),
				});
			}

			tracing::warn!("[{}] restarting", crashed);
			if !self.config.restart.delay.is_zero() {
				tokio::time::sleep(self.config.restart.delay).await;
			}
			child = spawn_child(spec, tail.path())?;
			spawns += 1;
			log_running(&child);
		}
	}
}

fn spawn_child(spec: &LaunchSpec, log_path: &Path) -> Result<Child, SupervisorError> {
	let mut cmd = Command::new(&spec.executable);
	cmd.args(spec.args(log_path))
		.envs(&spec.env)
		.stdin(Stdio::null())
		.stdout(Stdio::null());

	// own process group: interrupting the launcher leaves the child alone
	#[cfg(unix)]
	cmd.process_group(0);

	cmd.spawn().map_err(|source| SupervisorError::Spawn {
		executable: spec.executable.clone(),
		source,
	})
}

fn log_running(child: &Child) {
	let pid = child.id().unwrap_or(0);
	tracing::info!("[{}]", SupervisorState::Running { pid });
}

/// Writes tailed lines to `out`. Failures are logged and never stop
/// supervision.
fn echo<W: Write>(out: &mut W, lines: std::io::Result<Vec<String>>) {
	let lines = match lines {
		Ok(lines) => lines,
		Err(e) => {
			tracing::warn!("cannot read log: {}", e);
			return;
		}
	};
	if lines.is_empty() {
		return;
	}
	let written = lines
		.iter()
		.try_for_each(|line| writeln!(out, "{}", line))
		.and_then(|_| out.flush());
	if let Err(e) = written {
		tracing::warn!("cannot echo log output: {}", e);
	}
}

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const LOG_FLAG: &str = "-log";
pub const HIDE_CONSOLE_FLAG: &str = "-hideConsole";
pub const NO_AUTOLOAD_FLAG: &str = "-noAutoloadPlugins";
pub const PROJECT_FLAG: &str = "-proj";

/// Everything needed to (re)spawn the child.
#[derive(Debug, Clone, Default)]
pub struct LaunchSpec {
	pub executable: PathBuf,
	pub file: Option<PathBuf>,
	pub project: Option<PathBuf>,
	pub hide_console: bool,
	pub no_autoload: bool,
	/// Added on top of the inherited environment.
	pub env: BTreeMap<String, OsString>,
}

impl LaunchSpec {
	pub fn new(executable: impl Into<PathBuf>) -> Self {
		Self {
			executable: executable.into(),
			..Default::default()
		}
	}

	pub fn args(&self, log_path: &Path) -> Vec<OsString> {
		let mut args: Vec<OsString> = vec![LOG_FLAG.into(), log_path.as_os_str().to_os_string()];
		if self.hide_console {
			args.push(HIDE_CONSOLE_FLAG.into());
		}
		if self.no_autoload {
			args.push(NO_AUTOLOAD_FLAG.into());
		}
		if let Some(ref project) = self.project {
			args.push(PROJECT_FLAG.into());
			args.push(project.as_os_str().to_os_string());
		}
		if let Some(ref file) = self.file {
			args.push(file.as_os_str().to_os_string());
		}
		args
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
	/// `None` restarts forever.
	pub max_restarts: Option<u32>,
	pub delay: Duration,
}

impl Default for RestartPolicy {
	fn default() -> Self {
		Self {
			max_restarts: None,
			delay: Duration::ZERO,
		}
	}
}

impl RestartPolicy {
	pub fn allows(&self, crashes: u32) -> bool {
		self.max_restarts.map_or(true, |max| crashes <= max)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorState {
	Starting,
	Running { pid: u32 },
	Crashed { exit_code: Option<i32>, restarts: u32 },
	ExitedClean,
	Stopped,
}

impl fmt::Display for SupervisorState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SupervisorState::Starting => write!(f, "starting"),
			SupervisorState::Running { pid } => write!(f, "running (pid {})", pid),
			SupervisorState::Crashed { exit_code: Some(code), restarts } => {
				write!(f, "crashed (exit {}, restart {})", code, restarts)
			}
			SupervisorState::Crashed { exit_code: None, restarts } => {
				write!(f, "crashed (signal, restart {})", restarts)
			}
			SupervisorState::ExitedClean => write!(f, "exited cleanly"),
			SupervisorState::Stopped => write!(f, "stopped"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
	pub spawns: u32,
	pub crashes: u32,
	pub log_path: PathBuf,
}

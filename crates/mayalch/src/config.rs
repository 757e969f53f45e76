use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mayawatch::{RestartPolicy, SupervisorConfig};
use mayenv::LauncherConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const HEADER: &str = "# mayalch configuration\n\
# environments: alias = \"/path/one;/path/two\"\n\
# executables:  version = \"/path/to/maya\"\n\n";

// ── config.toml ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
	#[serde(flatten)]
	pub launcher: LauncherConfig,
	#[serde(default)]
	pub supervisor: SupervisorSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupervisorSection {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Absent means restart forever.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_restarts: Option<u32>,
	#[serde(default)]
	pub restart_delay_ms: u64,
}

impl Default for SupervisorSection {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			max_restarts: None,
			restart_delay_ms: 0,
		}
	}
}

fn default_poll_interval_ms() -> u64 {
	1000
}

impl SupervisorSection {
	pub fn to_config(&self, log_dir: PathBuf, max_restarts: Option<u32>) -> SupervisorConfig {
		let mut config = SupervisorConfig::new(log_dir);
		config.poll_interval = Duration::from_millis(self.poll_interval_ms.max(1));
		config.restart = RestartPolicy {
			max_restarts: max_restarts.or(self.max_restarts),
			delay: Duration::from_millis(self.restart_delay_ms),
		};
		config
	}
}

// ── Loading ─────────────────────────────────────────────────────────────────

/// Reads `path`, writing a default file first if there is none.
pub fn load_or_create(path: &Path) -> anyhow::Result<ConfigFile> {
	if !path.exists() {
		let config = ConfigFile::default();
		save(path, &config)?;
		tracing::info!("created {}", path.display());
		return Ok(config);
	}

	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	match toml::from_str(&content) {
		Ok(config) => Ok(config),
		Err(e) => {
			eprintln!("warning: failed to parse {}: {}", path.display(), e);
			Ok(ConfigFile::default())
		}
	}
}

pub fn save(path: &Path, config: &ConfigFile) -> anyhow::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)
			.with_context(|| format!("failed to create {}", parent.display()))?;
	}
	let body = toml::to_string_pretty(config).context("failed to serialize config")?;
	std::fs::write(path, format!("{}{}", HEADER, body))
		.with_context(|| format!("failed to write {}", path.display()))
}

/// Adds discovered installs; versions already in the file are kept.
pub fn merge_discovered(config: &mut LauncherConfig, discovered: BTreeMap<String, String>) {
	for (version, exec) in discovered {
		config.executables.entry(version).or_insert(exec);
	}
}

// ── Executable resolution ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("unknown Maya version '{version}' (known: {known})")]
	UnknownVersion { version: String, known: String },

	#[error(
		"could not find a Maya executable, please specify a path in the config file (--edit) \
		 or add the Autodesk directory location to your PATH"
	)]
	NoExecutable,
}

pub fn resolve_executable(config: &LauncherConfig, version: Option<&str>) -> Result<PathBuf, ConfigError> {
	if let Some(version) = version {
		return config
			.executables
			.get(version)
			.map(PathBuf::from)
			.ok_or_else(|| ConfigError::UnknownVersion {
				version: version.to_string(),
				known: known_versions(config),
			});
	}

	let default = config
		.defaults
		.executable
		.as_deref()
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.ok_or(ConfigError::NoExecutable)?;
	Ok(config
		.executables
		.get(default)
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(default)))
}

fn known_versions(config: &LauncherConfig) -> String {
	if config.executables.is_empty() {
		"none".to_string()
	} else {
		config.executables.keys().cloned().collect::<Vec<_>>().join(", ")
	}
}

// ── Editing ─────────────────────────────────────────────────────────────────

/// Opens `path` with the platform's default application.
pub fn edit(path: &Path) -> anyhow::Result<()> {
	let mut cmd = if cfg!(windows) {
		let mut c = std::process::Command::new("cmd");
		c.args(["/C", "start", ""]);
		c
	} else if cfg!(target_os = "macos") {
		std::process::Command::new("open")
	} else {
		std::process::Command::new("xdg-open")
	};
	let status = cmd
		.arg(path)
		.status()
		.with_context(|| format!("failed to open {}", path.display()))?;
	if !status.success() {
		anyhow::bail!("opener exited with {} for {}", status, path.display());
	}
	Ok(())
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to launch {}: {source}", .executable.display())]
	Spawn {
		executable: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("gave up after {spawns} launch(es); log kept at {}", .log_path.display())]
	RetriesExhausted { spawns: u32, log_path: PathBuf },
}

//! # mayawatch
//!
//! Launches one child process, tails the log file it writes, and respawns it
//! on a non-zero exit until it exits cleanly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mayawatch::{LaunchSpec, Supervisor, SupervisorConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sup = Supervisor::new(SupervisorConfig::new("/tmp/mayalch/logs"));
//! let spec = LaunchSpec::new("/usr/autodesk/maya2024/bin/maya");
//!
//! let report = sup.run(&spec).await.unwrap();
//! println!("spawned {} time(s)", report.spawns);
//! # }
//! ```

pub mod error;
pub mod logs;
pub mod supervisor;
pub mod types;

pub use error::SupervisorError;
pub use logs::LogTail;
pub use supervisor::{Supervisor, SupervisorConfig};
pub use types::*;

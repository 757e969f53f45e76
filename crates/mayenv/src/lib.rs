//! # mayenv
//!
//! Builds the search-path environment Maya is launched with.
//!
//! Root directories are walked top-down and every qualifying directory is
//! sorted into `MAYA_SCRIPT_PATH`, `PYTHONPATH`, `XBMLANGPATH` or
//! `MAYA_PLUG_IN_PATH` depending on what it contains.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mayenv::{BuildOutcome, LauncherConfig};
//! use std::path::PathBuf;
//!
//! let config = LauncherConfig::default();
//! let extra = vec![PathBuf::from("/home/me/dev/maya")];
//!
//! match mayenv::build(&config, Some("MAYA_DEV"), &extra).unwrap() {
//!     BuildOutcome::Environment(sinks) => {
//!         for (name, value) in sinks.into_env() {
//!             println!("{}={}", name, value.to_string_lossy());
//!         }
//!     }
//!     BuildOutcome::FactoryDefaults => println!("vanilla environment"),
//! }
//! ```

pub mod builder;
pub mod classify;
pub mod config;
pub mod env;
pub mod error;
pub mod sink;

pub use builder::{build, build_with, resolve_roots, BuildOutcome};
pub use classify::{Classifier, Rules};
pub use config::{DefaultsConfig, LauncherConfig, PatternsConfig};
pub use env::{EnvSinks, LaunchEnv, SinkKind};
pub use error::EnvError;
pub use sink::{EnvSink, PATH_SEPARATOR};

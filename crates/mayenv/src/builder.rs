use std::ffi::OsString;
use std::path::PathBuf;

use crate::classify::{Classifier, Rules};
use crate::config::LauncherConfig;
use crate::env::EnvSinks;
use crate::error::EnvError;

/// Delimiter of path lists stored in the `environments` table.
pub const CONFIG_PATH_DELIMITER: char = ';';

#[derive(Debug)]
pub enum BuildOutcome {
	Environment(EnvSinks),
	/// Nothing to classify; launch with an untouched environment.
	FactoryDefaults,
}

pub fn build(
	config: &LauncherConfig,
	alias: Option<&str>,
	extra_paths: &[PathBuf],
) -> Result<BuildOutcome, EnvError> {
	build_with(config, alias, extra_paths, |name| std::env::var_os(name))
}

/// Like [`build`] but reads environment variables through `lookup`.
pub fn build_with<F>(
	config: &LauncherConfig,
	alias: Option<&str>,
	extra_paths: &[PathBuf],
	lookup: F,
) -> Result<BuildOutcome, EnvError>
where
	F: Fn(&str) -> Option<OsString>,
{
	let rules = Rules::new(&config.patterns.exclude, &config.patterns.icon_ext)?;

	let mut roots = resolve_roots(config, alias, &lookup);
	if roots.is_empty() && extra_paths.is_empty() {
		tracing::info!("no environment paths resolved, using factory defaults");
		return Ok(BuildOutcome::FactoryDefaults);
	}
	roots.extend(extra_paths.iter().cloned());

	let classifier = Classifier::new(rules);
	let mut sinks = EnvSinks::seeded(&lookup);
	for root in &roots {
		tracing::debug!("classifying {}", root.display());
		classifier.classify(root, &mut sinks);
	}

	for sink in sinks.iter() {
		tracing::info!("{}: {} path(s)", sink.name(), sink.len());
	}
	Ok(BuildOutcome::Environment(sinks))
}

/// Root directories for `alias`, falling back to the configured default alias.
pub fn resolve_roots<F>(config: &LauncherConfig, alias: Option<&str>, lookup: &F) -> Vec<PathBuf>
where
	F: Fn(&str) -> Option<OsString>,
{
	if let Some(roots) = alias.and_then(|a| lookup_alias(config, a, lookup)) {
		return roots;
	}
	if let Some(alias) = alias {
		tracing::debug!("environment '{}' not found, trying default", alias);
	}
	config
		.default_environment()
		.and_then(|d| lookup_alias(config, d, lookup))
		.unwrap_or_default()
}

fn lookup_alias<F>(config: &LauncherConfig, alias: &str, lookup: &F) -> Option<Vec<PathBuf>>
where
	F: Fn(&str) -> Option<OsString>,
{
	if let Some(value) = config.environments.get(alias) {
		return Some(
			value
				.split(CONFIG_PATH_DELIMITER)
				.map(str::trim)
				.filter(|s| !s.is_empty())
				.map(expand_tilde)
				.collect(),
		);
	}
	let value = lookup(alias)?;
	Some(
		std::env::split_paths(&value)
			.filter(|p| !p.as_os_str().is_empty())
			.map(|p| match p.to_str() {
				Some(s) => expand_tilde(s),
				None => p,
			})
			.collect(),
	)
}

fn expand_tilde(path: &str) -> PathBuf {
	let rest = if path == "~" {
		Some("")
	} else {
		path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\"))
	};
	if let Some(rest) = rest {
		if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
			return PathBuf::from(home).join(rest);
		}
	}
	PathBuf::from(path)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sink::PATH_SEPARATOR;

	fn config_with(envs: &[(&str, &str)], default: Option<&str>) -> LauncherConfig {
		let mut config = LauncherConfig::default();
		for (k, v) in envs {
			config.environments.insert(k.to_string(), v.to_string());
		}
		config.defaults.environment = default.map(String::from);
		config
	}

	fn no_env(_: &str) -> Option<OsString> {
		None
	}

	#[test]
	fn config_alias_wins_over_os_variable() {
		let config = config_with(&[("DEV", "/a; /b ;")], None);
		let lookup = |_: &str| Some(OsString::from("/from-env"));
		let roots = resolve_roots(&config, Some("DEV"), &lookup);
		assert_eq!(roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
	}

	#[test]
	fn os_variable_used_when_alias_not_configured() {
		let config = config_with(&[], None);
		let value = OsString::from(format!("/x{}/y", PATH_SEPARATOR));
		let lookup = move |name: &str| (name == "MY_ENV").then(|| value.clone());
		let roots = resolve_roots(&config, Some("MY_ENV"), &lookup);
		assert_eq!(roots, vec![PathBuf::from("/x"), PathBuf::from("/y")]);
	}

	#[test]
	fn unknown_alias_falls_back_to_default() {
		let config = config_with(&[("BASE", "/base")], Some("BASE"));
		let roots = resolve_roots(&config, Some("NOPE"), &no_env);
		assert_eq!(roots, vec![PathBuf::from("/base")]);
		let roots = resolve_roots(&config, None, &no_env);
		assert_eq!(roots, vec![PathBuf::from("/base")]);
	}

	#[test]
	fn nothing_resolved_signals_factory_defaults() {
		let config = config_with(&[], None);
		let outcome = build_with(&config, Some("NOPE"), &[], no_env).unwrap();
		assert!(matches!(outcome, BuildOutcome::FactoryDefaults));
	}

	#[test]
	fn extra_paths_alone_still_build() {
		let config = config_with(&[], None);
		let extra = vec![PathBuf::from("/does/not/exist/mayenv")];
		let outcome = build_with(&config, None, &extra, no_env).unwrap();
		match outcome {
			BuildOutcome::Environment(sinks) => assert_eq!(sinks, EnvSinks::empty()),
			BuildOutcome::FactoryDefaults => panic!("expected an environment"),
		}
	}

	#[test]
	fn invalid_pattern_is_an_error() {
		let mut config = config_with(&[("DEV", "/a")], None);
		config.patterns.exclude = vec!["[".into()];
		assert!(build_with(&config, Some("DEV"), &[], no_env).is_err());
	}

	#[test]
	fn tilde_expands_to_home() {
		let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
		if let Some(home) = home {
			assert_eq!(expand_tilde("~/dev"), PathBuf::from(&home).join("dev"));
			assert_eq!(expand_tilde("~"), PathBuf::from(&home));
		}
		assert_eq!(expand_tilde("/abs"), PathBuf::from("/abs"));
	}
}

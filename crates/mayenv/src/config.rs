use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parsed launcher configuration, independent of where it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LauncherConfig {
	#[serde(default)]
	pub defaults: DefaultsConfig,
	#[serde(default)]
	pub patterns: PatternsConfig,
	/// alias -> `;`-separated root directories
	#[serde(default)]
	pub environments: BTreeMap<String, String>,
	/// version -> executable path
	#[serde(default)]
	pub executables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub executable: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternsConfig {
	#[serde(default = "default_exclude")]
	pub exclude: Vec<String>,
	#[serde(default = "default_icon_ext")]
	pub icon_ext: Vec<String>,
}

impl Default for PatternsConfig {
	fn default() -> Self {
		Self {
			exclude: default_exclude(),
			icon_ext: default_icon_ext(),
		}
	}
}

fn default_exclude() -> Vec<String> {
	vec!["__*".into(), ".*".into()]
}

fn default_icon_ext() -> Vec<String> {
	["xpm", "png", "bmp", "jpeg", "jpg"].iter().map(|s| s.to_string()).collect()
}

impl LauncherConfig {
	pub fn default_environment(&self) -> Option<&str> {
		self.defaults
			.environment
			.as_deref()
			.map(str::trim)
			.filter(|s| !s.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_gets_default_patterns() {
		let config: LauncherConfig = toml::from_str("").unwrap();
		assert_eq!(config.patterns.exclude, vec!["__*", ".*"]);
		assert_eq!(config.patterns.icon_ext[0], "xpm");
		assert!(config.environments.is_empty());
	}

	#[test]
	fn parses_full_document() {
		let config: LauncherConfig = toml::from_str(
			r#"
[defaults]
executable = "2024"
environment = "MAYA_DEV"

[patterns]
exclude = ["build"]

[environments]
MAYA_DEV = "/dev/a;/dev/b"

[executables]
"2024" = "/usr/autodesk/maya2024/bin/maya"
"#,
		)
		.unwrap();
		assert_eq!(config.defaults.executable.as_deref(), Some("2024"));
		assert_eq!(config.default_environment(), Some("MAYA_DEV"));
		assert_eq!(config.patterns.exclude, vec!["build"]);
		assert_eq!(config.patterns.icon_ext.len(), 5);
		assert_eq!(config.environments["MAYA_DEV"], "/dev/a;/dev/b");
	}

	#[test]
	fn blank_default_environment_is_none() {
		let mut config = LauncherConfig::default();
		config.defaults.environment = Some("  ".into());
		assert_eq!(config.default_environment(), None);
	}
}

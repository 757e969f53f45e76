use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::sink::EnvSink;

pub const SCRIPT_PATH_VAR: &str = "MAYA_SCRIPT_PATH";
pub const MODULE_PATH_VAR: &str = "PYTHONPATH";
pub const ICON_PATH_VAR: &str = "XBMLANGPATH";
pub const PLUGIN_PATH_VAR: &str = "MAYA_PLUG_IN_PATH";

/// Variables added on top of the inherited environment when spawning.
pub type LaunchEnv = BTreeMap<String, OsString>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
	Script,
	Module,
	Icon,
	Plugin,
}

impl SinkKind {
	pub const ALL: [SinkKind; 4] = [SinkKind::Script, SinkKind::Module, SinkKind::Icon, SinkKind::Plugin];

	pub fn var_name(self) -> &'static str {
		match self {
			SinkKind::Script => SCRIPT_PATH_VAR,
			SinkKind::Module => MODULE_PATH_VAR,
			SinkKind::Icon => ICON_PATH_VAR,
			SinkKind::Plugin => PLUGIN_PATH_VAR,
		}
	}
}

/// One sink per path category, shared across every classified root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSinks {
	pub script: EnvSink,
	pub module: EnvSink,
	pub icon: EnvSink,
	pub plugin: EnvSink,
}

impl EnvSinks {
	pub fn empty() -> Self {
		Self::seeded(|_| None)
	}

	pub fn from_env() -> Self {
		Self::seeded(|name| std::env::var_os(name))
	}

	pub fn seeded<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<OsString>,
	{
		let sink = |kind: SinkKind| {
			let current = lookup(kind.var_name());
			EnvSink::seeded(kind.var_name(), current.as_deref())
		};
		Self {
			script: sink(SinkKind::Script),
			module: sink(SinkKind::Module),
			icon: sink(SinkKind::Icon),
			plugin: sink(SinkKind::Plugin),
		}
	}

	pub fn get(&self, kind: SinkKind) -> &EnvSink {
		match kind {
			SinkKind::Script => &self.script,
			SinkKind::Module => &self.module,
			SinkKind::Icon => &self.icon,
			SinkKind::Plugin => &self.plugin,
		}
	}

	pub fn get_mut(&mut self, kind: SinkKind) -> &mut EnvSink {
		match kind {
			SinkKind::Script => &mut self.script,
			SinkKind::Module => &mut self.module,
			SinkKind::Icon => &mut self.icon,
			SinkKind::Plugin => &mut self.plugin,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &EnvSink> {
		SinkKind::ALL.into_iter().map(move |kind| self.get(kind))
	}

	/// Empty sinks are left out so the child keeps its own defaults for them.
	pub fn into_env(self) -> LaunchEnv {
		[self.script, self.module, self.icon, self.plugin]
			.into_iter()
			.filter(|sink| !sink.is_empty())
			.map(|sink| (sink.name().to_string(), sink.value().to_os_string()))
			.collect()
	}
}

impl Default for EnvSinks {
	fn default() -> Self {
		Self::empty()
	}
}

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
	pub app_name: String,
}

impl AppPaths {
	pub fn new(app_name: impl Into<String>) -> Self {
		Self {
			app_name: app_name.into(),
		}
	}

	pub fn config_dir(&self) -> PathBuf {
		if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
			return PathBuf::from(dir).join(&self.app_name);
		}
		if cfg!(windows) {
			if let Ok(dir) = std::env::var("APPDATA") {
				return PathBuf::from(dir).join(&self.app_name);
			}
		}
		match home_dir() {
			Some(home) if cfg!(target_os = "macos") => {
				home.join("Library").join("Preferences").join(&self.app_name)
			}
			Some(home) => home.join(".config").join(&self.app_name),
			None => std::env::temp_dir().join(&self.app_name).join("config"),
		}
	}

	pub fn state_dir(&self) -> PathBuf {
		if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
			PathBuf::from(dir).join(&self.app_name)
		} else if let Some(home) = home_dir() {
			home.join(".local").join("state").join(&self.app_name)
		} else {
			std::env::temp_dir().join(&self.app_name)
		}
	}

	pub fn config_file(&self) -> PathBuf {
		self.config_dir().join("config.toml")
	}

	pub fn log_dir(&self) -> PathBuf {
		self.state_dir().join("logs")
	}
}

fn home_dir() -> Option<PathBuf> {
	std::env::var_os("HOME")
		.or_else(|| std::env::var_os("USERPROFILE"))
		.map(PathBuf::from)
}

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

#[cfg(windows)]
pub const PATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const PATH_SEPARATOR: &str = ":";

/// Ordered, duplicate-free list of paths bound to one environment variable.
///
/// Every mutation re-serializes the entries into [`EnvSink::value`], so the
/// value handed to a child process always matches `entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSink {
	name: String,
	entries: Vec<PathBuf>,
	value: OsString,
}

impl EnvSink {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: Vec::new(),
			value: OsString::new(),
		}
	}

	/// Starts from an existing variable value so inherited entries survive.
	pub fn seeded(name: impl Into<String>, current: Option<&OsStr>) -> Self {
		let mut sink = Self::new(name);
		if let Some(current) = current {
			sink.extend(std::env::split_paths(current).filter(|p| !p.as_os_str().is_empty()));
		}
		sink
	}

	pub fn from_env(name: impl Into<String>) -> Self {
		let name = name.into();
		let current = std::env::var_os(&name);
		Self::seeded(name, current.as_deref())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn entries(&self) -> &[PathBuf] {
		&self.entries
	}

	pub fn value(&self) -> &OsStr {
		&self.value
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, path: impl AsRef<Path>) -> bool {
		let path = path.as_ref();
		self.entries.iter().any(|e| e.as_os_str() == path.as_os_str())
	}

	/// Returns false when the path was already present.
	pub fn append(&mut self, path: impl AsRef<Path>) -> bool {
		let path = path.as_ref();
		if self.contains(path) {
			return false;
		}
		self.entries.push(path.to_path_buf());
		self.update();
		true
	}

	pub fn extend<I, P>(&mut self, paths: I)
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		for path in paths {
			self.append(path);
		}
	}

	/// Removes the first matching entry. Returns false when it was absent.
	pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
		let path = path.as_ref();
		match self.entries.iter().position(|e| e.as_os_str() == path.as_os_str()) {
			Some(idx) => {
				self.entries.remove(idx);
				self.update();
				true
			}
			None => false,
		}
	}

	fn update(&mut self) {
		let mut value = OsString::new();
		for (i, entry) in self.entries.iter().enumerate() {
			if i > 0 {
				value.push(PATH_SEPARATOR);
			}
			value.push(entry.as_os_str());
		}
		self.value = value;
	}
}

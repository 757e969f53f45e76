use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::env::EnvSinks;
use crate::error::EnvError;

pub const PACKAGE_MARKER: &str = "__init__.py";
pub const SCRIPT_EXT: &str = "mel";
pub const MODULE_EXT: &str = "py";
pub const PLUGIN_EXTS: &[&str] = &["mll", "bundle", "so"];

/// Exclusion patterns and icon extensions for one classification run.
#[derive(Debug, Clone)]
pub struct Rules {
	exclude: Vec<Pattern>,
	icon_ext: Vec<String>,
}

impl Rules {
	pub fn new<E, I>(exclude: &[E], icon_ext: &[I]) -> Result<Self, EnvError>
	where
		E: AsRef<str>,
		I: AsRef<str>,
	{
		let exclude = exclude
			.iter()
			.map(|p| {
				Pattern::new(p.as_ref()).map_err(|source| EnvError::Pattern {
					pattern: p.as_ref().to_string(),
					source,
				})
			})
			.collect::<Result<Vec<_>, _>>()?;
		let icon_ext = icon_ext
			.iter()
			.map(|e| e.as_ref().trim_start_matches('.').to_string())
			.filter(|e| !e.is_empty())
			.collect();
		Ok(Self { exclude, icon_ext })
	}

	/// Matches a base name, never a full path.
	pub fn is_excluded(&self, name: &OsStr) -> bool {
		let name = name.to_string_lossy();
		self.exclude.iter().any(|p| p.matches(&name))
	}

	pub fn icon_ext(&self) -> &[String] {
		&self.icon_ext
	}

	fn is_icon(&self, path: &Path) -> bool {
		self.icon_ext.iter().any(|ext| has_ext(path, ext))
	}
}

pub struct Classifier {
	rules: Rules,
}

impl Classifier {
	pub fn new(rules: Rules) -> Self {
		Self { rules }
	}

	pub fn rules(&self) -> &Rules {
		&self.rules
	}

	/// Walks `root` and adds every qualifying directory to `sinks`.
	///
	/// The root itself is always classified. Below it, excluded directories are
	/// pruned and packages are classified without descending into them. A root
	/// that does not exist contributes nothing.
	pub fn classify(&self, root: &Path, sinks: &mut EnvSinks) {
		let root = match root.canonicalize() {
			Ok(path) if path.is_dir() => path,
			Ok(path) => {
				tracing::debug!("not a directory, skipping {}", path.display());
				return;
			}
			Err(e) => {
				tracing::debug!("skipping {}: {}", root.display(), e);
				return;
			}
		};

		self.put_path(&root, is_package(&root), sinks);

		let rules = &self.rules;
		let mut walker = WalkDir::new(&root)
			.min_depth(1)
			.sort_by_file_name()
			.into_iter()
			.filter_entry(|e| e.depth() == 0 || !(is_dir_entry(e) && rules.is_excluded(e.file_name())));

		while let Some(entry) = walker.next() {
			let entry = match entry {
				Ok(e) => e,
				Err(e) => {
					tracing::debug!("walk error under {}: {}", root.display(), e);
					continue;
				}
			};
			if !is_dir_entry(&entry) {
				continue;
			}

			let package = is_package(entry.path());
			self.put_path(entry.path(), package, sinks);

			// symlinked directories are never descended, so only real ones need skipping
			if package && entry.file_type().is_dir() {
				walker.skip_current_dir();
			}
		}
	}

	fn put_path(&self, dir: &Path, package: bool, sinks: &mut EnvSinks) {
		if package {
			if let Some(parent) = dir.parent() {
				if sinks.module.append(parent) {
					tracing::debug!("{} <- {}", sinks.module.name(), parent.display());
				}
			}
			for icon_dir in self.icon_dirs(dir) {
				if sinks.icon.append(&icon_dir) {
					tracing::debug!("{} <- {}", sinks.icon.name(), icon_dir.display());
				}
			}
			return;
		}

		let files = match direct_files(dir) {
			Ok(files) => files,
			Err(e) => {
				tracing::debug!("cannot read {}: {}", dir.display(), e);
				return;
			}
		};
		let any_with = |ext: &str| files.iter().any(|f| has_ext(f, ext));

		let mut matched = Vec::new();
		if any_with(SCRIPT_EXT) {
			matched.push(&mut sinks.script);
		}
		if any_with(MODULE_EXT) {
			matched.push(&mut sinks.module);
		}
		if PLUGIN_EXTS.iter().any(|&ext| any_with(ext)) {
			matched.push(&mut sinks.plugin);
		}
		if self.rules.icon_ext.iter().any(|ext| any_with(ext.as_str())) {
			matched.push(&mut sinks.icon);
		}

		for sink in matched {
			if sink.append(dir) {
				tracing::debug!("{} <- {}", sink.name(), dir.display());
			}
		}
	}

	/// Every distinct directory below `package` holding an icon file.
	fn icon_dirs(&self, package: &Path) -> Vec<PathBuf> {
		let mut dirs: Vec<PathBuf> = Vec::new();
		for entry in WalkDir::new(package).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
			if !entry.file_type().is_file() || !self.rules.is_icon(entry.path()) {
				continue;
			}
			if let Some(parent) = entry.path().parent() {
				if !dirs.iter().any(|d| d == parent) {
					dirs.push(parent.to_path_buf());
				}
			}
		}
		dirs
	}
}

pub fn is_package(dir: &Path) -> bool {
	dir.join(PACKAGE_MARKER).is_file()
}

fn is_dir_entry(entry: &DirEntry) -> bool {
	entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn direct_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for entry in fs::read_dir(dir)?.flatten() {
		let path = entry.path();
		if path.is_file() {
			files.push(path);
		}
	}
	Ok(files)
}

fn has_ext(path: &Path, ext: &str) -> bool {
	path.extension().and_then(|e| e.to_str()) == Some(ext)
}

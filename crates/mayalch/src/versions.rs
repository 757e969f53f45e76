use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

pub const DEVELOPER_NAME: &str = "Autodesk";
pub const APPLICATION_NAME: &str = "Maya";
pub const APPLICATION_BIN: &str = "bin";
pub const EXECUTABLE_NAME: &str = "maya";

/// Maps release -> executable for every `Maya<release>` install found under a
/// `PATH` entry whose directory name ends with `Autodesk`.
pub fn discover(path_var: Option<&OsStr>) -> BTreeMap<String, String> {
	let mut versions = BTreeMap::new();
	let Some(path_var) = path_var else {
		return versions;
	};

	for dir in std::env::split_paths(path_var) {
		let Ok(dir) = dir.canonicalize() else {
			continue;
		};
		let is_vendor_dir = dir
			.file_name()
			.and_then(|n| n.to_str())
			.is_some_and(|n| n.to_lowercase().ends_with(&DEVELOPER_NAME.to_lowercase()));
		if is_vendor_dir {
			versions.extend(versions_in(&dir));
		}
	}
	versions
}

pub fn versions_in(vendor_dir: &Path) -> BTreeMap<String, String> {
	let mut versions = BTreeMap::new();
	let entries = match fs::read_dir(vendor_dir) {
		Ok(e) => e,
		Err(e) => {
			tracing::debug!("cannot read {}: {}", vendor_dir.display(), e);
			return versions;
		}
	};

	for entry in entries.flatten() {
		let dir = entry.path();
		if !dir.is_dir() {
			continue;
		}
		let name = entry.file_name().to_string_lossy().to_string();
		let Some(release) = strip_prefix_ignore_case(&name, APPLICATION_NAME) else {
			continue;
		};
		if release.is_empty() {
			continue;
		}

		let bin = dir.join(APPLICATION_BIN);
		match which::which_in(EXECUTABLE_NAME, Some(bin.as_os_str()), &dir) {
			Ok(exec) => {
				tracing::debug!("found {} {} at {}", APPLICATION_NAME, release, exec.display());
				versions.insert(release.to_string(), exec.display().to_string());
			}
			Err(_) => tracing::debug!("no {} executable in {}", EXECUTABLE_NAME, bin.display()),
		}
	}
	versions
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
	if s.len() >= prefix.len() && s.is_char_boundary(prefix.len()) && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
		Some(&s[prefix.len()..])
	} else {
		None
	}
}

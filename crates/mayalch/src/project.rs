use std::path::{Path, PathBuf};

pub const WORKSPACE_FILE: &str = "workspace.mel";

/// Nearest directory at or above `start` holding a `workspace.mel`.
pub fn find_project(start: &Path) -> Option<PathBuf> {
	start
		.ancestors()
		.find(|dir| dir.join(WORKSPACE_FILE).is_file())
		.map(Path::to_path_buf)
}

/// Where the project search starts: the scene's directory if one is being
/// opened, the working directory otherwise.
pub fn search_start(file: Option<&Path>, cwd: &Path) -> PathBuf {
	match file.and_then(|f| cwd.join(f).parent().map(Path::to_path_buf)) {
		Some(dir) => dir,
		None => cwd.to_path_buf(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn finds_workspace_in_ancestor() {
		let root = std::env::temp_dir().join(format!("mayalch-project-{}", std::process::id()));
		let _ = fs::remove_dir_all(&root);
		let scenes = root.join("show/scenes/shot010");
		fs::create_dir_all(&scenes).unwrap();
		fs::write(root.join("show").join(WORKSPACE_FILE), "").unwrap();

		assert_eq!(find_project(&scenes), Some(root.join("show")));
		assert_eq!(find_project(&root), None);

		let _ = fs::remove_dir_all(&root);
	}

	#[test]
	fn search_starts_next_to_scene() {
		let cwd = Path::new("/work");
		assert_eq!(search_start(Some(Path::new("shots/a.ma")), cwd), PathBuf::from("/work/shots"));
		assert_eq!(search_start(Some(Path::new("/abs/b.ma")), cwd), PathBuf::from("/abs"));
		assert_eq!(search_start(None, cwd), PathBuf::from("/work"));
	}
}

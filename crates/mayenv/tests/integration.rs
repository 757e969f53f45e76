use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use mayenv::{build_with, BuildOutcome, Classifier, EnvSinks, LauncherConfig, Rules, PATH_SEPARATOR};

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_dir(name: &str) -> PathBuf {
	let n = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
	let dir = std::env::temp_dir().join(format!("mayenv-test-{}-{}-{}", std::process::id(), n, name));
	let _ = fs::remove_dir_all(&dir);
	fs::create_dir_all(&dir).unwrap();
	dir.canonicalize().unwrap()
}

fn touch(root: &Path, rel: &str) {
	let path = root.join(rel);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, b"").unwrap();
}

fn classify(root: &Path, exclude: &[&str], icon_ext: &[&str]) -> EnvSinks {
	let rules = Rules::new(exclude, icon_ext).unwrap();
	let mut sinks = EnvSinks::empty();
	Classifier::new(rules).classify(root, &mut sinks);
	sinks
}

fn all_entries(sinks: &EnvSinks) -> Vec<PathBuf> {
	sinks.iter().flat_map(|s| s.entries().to_vec()).collect()
}

// --- Scenario ---

#[test]
fn project_tree_scenario() {
	let proj = temp_dir("proj");
	touch(&proj, "__pycache__/mod.py");
	touch(&proj, "__pycache__/tool.mel");
	touch(&proj, "mypkg/__init__.py");
	touch(&proj, "scripts/a.mel");
	touch(&proj, "icons/x.png");

	let sinks = classify(&proj, &["__*"], &["png"]);

	assert_eq!(sinks.module.entries(), &[proj.clone()]);
	assert_eq!(sinks.script.entries(), &[proj.join("scripts")]);
	assert_eq!(sinks.icon.entries(), &[proj.join("icons")]);
	assert!(sinks.plugin.is_empty());
	assert!(all_entries(&sinks).iter().all(|p| !p.starts_with(proj.join("__pycache__"))));

	let _ = fs::remove_dir_all(&proj);
}

// --- Exclusion ---

#[test]
fn excluded_subtree_contributes_nothing() {
	let root = temp_dir("excluded");
	touch(&root, ".git/hooks/post.mel");
	touch(&root, ".git/objects/pkg/__init__.py");
	touch(&root, "__build/deep/plugin.mll");
	touch(&root, "__build/deep/icon.png");
	touch(&root, "tools/keep.mel");

	let sinks = classify(&root, &["__*", ".*"], &["png"]);

	let entries = all_entries(&sinks);
	assert_eq!(entries, vec![root.join("tools")]);

	let _ = fs::remove_dir_all(&root);
}

#[test]
fn excluded_package_is_never_classified() {
	let root = temp_dir("excluded-pkg");
	touch(&root, "__vendor/__init__.py");
	touch(&root, "__vendor/icons/a.png");

	let sinks = classify(&root, &["__*"], &["png"]);

	assert!(sinks.module.is_empty());
	assert!(sinks.icon.is_empty());

	let _ = fs::remove_dir_all(&root);
}

// --- Packages ---

#[test]
fn package_is_not_descended() {
	let root = temp_dir("package");
	touch(&root, "lib/mypkg/__init__.py");
	touch(&root, "lib/mypkg/core.py");
	touch(&root, "lib/mypkg/sub/helpers.py");
	touch(&root, "lib/mypkg/mel/proc.mel");
	touch(&root, "lib/mypkg/plug/node.mll");
	touch(&root, "lib/mypkg/icons/shelf.png");

	let sinks = classify(&root, &["__*"], &["png"]);

	assert_eq!(sinks.module.entries(), &[root.join("lib")]);
	assert!(sinks.script.is_empty());
	assert!(sinks.plugin.is_empty());
	assert_eq!(sinks.icon.entries(), &[root.join("lib/mypkg/icons")]);

	let _ = fs::remove_dir_all(&root);
}

#[test]
fn sibling_packages_share_one_module_entry() {
	let root = temp_dir("siblings");
	touch(&root, "a/__init__.py");
	touch(&root, "b/__init__.py");

	let sinks = classify(&root, &["__*"], &["png"]);

	assert_eq!(sinks.module.entries(), &[root.clone()]);

	let _ = fs::remove_dir_all(&root);
}

// --- Builder ---

#[test]
fn builder_shares_sinks_across_roots() {
	let first = temp_dir("first");
	let second = temp_dir("second");
	touch(&first, "scripts/a.mel");
	touch(&second, "scripts/b.mel");
	touch(&second, "python/mod.py");

	let mut config = LauncherConfig::default();
	config.environments.insert(
		"STUDIO".into(),
		format!("{};{};/not/there/mayenv", first.display(), second.display()),
	);

	let outcome = build_with(&config, Some("STUDIO"), &[first.clone()], |_| None).unwrap();
	let sinks = match outcome {
		BuildOutcome::Environment(sinks) => sinks,
		BuildOutcome::FactoryDefaults => panic!("expected environment"),
	};

	assert_eq!(
		sinks.script.entries(),
		&[first.join("scripts"), second.join("scripts")]
	);
	assert_eq!(sinks.module.entries(), &[second.join("python")]);

	let _ = fs::remove_dir_all(&first);
	let _ = fs::remove_dir_all(&second);
}

#[test]
fn builder_keeps_inherited_entries_first() {
	let root = temp_dir("inherited");
	touch(&root, "scripts/a.mel");

	let config = LauncherConfig::default();
	let outcome = build_with(&config, None, &[root.clone()], |name| {
		(name == "MAYA_SCRIPT_PATH").then(|| "/studio/scripts".into())
	})
	.unwrap();
	let BuildOutcome::Environment(sinks) = outcome else {
		panic!("expected environment");
	};

	let env = sinks.into_env();
	let expected = format!("/studio/scripts{}{}", PATH_SEPARATOR, root.join("scripts").display());
	assert_eq!(env["MAYA_SCRIPT_PATH"].to_string_lossy(), expected);
	assert!(!env.contains_key("PYTHONPATH"));

	let _ = fs::remove_dir_all(&root);
}

mod config;
mod paths;
mod project;
mod versions;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mayawatch::{LaunchSpec, Supervisor};
use mayenv::{BuildOutcome, LaunchEnv};
use owo_colors::OwoColorize;

use config::ConfigFile;
use paths::AppPaths;

const APP_NAME: &str = "mayalch";

/// Launches Autodesk Maya with MAYA_SCRIPT_PATH, PYTHONPATH, XBMLANGPATH and
/// MAYA_PLUG_IN_PATH built from your tool directories, and restarts it if it
/// crashes.
///
/// With a default environment configured, `mayalch my_scene.ma` is all it takes.
#[derive(Debug, Parser)]
#[command(name = "mayalch", disable_version_flag = true)]
struct Cli {
	/// Scene file for Maya to open
	file: Option<PathBuf>,

	/// Launch the given Maya version
	#[arg(short = 'v', long = "version", value_name = "VERSION")]
	maya_version: Option<String>,

	/// Environment alias: a key of [environments] or an environment variable
	#[arg(short = 'e', long, value_name = "ENV")]
	environment: Option<String>,

	/// Extra root directories to classify
	#[arg(short = 'p', long, value_name = "PATH", num_args = 1..)]
	paths: Vec<PathBuf>,

	/// Open the config file with the default application
	#[arg(long)]
	edit: bool,

	/// List known Maya versions and environments
	#[arg(long)]
	list: bool,

	/// Print the resolved launch environment as JSON and exit
	#[arg(long)]
	print_env: bool,

	/// Pass -hideConsole to Maya
	#[arg(long)]
	hide_console: bool,

	/// Pass -noAutoloadPlugins to Maya
	#[arg(long)]
	no_autoload: bool,

	/// Don't look for a workspace.mel project
	#[arg(long)]
	no_project: bool,

	/// Give up after this many restarts (default: never)
	#[arg(long, value_name = "N")]
	max_restarts: Option<u32>,

	/// Debug logging
	#[arg(long)]
	verbose: bool,
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.init();

	if let Err(e) = run(cli).await {
		eprintln!("{} {:#}", "error:".red().bold(), e);
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let paths = AppPaths::new(APP_NAME);
	let config_path = paths.config_file();

	if cli.edit {
		return config::edit(&config_path);
	}

	let mut file = config::load_or_create(&config_path)?;
	let discovered = versions::discover(std::env::var_os("PATH").as_deref());
	config::merge_discovered(&mut file.launcher, discovered);

	if cli.list {
		print_list(&file);
		return Ok(());
	}

	let env = build_env(&file, &cli)?;

	if cli.print_env {
		let printable: BTreeMap<&str, String> = env
			.iter()
			.map(|(k, v)| (k.as_str(), v.to_string_lossy().to_string()))
			.collect();
		println!("{}", serde_json::to_string_pretty(&printable)?);
		return Ok(());
	}

	let executable = config::resolve_executable(&file.launcher, cli.maya_version.as_deref())?;

	let project = if cli.no_project {
		None
	} else {
		let cwd = std::env::current_dir().context("cannot read working directory")?;
		project::find_project(&project::search_start(cli.file.as_deref(), &cwd))
	};
	if let Some(ref dir) = project {
		tracing::info!("project {}", dir.display());
	}

	let spec = LaunchSpec {
		executable,
		file: cli.file,
		project,
		hide_console: cli.hide_console,
		no_autoload: cli.no_autoload,
		env,
	};
	let supervisor = Supervisor::new(file.supervisor.to_config(paths.log_dir(), cli.max_restarts));
	let report = supervisor.run(&spec).await?;
	tracing::info!("maya exited cleanly after {} launch(es)", report.spawns);
	Ok(())
}

fn build_env(file: &ConfigFile, cli: &Cli) -> anyhow::Result<LaunchEnv> {
	let outcome = mayenv::build(&file.launcher, cli.environment.as_deref(), &cli.paths)?;
	Ok(match outcome {
		BuildOutcome::Environment(sinks) => sinks.into_env(),
		BuildOutcome::FactoryDefaults => LaunchEnv::new(),
	})
}

fn print_list(file: &ConfigFile) {
	let launcher = &file.launcher;
	let default_exec = launcher.defaults.executable.as_deref();
	let default_env = launcher.default_environment();

	eprintln!("{}", "versions".cyan().bold());
	if launcher.executables.is_empty() {
		eprintln!("  (none found)");
	}
	for (version, exec) in &launcher.executables {
		let marker = if default_exec == Some(version.as_str()) { "*" } else { " " };
		eprintln!("{} {}  {}", marker, version.bold(), exec.dimmed());
	}

	eprintln!();
	eprintln!("{}", "environments".cyan().bold());
	if launcher.environments.is_empty() {
		eprintln!("  (none configured)");
	}
	for (alias, roots) in &launcher.environments {
		let marker = if default_env == Some(alias.as_str()) { "*" } else { " " };
		eprintln!("{} {}  {}", marker, alias.bold(), roots.dimmed());
	}
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use git_web_link::actions::{Action, perform_all};
use git_web_link::config::{
	CONFIG_FILE_NAME, MergedConfig, discover_configs, init_template, load_explicit_config,
	load_merged_config, merge_configs, user_config_path,
};
use git_web_link::git::RepoState;
use git_web_link::link::{LinkCommand, generate_link};
use git_web_link::logging::init_logging;
use git_web_link::region::{LineRange, Selection};
use git_web_link::rules::{MatchContext, build_url, compile_rules};
use git_web_link::wizard;

#[derive(Parser)]
#[command(name = "git-web-link")]
#[command(
	author,
	version,
	about = "Build web links to files, regions, branches and commits of a git repository"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Enable debug logging (GIT_WEB_LINK_LOG overrides)
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Use this config file instead of discovering .git-web-link.toml files
	#[arg(long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Link to a file
	File(LinkArgs),
	/// Link to a region of a file
	Region(LinkArgs),
	/// Link to a file on the current branch
	FileOnBranch(LinkArgs),
	/// Link to a region of a file on the current branch
	RegionOnBranch(LinkArgs),
	/// Link to a file at the current commit
	FileAtHash(LinkArgs),
	/// Link to a region of a file at the current commit
	RegionAtHash(LinkArgs),
	/// Choose what to include and what to do with the link interactively
	Wizard(LinkArgs),
	/// Build a URL from explicit values without reading a repository
	Resolve(ResolveArgs),
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Create a template .git-web-link.toml in the current directory
	Init {
		/// Overwrite an existing .git-web-link.toml
		#[arg(long)]
		force: bool,
	},
}

#[derive(Args)]
struct LinkArgs {
	/// File to link to
	path: PathBuf,

	/// Lines to link to: N or START-END (1-based, inclusive)
	#[arg(short, long, value_name = "LINES", conflicts_with = "selection")]
	lines: Option<LineRange>,

	/// Editor selection: LINE:COL-LINE:COL (1-based lines, 0-based columns)
	#[arg(long, value_name = "SELECTION")]
	selection: Option<Selection>,

	/// Remote to read the clone URL from (default: the branch's upstream remote, then origin)
	#[arg(long)]
	remote: Option<String>,

	/// What to do with the URL; may be repeated (default: default-action from config;
	/// preselected in the wizard)
	#[arg(short, long = "action", value_enum, value_name = "ACTION")]
	actions: Vec<Action>,
}

#[derive(Args)]
struct ResolveArgs {
	/// Clone URL matched against the rule patterns
	#[arg(long)]
	clone_url: String,

	/// Repository-relative file path
	#[arg(long)]
	filename: String,

	/// Value for ${branch}
	#[arg(long)]
	branch: Option<String>,

	/// Value for ${startline}
	#[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
	start_line: Option<u32>,

	/// Value for ${endline}
	#[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
	end_line: Option<u32>,

	/// Value for ${hash}
	#[arg(long)]
	hash: Option<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective rules with their sources
	Show,
	/// Check all config files for errors without building a link
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	let config_file = cli.config.as_deref();

	let (command, args) = match cli.command {
		Commands::File(args) => (LinkCommand::File, args),
		Commands::Region(args) => (LinkCommand::Region, args),
		Commands::FileOnBranch(args) => (LinkCommand::FileOnBranch, args),
		Commands::RegionOnBranch(args) => (LinkCommand::RegionOnBranch, args),
		Commands::FileAtHash(args) => (LinkCommand::FileAtHash, args),
		Commands::RegionAtHash(args) => (LinkCommand::RegionAtHash, args),
		Commands::Wizard(args) => (LinkCommand::Wizard, args),
		Commands::Resolve(args) => return handle_resolve(&args, config_file),
		Commands::Config { action } => {
			return match action {
				ConfigAction::Show => handle_config_show(config_file),
				ConfigAction::Validate => handle_config_validate(config_file),
			};
		}
		Commands::Init { force } => return handle_init(force),
	};

	handle_link(command, &args, config_file)
}

/// Load the explicit config file, or discover the cascade from `start_dir`.
fn load_config(config_file: Option<&Path>, start_dir: &Path) -> Result<MergedConfig> {
	match config_file {
		Some(path) => load_explicit_config(path)
			.with_context(|| format!("Failed to load configuration from {}", path.display())),
		None => load_merged_config(start_dir).context("Failed to load configuration"),
	}
}

fn handle_link(
	command: LinkCommand,
	args: &LinkArgs,
	config_file: Option<&Path>,
) -> Result<ExitCode> {
	let repo = RepoState::discover(&args.path, args.remote.as_deref())
		.with_context(|| format!("Failed to inspect repository of {}", args.path.display()))?;

	let file = repo.root.join(&repo.relative_path);
	let start_dir = file.parent().unwrap_or(&repo.root);
	let config = load_config(config_file, start_dir)?;
	let rules = compile_rules(&config).context("Failed to compile rules")?;

	let region = args
		.lines
		.or_else(|| args.selection.map(|selection| selection.line_range()));

	let (options, actions) = match command.options() {
		Some(options) if args.actions.is_empty() => (options, vec![config.default_action]),
		Some(options) => (options, args.actions.clone()),
		None => match wizard::run(region.is_some(), &args.actions)? {
			Some(choice) => (choice.options, choice.actions),
			None => return Ok(ExitCode::SUCCESS),
		},
	};

	let url = generate_link(&repo, &rules, options, region).context("Failed to build link")?;
	perform_all(&url, &actions)?;

	Ok(ExitCode::SUCCESS)
}

fn handle_resolve(args: &ResolveArgs, config_file: Option<&Path>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_config(config_file, &cwd)?;
	let rules = compile_rules(&config).context("Failed to compile rules")?;

	let ctx = MatchContext {
		filename: &args.filename,
		branch: args.branch.as_deref(),
		start_line: args.start_line,
		end_line: args.end_line,
		hash: args.hash.as_deref(),
	};

	let url = build_url(&args.clone_url, &rules, &ctx).context("Failed to build link")?;
	println!("{url}");
	Ok(ExitCode::SUCCESS)
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config_file: Option<&Path>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match config_file {
		Some(path) => println!("# Config file: {}", path.display()),
		None => {
			let configs = discover_configs(&cwd).context("Failed to discover config files")?;
			if configs.is_empty() {
				println!("# No configuration files found; using built-in rules.");
			} else {
				println!("# Configuration files (in cascade order):");
				for loaded in &configs {
					println!("#   {}", loaded.path.display());
				}
			}
		}
	}
	println!();

	let config = load_config(config_file, &cwd)?;
	println!("default-action: {}", config.default_action);
	println!();

	for (i, rws) in config.rules.iter().enumerate() {
		let kind = if i == 0 { "primary" } else { "other" };
		println!("Rule {} ({kind}, from {}):", i + 1, rws.source);
		match rws.rule.remote_pattern {
			Some(ref pattern) => println!("  remote-pattern: {pattern}"),
			None => println!("  remote-pattern: (unset)"),
		}
		for template in rws.rule.web_urls.iter().flatten() {
			println!("  web-url: {template}");
		}
		if !rws.rule.is_eligible() {
			println!("  (ignored: needs a pattern and at least one web URL)");
		}
		println!();
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(config_file: Option<&Path>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let result = match config_file {
		Some(path) => load_explicit_config(path).map(|config| (vec![path.to_path_buf()], config)),
		None => discover_configs(&cwd).map(|configs| {
			let paths: Vec<_> = configs.iter().map(|loaded| loaded.path.clone()).collect();
			(paths, merge_configs(&configs))
		}),
	};

	match result.and_then(|(paths, config)| compile_rules(&config).map(|rules| (paths, rules))) {
		Ok((paths, rules)) => {
			if paths.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for path in &paths {
					println!("  {}", path.display());
				}
			}
			println!("{} usable rules", rules.len());
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

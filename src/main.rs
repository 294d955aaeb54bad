// SPDX-License-Identifier: Apache-2.0

mod activity_log;
mod config;
mod manager;
mod printer;
mod pyproject;
mod scanner;
mod status;
mod table;
mod tree;
mod types;
mod utils;
mod validation;
mod watcher;

use clap::{CommandFactory, Parser, Subcommand};
use colored::*;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::config::{Config, GroupBy};
use crate::manager::UvManager;
use crate::printer::Printer;
use crate::types::{PackageName, PythonEnvironment, UvError};

#[derive(Parser)]
#[command(name = "uvkit")]
#[command(version = env!("UVKIT_VERSION"))]
#[command(about = "Workspace toolkit for uv-managed Python environments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workspace folder(s) to operate on (first one is primary)
    #[arg(long = "workspace", value_name = "DIR", global = true)]
    workspace: Vec<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    /// List environments discovered in the workspace
    List {
        /// Emit records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a new uv virtual environment
    Create {
        /// Path for the new environment (prompted if omitted)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Python version to use (e.g. 3.11)
        #[arg(long)]
        python: Option<String>,
        /// Skip prompts and use defaults
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove an environment from disk
    Rm {
        /// Environment selector (label, folder name, or path)
        env: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Select an environment's interpreter as active
    #[command(visible_alias = "use")]
    Activate {
        /// Environment selector (label, folder name, or path)
        env: String,
    },
    /// List installed packages in an environment
    Packages {
        /// Environment selector (label, folder name, or path)
        env: String,
        /// Emit packages as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Install packages into an environment
    Install {
        /// Environment selector (label, folder name, or path)
        env: String,
        /// Packages to install
        packages: Vec<String>,
    },
    /// Uninstall packages from an environment
    Uninstall {
        /// Environment selector (label, folder name, or path)
        env: String,
        /// Packages to uninstall
        packages: Vec<String>,
    },
    /// Render the environment tree (with project scripts)
    Tree {
        /// Group root nodes by folder or by environment kind
        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,
        /// Hide script children
        #[arg(long)]
        no_scripts: bool,
    },
    /// One-line environment status for the primary workspace folder
    Status {
        /// Emit the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that pyproject.toml dependencies appear in uv.lock
    Health,
    /// Watch marker files and re-render on changes
    Watch,
    /// View the activity log (recent operations)
    #[command(alias = "logs")]
    Log {
        /// Filter log entries by keyword (env label, action, etc.)
        filter: Option<String>,
        /// Number of lines to show (default: 25)
        #[arg(short = 'n', long, default_value = "25")]
        lines: usize,
        /// Clear the entire log
        #[arg(long)]
        clear: bool,
    },
    /// Show the resolved configuration
    Config,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Restore terminal cursor on Ctrl+C.
    // dialoguer hides the cursor during prompts; SIGINT without cleanup
    // leaves the terminal with an invisible cursor.
    ctrlc::set_handler(move || {
        // Show cursor: ESC [ ? 25 h
        eprint!("\x1B[?25h");
        std::process::exit(130);
    })
    .ok();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            print_landing_screen(&cli.workspace);
            return Ok(());
        }
    };

    let result = (|| -> Result<(), Box<dyn std::error::Error>> {
        // Log and completions need no workspace; handle them up front.
        let command = match command {
            Commands::Log {
                filter,
                lines,
                clear,
            } => {
                if clear {
                    activity_log::clear_log();
                    println!("{} Activity log cleared.", "✓".green());
                    return Ok(());
                }
                let entries = activity_log::read_log(lines, filter.as_deref());
                if entries.is_empty() {
                    println!("No log entries.");
                } else {
                    for entry in &entries {
                        println!("{}", entry);
                    }
                    println!("{}", format!("({} entries)", entries.len()).dimmed());
                }
                return Ok(());
            }
            Commands::Completions { shell } => {
                let mut cmd = Cli::command();
                clap_complete::generate(shell, &mut cmd, "uvkit", &mut std::io::stdout());
                return Ok(());
            }
            other => other,
        };

        // Every remaining entry point needs workspace folders.
        let folders = workspace_folders(&cli.workspace)?;
        let primary = folders[0].clone();
        let config = Config::load(&primary);
        let ops = UvManager::new(config.clone());

        match command {
            Commands::List { json } => {
                let printer = if json { Printer::Silent } else { Printer::Default };
                let envs = scanner::scan_all(&folders, utils::current_interpreter().as_deref())?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&envs)?);
                    return Ok(());
                }
                if envs.is_empty() {
                    printer.info("No environments discovered.");
                    return Ok(());
                }

                let mut table =
                    table::new_table_with_headers(vec!["Environment", "Kind", "Python", "Active", "Path"]);
                for env in &envs {
                    table.add_row(vec![
                        env.label.clone(),
                        env.kind.to_string(),
                        env.version.clone().unwrap_or_else(|| "-".to_string()),
                        if env.is_active { "●".to_string() } else { String::new() },
                        env.path.display().to_string(),
                    ]);
                }
                printer.table(&table);
            }
            Commands::Create { path, python, yes } => {
                let default_location = primary.join(&config.venv_path);
                let location = match path {
                    Some(p) => utils::expand_tilde(p),
                    None if yes => default_location,
                    None => {
                        let input: String = dialoguer::Input::new()
                            .with_prompt("Path for the new uv environment")
                            .default(default_location.display().to_string())
                            .interact_text()?;
                        utils::expand_tilde(PathBuf::from(input))
                    }
                };

                let python = match python {
                    Some(v) => Some(v),
                    None if yes => {
                        (!config.python_version.is_empty()).then(|| config.python_version.clone())
                    }
                    None => {
                        let input: String = dialoguer::Input::new()
                            .with_prompt("Python version (optional, e.g. 3.11)")
                            .default(config.python_version.clone())
                            .allow_empty(true)
                            .interact_text()?;
                        (!input.trim().is_empty()).then(|| input.trim().to_string())
                    }
                };
                validation::validate_path(&location, false)?;
                if let Some(ref v) = python {
                    validation::validate_python_version(v)?;
                }

                let pb = indicatif::ProgressBar::new_spinner();
                pb.set_style(
                    indicatif::ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap(),
                );
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_message(format!("Creating uv environment at {}", location.display()));

                match ops.create(&location, python.as_deref()) {
                    Ok(env) => {
                        pb.finish_with_message(format!("{} {}", "✓".green(), env.label.bold()));
                        activity_log::log_activity("cli", "create", &env.id);
                    }
                    Err(e) => {
                        pb.finish_and_clear();
                        activity_log::log_activity(
                            "cli",
                            "create:error",
                            &format!("{} - {}", location.display(), e),
                        );
                        return Err(e.into());
                    }
                }
            }
            Commands::Rm { env, yes } => {
                let envs = scanner::scan_all(&folders, utils::current_interpreter().as_deref())?;
                let Some(record) = ops.resolve(&envs, &env).cloned() else {
                    activity_log::log_activity("cli", "rm:error", &format!("{} - not found", env));
                    eprintln!("{} Environment '{}' not found.", "Error:".red(), env);
                    return Ok(());
                };

                if !yes {
                    use dialoguer::{Confirm, theme::ColorfulTheme};
                    let confirmed = match Confirm::with_theme(&ColorfulTheme::default())
                        .with_prompt(format!("Remove environment '{}'?", record.label))
                        .default(false)
                        .interact()
                    {
                        Ok(v) => v,
                        Err(_) => {
                            // Ctrl+C — exit silently
                            println!();
                            return Ok(());
                        }
                    };
                    if !confirmed {
                        println!("Abort.");
                        return Ok(());
                    }
                }

                activity_log::log_activity("cli", "rm", &record.id);
                ops.delete(&record)?;
                println!("{} Removed {}", "✓".green(), record.path.display());
            }
            Commands::Activate { env } => {
                let envs = scanner::scan_all(&folders, utils::current_interpreter().as_deref())?;
                let Some(record) = ops.resolve(&envs, &env) else {
                    activity_log::log_activity("cli", "activate:error", &format!("{} - not found", env));
                    return Err(Box::new(UvError::not_found(&env)));
                };

                if ops.activate(record)? {
                    activity_log::log_activity("cli", "activate", &record.id);
                    println!(
                        "{} Interpreter set to {}",
                        "✓".green(),
                        record.python_path.display()
                    );
                } else {
                    activity_log::log_activity(
                        "cli",
                        "activate:error",
                        &format!("{} - interpreter missing", record.id),
                    );
                    eprintln!(
                        "{} No interpreter at {}",
                        "⚠".yellow(),
                        record.python_path.display()
                    );
                }
            }
            Commands::Packages { env, json } => {
                let printer = if json { Printer::Silent } else { Printer::Default };
                let envs = scanner::scan_all(&folders, utils::current_interpreter().as_deref())?;
                let Some(record) = ops.resolve(&envs, &env) else {
                    return Err(Box::new(UvError::not_found(&env)));
                };

                let packages = ops.list_packages(record);
                if json {
                    println!("{}", serde_json::to_string_pretty(&packages)?);
                    return Ok(());
                }
                if packages.is_empty() {
                    printer.info("No packages found (or listing failed).");
                    return Ok(());
                }

                let mut table = table::new_table_with_headers(vec!["Package", "Version"]);
                for pkg in &packages {
                    table.add_row(vec![pkg.name.clone(), pkg.version.clone()]);
                }
                printer.table(&table);
                printer.println(&format!("({} packages)", packages.len()).dimmed().to_string());
            }
            Commands::Install { env, packages } => {
                run_package_op(&ops, &folders, &env, &packages, PackageOp::Install)?;
            }
            Commands::Uninstall { env, packages } => {
                run_package_op(&ops, &folders, &env, &packages, PackageOp::Uninstall)?;
            }
            Commands::Tree {
                group_by,
                no_scripts,
            } => {
                let mut tree_config = config.clone();
                if let Some(mode) = group_by {
                    tree_config.group_by = mode;
                }
                if no_scripts {
                    tree_config.show_scripts = false;
                }

                let envs = scanner::scan_all(&folders, utils::current_interpreter().as_deref())?;
                let nodes = tree::build_tree(&envs, &tree_config);
                if nodes.is_empty() {
                    println!("No environments discovered.");
                } else {
                    print!("{}", tree::render(&nodes));
                }
            }
            Commands::Status { json } => {
                let summary = status::summarize(&primary, &config);
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    match &summary {
                        status::StatusSummary::Active { .. } => {
                            println!("{} {}", "●".green(), summary)
                        }
                        status::StatusSummary::NoEnvironment => {
                            println!("{} {}", "○".dimmed(), summary)
                        }
                    }
                }
            }
            Commands::Health => {
                let missing = match ops.lock_drift(&primary) {
                    Ok(missing) => missing,
                    Err(e) => {
                        activity_log::log_activity("cli", "health:error", &e.to_string());
                        return Err(e.into());
                    }
                };
                if missing.is_empty() {
                    println!(
                        "{} All dependencies are present in uv.lock.",
                        "✓".green()
                    );
                } else {
                    activity_log::log_activity("cli", "health", &missing.join(","));
                    eprintln!(
                        "{} Missing dependencies in uv.lock: {}",
                        "⚠".yellow(),
                        missing.join(", ")
                    );
                }
            }
            Commands::Watch => {
                run_watch(&folders, &config)?;
            }
            // Handled before workspace resolution.
            Commands::Log { .. } | Commands::Completions { .. } => unreachable!(),
            Commands::Config => {
                println!("{}:", "Configuration".cyan());
                println!("  {} = {:?}", "python_version".bold(), config.python_version);
                println!("  {} = {:?}", "venv_path".bold(), config.venv_path);
                println!("  {} = {:?}", "manager".bold(), config.manager);
                println!("  {} = {}", "group_by".bold(), config.group_by);
                println!("  {} = {}", "show_scripts".bold(), config.show_scripts);
            }
        }
        Ok(())
    })();

    if let Err(ref e) = result {
        eprintln!("Error: {}", e);
    }

    result
}

enum PackageOp {
    Install,
    Uninstall,
}

fn run_package_op(
    ops: &UvManager,
    folders: &[PathBuf],
    env: &str,
    packages: &[String],
    op: PackageOp,
) -> Result<(), Box<dyn std::error::Error>> {
    if packages.is_empty() {
        return Err("No packages specified".into());
    }

    // Match `list`: every workspace folder's environments are addressable.
    let envs = scanner::scan_all(folders, utils::current_interpreter().as_deref())?;
    let Some(record) = ops.resolve(&envs, env) else {
        return Err(Box::new(UvError::not_found(env)));
    };

    let (verb, action) = match op {
        PackageOp::Install => ("Installed", "install"),
        PackageOp::Uninstall => ("Uninstalled", "uninstall"),
    };

    for raw in packages {
        let pkg = PackageName::new(raw.as_str()).map_err(|e| e.to_string())?;
        let outcome = match op {
            PackageOp::Install => ops.install_package(record, &pkg),
            PackageOp::Uninstall => ops.uninstall_package(record, &pkg),
        };
        match outcome {
            Ok(()) => {
                activity_log::log_activity("cli", action, &format!("{} {}", record.id, pkg));
                println!("{} {} {}", "✓".green(), verb, pkg.bold());
            }
            Err(e) => {
                activity_log::log_activity(
                    "cli",
                    &format!("{}:error", action),
                    &format!("{} {} - {}", record.id, pkg, e),
                );
                return Err(e.into());
            }
        }
    }
    Ok(())
}

/// Foreground watch loop: rescan and re-render on every debounced refresh,
/// discarding scans that a newer signal made stale.
fn run_watch(folders: &[PathBuf], config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let watcher =
        watcher::RefreshWatcher::new(folders, &config.venv_path, watcher::DEBOUNCE_WINDOW)?;

    println!(
        "{} Watching {} folder(s) for pyproject.toml, uv.lock, {} changes (Ctrl+C to stop)",
        "●".cyan(),
        folders.len(),
        config.venv_path
    );
    let envs = scanner::scan_all(folders, utils::current_interpreter().as_deref())?;
    render_records(&envs, &folders[0], config);

    while let Some(signal) = watcher.recv() {
        // Coalesce anything that queued up while we were rendering.
        let generation = watcher.drain_pending().unwrap_or(signal);
        activity_log::log_activity("watch", "refresh", &format!("generation {}", generation));

        // A transient scan failure (e.g. a folder vanishing mid-burst) must
        // not kill the watch; the next event gets another chance.
        let envs = match scanner::scan_all(folders, utils::current_interpreter().as_deref()) {
            Ok(envs) => envs,
            Err(e) => {
                activity_log::log_activity("watch", "refresh:error", &e.to_string());
                continue;
            }
        };
        if !watcher.is_current(generation) {
            // A newer signal arrived mid-scan; its own refresh will render.
            continue;
        }

        println!();
        render_records(&envs, &folders[0], config);
    }

    Ok(())
}

fn render_records(envs: &[PythonEnvironment], primary: &std::path::Path, config: &Config) {
    let summary = status::summarize(primary, config);
    match &summary {
        status::StatusSummary::Active { .. } => println!("{} {}", "●".green(), summary),
        status::StatusSummary::NoEnvironment => println!("{} {}", "○".dimmed(), summary),
    }

    let nodes = tree::build_tree(envs, config);
    if nodes.is_empty() {
        println!("{}", "No environments discovered.".dimmed());
    } else {
        print!("{}", tree::render(&nodes));
    }
}

/// Resolve and validate workspace folders (default: current directory).
fn workspace_folders(args: &[PathBuf]) -> Result<Vec<PathBuf>, UvError> {
    let folders: Vec<PathBuf> = if args.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        args.iter().cloned().map(utils::expand_tilde).collect()
    };

    for folder in &folders {
        if !folder.is_dir() {
            return Err(UvError::MissingWorkspace(folder.clone()));
        }
    }
    Ok(folders)
}

fn print_landing_screen(workspace: &[PathBuf]) {
    use terminal_size::{Width, terminal_size};

    let full_version = env!("UVKIT_VERSION");
    let wide = terminal_size().map(|(Width(w), _)| w).unwrap_or(80) >= 60;

    eprintln!();
    eprintln!(
        "  {}  {}",
        "⚗".bold(),
        format!("uvkit v{}", full_version).dimmed()
    );
    eprintln!(
        "  {}",
        "Workspace toolkit for uv-managed Python environments".dimmed()
    );
    eprintln!();

    // Live status: discovered environments and the recorded interpreter.
    if let Ok(folders) = workspace_folders(workspace) {
        let count = scanner::scan_all(&folders, utils::current_interpreter().as_deref())
            .map(|e| e.len())
            .unwrap_or(0);
        eprintln!("  {} {} environment(s) discovered", "●".green(), count);
    }
    match utils::current_interpreter() {
        Some(python) => eprintln!("  {} Active: {}", "●".cyan(), python.display()),
        None => eprintln!("  {} No active interpreter", "○".dimmed()),
    }
    eprintln!();

    let commands: &[(&str, &str)] = &[
        ("list", "List discovered environments"),
        ("create", "Create a new uv environment"),
        ("rm", "Remove an environment from disk"),
        ("activate", "Select an environment's interpreter"),
        ("packages", "List installed packages"),
        ("install", "Install packages into an environment"),
        ("tree", "Render the environment tree"),
        ("status", "One-line environment status"),
        ("health", "Check uv.lock against pyproject.toml"),
        ("watch", "Re-render on marker-file changes"),
        ("log", "View recent operations"),
    ];

    eprintln!("  {}", "Commands".bold().underline());
    for (name, hint) in commands {
        if wide {
            eprintln!("    {:<10} {}", name.cyan(), hint.dimmed());
        } else {
            eprintln!("    {}", name.cyan());
        }
    }
    eprintln!();
    eprintln!("  {}", "Run 'uvkit <command> --help' for details.".dimmed());
    eprintln!();
}

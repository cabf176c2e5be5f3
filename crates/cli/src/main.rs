use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use meganav_engine::{ProcessOptions, SearchConfig, process, search_tree};
use meganav_types::{NavigationConfig, ThemeMode};
use meganav_util::{LoadError, MenuBehavior, UserPreferences, is_truthy, load_navigation, load_navigation_from_env, resolve_app_path};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const LOG_PATH_ENV: &str = "MEGANAV_LOG_PATH";
const REDUCED_MOTION_ENV: &str = "MEGANAV_REDUCED_MOTION";

#[derive(Debug, Parser)]
#[command(name = "meganav", version, about = "Mega-menu site navigation in the terminal")]
struct Cli {
    /// Navigation document (.json, .yaml or .yml).
    #[arg(long, global = true, value_name = "FILE")]
    nav: Option<PathBuf>,
    /// Color theme: light, dark or auto.
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeMode>,
    /// Reveal panels without animation.
    #[arg(long)]
    reduced_motion: bool,
    /// How desktop panels open.
    #[arg(long, value_enum)]
    menu_behavior: Option<BehaviorArg>,
    /// Permission tag held by the viewer; repeat for several.
    #[arg(long = "permission", value_name = "TAG", global = true)]
    permissions: Vec<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the navigation and print matches as JSON.
    Search {
        query: String,
        #[arg(long, default_value_t = SearchConfig::FULL.limit)]
        limit: usize,
    },
    /// Load and validate a navigation document.
    Validate { file: PathBuf },
    /// Manage saved preferences and usage history.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Debug, Subcommand)]
enum PrefsAction {
    /// Print preferences and usage as JSON.
    Export,
    /// Replace preferences and usage from a JSON document.
    Import { file: PathBuf },
    /// Forget usage history and favourites.
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BehaviorArg {
    Hover,
    Click,
}

impl From<BehaviorArg> for MenuBehavior {
    fn from(value: BehaviorArg) -> Self {
        match value {
            BehaviorArg::Hover => MenuBehavior::Hover,
            BehaviorArg::Click => MenuBehavior::Click,
        }
    }
}

fn parse_theme(value: &str) -> Result<ThemeMode, String> {
    meganav_tui::parse_mode(value).ok_or_else(|| format!("unknown theme '{value}' (expected light, dark or auto)"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        None => {
            init_file_tracing()?;
            let config = load_navigation_from_env(cli.nav.as_deref()).context("failed to load navigation")?;
            let reduced_motion = cli.reduced_motion || std::env::var(REDUCED_MOTION_ENV).is_ok_and(|value| is_truthy(&value));
            let options = meganav_tui::RunOptions {
                theme: cli.theme,
                reduced_motion,
                behavior: cli.menu_behavior.map(MenuBehavior::from),
                permissions: cli.permissions,
                preferences: None,
            };
            meganav_tui::run(config, options).await
        }
        Some(command) => {
            init_stderr_tracing();
            match command {
                Command::Search { query, limit } => run_search(cli.nav.as_deref(), cli.permissions, &query, limit),
                Command::Validate { file } => run_validate(&file),
                Command::Prefs { action } => run_prefs(action),
            }
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).try_init();
}

/// The TUI owns the terminal, so logs go to a file.
fn init_file_tracing() -> Result<()> {
    let path = resolve_app_path(LOG_PATH_ENV, true, "meganav.log");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn processed(config: &NavigationConfig, permissions: Vec<String>) -> meganav_types::NavigationTree {
    let options = ProcessOptions::default()
        .with_permissions(permissions)
        .with_max_columns(usize::from(config.max_columns));
    process(&config.items, &options)
}

fn run_search(nav: Option<&Path>, permissions: Vec<String>, query: &str, limit: usize) -> Result<()> {
    let config = load_navigation_from_env(nav).context("failed to load navigation")?;
    let tree = processed(&config, permissions);
    let results: Vec<_> = search_tree(&tree, query, limit)
        .into_iter()
        .map(|result| {
            json!({
                "label": result.link.label,
                "href": result.link.href,
                "breadcrumb": result.breadcrumb,
                "newTab": result.link.opens_new_tab(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn run_validate(file: &Path) -> Result<()> {
    match load_navigation(file) {
        Ok(config) => {
            let links = config.items.links().count();
            println!("{}: {} items, {} links, OK", file.display(), config.items.len(), links);
            Ok(())
        }
        Err(LoadError::Invalid(errors)) => {
            for error in &errors {
                eprintln!("  - {error}");
            }
            bail!("{} has {} validation error(s)", file.display(), errors.len());
        }
        Err(error) => Err(error).with_context(|| format!("failed to load {}", file.display())),
    }
}

fn run_prefs(action: PrefsAction) -> Result<()> {
    let preferences = UserPreferences::new().context("failed to open preferences")?;
    match action {
        PrefsAction::Export => println!("{}", preferences.export()?),
        PrefsAction::Import { file } => {
            let data = fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
            preferences.import(&data).context("failed to import preferences")?;
            println!("Imported preferences from {}", file.display());
        }
        PrefsAction::Reset => {
            preferences.reset_usage()?;
            println!("Usage history cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_and_subcommands() {
        let cli = Cli::parse_from(["meganav", "--theme", "system", "--permission", "staff", "--permission", "beta", "search", "sensor"]);
        assert_eq!(cli.theme, Some(ThemeMode::Auto));
        assert_eq!(cli.permissions, vec!["staff", "beta"]);
        assert!(matches!(cli.command, Some(Command::Search { ref query, limit }) if query == "sensor" && limit == 20));
    }

    #[test]
    fn validate_reports_invalid_documents() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("tempfile");
        writeln!(file, "items:\n  - label: \"\"\n    columns: []").expect("write");
        assert!(run_validate(file.path()).is_err());
    }
}

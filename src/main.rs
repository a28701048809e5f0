use anyhow::{bail, Context, Result};
use book_finder::config::{
    default_config_path, default_log_path, find_config_file, load_config, save_config, Config,
    LogFormat, LoggingConfig,
};
use book_finder::search::{FetchCoordinator, PagerView, Pagination, SearchSession, StatusLine};
use book_finder::sources::{OpenLibrarySource, Source};
use book_finder::tui::{run_app, App};
use book_finder::ui::{
    cards, pager_line, print_book_plain, print_book_table, print_pager, print_search_header,
    print_status, print_status_line, BookCard, Spinner, Status,
};
use book_finder::utils::{is_terminal, HttpClient};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Finder - Search books by title using Open Library
#[derive(Parser, Debug)]
#[command(name = "book-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search books by title using Open Library", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides api.timeout_seconds)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive search screen (the default)
    Tui {
        /// Start with this query already submitted
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Search once and print a single page of results
    #[command(alias = "s")]
    Search {
        /// Book title to search for
        title: String,

        /// Result page (20 books per page)
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// JSON shape of a one-shot search
#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    page: usize,
    total_pages: usize,
    total_results: usize,
    books: Vec<BookCard>,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Book Finder - Environment Variables");
    println!();
    println!("API Settings:");
    println!("  BOOK_FINDER__API__SEARCH_ENDPOINT   Title search endpoint (default: https://openlibrary.org/search.json)");
    println!("  BOOK_FINDER__API__COVER_ENDPOINT    Cover image host (default: https://covers.openlibrary.org)");
    println!("  BOOK_FINDER__API__USER_AGENT        User-Agent header sent with requests");
    println!("  BOOK_FINDER__API__TIMEOUT_SECONDS   Request timeout in seconds (default: none)");
    println!();
    println!("Search Settings:");
    println!("  BOOK_FINDER__SEARCH__DEBOUNCE_MS    Quiet period before typed input is searched (default: 600)");
    println!();
    println!("Logging Settings:");
    println!("  BOOK_FINDER__LOGGING__LEVEL         Default log level (default: info)");
    println!("  BOOK_FINDER__LOGGING__FORMAT        Log format: text or json (default: text)");
    println!("  BOOK_FINDER__LOGGING__FILE          Log file (interactive mode defaults to the cache dir)");
    println!();
    println!("Global Proxy Settings:");
    println!("  HTTP_PROXY                          HTTP proxy URL (e.g., http://proxy:8080)");
    println!("  HTTPS_PROXY                         HTTPS proxy URL (e.g., https://proxy:8080)");
    println!("  NO_PROXY                            Comma-separated list of hosts to bypass proxy");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                            Rust logging filter (e.g., book_finder=debug)");
    println!();
    println!("Example:");
    println!("  export BOOK_FINDER__SEARCH__DEBOUNCE_MS=\"300\"");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    // `config init` must work even when the target file is missing or broken
    if let Some(Commands::Config {
        action: ConfigCommands::Init { force },
    }) = &cli.command
    {
        return init_config(cli.config.as_deref(), *force);
    }

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = Some(timeout);
    }

    let interactive = matches!(cli.command, None | Some(Commands::Tui { .. }));
    init_tracing(cli.verbose, cli.quiet, &config.logging, interactive)?;

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command {
        None => run_tui(&config, None).await,
        Some(Commands::Tui { query }) => run_tui(&config, query).await,
        Some(Commands::Search { title, page }) => {
            run_search(&config, &title, page, cli.output, cli.quiet).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigCommands::Path => {
                print_config_path(config_path.as_deref());
                Ok(())
            }
            ConfigCommands::Init { force } => init_config(cli.config.as_deref(), force),
        },
    }
}

fn init_tracing(
    verbose: u8,
    quiet: bool,
    logging: &LoggingConfig,
    interactive: bool,
) -> Result<()> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_finder={}", level)),
    );

    // The interactive screen owns the terminal, so its logs always go to a file
    let log_file = logging
        .file
        .clone()
        .or_else(|| interactive.then(default_log_path).flatten());

    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(&path)?)), false),
        None => (
            BoxMakeWriter::new(std::io::stderr),
            std::io::stderr().is_terminal(),
        ),
    };

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .init(),
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

fn build_source(config: &Config) -> Result<Arc<OpenLibrarySource>> {
    let http = HttpClient::from_config(&config.api).context("failed to build HTTP client")?;
    Ok(Arc::new(OpenLibrarySource::with_endpoint(
        http,
        &config.api.search_endpoint,
    )))
}

async fn run_tui(config: &Config, query: Option<String>) -> Result<()> {
    let source = build_source(config)?;
    tracing::info!(
        source = source.name(),
        endpoint = source.endpoint(),
        debounce_ms = config.search.debounce_ms,
        "Starting interactive search"
    );

    let mut session = SearchSession::new(source, config.search.debounce());
    if let Some(query) = query {
        session.submit(query);
    }

    let mut app = App::new(session, config.api.cover_endpoint.clone());
    run_app(&mut app).await
}

async fn run_search(
    config: &Config,
    title: &str,
    page: usize,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let source = build_source(config)?;
    tracing::debug!(
        source = source.name(),
        endpoint = source.endpoint(),
        title,
        page,
        "One-shot search"
    );
    let coordinator = FetchCoordinator::new(source);
    let format = resolve_format(format);

    let spinner = (format == OutputFormat::Table && !quiet)
        .then(|| Spinner::new(&StatusLine::Loading.to_string()));
    let started = Instant::now();
    let result = coordinator.search(title, page).await;
    if let Some(spinner) = &spinner {
        spinner.finish();
    }

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, title, page, "Search failed");
            print_status_line(&StatusLine::Error(err.user_message().to_string()));
            std::process::exit(1);
        }
    };

    let pagination = Pagination::at(response.page, response.total_results);
    let pager = PagerView::from_pagination(&pagination);
    let books = cards(&response.books, &config.api.cover_endpoint);

    match format {
        OutputFormat::Json => {
            let output = SearchOutput {
                query: title,
                page: pagination.page(),
                total_pages: pagination.total_pages(),
                total_results: pagination.total_results(),
                books,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            print_book_plain(&books);
            if let Some(pager) = &pager {
                println!("{}", pager_line(pager));
            }
        }
        OutputFormat::Table => {
            if books.is_empty() {
                if !title.trim().is_empty() {
                    print_status_line(&StatusLine::NoResults(title.to_string()));
                }
            } else {
                if !quiet {
                    print_search_header(title, books.len(), started.elapsed());
                }
                print_book_table(&books);
            }
            if let Some(pager) = &pager {
                print_pager(pager);
            }
        }
        OutputFormat::Auto => unreachable!("resolved above"),
    }
    Ok(())
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto if is_terminal() => OutputFormat::Table,
        OutputFormat::Auto => OutputFormat::Json,
        other => other,
    }
}

fn init_config(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path().context("no configuration directory on this platform")?,
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    save_config(&Config::default(), &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    print_status(
        Status::Success,
        &format!("Wrote default configuration to {}", path.display()),
    );
    Ok(())
}

fn print_config_path(active: Option<&Path>) {
    match active {
        Some(path) => println!("{}", path.display()),
        None => {
            print_status(Status::Info, "No configuration file found; using defaults");
            if let Some(path) = default_config_path() {
                println!("Default location: {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_values() {
        assert_eq!(OutputFormat::Auto as i32, 0);
        assert_eq!(OutputFormat::Table as i32, 1);
        assert_eq!(OutputFormat::Json as i32, 2);
        assert_eq!(OutputFormat::Plain as i32, 3);
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["book-finder"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert_eq!(cli.timeout, None);
        assert!(!cli.env);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["book-finder", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["book-finder", "-vv"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["book-finder", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag() {
        let cli = Cli::parse_from(["book-finder", "-q"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["book-finder", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["book-finder", "--output", "plain"]);
        assert_eq!(cli.output, OutputFormat::Plain);
    }

    #[test]
    fn test_cli_timeout_and_config() {
        let cli = Cli::parse_from([
            "book-finder",
            "--timeout",
            "15",
            "--config",
            "/path/to/config.toml",
        ]);
        assert_eq!(cli.timeout, Some(15));
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from(["book-finder", "search", "Dune"]);
        match cli.command {
            Some(Commands::Search { title, page }) => {
                assert_eq!(title, "Dune");
                assert_eq!(page, 1);
            }
            _ => panic!("Expected Search command"),
        }

        let cli = Cli::parse_from(["book-finder", "s", "Dune", "--page", "3", "-o", "json"]);
        match cli.command {
            Some(Commands::Search { page, .. }) => assert_eq!(page, 3),
            _ => panic!("Expected Search command"),
        }
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_tui_command() {
        let cli = Cli::parse_from(["book-finder", "tui", "--query", "Emma"]);
        match cli.command {
            Some(Commands::Tui { query }) => assert_eq!(query.as_deref(), Some("Emma")),
            _ => panic!("Expected Tui command"),
        }
    }

    #[test]
    fn test_cli_config_commands() {
        let cli = Cli::parse_from(["book-finder", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Init { force: true }
            })
        ));

        let cli = Cli::parse_from(["book-finder", "config", "show"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Show
            })
        ));
    }

    #[test]
    fn test_resolve_format_keeps_explicit_choice() {
        assert_eq!(resolve_format(OutputFormat::Plain), OutputFormat::Plain);
        assert_ne!(resolve_format(OutputFormat::Auto), OutputFormat::Auto);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config(Some(&path), false).unwrap();
        assert!(path.exists());
        assert!(init_config(Some(&path), false).is_err());
        assert!(init_config(Some(&path), true).is_ok());
    }
}

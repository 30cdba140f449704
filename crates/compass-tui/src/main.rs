//! Conceptual Compass - terminal client for query analysis
//!
//! Type a question, send it to the analysis service, read the insight.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use compass_core::controller::OutputPanel;
use compass_core::{AnalysisClient, Config, EndpointSource, PanelContent, QueryAnalyzer};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use handler::Action;
use tui::{AppEvent, EventHandler};

#[derive(Parser)]
#[command(name = "compass")]
#[command(version, about = "Send a query to the Conceptual Compass analysis service and read the insight", long_about = None)]
struct Cli {
    /// Analysis endpoint URL (overrides COMPASS_ENDPOINT and the config file)
    #[arg(short, long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive TUI (default)
    Tui,

    /// Analyze one query and print the result
    Ask {
        /// Print the panel markup instead of plain text
        #[arg(long)]
        html: bool,

        /// Query text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Inspect or change the stored configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective endpoint and where it came from
    Show,

    /// Store an endpoint in the config file
    SetEndpoint { url: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Tui) => {
            // Logs go to a file so they don't corrupt the screen
            setup_tui_logging(cli.debug)?;
            let (endpoint, source) = Config::load_or_default().effective_endpoint(cli.endpoint.as_deref())?;
            run_tui(AnalysisClient::new(&endpoint), source).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Ask { html, query }) => {
            setup_logging(cli.debug)?;
            let (endpoint, _) = Config::load_or_default().effective_endpoint(cli.endpoint.as_deref())?;
            ask(AnalysisClient::new(&endpoint), &query.join(" "), html).await
        }
        Some(Commands::Config { action }) => {
            setup_logging(cli.debug)?;
            run_config(action, cli.endpoint.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_tui(client: AnalysisClient, source: EndpointSource) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(client, source);
    let mut events = EventHandler::new();
    tracing::info!(endpoint = %app.endpoint(), source = source.as_str(), "TUI started");

    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn event_loop(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };

        if let Action::Submit(query) = handler::handle_event(app, event) {
            // One task per submission; overlapping requests are neither cancelled nor merged
            let analyzer = app.analyzer.clone();
            let tx = events.sender();
            tokio::spawn(async move {
                let outcome = analyzer.analyze(&query).await;
                let _ = tx.send(AppEvent::AnalysisFinished(outcome));
            });
        }
    }
    Ok(())
}

/// Prints panel updates: progress to stderr, the final panel to stdout.
struct ConsolePanel {
    html: bool,
    last: Option<PanelContent>,
}

impl OutputPanel for ConsolePanel {
    fn show(&mut self, content: PanelContent) {
        match &content {
            PanelContent::Placeholder => {}
            PanelContent::Loading => eprintln!("{}", content.to_plain_text()),
            _ if self.html => println!("{}", content.to_markup()),
            _ => println!("{}", content.to_plain_text()),
        }
        self.last = Some(content);
    }
}

async fn ask(client: AnalysisClient, input: &str, html: bool) -> Result<ExitCode> {
    let analyzer = QueryAnalyzer::new(client);
    let mut panel = ConsolePanel { html, last: None };

    analyzer.submit_and_render(input, &mut panel).await;
    std::io::stdout().flush()?;

    let failed = panel.last.as_ref().map_or(true, PanelContent::is_error);
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn run_config(action: ConfigCommands, flag: Option<&str>) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let config = Config::load_or_default();
            let (endpoint, source) = config.effective_endpoint(flag)?;
            println!("config file: {}", Config::get_config_path()?.display());
            println!("endpoint:    {} ({})", endpoint, source.as_str());
        }
        ConfigCommands::SetEndpoint { url } => {
            let endpoint = compass_core::config::validate_endpoint(&url)?;
            let mut config = Config::load_or_default();
            config.endpoint = Some(endpoint.clone());
            config.save()?;
            tracing::info!(endpoint = %endpoint, "endpoint saved");
            println!("Saved endpoint {}", endpoint);
        }
    }
    Ok(())
}

/// Setup tracing/logging for CLI commands (non-TUI)
fn setup_logging(debug: bool) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("compass=debug,compass_core=debug")
        } else {
            EnvFilter::new("compass=info,compass_core=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

/// Setup tracing/logging for TUI mode (logs to file)
fn setup_tui_logging(debug: bool) -> Result<()> {
    use std::fs::OpenOptions;
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("conceptual-compass")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("compass.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("compass=debug,compass_core=debug")
        } else {
            EnvFilter::new("compass=warn,compass_core=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_target(false)
        .with_ansi(false) // Disable ANSI colors in file
        .init();

    Ok(())
}

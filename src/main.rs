mod config;
mod history;
mod logging;
mod persistence;
mod suite;
mod tui;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{Generator, Shell, generate};
use config::{Config, ConfigError};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use persistence::FileStore;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use suite::backend::{MockBackend, SeoBackend};
use suite::export::{self, CsvExport, ExportFormat};
use suite::route::{Route, ToolKind};
use suite::tools::Tool;
use suite::{History, ToolSuite, with_tool};
use tui::app::App;
use tui::handlers::KeyEventHandler;
use tui::ui;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "seo-studio")]
#[command(about = "Keyword research, SERP analysis, content briefs and SEO audits in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, help = "Page to open the TUI on, e.g. serpMonitoring or seoAudit")]
    page: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
    #[command(about = "Run one tool and save the result")]
    Generate {
        #[arg(value_enum, help = "Tool to run")]
        tool: ToolKind,
        #[arg(help = "Tool inputs in form order, e.g. keyword then domain")]
        inputs: Vec<String>,
    },
    #[command(about = "Inspect and manage saved results")]
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key (data_dir, mock_latency_ms or log_file)")]
        key: String,
        #[arg(help = "Configuration value", value_hint = ValueHint::AnyPath)]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

#[derive(Subcommand)]
enum SavedAction {
    #[command(about = "List saved results, newest first")]
    List {
        #[arg(value_enum)]
        tool: ToolKind,
    },
    #[command(about = "Print one saved result")]
    Show {
        #[arg(value_enum)]
        tool: ToolKind,
        id: u64,
    },
    #[command(about = "Delete one saved result")]
    Delete {
        #[arg(value_enum)]
        tool: ToolKind,
        id: u64,
    },
    #[command(about = "Export one saved result as JSON or CSV")]
    Export {
        #[arg(value_enum)]
        tool: ToolKind,
        id: u64,
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
        #[arg(long, short, help = "Output file (defaults to a name derived from the inputs)", value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Commands::Config { action }) => handle_config_command(action).map_err(anyhow::Error::from),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
            Ok(())
        }
        Some(Commands::Generate { tool, inputs }) => {
            logging::init_stderr();
            handle_generate(tool, inputs)
        }
        Some(Commands::Saved { action }) => {
            logging::init_stderr();
            handle_saved_command(action)
        }
        None => run_main_app(cli.page.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in config::KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

struct Session {
    suite: ToolSuite,
    backend: MockBackend,
    data_dir: PathBuf,
}

fn open_session(config: &Config) -> Result<Session> {
    let data_dir = config.data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "opening saved results");
    Ok(Session {
        suite: ToolSuite::new(Box::new(FileStore::new(&data_dir))),
        backend: MockBackend::new(Duration::from_millis(config.mock_latency_ms)),
        data_dir,
    })
}

fn handle_generate(tool: ToolKind, inputs: Vec<String>) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;
    with_tool!(tool, T => generate_once::<T>(&mut session.suite, &session.backend, inputs))
}

fn generate_once<T: Tool>(suite: &mut ToolSuite, backend: &dyn SeoBackend, inputs: Vec<String>) -> Result<()> {
    if inputs.len() > T::FIELDS.len() {
        bail!("{} takes at most {} inputs: {}", T::TITLE, T::FIELDS.len(), T::FIELDS.join(", "));
    }
    let mut query = T::Query::default();
    for (i, value) in inputs.into_iter().enumerate() {
        if let Some(field) = T::field_mut(&mut query, i) {
            *field = value;
        }
    }
    T::validate(&query)?;

    let result = T::request(backend, &query).map_err(|e| {
        tracing::error!(tool = T::TITLE, error = %e, "request failed");
        anyhow!(T::failure_message(&e))
    })?;

    // one-shot: nothing to undo once the process exits
    let mut history = History::new();
    let id = suite.commit::<T>(&mut history, query, result.clone())?;

    println!("Saved {} #{}", T::TITLE, id);
    for line in T::describe(&result) {
        println!("{}", line);
    }
    Ok(())
}

fn handle_saved_command(action: SavedAction) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;

    match action {
        SavedAction::List { tool } => with_tool!(tool, T => list_saved::<T>(&session.suite)),
        SavedAction::Show { tool, id } => with_tool!(tool, T => show_saved::<T>(&session.suite, id)),
        SavedAction::Delete { tool, id } => {
            let mut history = History::new();
            let deleted = with_tool!(tool, T => session.suite.delete::<T>(&mut history, id))?;
            if !deleted {
                bail!("No saved result with id {}", id);
            }
            println!("Deleted #{}", id);
            Ok(())
        }
        SavedAction::Export {
            tool,
            id,
            format,
            output,
        } => {
            let dir = std::env::current_dir().context("Failed to read current directory")?;
            let path = with_tool!(tool, T => export_saved::<T>(&session.suite, id, format, &dir, output.as_deref()))?;
            println!("Exported to {}", path.display());
            Ok(())
        }
    }
}

fn list_saved<T: Tool>(suite: &ToolSuite) -> Result<()> {
    let page = suite.page::<T>();
    if page.saved.is_empty() {
        println!("No saved {} results.", T::TITLE);
        return Ok(());
    }
    for snapshot in &page.saved {
        println!("{:<15} {:<26} {}", snapshot.id, snapshot.timestamp, T::summary(&snapshot.query));
    }
    Ok(())
}

fn show_saved<T: Tool>(suite: &ToolSuite, id: u64) -> Result<()> {
    let snapshot = suite
        .page::<T>()
        .find(id)
        .ok_or_else(|| anyhow!("No saved {} result with id {}", T::TITLE, id))?;
    println!("{} #{} - {}", T::TITLE, snapshot.id, T::summary(&snapshot.query));
    println!("Saved at {}", snapshot.timestamp);
    println!();
    for line in T::describe(&snapshot.result) {
        println!("{}", line);
    }
    Ok(())
}

fn export_saved<T: CsvExport>(
    suite: &ToolSuite,
    id: u64,
    format: ExportFormat,
    dir: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<PathBuf> {
    let snapshot = suite
        .page::<T>()
        .find(id)
        .ok_or_else(|| anyhow!("No saved {} result with id {}", T::TITLE, id))?;
    export::write_export::<T>(&snapshot.query, &snapshot.result, format, dir, output)
}

fn run_main_app(page: Option<&str>) -> Result<()> {
    let config = Config::load().map_err(|e| anyhow!("Configuration error: {}", e))?;
    logging::init_file(&config.log_path()?)?;
    tracing::info!("starting TUI");

    let session = open_session(&config)?;
    let export_dir = session.data_dir.join("exports");
    let backend: Arc<dyn SeoBackend> = Arc::new(session.backend);
    let mut app = App::new(session.suite, backend, export_dir);
    if let Some(key) = page {
        app.set_route(Route::from_key(key));
    }

    run_tui(&mut app)?;

    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // wake up on the tick so finished requests get drawn without a keypress
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key)?;
            }
        }
        app.drain_completions();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

// crates/journal-terminal/src/main.rs

mod app;
mod components;
mod network;
mod route;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use journal_client::config::CONFIG_FILE;
use journal_client::{JournalApi, JournalConfig};
use journal_core::{AccessState, Role, UiMode};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::network::{JournalWorker, WorkerReply, WorkerRequest};

#[derive(Parser)]
#[clap(name = "journal-terminal")]
#[clap(about = "Terminal dashboard for the trading journal")]
struct Cli {
    /// Config file (default: <state dir>/journal.toml if present)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Journal API base URL
    #[clap(short, long)]
    api_url: Option<String>,

    /// Directory for the persisted identity and mode
    #[clap(long)]
    state_dir: Option<PathBuf>,

    /// Directory with trades.json / metrics.json / equity.json for demo mode
    #[clap(long)]
    fixture_dir: Option<PathBuf>,

    /// Start in this data source mode (demo or api)
    #[clap(short, long)]
    mode: Option<UiMode>,

    /// Act as this role (ADMIN or TRADER)
    #[clap(short, long)]
    role: Option<Role>,

    /// Act as this telegram user id
    #[clap(short, long)]
    user_id: Option<i64>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Write logs to this file (default with --debug: <state dir>/journal-terminal.log)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut JournalConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.state_dir {
            config.state_dir = dir.clone();
        }
        if let Some(dir) = &self.fixture_dir {
            config.fixture_dir = Some(dir.clone());
        }
    }

    /// Persist any identity or mode forced on the command line.
    fn seed_store(&self, api: &JournalApi) -> Result<()> {
        if let Some(mode) = self.mode {
            api.set_mode(mode)?;
        }
        if self.role.is_some() || self.user_id.is_some() {
            let current = api.access();
            let access = AccessState::new(
                self.role.unwrap_or(current.role),
                self.user_id.unwrap_or(current.identity_id),
            );
            api.set_access(&access)?;
        }
        Ok(())
    }
}

/// The terminal is in raw mode while running, so logs only ever go to a
/// file and only when asked for.
fn init_logging(cli: &Cli, config: &JournalConfig) -> Result<()> {
    let path = match (&cli.log_file, cli.debug) {
        (Some(path), _) => path.clone(),
        (None, true) => config.state_dir.join("journal-terminal.log"),
        (None, false) => return Ok(()),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --state-dir also moves where the implicit config file is looked up.
    let config_file = cli.config.clone().or_else(|| {
        cli.state_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE))
            .filter(|path| path.is_file())
    });
    let mut config = JournalConfig::load(config_file.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);
    init_logging(&cli, &config)?;
    info!("starting with {:?}", config);

    let api = config.build_api().context("initialising data access")?;
    cli.seed_store(&api)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let app = App::new(api.clone());
    let res = run_app(&mut terminal, app, api).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("terminal loop failed: {:?}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App, api: JournalApi) -> Result<()> {
    // Channels between the UI loop and the fetch worker
    let (tx_to_worker, rx_from_app) = mpsc::unbounded_channel::<WorkerRequest>();
    let (tx_to_app, mut rx_from_worker) = mpsc::unbounded_channel::<WorkerReply>();

    app.set_worker_sender(tx_to_worker);

    let worker = JournalWorker::new(api, tx_to_app);
    let worker_handle = tokio::spawn(worker.run(rx_from_app));

    app.start();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Ok(reply) = rx_from_worker.try_recv() {
            app.handle_reply(reply);
        }

        if app.should_quit {
            break;
        }
    }

    worker_handle.abort();
    Ok(())
}

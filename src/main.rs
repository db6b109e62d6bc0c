mod app;
mod config;
mod input;
mod models;
mod network;
mod prompts;
mod scene;
mod theme;
mod ui;
mod utils;
mod wizard;

use std::{
    fs,
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Settings;
use crate::network::GeminiClient;

const FRAME_TIME: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "storyforge", version, about = "Forge a short story in four steps")]
struct Cli {
    /// Extra config file layered over the defaults and the user config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gemini model to use for this run
    #[arg(short, long)]
    model: Option<String>,

    /// Hide the rotating contact panel
    #[arg(long)]
    no_scene: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = config::ensure_user_config() {
        eprintln!("storyforge: could not create user config: {e:#}");
    }
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(model) = cli.model {
        settings.gemini_model = model;
    }
    if cli.no_scene {
        settings.show_scene = false;
    }

    let _guard = init_logging(&settings.log_dir())?;
    info!(model = %settings.gemini_model, "starting storyforge");

    let runtime = tokio::runtime::Runtime::new()?;
    let client = GeminiClient::from_settings(&settings)?;
    let mut app = App::new(
        Arc::new(client),
        runtime.handle().clone(),
        Duration::from_millis(settings.advance_delay_ms),
        settings.show_scene,
    );
    if settings.api_key().is_none() && settings.prompt_for_api_key {
        app.api_key_prompt = Some(String::new());
    }

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, &settings);
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "storyforge exited with an error");
    }
    result
}

fn init_logging(dir: &Path) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(dir).with_context(|| format!("could not create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::never(dir, "storyforge.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut last_frame = Instant::now();
    loop {
        app.drain_events();
        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(FRAME_TIME)? {
            match event::read()? {
                Event::Key(key) => {
                    if !input::handle_key(key, app, settings)? {
                        break;
                    }
                }
                Event::Resize(_, _) => terminal.autoresize()?,
                _ => {}
            }
        }
    }
    info!("bye");
    Ok(())
}

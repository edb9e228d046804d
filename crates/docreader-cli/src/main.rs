mod app;
mod view;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use docreader_config::{Config, SearchModeSetting};
use docreader_engine::{
    DocViewer, FsContentSource, SearchIndexer, SearchMode, VecSink, ViewerOptions, io,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::{self, File},
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

use crate::app::{App, Flow};

/// Frame interval while idle; rendering and search pump on every frame.
const FRAME: Duration = Duration::from_millis(16);

fn init_logging() -> Result<PathBuf> {
    let log_dir = Config::config_dir();
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("docreader.log");
    let file = File::create(&log_path)?;

    // The terminal belongs to the UI, so log lines go to a file.
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(log_path)
}

fn viewer_options(config: Option<&Config>) -> ViewerOptions {
    let Some(config) = config else {
        return ViewerOptions::default();
    };
    ViewerOptions {
        lines_per_tick: config.render.lines_per_tick,
        debounce: Duration::from_millis(config.search.debounce_ms),
        lead_margin: config.navigation.lead_margin,
        search_mode: match config.search.mode {
            SearchModeSetting::FileName => SearchMode::FileName,
            SearchModeSetting::Content => SearchMode::Content,
        },
    }
}

fn main() -> Result<()> {
    let log_path = init_logging()?;
    log::info!("docreader starting up, logging to {}", log_path.display());

    // Determine notes path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) if args.len() == 2 => {
            log::warn!("ignoring config file: {e}");
            None
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            process::exit(1);
        }
    };

    let (notes_path, from_config) = match (args.len(), &config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.notes_path.clone(), true),
        (1, None) => {
            eprintln!("Error: No notes path provided and no config file found");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [notes-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_notes_dir(&notes_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notes path '{}'{} is invalid: {e}",
            notes_path.display(),
            source
        );
        process::exit(1);
    }

    let corpus = io::load_corpus(&notes_path)?;
    log::info!("{} documents under {}", corpus.len(), notes_path.display());
    let indexer = SearchIndexer::new(corpus, FsContentSource::new(&notes_path));
    let viewer = DocViewer::new(VecSink::default(), indexer, viewer_options(config.as_ref()));
    let mut app = App::new(viewer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.pump()?;
        terminal.draw(|f| view::ui(f, app))?;

        if !event::poll(FRAME)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key) == Flow::Quit
        {
            return Ok(());
        }
    }
}

// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod loader;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::{AppContext, SharedContext};
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::WriteLogger;
use std::{
    fs::File,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

/// Sends log output to a file; the terminal belongs to the UI.
fn init_file_logger(ctx: &dyn AppContext, config: &Config) {
    let path = match ctx.get_log_path() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            return;
        }
    };
    match File::create(&path) {
        Ok(file) => {
            // Fails only if a logger is already installed, which is fine.
            let _ = WriteLogger::init(
                config.log_level_filter(),
                simplelog::Config::default(),
                file,
            );
        }
        Err(e) => eprintln!("Warning: cannot open log file {}: {}", path.display(), e),
    }
}

pub async fn run(
    ctx: SharedContext,
    config: Config,
    initial_file: Option<PathBuf>,
) -> Result<()> {
    init_file_logger(ctx.as_ref(), &config);

    // Panic Hook
    let panic_log = ctx
        .get_cache_dir()
        .map(|d| d.join("rundown_panic.log"))
        .unwrap_or_else(|_| PathBuf::from("rundown_panic.log"));
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&panic_log)
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let tick_interval = config.tick_interval();
    let default_duration = config.default_duration_mins;

    // --- 1. STATE INIT ---
    let mut app_state = AppState::new_with_ctx(ctx.clone(), config, Local::now().naive_local());
    app_state.restore();
    log::info!("TUI started with {} item(s)", app_state.run.items.len());

    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- 2. IMPORT THREAD ---
    tokio::spawn(loader::run_import_actor(
        action_rx,
        event_tx,
        default_duration,
    ));

    if let Some(path) = initial_file {
        let _ = action_tx.send(Action::Import(path)).await;
    }

    // --- 3. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First tick right away so the view opens on the current item.
    let mut last_tick: Option<Instant> = None;

    // --- 4. UI LOOP ---
    loop {
        let at = Instant::now();
        if last_tick.is_none_or(|t| at.duration_since(t) >= tick_interval) {
            app_state.on_tick(Local::now().naive_local(), at);
            last_tick = Some(at);
        }
        app_state.viewport.animate();

        terminal.draw(|f| draw(f, &mut app_state))?;

        // A. Loader Events
        while let Ok(event) = event_rx.try_recv() {
            handlers::handle_app_event(&mut app_state, event);
        }

        // B. Input Events
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Mouse(mouse) => {
                    handlers::handle_mouse_event(mouse, &mut app_state, Instant::now())
                }
                Event::Key(key) => {
                    // Filter out KeyRelease events to prevent double input on Windows
                    if key.kind == event::KeyEventKind::Release {
                        continue;
                    }
                    if let Some(action) =
                        handlers::handle_key_event(key, &mut app_state, Instant::now())
                    {
                        if matches!(action, Action::Quit) {
                            let _ = action_tx.send(Action::Quit).await;
                            break;
                        }
                        let _ = action_tx.send(action).await;
                    }
                }
                _ => {}
            }
        }
    }

    // --- 5. CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    log::info!("TUI stopped");
    Ok(())
}

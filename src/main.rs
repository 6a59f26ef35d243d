use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod catalog;
mod config;
mod error;
mod models;
mod services;
mod tui;

use app::App;
use catalog::{Catalog, CatalogOptions};
use config::Config;
use error::{AppError, Result};
use services::{HttpVodService, VodService};
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    let service = Arc::new(HttpVodService::new(&config)?);
    let catalog = Catalog::new(service, CatalogOptions::from(&config));

    // --dump [pages]: print cards to stdout and exit
    if args.len() >= 2 && args[1] == "--dump" {
        let pages = parse_page_count(args.get(2).map(String::as_str))?;
        return dump(catalog, pages).await;
    }

    let mut app = App::new(catalog, &config);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend, S: VodService>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Apply finished fetches and advance the spinner
        app.tick();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.show_help) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Page count for `--dump`, 1 when omitted
fn parse_page_count(arg: Option<&str>) -> Result<usize> {
    let Some(n) = arg else {
        return Ok(1);
    };
    match n.parse::<usize>() {
        Ok(0) => Err(AppError::Config("page count must be at least 1".to_string())),
        Ok(pages) => Ok(pages),
        Err(_) => Err(AppError::Config(format!("invalid page count '{}'", n))),
    }
}

async fn dump<S: VodService>(mut catalog: Catalog<S>, pages: usize) -> Result<()> {
    let mut errors = catalog.subscribe_errors();

    catalog.start();
    catalog.settle().await;
    for _ in 1..pages {
        if !catalog.request_next_page() {
            break;
        }
        catalog.settle().await;
    }

    while let Ok(failure) = errors.try_recv() {
        eprintln!("{}", failure.message);
    }

    let snapshot = catalog.snapshot();
    for (index, row) in snapshot.rows.iter().enumerate() {
        println!(
            "{:>4}  {:>8}  {}  |  {}  |  {}",
            index + 1,
            row.duration,
            row.program.title,
            row.school_names,
            row.sport_names
        );
    }

    let more = if snapshot.exhausted { "" } else { " (more available)" };
    println!(
        "{} videos from {} pages ({} downloaded){}",
        snapshot.rows.len(),
        catalog.pager().current_page(),
        catalog.pager().downloaded(),
        more
    );

    Ok(())
}

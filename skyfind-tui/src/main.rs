//! Terminal UI for skyfind that lets users search flights and destination hotels.

mod app;
mod input;
mod settings;
mod ui;

use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
    time::{Duration as StdDuration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use skyfind_core::{LocationResolver, LookupTicket, SearchJob};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Completion};
use crate::input::Action;

const TICK: StdDuration = StdDuration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    let settings = settings::read_config()?;
    init_tracing(&settings.ui.log_file)?;

    // HTTP + provider setup
    let client = Client::builder().user_agent("skyfind/0.1").build()?;
    let bundle = settings.provider(client)?;
    info!(provider = %bundle.meta.name, hotels = settings.search.hotels, "starting skyfind");

    // App state
    let app = App::new(&bundle, &settings);
    let (tx, rx) = mpsc::unbounded_channel();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &tx, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "skyfind=info".into()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install the tracing subscriber")
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    tx: &UnboundedSender<Completion>,
    mut rx: UnboundedReceiver<Completion>,
) -> Result<()> {
    loop {
        // Results of background work land here, one turn at a time
        while let Ok(completion) = rx.try_recv() {
            app.apply_completion(completion);
        }
        for ticket in app.due_lookups(Instant::now()) {
            spawn_lookup(app.resolver.clone(), ticket, tx.clone());
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(TICK)?
            && let CEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match input::handle_key_event(key, &mut app, Instant::now()) {
                Action::Quit => break,
                Action::None => {}
                Action::Search => {
                    if let Some(job) = app.prepare_search() {
                        spawn_search(job, tx.clone());
                    }
                }
            }
        }
    }

    Ok(())
}

fn spawn_lookup(resolver: LocationResolver, ticket: LookupTicket, tx: UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let id = ticket.id;
        let completion = match resolver.try_resolve(&ticket.query).await {
            Ok(places) => Completion::Lookup { id, places },
            Err(err) => {
                warn!(request = %id, query = %ticket.query, error = %err, "place lookup failed");
                Completion::LookupExpired { id }
            }
        };
        if tx.send(completion).is_err() {
            debug!(request = %id, "event loop gone; dropping place lookup");
        }
    });
}

fn spawn_search(job: SearchJob, tx: UnboundedSender<Completion>) {
    tokio::spawn(async move {
        let completion = job.run().await;
        let id = completion.id;
        if tx.send(Completion::Search(completion)).is_err() {
            debug!(request = %id, "event loop gone; dropping search result");
        }
    });
}

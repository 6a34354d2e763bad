//! livescroll-reader: a live-updating RSS reader for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  setters  ┌──────────┐  Change  ┌────────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ────────► │  state/  │ ───────► │  render/   │
//! │ (thread) │ ◄───────── │ (intents)│           │ (Store)  │          │ (Renderer) │
//! └──────────┘  PollCmd   └──────────┘           └──────────┘          └────────────┘
//!                              ▲                                              │ Surface
//!                              │ handle_key_event()                           ▼
//!                         ┌──────────┐                                  ┌──────────┐
//!                         │ input.rs │                                  │  ui.rs   │
//!                         └──────────┘                                  └──────────┘
//! ```
//!
//! * **`state`**: the application state and the [`Store`](state::Store)
//!   that owns it.  Every committed mutation emits one typed change.
//! * **`render`**: observes changes and patches the on-screen surface.
//! * **`view`**: pure builders from state to display data.
//! * **`notify`**: badge and banner bookkeeping for newly delivered posts.
//! * **`i18n`**: translation catalogs (English and Russian).
//! * **`feed/`**: the `FeedFetcher` trait and the RSS implementation.
//! * **`poll`**: background thread that subscribes to and refetches feeds.
//! * **`app`**: translates user intents and poll results into store calls.
//! * **`ui`**: draws the surface with ratatui.
//! * **`input`**: maps key events to `App` intents.
//! * **`config`** / **`logging`**: startup configuration and the log file.
//! * **`main`**: wires everything together: parse args, load config, set up
//!   the terminal, and run the event loop.

mod app;
mod browser;
mod config;
mod error;
mod feed;
mod i18n;
mod input;
mod logging;
mod notify;
mod poll;
mod render;
mod state;
mod ui;
mod view;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::App;
use config::Config;
use feed::RssFetcher;
use i18n::Catalog;

// ---------------------------------------------------------------------------
// Terminal lifetime
// ---------------------------------------------------------------------------

/// Raw mode and the alternate screen, held for as long as this value lives.
///
/// Dropping it (on return or while unwinding) puts the terminal back.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message,
/// and record the panic in the log.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        tracing::error!(%info, "panicked");
        previous(info);
    }));
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// A terminal feed reader with live "new posts" notifications.
#[derive(Parser, Debug)]
#[command(name = "livescroll-reader", version, about)]
struct Args {
    /// Config file (defaults to <config dir>/livescroll-reader/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feed links to follow in addition to those in the config file
    feeds: Vec<String>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // -- parse arguments and configuration -----------------------------------
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    logging::init(logging::log_path(config.log_file.as_deref()))?;
    info!(path = %config_path.display(), language = %config.language, "starting");

    install_panic_hook();

    // -- start background polling --------------------------------------------
    let poller = poll::spawn(Box::new(RssFetcher::new()), config.poll_interval());

    let mut app = App::new(
        &config.language,
        Box::new(Catalog::new(&config.language)),
        poller.commands.clone(),
    );
    for link in config.feeds.iter().chain(&args.feeds) {
        app.subscribe(link);
    }

    // -- terminal setup (Drop restores it on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the poller.
    //   2. Advance dismissal timers.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(msg) = poller.messages.try_recv() {
            app.handle_poll(msg);
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("quitting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

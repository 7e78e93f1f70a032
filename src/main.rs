use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{CommandFactory, FromArgMatches, Parser};
use indoc::indoc;
use tracing::Level;

use term_panels::drivers::OutputDriver;
use term_panels::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_panels::keybindings::KeyBindings;
use term_panels::layout::Viewport;
use term_panels::persistence::LayoutStore;
use term_panels::priority::ContextFlags;
use term_panels::runner::run_deck;
use term_panels::{Deck, DeckOptions, tracing_sub};

const MOUSE_HELP: &str = indoc! {"
    Mouse:
      drag a panel header to move it, drag its border to resize it
      click the launcher header to drag it; release near an edge to dock
"};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Where the layout is kept (default: per-user config directory).
    #[arg(long, value_name = "PATH")]
    layout_file: Option<PathBuf>,

    /// Keep the layout in memory only.
    #[arg(long, conflicts_with = "layout_file")]
    no_persist: bool,

    /// Write logs to this file; logging is discarded otherwise.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Hour of day used for launcher priority instead of the local clock.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    /// Order the launcher by catalog tier instead of live priority.
    #[arg(long)]
    static_order: bool,

    #[arg(long)]
    unread_inbox: bool,

    #[arg(long)]
    volatile_market: bool,

    #[arg(long)]
    voice_input: bool,

    #[arg(long)]
    background_task: bool,
}

impl Cli {
    /// Parses the command line; `--help` lists the keys from `bindings`.
    fn parse_with(bindings: &KeyBindings) -> Self {
        let matches = Self::command()
            .after_help(format!("{}\n{MOUSE_HELP}", bindings.help_text()))
            .get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    fn store(&self) -> LayoutStore {
        if self.no_persist {
            return LayoutStore::in_memory();
        }
        if let Some(path) = &self.layout_file {
            return LayoutStore::at(path);
        }
        LayoutStore::user_default().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "layout will not be saved");
            LayoutStore::in_memory()
        })
    }

    fn options(&self) -> DeckOptions {
        DeckOptions {
            hour: self.hour,
            static_order: self.static_order,
            context: ContextFlags {
                unread_inbox: self.unread_inbox,
                market_volatility: self.volatile_market,
                voice_input: self.voice_input,
                background_task: self.background_task,
            },
        }
    }
}

fn main() -> io::Result<()> {
    let bindings = KeyBindings::default();
    let cli = Cli::parse_with(&bindings);
    tracing_sub::init(cli.log_level, cli.log_file.as_deref())?;

    let (width, height) = crossterm::terminal::size()?;
    let mut deck = Deck::new(
        Viewport::new(width, height),
        cli.store(),
        cli.options(),
        Instant::now(),
    )
    .with_bindings(bindings);
    tracing::info!(width, height, "starting deck");

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    let result = run_deck(&mut input, &mut output, &mut deck, Duration::from_millis(250));
    output.exit()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "deck stopped");
    }
    result
}

mod config;
mod input;
mod render;

use anyhow::Context;
use clap::Parser;
use config::{PlayConfig, RulesMode};
use hotseat_engine::{Event, Game, Phase, PseudoLegal, RuleSet, Strict};
use input::Command;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Hot-seat chess: two players take turns at one terminal.
#[derive(Parser)]
#[command(name = "hotseat")]
#[command(about = "Two-player chess in the terminal")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = PlayConfig::default_path())]
    config: PathBuf,

    /// Rule set, overriding the configuration file
    #[arg(long, value_enum)]
    rules: Option<RulesMode>,

    /// Starting layout as a board diagram, e.g. "4k3/8/8/8/8/8/4P3/4K3"
    #[arg(long)]
    layout: Option<String>,

    /// Print the snapshot as JSON after every input
    #[arg(long)]
    json: bool,

    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

const HELP: &str = "\
Select a square by row and column (`6 4`) or by label (`e2`).
Select one of your pieces, then one of its marked destinations.
When a pawn reaches the last row, choose q, r, b or n.
Type `quit` to leave.";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = PlayConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(rules) = cli.rules {
        config.rules = rules;
    }
    if let Some(layout) = cli.layout {
        config.layout = Some(layout);
    }

    let level = match cli.verbose {
        0 => config.level_filter()?,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
    tracing::info!(rules = ?config.rules, config = %cli.config.display(), "starting hotseat");

    let layout = config.layout()?;
    tracing::debug!(layout = %layout.to_diagram(), to_move = %config.to_move, "starting position");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    match config.rules {
        RulesMode::Pseudo => {
            let mut game = Game::from_layout(PseudoLegal, &layout, config.to_move)?;
            run(&mut game, &config, cli.json, stdin.lock(), &mut stdout)
        }
        RulesMode::Strict => {
            let mut game = Game::from_layout(Strict, &layout, config.to_move)?;
            run(&mut game, &config, cli.json, stdin.lock(), &mut stdout)
        }
    }
}

/// Plays until the game ends, input runs out or a player quits.
fn run<R: RuleSet, I: BufRead, W: Write>(
    game: &mut Game<R>,
    config: &PlayConfig,
    json: bool,
    mut input: I,
    out: &mut W,
) -> anyhow::Result<()> {
    game.advance();
    let mut line = String::new();
    loop {
        show(game, config, json, out)?;
        if game.phase().is_terminal() {
            break;
        }

        if !json {
            write!(out, "> ")?;
        }
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("input closed");
            break;
        }

        let pending = game.phase() == Phase::SelectPromotion;
        let event = match input::parse(&line, pending) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Ok(Command::Square { row, col }) => Event::square(row, col),
            Ok(Command::Promote(kind)) => Event::PromotionSelected(kind),
            Err(err) => {
                writeln!(out, "{}", err)?;
                continue;
            }
        };

        let turn = game.turn_number();
        match game.handle(event) {
            Ok(_) if game.turn_number() != turn => {
                if let Some(report) = game.last_turn() {
                    writeln!(out, "{}", render::report(&report, config))?;
                }
            }
            Ok(_) => {}
            Err(err) => writeln!(out, "{}", err)?,
        }
    }
    Ok(())
}

fn show<R: RuleSet, W: Write>(
    game: &Game<R>,
    config: &PlayConfig,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let snapshot = game.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        write!(out, "\n{}", render::board(&snapshot, config.show_hints))?;
        writeln!(out, "{}", render::status(&snapshot, config))?;
    }
    Ok(())
}

use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use termsweeper::game::{Game, Outcome, SessionEnd};
use termsweeper::{tui, GameConfig};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Path of the log file. Unset means logs are discarded: the game owns the
/// terminal, and anything written to stderr would draw over the board.
const LOG_FILE_ENV: &str = "TERMSWEEPER_LOG";

#[derive(Parser, Debug)]
#[command(name = "termsweeper", about = "Terminal Minesweeper", version)]
struct Args {
    /// Board height (default: terminal rows minus the border)
    #[arg(short, long)]
    lines: Option<usize>,
    /// Board width (default: terminal columns minus the border)
    #[arg(short, long)]
    cols: Option<usize>,
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::metadata::LevelFilter::WARN.into())
        .from_env()?;
    let path = std::env::var_os(LOG_FILE_ENV);
    let writer = log_writer(path.as_deref()).with_context(|| format!("cannot open log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(())
}

fn log_writer(path: Option<&OsStr>) -> io::Result<BoxMakeWriter> {
    Ok(match path {
        Some(path) => BoxMakeWriter::new(Mutex::new(File::create(path)?)),
        None => BoxMakeWriter::new(io::sink),
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let terminal = crossterm::terminal::size().context("cannot read terminal size")?;
    let config = GameConfig::resolve(args.lines, args.cols, terminal)?;
    let mut game = Game::new(&config, &mut rand::thread_rng());

    match tui::run_tui(&mut game)? {
        SessionEnd::Interrupted => println!("game interrupted!"),
        SessionEnd::Finished(Outcome::Won) => println!("You won!"),
        SessionEnd::Finished(Outcome::Lost((row, col))) => println!("Game over! Mine at row {}, column {}.", row + 1, col + 1),
        SessionEnd::Finished(Outcome::InProgress) | SessionEnd::Quit => {}
    }
    Ok(())
}

//! cardstack
//!
//! Assemble, inspect and run card decks.
//!
//! Usage: `cardstack <asm|run|disasm|encode|decode> ...`

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info, warn};

use cardstack::bytecode::disasm::disassemble_deck;
use cardstack::{
    AsmError, BitsError, ChannelWord, DataWord, Deck, DeckError, DeckReader, Driver, DriverConfig,
    DriverError, HammingCode, LogAnnouncer, MachineState, Value, assemble,
};

#[derive(Parser, Debug)]
#[command(name = "cardstack")]
#[command(about = "SEC-DED card decks for an 8-bit stack machine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a source file and encode it into a deck
    Asm {
        source: PathBuf,

        /// Output deck; `.txt` writes the text format, anything else binary
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run a deck through the driver
    Run {
        deck: PathBuf,

        #[arg(long = "max-rereads", default_value_t = 3)]
        max_rereads: u32,

        #[arg(long = "max-lines")]
        max_lines: Option<usize>,

        /// Invert bit BIT of line LINE before running (0-based, repeatable)
        #[arg(long = "flip", value_name = "LINE:BIT", value_parser = parse_flip)]
        flips: Vec<(usize, usize)>,

        /// Keep executing after a machine error
        #[arg(long = "keep-going")]
        keep_going: bool,

        /// Print the final machine state
        #[arg(long)]
        dump: bool,
    },

    /// List a deck with decode outcomes
    Disasm { deck: PathBuf },

    /// Encode a 6-bit data word
    Encode { bits: String },

    /// Decode an 11-bit channel word
    Decode { bits: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Asm(#[from] AsmError),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("invalid word: {0}")]
    Bits(#[from] BitsError),
}

fn main() -> ExitCode {
    cardstack::init_logging();

    let cli = Cli::parse();

    match execute(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Asm { source, output } => {
            let text = fs::read_to_string(&source).map_err(|e| CliError::Read {
                path: source.clone(),
                source: e,
            })?;
            let program = assemble(&text)?;
            let deck = Deck::from_program(&program, &HammingCode::new());
            deck.save(&output)?;
            info!("wrote {} lines to {}", deck.len(), output.display());
        }

        Command::Run {
            deck,
            max_rereads,
            max_lines,
            flips,
            keep_going,
            dump,
        } => {
            let mut deck = Deck::load(&deck)?;
            for (line, bit) in flips {
                deck.flip(line, bit)?;
            }

            let config = DriverConfig {
                max_rereads,
                max_lines,
                stop_on_error: !keep_going,
                ..DriverConfig::default()
            };
            let mut driver = Driver::with_config(config);
            let report = driver.run(&mut DeckReader::new(deck), &mut LogAnnouncer)?;

            info!(
                lines = report.lines,
                corrected = report.corrected,
                rereads = report.rereads,
                "finished in state {}",
                report.final_state
            );
            if report.exhausted {
                warn!("deck ended without STP");
            }

            if dump {
                let snapshot = driver.machine().snapshot();
                let stack: Vec<String> = snapshot
                    .stack
                    .iter()
                    .map(|v| match v {
                        Value::Byte(b) => b.to_string(),
                        Value::Char(c) => format!("'{}'", c),
                    })
                    .collect();
                println!("state:    {}", snapshot.state);
                println!("overflow: {}", snapshot.overflow);
                println!("steps:    {}", snapshot.steps);
                println!("stack:    [{}]", stack.join(", "));
            }

            if let Some(e) = report.last_error {
                error!("{}", e);
            }
            if report.final_state == MachineState::Error {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Disasm { deck } => {
            let deck = Deck::load(&deck)?;
            print!("{}", disassemble_deck(&deck, &HammingCode::new()));
        }

        Command::Encode { bits } => {
            let data: DataWord = bits.parse()?;
            println!("{}", HammingCode::new().encode(data));
        }

        Command::Decode { bits } => {
            let word: ChannelWord = bits.parse()?;
            let decoded = HammingCode::new().decode(word);
            match decoded.error_position {
                Some(pos) => println!("{} {} at {}", decoded.data, decoded.outcome, pos),
                None => println!("{} {}", decoded.data, decoded.outcome),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn parse_flip(s: &str) -> Result<(usize, usize), String> {
    let (line, bit) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:BIT, got '{}'", s))?;
    let line = line.trim().parse::<usize>().map_err(|e| format!("bad line '{}': {}", line, e))?;
    let bit = bit.trim().parse::<usize>().map_err(|e| format!("bad bit '{}': {}", bit, e))?;
    Ok((line, bit))
}

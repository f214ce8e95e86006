//! # cardstack
//!
//! Runs programs printed on cards as lines of bits. Each line is an 11-bit
//! SEC-DED channel word: a (10,6) linear code plus an overall parity bit.
//! The decoded 6-bit word drives an 8-bit stack machine.
//!
//! - [`codec`]: generator/parity-check matrices and the SEC-DED decoder
//! - [`runtime`]: the stack machine
//! - [`bytecode`]: opcode table, assembler, disassembler and deck formats
//! - [`driver`]: the read, decode and execute loop over a [`BitSource`]

pub mod bits;
pub mod bytecode;
pub mod codec;
pub mod driver;
pub mod lang;
pub mod runtime;

pub use bits::{Bits, BitsError, ChannelWord, DataWord};
pub use bytecode::{AsmError, Deck, DeckError, Instruction, Op, assemble};
pub use codec::{DecodeOutcome, Decoded, HammingCode};
pub use driver::{
    Announcer, BitSource, DeckReader, Driver, DriverConfig, DriverError, LogAnnouncer,
    RecordingAnnouncer, RunReport,
};
pub use lang::Value;
pub use runtime::{MachineSnapshot, MachineState, RuntimeError, StackMachine};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// `RUST_LOG` overrides the default of `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cardstack=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

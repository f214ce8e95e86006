use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bits::ChannelWord;
use crate::codec::{DecodeOutcome, Decoded, HammingCode};
use crate::driver::announcer::Announcer;
use crate::driver::driver_error::DriverError;
use crate::driver::source::BitSource;
use crate::runtime::runtime_error::RuntimeError;
use crate::runtime::state::MachineState;
use crate::runtime::vm::StackMachine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Re-reads allowed per line, for unreadable bits and uncorrectable words.
    pub max_rereads: u32,
    /// Stop after this many executed lines.
    pub max_lines: Option<usize>,
    pub stop_on_error: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            max_rereads: 3,
            max_lines: None,
            stop_on_error: true,
        }
    }
}

/// Summary of one [`Driver::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub final_state: MachineState,
    /// Lines executed.
    pub lines: usize,
    /// Lines whose channel word needed a single-bit correction.
    pub corrected: usize,
    pub rereads: usize,
    pub announcements: Vec<String>,
    pub last_error: Option<RuntimeError>,
    /// The source ran out of lines before the machine stopped.
    pub exhausted: bool,
}

pub struct Driver {
    code: HammingCode,
    machine: StackMachine,
    config: DriverConfig,
}

impl Driver {
    pub fn new() -> Self {
        Self::with_config(DriverConfig::default())
    }

    pub fn with_config(config: DriverConfig) -> Self {
        Driver {
            code: HammingCode::new(),
            machine: StackMachine::new(),
            config,
        }
    }

    pub fn machine(&self) -> &StackMachine {
        &self.machine
    }

    /// Reads, decodes and executes lines until the machine stops, fails
    /// (with `stop_on_error`), the line limit is hit, or the source runs out.
    pub fn run<S, A>(&mut self, source: &mut S, announcer: &mut A) -> Result<RunReport, DriverError>
    where
        S: BitSource + ?Sized,
        A: Announcer + ?Sized,
    {
        let mut report = RunReport::default();

        loop {
            if self.config.max_lines.is_some_and(|max| report.lines >= max) {
                debug!(lines = report.lines, "line limit reached");
                break;
            }

            let line = report.lines;
            let decoded = match self.read_line(source, line, &mut report) {
                Ok(decoded) => decoded,
                Err(DriverError::SourceExhausted) => {
                    report.exhausted = true;
                    break;
                }
                Err(e) => return Err(e),
            };

            if decoded.outcome == DecodeOutcome::Corrected {
                report.corrected += 1;
            }

            let state = self.machine.execute_one(decoded.data);
            report.lines += 1;

            for text in self.machine.take_announcements() {
                announcer.announce(&text);
                report.announcements.push(text);
            }
            debug!(line, data = %decoded.data, %state, top = ?self.machine.top(), "line executed");

            if state.is_terminal() && (state == MachineState::Stopped || self.config.stop_on_error) {
                break;
            }
            source.advance_line();
        }

        report.final_state = self.machine.state();
        report.last_error = self.machine.last_error().cloned();
        Ok(report)
    }

    /// Reads and decodes the current line, re-reading it while a bit is
    /// unreadable or the word is uncorrectable.
    fn read_line<S>(
        &self,
        source: &mut S,
        line: usize,
        report: &mut RunReport,
    ) -> Result<Decoded, DriverError>
    where
        S: BitSource + ?Sized,
    {
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let retry = attempts <= self.config.max_rereads;

            match read_word(source)? {
                Some(word) => {
                    let decoded = self.code.decode(word);
                    if decoded.outcome.is_trusted() {
                        return Ok(decoded);
                    }
                    if !retry {
                        return Err(DriverError::Uncorrectable { line, attempts });
                    }
                    warn!(line, %word, attempt = attempts, "uncorrectable word, re-reading line");
                }
                None => {
                    if !retry {
                        return Err(DriverError::Unreadable { line, attempts });
                    }
                    warn!(line, attempt = attempts, "unreadable bit, re-reading line");
                }
            }

            report.rereads += 1;
            source.rewind_line();
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// One channel word, or `None` if any bit was unreadable or not binary.
fn read_word<S: BitSource + ?Sized>(source: &mut S) -> Result<Option<ChannelWord>, DriverError> {
    let mut bits = [0u8; ChannelWord::WIDTH];
    for bit in bits.iter_mut() {
        match source.read_bit()? {
            Some(b) => *bit = b,
            None => return Ok(None),
        }
    }
    Ok(ChannelWord::new(bits).ok())
}

//! The read-decode-execute loop that connects a card reader to the machine.

pub mod announcer;
pub mod driver_error;
pub mod run;
pub mod source;

pub use announcer::{Announcer, LogAnnouncer, RecordingAnnouncer};
pub use driver_error::DriverError;
pub use run::{Driver, DriverConfig, RunReport};
pub use source::{BitSource, DeckReader};

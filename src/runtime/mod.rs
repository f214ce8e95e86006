pub mod runtime_error;
pub mod state;
pub mod vm;

pub use runtime_error::RuntimeError;
pub use state::{MachineSnapshot, MachineState};
pub use vm::{StackMachine, Top};

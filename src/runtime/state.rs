use serde::{Deserialize, Serialize};

use crate::lang::value::Value;

/// Run state of a [`StackMachine`](super::vm::StackMachine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineState {
    /// Nothing executed yet.
    #[default]
    Idle,
    Running,
    /// STP was executed.
    Stopped,
    /// The last instruction failed.
    Error,
}

impl MachineState {
    /// `Stopped` and `Error` end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, MachineState::Stopped | MachineState::Error)
    }
}

impl std::fmt::Display for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MachineState::Idle => "IDLE",
            MachineState::Running => "RUNNING",
            MachineState::Stopped => "STOPPED",
            MachineState::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Point-in-time copy of the observable machine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub state: MachineState,
    pub overflow: bool,
    /// Bottom first.
    pub stack: Vec<Value>,
    pub steps: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(MachineState::Stopped.is_terminal());
        assert!(MachineState::Error.is_terminal());
        assert!(!MachineState::Idle.is_terminal());
        assert!(!MachineState::Running.is_terminal());
    }
}

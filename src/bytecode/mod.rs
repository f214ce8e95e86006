pub mod assemble;
pub mod assemble_error;
pub mod deck;
pub mod disasm;
pub mod op;

pub use assemble::{Assembler, assemble};
pub use assemble_error::{AsmError, AsmErrorKind};
pub use deck::{Deck, DeckError, DeckFile};
pub use op::{Instruction, Op};

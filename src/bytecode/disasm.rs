use crate::bits::DataWord;
use crate::bytecode::deck::Deck;
use crate::bytecode::op::Instruction;
use crate::codec::{DecodeOutcome, Decoded, HammingCode};

/// One line per word: `index  bits  instruction  ; ( pops -- pushes )`.
pub fn disassemble(program: &[DataWord]) -> String {
    let mut out = String::new();

    for (ip, word) in program.iter().enumerate() {
        out.push_str(&format!("{:04}  {}  {}\n", ip, word, describe(*word)));
    }

    out
}

/// Like [`disassemble`], with the channel word and decode result of each
/// card line.
pub fn disassemble_deck(deck: &Deck, code: &HammingCode) -> String {
    let mut out = String::new();

    for (ip, (line, decoded)) in deck.lines.iter().zip(deck.decode_all(code)).enumerate() {
        out.push_str(&format!(
            "{:04}  {}  {:<8}  {}  {}\n",
            ip,
            line,
            outcome_label(&decoded),
            decoded.data,
            describe(decoded.data)
        ));
    }

    out
}

fn outcome_label(decoded: &Decoded) -> String {
    match (decoded.outcome, decoded.error_position) {
        (DecodeOutcome::Valid, _) => "ok".to_string(),
        (DecodeOutcome::Corrected, Some(pos)) => format!("fixed@{}", pos),
        (DecodeOutcome::Corrected, None) => "fixed".to_string(),
        (DecodeOutcome::Uncorrectable, _) => "ERR".to_string(),
    }
}

fn describe(word: DataWord) -> String {
    let Some(instr) = Instruction::from_word(word) else {
        return "???".to_string();
    };

    let effect = match instr {
        Instruction::Operand(_) | Instruction::Char(_) => "( -- x )".to_string(),
        Instruction::Op(op) => match op.effect() {
            Some((pops, pushes)) => format!("( {} -- {} )", pops, pushes),
            None => "( v.. n -- )".to_string(),
        },
    };

    format!("{:<6} ; {}", instr.to_string(), effect)
}

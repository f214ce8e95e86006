use tracing::{debug, trace, warn};

use crate::bits::{Byte, DataWord};
use crate::bytecode::op::{Instruction, Op};
use crate::lang::value::Value;
use crate::runtime::runtime_error::{RuntimeError, division_by_zero, stack_underflow, type_error};
use crate::runtime::state::{MachineSnapshot, MachineState};

/// Non-destructive view of the stack top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Top {
    /// Byte as 8 bits, most significant first.
    Byte(Byte),
    Char(char),
}

/// Result of a successful arithmetic step: the (8-bit) result and whether
/// the true result fell outside `0..=255`.
type Arith = Result<(u8, bool), RuntimeError>;

/// 8-bit stack machine driven one 6-bit word at a time.
pub struct StackMachine {
    stack: Vec<Value>,
    overflow: bool,
    state: MachineState,
    last_error: Option<RuntimeError>,
    announcements: Vec<String>,
    steps: usize,
}

impl StackMachine {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            overflow: false,
            state: MachineState::Idle,
            last_error: None,
            announcements: Vec::new(),
            steps: 0,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Set when the true result of the last arithmetic/shift instruction
    /// did not fit in 8 bits. Advisory only.
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Cause of the most recent `Error` state, cleared by the next
    /// successful instruction.
    pub fn last_error(&self) -> Option<&RuntimeError> {
        self.last_error.as_ref()
    }

    /// Texts produced by SPEAK, oldest first.
    pub fn announcements(&self) -> &[String] {
        &self.announcements
    }

    pub fn take_announcements(&mut self) -> Vec<String> {
        std::mem::take(&mut self.announcements)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.overflow = false;
        self.state = MachineState::Idle;
        self.last_error = None;
        self.announcements.clear();
        self.steps = 0;
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            state: self.state,
            overflow: self.overflow,
            stack: self.stack.clone(),
            steps: self.steps,
        }
    }

    pub fn top(&self) -> Option<Top> {
        self.stack.last().map(|value| match *value {
            Value::Byte(n) => Top::Byte(Byte::from_value(n.into())),
            Value::Char(c) => Top::Char(c),
        })
    }

    /// Classifies and executes one word.
    ///
    /// Always executes, whatever the current state; stopping after
    /// `Stopped` or `Error` is up to the caller.
    pub fn execute_one(&mut self, word: DataWord) -> MachineState {
        self.steps += 1;

        let result = match Instruction::from_word(word) {
            Some(instr) => {
                trace!(step = self.steps, %word, %instr, "execute");
                self.exec(instr)
            }
            None => Err(RuntimeError::UnknownWord(word.value() as u8)),
        };

        self.state = match result {
            Ok(state) => {
                self.last_error = None;
                state
            }
            Err(e) => {
                warn!(step = self.steps, %word, "{}", e);
                self.last_error = Some(e);
                MachineState::Error
            }
        };
        self.state
    }

    // Execution

    fn exec(&mut self, instr: Instruction) -> Result<MachineState, RuntimeError> {
        match instr {
            Instruction::Operand(n) => {
                self.stack.push(Value::Byte(n));
                self.overflow = false;
            }
            Instruction::Char(c) => self.stack.push(Value::Char(c)),
            Instruction::Op(op) => return self.exec_op(op),
        }
        Ok(MachineState::Running)
    }

    fn exec_op(&mut self, op: Op) -> Result<MachineState, RuntimeError> {
        match op {
            Op::Stp => return Ok(MachineState::Stopped),
            Op::Nop => {}

            // Stack operations
            Op::Dup => {
                let a = self.peek("DUP")?;
                self.stack.push(a);
            }
            Op::Del => {
                self.pop("DEL")?;
            }
            Op::Swp => {
                let (y, x) = self.pop_two("SWP")?;
                self.stack.push(x);
                self.stack.push(y);
            }

            // Arithmetic
            Op::Add => self.arith(op, |y, x| Ok(y.overflowing_add(x)))?,
            Op::Sub => self.arith(op, |y, x| Ok(y.overflowing_sub(x)))?,
            Op::Mul => self.arith(op, |y, x| Ok(y.overflowing_mul(x)))?,
            Op::Div => self.arith(op, |y, x| {
                y.checked_div(x)
                    .map(|q| (q, false))
                    .ok_or_else(|| division_by_zero("DIV"))
            })?,
            Op::Exp => self.arith(op, |y, x| Ok(power(y, x)))?,
            Op::Mod => self.arith(op, |y, x| {
                y.checked_rem(x)
                    .map(|r| (r, false))
                    .ok_or_else(|| division_by_zero("MOD"))
            })?,

            // Shifts & bitwise
            Op::Shl => self.arith(op, |y, x| Ok(shift_left(y, x)))?,
            Op::Shr => self.arith(op, |y, x| {
                Ok((y.checked_shr(u32::from(x)).unwrap_or(0), false))
            })?,
            Op::Xor => self.arith(op, |y, x| Ok((y ^ x, false)))?,
            Op::Not => {
                let a = self.pop("NOT")?;
                match a {
                    Value::Byte(n) => {
                        self.stack.push(Value::Byte(!n));
                        self.overflow = false;
                    }
                    other => {
                        self.stack.push(other);
                        return Err(type_error("NOT", "byte", &other));
                    }
                }
            }

            // Conversion / comparison
            Op::Hex => self.binary("HEX", |y, x| {
                let hi = y.hex_digit().ok_or(RuntimeError::NotHexDigit(y))?;
                let lo = x.hex_digit().ok_or(RuntimeError::NotHexDigit(x))?;
                Ok(((hi << 4) | lo, false))
            })?,
            Op::Ieq => self.binary("IEQ", |y, x| Ok((u8::from(y == x), false)))?,

            // I/O
            Op::Speak => self.speak()?,
        }

        Ok(MachineState::Running)
    }

    /// Pops `x` (top) then `y`, and pushes `f(y, x)` as a byte.
    ///
    /// On any failure the stack is restored to its exact pre-call shape and
    /// the overflow flag is left alone.
    fn binary<F>(&mut self, op: &'static str, f: F) -> Result<(), RuntimeError>
    where
        F: FnOnce(Value, Value) -> Arith,
    {
        let (y, x) = self.pop_two(op)?;

        match f(y, x) {
            Ok((result, overflow)) => {
                self.stack.push(Value::Byte(result));
                self.overflow = overflow;
                Ok(())
            }
            Err(e) => {
                self.stack.push(y);
                self.stack.push(x);
                Err(e)
            }
        }
    }

    /// [`binary`](Self::binary) restricted to two bytes.
    fn arith<F>(&mut self, op: Op, f: F) -> Result<(), RuntimeError>
    where
        F: FnOnce(u8, u8) -> Arith,
    {
        let name = op.mnemonic();
        self.binary(name, |y, x| match (y, x) {
            (Value::Byte(y), Value::Byte(x)) => f(y, x),
            (Value::Byte(_), other) | (other, _) => Err(type_error(name, "byte", &other)),
        })
    }

    /// ( text... n -- ): pops a byte count `n`, then `n` values top first,
    /// and announces their concatenated text.
    fn speak(&mut self) -> Result<(), RuntimeError> {
        let count = match self.pop("SPEAK")? {
            Value::Byte(n) => n,
            other => {
                self.stack.push(other);
                return Err(type_error("SPEAK", "byte", &other));
            }
        };

        let n = usize::from(count);
        if self.stack.len() < n {
            let partial: String = self.stack.iter().rev().map(ToString::to_string).collect();
            self.stack.push(Value::Byte(count));
            return Err(RuntimeError::IncompleteSpeech {
                expected: count,
                partial,
            });
        }

        let start = self.stack.len() - n;
        let text: String = self
            .stack
            .drain(start..)
            .rev()
            .map(|v| v.to_string())
            .collect();

        debug!(text = %text, "announce");
        self.announcements.push(text);
        Ok(())
    }

    // Stack operations

    fn pop(&mut self, op: &'static str) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or_else(|| stack_underflow(op))
    }

    fn peek(&self, op: &'static str) -> Result<Value, RuntimeError> {
        self.stack.last().copied().ok_or_else(|| stack_underflow(op))
    }

    /// Returns `(y, x)` where `x` was on top. Restores `x` if `y` is missing.
    fn pop_two(&mut self, op: &'static str) -> Result<(Value, Value), RuntimeError> {
        let x = self.pop(op)?;
        match self.pop(op) {
            Ok(y) => Ok((y, x)),
            Err(e) => {
                self.stack.push(x);
                Err(e)
            }
        }
    }
}

impl Default for StackMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// `y ^ x` truncated to 8 bits.
fn power(y: u8, x: u8) -> (u8, bool) {
    match u32::from(y).checked_pow(u32::from(x)) {
        Some(v) => (v as u8, v > 0xFF),
        None => (y.wrapping_pow(u32::from(x)), true),
    }
}

/// `y << x` truncated to 8 bits; overflow if a set bit is shifted out.
fn shift_left(y: u8, x: u8) -> (u8, bool) {
    if x >= 8 {
        return (0, y != 0);
    }
    let wide = u16::from(y) << x;
    (wide as u8, wide > 0xFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Test Helpers
    // ============================================================

    fn lit(n: u8) -> DataWord {
        Instruction::Operand(n).word().expect("literal fits in four bits")
    }

    fn op(op: Op) -> DataWord {
        Instruction::Op(op).word().unwrap()
    }

    fn ch(c: char) -> DataWord {
        Instruction::Char(c).word().expect("card character")
    }

    /// Run words on a fresh machine, returning it and the last state
    fn run_words(words: &[DataWord]) -> (StackMachine, MachineState) {
        let mut vm = StackMachine::new();
        let mut state = vm.state();
        for word in words {
            state = vm.execute_one(*word);
        }
        (vm, state)
    }

    /// Assert the program runs and leaves the expected stack
    fn assert_stack(words: &[DataWord], expected: &[Value]) -> StackMachine {
        let (vm, state) = run_words(words);
        assert_eq!(state, MachineState::Running, "error: {:?}", vm.last_error());
        assert_eq!(vm.stack(), expected, "stack mismatch");
        vm
    }

    /// Assert the last word fails and leaves the stack as it was before it
    fn assert_error(words: &[DataWord], check: impl Fn(&RuntimeError) -> bool) {
        let (setup, _) = run_words(&words[..words.len() - 1]);
        let (vm, state) = run_words(words);
        assert_eq!(state, MachineState::Error);
        let err = vm.last_error().expect("error recorded");
        assert!(check(err), "unexpected error: {}", err);
        assert_eq!(vm.stack(), setup.stack(), "stack not restored");
    }

    /// Build 10 * 5 * 4 = 200 from four-bit literals
    fn two_hundred() -> Vec<DataWord> {
        vec![
            lit(10),
            lit(5),
            op(Op::Mul),
            lit(4),
            op(Op::Mul),
        ]
    }

    fn byte(n: u8) -> Value {
        Value::Byte(n)
    }

    // ============================================================
    // Construction & top
    // ============================================================

    #[test]
    fn test_new_machine_is_idle_and_empty() {
        let vm = StackMachine::new();
        assert_eq!(vm.state(), MachineState::Idle);
        assert_eq!(vm.top(), None);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_top_char() {
        let (vm, _) = run_words(&[ch('A')]);
        assert_eq!(vm.top(), Some(Top::Char('A')));
    }

    #[test]
    fn test_top_byte_is_eight_bits() {
        let (vm, _) = run_words(&[lit(2)]);
        let expected = Byte::new([0, 0, 0, 0, 0, 0, 1, 0]).unwrap();
        assert_eq!(vm.top(), Some(Top::Byte(expected)));
        // non-destructive
        assert_eq!(vm.stack().len(), 1);
    }

    #[test]
    fn test_push_space() {
        assert_stack(&[ch(' ')], &[Value::Char(' ')]);
    }

    #[test]
    fn test_nop_patterns() {
        let mut vm = StackMachine::new();
        for code in [0b100000u16, 0b100011, 0b111110, 0b111111] {
            assert_eq!(vm.execute_one(DataWord::from_value(code)), MachineState::Running);
        }
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_stp() {
        let (vm, state) = run_words(&[lit(1), op(Op::Stp)]);
        assert_eq!(state, MachineState::Stopped);
        assert_eq!(vm.stack(), &[byte(1)]);
    }

    // ============================================================
    // Stack operations
    // ============================================================

    #[test]
    fn test_dup() {
        assert_stack(&[lit(10), op(Op::Dup)], &[byte(10), byte(10)]);
    }

    #[test]
    fn test_dup_empty_stack() {
        let (vm, state) = run_words(&[op(Op::Dup)]);
        assert_eq!(state, MachineState::Error);
        assert_eq!(vm.top(), None);
        assert!(vm.last_error().unwrap().is_underflow());
    }

    #[test]
    fn test_del() {
        let (vm, _) = run_words(&[lit(10), op(Op::Del)]);
        assert_eq!(vm.top(), None);
    }

    #[test]
    fn test_del_empty_stack() {
        assert_error(&[op(Op::Del)], RuntimeError::is_underflow);
    }

    #[test]
    fn test_swp() {
        assert_stack(&[lit(10), lit(2), op(Op::Swp)], &[byte(2), byte(10)]);
    }

    #[test]
    fn test_swp_restores_single_operand() {
        assert_error(&[lit(3), op(Op::Swp)], RuntimeError::is_underflow);
    }

    // ============================================================
    // Arithmetic
    // ============================================================

    #[test]
    fn test_add() {
        let vm = assert_stack(&[lit(10), lit(7), op(Op::Add)], &[byte(17)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_add_overflow_truncates() {
        // 200 + 100 = 300 -> 44
        let mut words = two_hundred();
        words.extend([lit(10), lit(10), op(Op::Mul), op(Op::Add)]);
        let vm = assert_stack(&words, &[byte(44)]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_add_type_error() {
        assert_error(&[lit(10), ch('A'), op(Op::Add)], |e| {
            matches!(e, RuntimeError::TypeMismatch { got: "char", .. })
        });
    }

    #[test]
    fn test_sub_char_below_byte() {
        assert_error(&[ch('A'), lit(10), op(Op::Sub)], |e| {
            matches!(
                e,
                RuntimeError::TypeMismatch { op: "SUB", expected: "byte", got: "char" }
            )
        });
    }

    #[test]
    fn test_xor_space_below_byte() {
        assert_error(&[ch(' '), lit(3), op(Op::Xor)], |e| {
            matches!(e, RuntimeError::TypeMismatch { op: "XOR", got: "space", .. })
        });
    }

    #[test]
    fn test_div_char_on_top() {
        assert_error(&[lit(8), ch('B'), op(Op::Div)], |e| {
            matches!(e, RuntimeError::TypeMismatch { op: "DIV", got: "char", .. })
        });
    }

    #[test]
    fn test_div_two_chars() {
        assert_error(&[lit(1), ch('X'), ch('Y'), op(Op::Div)], |e| {
            matches!(e, RuntimeError::TypeMismatch { op: "DIV", .. })
        });
    }

    #[test]
    fn test_add_restores_lone_operand() {
        assert_error(&[lit(10), op(Op::Add)], RuntimeError::is_underflow);
    }

    #[test]
    fn test_sub() {
        let vm = assert_stack(&[lit(10), lit(2), op(Op::Sub)], &[byte(8)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_sub_borrow() {
        let vm = assert_stack(&[lit(2), lit(10), op(Op::Sub)], &[byte(248)]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_mul() {
        let vm = assert_stack(&[lit(2), lit(10), op(Op::Mul)], &[byte(20)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_mul_overflow_truncates() {
        // 200 * 2 = 400 -> 144
        let mut words = two_hundred();
        words.extend([lit(2), op(Op::Mul)]);
        let vm = assert_stack(&words, &[byte(144)]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_div() {
        assert_stack(&[lit(15), lit(4), op(Op::Div)], &[byte(3)]);
    }

    #[test]
    fn test_div_by_zero_restores_operands() {
        assert_error(&[lit(2), lit(0), op(Op::Div)], |e| {
            matches!(e, RuntimeError::DivisionByZero { op: "DIV" })
        });
    }

    #[test]
    fn test_exp() {
        let vm = assert_stack(&[lit(2), lit(6), op(Op::Exp)], &[byte(64)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_exp_overflow() {
        // 2^10 = 1024 -> 0
        let vm = assert_stack(&[lit(2), lit(10), op(Op::Exp)], &[byte(0)]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_exp_huge_exponent() {
        let vm = assert_stack(&[lit(15), lit(15), op(Op::Exp)], &[byte(15u8.wrapping_pow(15))]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_exp_zero_exponent() {
        assert_stack(&[lit(0), lit(0), op(Op::Exp)], &[byte(1)]);
    }

    #[test]
    fn test_mod() {
        let vm = assert_stack(&[lit(10), lit(7), op(Op::Mod)], &[byte(3)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_mod_by_zero_restores_operands() {
        assert_error(&[lit(10), lit(0), op(Op::Mod)], |e| {
            matches!(e, RuntimeError::DivisionByZero { op: "MOD" })
        });
    }

    // ============================================================
    // Shifts & bitwise
    // ============================================================

    #[test]
    fn test_shl_overflow() {
        // 10 << 7 = 1280 -> 0
        let vm = assert_stack(&[lit(10), lit(7), op(Op::Shl)], &[byte(0)]);
        assert!(vm.overflow());
    }

    #[test]
    fn test_shl_in_range() {
        let vm = assert_stack(&[lit(3), lit(4), op(Op::Shl)], &[byte(48)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_shl_zero_by_large_amount() {
        let vm = assert_stack(&[lit(0), lit(9), op(Op::Shl)], &[byte(0)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_shr() {
        let vm = assert_stack(&[lit(10), lit(7), op(Op::Shr)], &[byte(0)]);
        assert!(!vm.overflow());
        assert_stack(&[lit(12), lit(2), op(Op::Shr)], &[byte(3)]);
    }

    #[test]
    fn test_not_is_eight_bit_complement() {
        assert_stack(&[lit(10), op(Op::Not)], &[byte(245)]);
    }

    #[test]
    fn test_not_rejects_char() {
        assert_error(&[ch('A'), op(Op::Not)], |e| {
            matches!(e, RuntimeError::TypeMismatch { op: "NOT", .. })
        });
    }

    #[test]
    fn test_xor() {
        let vm = assert_stack(&[lit(10), lit(7), op(Op::Xor)], &[byte(13)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_overflow_cleared_by_next_arithmetic() {
        let (mut vm, _) = run_words(&[lit(2), lit(10), op(Op::Exp), op(Op::Dup)]);
        // stack ops leave the flag alone
        assert!(vm.overflow());
        vm.execute_one(op(Op::Add));
        assert_eq!(vm.stack(), &[byte(0)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_operand_push_clears_overflow() {
        let (vm, _) = run_words(&[lit(2), lit(10), op(Op::Exp), lit(1)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_failed_op_keeps_overflow_flag() {
        let (vm, state) = run_words(&[lit(2), lit(10), op(Op::Sub), ch('A'), op(Op::Add)]);
        assert_eq!(state, MachineState::Error);
        assert!(vm.overflow());
    }

    // ============================================================
    // HEX / IEQ
    // ============================================================

    #[test]
    fn test_hex() {
        let vm = assert_stack(&[ch('A'), ch('A'), op(Op::Hex)], &[byte(0xAA)]);
        assert!(!vm.overflow());
    }

    #[test]
    fn test_hex_high_nibble_is_second_operand() {
        assert_stack(&[ch('F'), ch('A'), op(Op::Hex)], &[byte(0xFA)]);
    }

    #[test]
    fn test_hex_rejects_bytes() {
        assert_error(&[lit(10), lit(7), op(Op::Hex)], |e| {
            matches!(e, RuntimeError::NotHexDigit(Value::Byte(10)))
        });
    }

    #[test]
    fn test_hex_rejects_non_hex_letter() {
        assert_error(&[ch('A'), ch('G'), op(Op::Hex)], |e| {
            matches!(e, RuntimeError::NotHexDigit(Value::Char('G')))
        });
    }

    #[test]
    fn test_ieq() {
        assert_stack(&[lit(10), lit(7), op(Op::Ieq)], &[byte(0)]);
        assert_stack(&[lit(7), lit(7), op(Op::Ieq)], &[byte(1)]);
        assert_stack(&[ch('B'), ch('B'), op(Op::Ieq)], &[byte(1)]);
    }

    #[test]
    fn test_ieq_different_kinds_are_unequal() {
        assert_stack(&[lit(1), ch('A'), op(Op::Ieq)], &[byte(0)]);
    }

    // ============================================================
    // SPEAK
    // ============================================================

    #[test]
    fn test_speak() {
        let (vm, state) = run_words(&[ch('I'), ch('H'), lit(2), op(Op::Speak)]);
        assert_eq!(state, MachineState::Running);
        assert_eq!(vm.announcements(), &["HI".to_string()]);
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_speak_mixed_values() {
        let (vm, _) = run_words(&[lit(4), ch('X'), lit(2), op(Op::Speak)]);
        assert_eq!(vm.announcements(), &["X4".to_string()]);
    }

    #[test]
    fn test_speak_zero_count() {
        let (mut vm, state) = run_words(&[ch('A'), lit(0), op(Op::Speak)]);
        assert_eq!(state, MachineState::Running);
        assert_eq!(vm.take_announcements(), vec![String::new()]);
        assert!(vm.announcements().is_empty());
        assert_eq!(vm.stack(), &[Value::Char('A')]);
    }

    #[test]
    fn test_speak_incomplete() {
        assert_error(&[ch('I'), ch('H'), lit(3), op(Op::Speak)], |e| {
            *e == RuntimeError::IncompleteSpeech {
                expected: 3,
                partial: "HI".to_string(),
            }
        });
    }

    #[test]
    fn test_speak_count_must_be_byte() {
        assert_error(&[ch('H'), op(Op::Speak)], |e| {
            matches!(e, RuntimeError::TypeMismatch { op: "SPEAK", .. })
        });
    }

    #[test]
    fn test_speak_empty_stack() {
        assert_error(&[op(Op::Speak)], RuntimeError::is_underflow);
    }

    // ============================================================
    // Programs & lifecycle
    // ============================================================

    #[test]
    fn test_res_64_program() {
        let program = [
            lit(10),
            op(Op::Dup),
            op(Op::Dup),
            op(Op::Mul),
            op(Op::Xor),
            lit(4),
            op(Op::Shr),
            lit(4),
            op(Op::Mod),
            lit(6),
            op(Op::Exp),
            ch(' '),
            ch('S'),
            ch('E'),
            ch('R'),
            lit(5),
            op(Op::Speak),
        ];
        let (mut vm, state) = run_words(&program);
        assert_eq!(state, MachineState::Running);
        assert_eq!(vm.announcements(), &["RES 64".to_string()]);
        assert_eq!(vm.execute_one(op(Op::Stp)), MachineState::Stopped);
    }

    #[test]
    fn test_error_is_not_sticky() {
        let mut vm = StackMachine::new();
        assert_eq!(vm.execute_one(op(Op::Dup)), MachineState::Error);
        assert!(vm.last_error().is_some());
        assert_eq!(vm.execute_one(lit(1)), MachineState::Running);
        assert!(vm.last_error().is_none());
    }

    #[test]
    fn test_push_never_fails() {
        let mut vm = StackMachine::new();
        for i in 0..5000u32 {
            let word = if i % 2 == 0 { lit(1) } else { ch('Z') };
            assert_eq!(vm.execute_one(word), MachineState::Running, "push {i}");
        }
        assert_eq!(vm.execute_one(op(Op::Dup)), MachineState::Running);
        assert_eq!(vm.stack().len(), 5001);
        assert!(vm.last_error().is_none());
    }

    #[test]
    fn test_reset() {
        let (mut vm, _) = run_words(&[lit(3), op(Op::Dup)]);
        vm.reset();
        assert_eq!(vm.snapshot(), StackMachine::new().snapshot());
    }

    #[test]
    fn test_snapshot() {
        let (vm, _) = run_words(&[lit(3), ch('Q')]);
        let snap = vm.snapshot();
        assert_eq!(snap.state, MachineState::Running);
        assert_eq!(snap.stack, vec![byte(3), Value::Char('Q')]);
        assert_eq!(snap.steps, 2);
    }
}

//! The fetch-decode-execute engine.
//!
//! One call to [`step`] executes exactly one instruction: fetch the byte at
//! PC, advance PC, decode, dispatch to the matching unit, write back, and
//! report whether the driving loop should continue. Decode scratch (the
//! fetched byte and its fields) lives on this call's stack; nothing is
//! shared between calls except the machine state itself.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    unknown_lints
)]

mod flags;
mod helpers;

pub use flags::{carry_out, negative, signed_overflow, zero, FlagsUpdate};
pub use helpers::{
    fetch_second_word, read_register, resolve_operand, resolve_store_address, write_register,
};

use crate::decoder::{
    AddressingMode, AluOp, BranchCondition, Decoder, Instruction, OperandReg, ShiftMode,
};
use crate::fault::FaultCode;
use crate::memory::next_pc;
use crate::state::{MachineState, RunState};

/// Output status from one step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the driver may call [`step`] again.
    Continue,
    /// The machine halted (`HLT` or an already-latched halt).
    Halted,
    /// A fault latched during decode or dispatch.
    Fault {
        /// The diagnostic for the host to render.
        cause: FaultCode,
    },
}

impl StepOutcome {
    /// Returns `true` when the driving loop must stop stepping.
    #[must_use]
    pub const fn should_halt(self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// Returns the fault carried by this outcome, if any.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Fault { cause } => Some(cause),
            Self::Continue | Self::Halted => None,
        }
    }
}

/// Executes one fetch-decode-execute cycle.
///
/// A halted or fault-latched machine is left untouched and reports its
/// terminal outcome again, so a driver that overshoots the stop condition
/// stays safe.
pub fn step(state: &mut MachineState) -> StepOutcome {
    match state.run_state {
        RunState::FaultLatched(cause) => return StepOutcome::Fault { cause },
        RunState::Halted => return StepOutcome::Halted,
        RunState::Running => {}
    }

    let fetch_pc = state.pc;
    let code = state.fetch_byte();
    state.pc = next_pc(state.pc);

    let instruction = match Decoder::decode(code) {
        Ok(instruction) => instruction,
        Err(cause) => {
            state.counters.record_fault(cause, fetch_pc);
            state.run_state = RunState::FaultLatched(cause);
            return StepOutcome::Fault { cause };
        }
    };

    let outcome = match instruction {
        Instruction::Nop => StepOutcome::Continue,
        Instruction::Hlt => StepOutcome::Halted,
        Instruction::Jal => execute_jal(state),
        Instruction::Jr => execute_jr(state),
        Instruction::Out => execute_out(state),
        Instruction::In => execute_in(state),
        Instruction::Rcf => execute_carry(state, false),
        Instruction::Scf => execute_carry(state, true),
        Instruction::Bbc(condition) => execute_bbc(state, condition),
        Instruction::Srsm { reg, mode } => execute_srsm(state, reg, mode),
        Instruction::Ld { reg, operand } => {
            let value = resolve_operand(state, operand);
            write_register(state, reg, value);
            StepOutcome::Continue
        }
        Instruction::St { reg, target } => {
            let value = read_register(state, reg);
            let addr = resolve_store_address(state, target);
            state.mem[addr] = value;
            StepOutcome::Continue
        }
        Instruction::Alu { op, reg, operand } => execute_alu(state, op, reg, operand),
    };

    state.counters.retire();
    if outcome == StepOutcome::Halted {
        state.run_state = RunState::Halted;
    }
    outcome
}

/// Jump-and-link: the already-incremented PC lands in ACC as the return
/// address, then PC takes the fetched program-space target.
fn execute_jal(state: &mut MachineState) -> StepOutcome {
    let target = fetch_second_word(state);
    state.acc = (state.pc & 0x00FF) as u8;
    state.pc = u16::from(target);
    StepOutcome::Continue
}

const fn execute_jr(state: &mut MachineState) -> StepOutcome {
    state.pc = state.acc as u16;
    StepOutcome::Continue
}

/// OUT never waits: an unconsumed value is overwritten.
const fn execute_out(state: &mut MachineState) -> StepOutcome {
    state.obuf.post(state.acc);
    StepOutcome::Continue
}

/// IN never waits: the buffer is read even when nothing is pending.
const fn execute_in(state: &mut MachineState) -> StepOutcome {
    state.acc = state.ibuf.take();
    StepOutcome::Continue
}

const fn execute_carry(state: &mut MachineState, cf: bool) -> StepOutcome {
    FlagsUpdate::carry_only(cf).apply(state);
    StepOutcome::Continue
}

/// BBC consumes the target word whether or not the branch is taken.
fn execute_bbc(state: &mut MachineState, condition: BranchCondition) -> StepOutcome {
    let target = fetch_second_word(state);
    if branch_taken(condition, state) {
        state.pc = u16::from(target);
    }
    StepOutcome::Continue
}

fn execute_srsm(state: &mut MachineState, reg: OperandReg, mode: ShiftMode) -> StepOutcome {
    let value = read_register(state, reg);
    let (result, update) = shift_compute(mode, value, state.cf);
    write_register(state, reg, result);
    update.apply(state);
    StepOutcome::Continue
}

fn execute_alu(
    state: &mut MachineState,
    op: AluOp,
    reg: OperandReg,
    operand: AddressingMode,
) -> StepOutcome {
    let a = read_register(state, reg);
    let b = resolve_operand(state, operand);
    let (result, update) = alu_compute(op, a, b, state.cf);
    update.apply(state);
    if op != AluOp::Cmp {
        write_register(state, reg, result);
    }
    StepOutcome::Continue
}

/// Evaluates one of the sixteen branch predicates against the current
/// flags and I/O readiness.
#[must_use]
pub const fn branch_taken(condition: BranchCondition, state: &MachineState) -> bool {
    match condition {
        BranchCondition::Always => true,
        BranchCondition::NotZero => !state.zf,
        BranchCondition::NotNegative => !state.nf,
        BranchCondition::Positive => !(state.nf || state.zf),
        BranchCondition::NoInput => !state.ibuf.ready,
        BranchCondition::NotCarry => !state.cf,
        BranchCondition::GreaterOrEqual => !(state.vf ^ state.nf),
        BranchCondition::Greater => !((state.vf ^ state.nf) || state.zf),
        BranchCondition::Overflow => state.vf,
        BranchCondition::Zero => state.zf,
        BranchCondition::Negative => state.nf,
        BranchCondition::NegativeOrZero => state.nf || state.zf,
        BranchCondition::OutputReady => state.obuf.ready,
        BranchCondition::Carry => state.cf,
        BranchCondition::Less => state.vf ^ state.nf,
        BranchCondition::LessOrEqual => (state.vf ^ state.nf) || state.zf,
    }
}

/// Computes an ALU result and its flag update.
///
/// The carry/overflow conventions are intentionally asymmetric and follow
/// the board documentation: see [`flags`] for the catalogue.
#[must_use]
pub fn alu_compute(op: AluOp, a: u8, b: u8, cf_in: bool) -> (u8, FlagsUpdate) {
    match op {
        AluOp::Add => {
            let sum = u16::from(a) + u16::from(b);
            let result = (sum & 0xFF) as u8;
            let vf = carry_out(sum) | signed_overflow(a, b, result);
            (result, FlagsUpdate::arithmetic(None, vf, result))
        }
        AluOp::Adc => {
            let sum = u16::from(a) + u16::from(b) + u16::from(cf_in);
            let result = (sum & 0xFF) as u8;
            let update = FlagsUpdate::arithmetic(
                Some(carry_out(sum)),
                signed_overflow(a, b, result),
                result,
            );
            (result, update)
        }
        AluOp::Sub | AluOp::Cmp => {
            let negated = b.wrapping_neg();
            let sum = u16::from(a) + u16::from(negated);
            let result = (sum & 0xFF) as u8;
            let update =
                FlagsUpdate::arithmetic(None, signed_overflow(a, negated, result), result);
            (result, update)
        }
        AluOp::Sbc => {
            let negated = b.wrapping_neg();
            let sum = (u16::from(a) + u16::from(negated)).wrapping_sub(u16::from(cf_in)) & 0x1FF;
            let result = (sum & 0xFF) as u8;
            let update = FlagsUpdate::arithmetic(
                Some(!carry_out(sum)),
                signed_overflow(a, negated, result),
                result,
            );
            (result, update)
        }
        AluOp::Eor => {
            let result = a ^ b;
            (result, FlagsUpdate::logical(result))
        }
        AluOp::Or => {
            let result = a | b;
            (result, FlagsUpdate::logical(result))
        }
        AluOp::And => {
            let result = a & b;
            (result, FlagsUpdate::logical(result))
        }
    }
}

/// Computes a shift/rotate result and its flag update.
#[must_use]
pub const fn shift_compute(mode: ShiftMode, value: u8, cf_in: bool) -> (u8, FlagsUpdate) {
    let lsb = value & 0x01 != 0;
    let msb = value & 0x80 != 0;

    let (result, carry, vf) = match mode {
        ShiftMode::Sra => ((value >> 1) | (value & 0x80), lsb, false),
        ShiftMode::Sla => {
            let shifted = value << 1;
            (shifted, msb, (shifted ^ value) & 0x80 != 0)
        }
        ShiftMode::Srl => (value >> 1, lsb, false),
        ShiftMode::Sll => (value << 1, msb, false),
        ShiftMode::Rra => ((value >> 1) | ((cf_in as u8) << 7), lsb, false),
        ShiftMode::Rla => {
            let rotated = (value << 1) | cf_in as u8;
            (rotated, msb, (rotated ^ value) & 0x80 != 0)
        }
        ShiftMode::Rrl => (value.rotate_right(1), lsb, false),
        ShiftMode::Rll => (value.rotate_left(1), msb, false),
    };

    (result, FlagsUpdate::arithmetic(Some(carry), vf, result))
}

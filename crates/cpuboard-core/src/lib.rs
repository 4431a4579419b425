//! Instruction-set simulator core for the Educational CPU Board.
//!
//! The board is an 8-bit teaching machine: an accumulator, an index
//! register, a 9-bit program counter, four condition flags, and 512 memory
//! cells split into a program bank and a data bank. This crate models the
//! machine state and its fetch-decode-execute cycle; hosts drive it one
//! [`step`](execute::step) at a time and read whatever state they want in
//! between.

/// Memory geometry: bank bases, sizes, and program-counter wrap.
pub mod memory;
pub use memory::{
    next_pc, MemoryBank, BANK_CELLS, DATA_BASE, MEMORY_CELLS, PC_MASK, PROGRAM_BASE,
};

/// Execution counters and last-fault record.
pub mod diag;
pub use diag::{FaultRecord, StepCounters};

/// Machine state, I/O buffers, and the run-state latch.
pub mod state;
pub use state::{IoBuffer, MachineState, RunState};

/// Deterministic opcode pattern table and classification.
pub mod encoding;
pub use encoding::{classify_opcode, decode_operand_fields, Mnemonic, OPCODE_PATTERN_TABLE};

/// Instruction decode with operand-field validation.
pub mod decoder;
pub use decoder::{
    AddressingMode, AluOp, BranchCondition, Decoder, Instruction, OperandReg, ShiftMode,
    StoreTarget,
};

/// Fault taxonomy for undecodable and ill-formed instructions.
pub mod fault;
pub use fault::{FaultClass, FaultCode};

/// The fetch-decode-execute engine.
pub mod execute;
pub use execute::{alu_compute, branch_taken, shift_compute, step, FlagsUpdate, StepOutcome};

/// Instruction disassembly for listings.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_window, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;

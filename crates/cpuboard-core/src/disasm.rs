//! Instruction disassembly for front-panel and debugger listings.
//!
//! Program space uses two operand spellings: square brackets for program
//! addresses (`[0x20]`, `[IX+0x04]`) and parentheses for data addresses
//! (`(0x20)`, `(IX+0x04)`).

use crate::decoder::{AddressingMode, Decoder, Instruction, OperandReg, StoreTarget};
use crate::memory::next_pc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// The starting address of this instruction.
    pub addr_start: u16,
    /// Length in bytes (1, or 2 when a second word follows).
    pub len_bytes: u8,
    /// Raw bytes; the second is zero for one-byte instructions.
    pub raw_bytes: [u8; 2],
    /// The instruction mnemonic (e.g. `"ADD"`, `"BZ"`, `"SRA"`).
    pub mnemonic: String,
    /// The formatted operands (e.g. `"ACC, #0x2A"` or `"(IX+0x04)"`).
    pub operands: String,
    /// Whether this row is an undecodable byte.
    pub is_illegal: bool,
}

/// Disassembles up to `count` instructions forward from `start_pc`.
///
/// Walking stops early when an address falls outside `memory`. Illegal
/// bytes produce a one-byte `.byte` row and walking continues after them,
/// mirroring how the fetch unit would resynchronize.
#[must_use]
pub fn disassemble_window(start_pc: u16, count: usize, memory: &[u8]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut pc = start_pc;

    for _ in 0..count {
        let Some(row) = disassemble_one(pc, memory) else {
            break;
        };
        pc = pc.wrapping_add(u16::from(row.len_bytes));
        rows.push(row);
    }

    rows
}

/// Disassembles the single instruction at `pc`, or `None` when `pc` (or a
/// required second word) lies outside `memory`.
#[must_use]
pub fn disassemble_one(pc: u16, memory: &[u8]) -> Option<DisassemblyRow> {
    let code = *memory.get(usize::from(pc))?;

    let Ok(instruction) = Decoder::decode(code) else {
        return Some(DisassemblyRow {
            addr_start: pc,
            len_bytes: 1,
            raw_bytes: [code, 0],
            mnemonic: ".byte".to_string(),
            operands: format!("{code:#04X} ; ILLEGAL"),
            is_illegal: true,
        });
    };

    let (len_bytes, word) = if instruction.is_two_word() {
        let word = *memory.get(usize::from(next_pc(pc)))?;
        (2, word)
    } else {
        (1, 0)
    };

    Some(DisassemblyRow {
        addr_start: pc,
        len_bytes,
        raw_bytes: [code, word],
        mnemonic: format_mnemonic(&instruction),
        operands: format_operands(&instruction, word),
        is_illegal: false,
    })
}

fn format_mnemonic(instruction: &Instruction) -> String {
    let name = match instruction {
        Instruction::Nop => "NOP",
        Instruction::Hlt => "HLT",
        Instruction::Jal => "JAL",
        Instruction::Jr => "JR",
        Instruction::Out => "OUT",
        Instruction::In => "IN",
        Instruction::Rcf => "RCF",
        Instruction::Scf => "SCF",
        Instruction::Bbc(condition) => condition.mnemonic(),
        Instruction::Srsm { mode, .. } => mode.mnemonic(),
        Instruction::Ld { .. } => "LD",
        Instruction::St { .. } => "ST",
        Instruction::Alu { op, .. } => op.mnemonic(),
    };
    name.to_string()
}

fn format_operands(instruction: &Instruction, word: u8) -> String {
    match instruction {
        Instruction::Nop
        | Instruction::Hlt
        | Instruction::Jr
        | Instruction::Out
        | Instruction::In
        | Instruction::Rcf
        | Instruction::Scf => String::new(),
        Instruction::Jal | Instruction::Bbc(_) => format!("{word:#04X}"),
        Instruction::Srsm { reg, .. } => register_name(*reg).to_string(),
        Instruction::Ld { reg, operand } | Instruction::Alu { reg, operand, .. } => {
            format!("{}, {}", register_name(*reg), format_source(*operand, word))
        }
        Instruction::St { reg, target } => {
            format!("{}, {}", register_name(*reg), format_target(*target, word))
        }
    }
}

fn format_source(mode: AddressingMode, word: u8) -> String {
    match mode {
        AddressingMode::AccDirect => "ACC".to_string(),
        AddressingMode::IxDirect => "IX".to_string(),
        AddressingMode::Immediate => format!("#{word:#04X}"),
        AddressingMode::AbsoluteProgram => format!("[{word:#04X}]"),
        AddressingMode::AbsoluteData => format!("({word:#04X})"),
        AddressingMode::IndexedProgram => format!("[IX+{word:#04X}]"),
        AddressingMode::IndexedData => format!("(IX+{word:#04X})"),
    }
}

fn format_target(target: StoreTarget, word: u8) -> String {
    match target {
        StoreTarget::AbsoluteProgram => format!("[{word:#04X}]"),
        StoreTarget::AbsoluteData => format!("({word:#04X})"),
        StoreTarget::IndexedProgram => format!("[IX+{word:#04X}]"),
        StoreTarget::IndexedData => format!("(IX+{word:#04X})"),
    }
}

const fn register_name(reg: OperandReg) -> &'static str {
    match reg {
        OperandReg::Acc => "ACC",
        OperandReg::Ix => "IX",
    }
}

//! Instruction decoder for the Educational CPU Board.
//!
//! Splits a fetched instruction byte into an opcode classification plus
//! operand selectors, and validates field combinations that have no defined
//! behavior (unknown bytes, register/immediate store destinations).

use crate::encoding::{classify_opcode, decode_operand_fields, Mnemonic};
use crate::fault::FaultCode;

/// Primary register selected by operand A (bit 3 of the instruction byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandReg {
    /// The accumulator.
    Acc,
    /// The index register.
    Ix,
}

impl OperandReg {
    /// Decodes the 1-bit operand-A field.
    #[must_use]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 0x01 == 0 {
            Self::Acc
        } else {
            Self::Ix
        }
    }
}

/// Operand-B addressing modes (low 3 bits of the instruction byte).
///
/// The 3-bit field carries a redundant encoding: raw value `0b011` folds
/// onto `0b010`, both meaning immediate addressing. The fold is part of the
/// wire format and is reproduced here rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Operand value is ACC; no second word.
    AccDirect,
    /// Operand value is IX; no second word.
    IxDirect,
    /// Operand value is the second word itself.
    Immediate,
    /// Second word is an absolute program-space address.
    AbsoluteProgram,
    /// Second word is an absolute data-space address.
    AbsoluteData,
    /// Second word plus IX forms a program-space address.
    IndexedProgram,
    /// Second word plus IX forms a data-space address.
    IndexedData,
}

impl AddressingMode {
    /// Decodes the 3-bit operand-B field, applying the immediate fold.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::AccDirect,
            1 => Self::IxDirect,
            2 | 3 => Self::Immediate,
            4 => Self::AbsoluteProgram,
            5 => Self::AbsoluteData,
            6 => Self::IndexedProgram,
            _ => Self::IndexedData,
        }
    }

    /// Returns `true` when resolving this mode consumes a second word.
    #[must_use]
    pub const fn needs_second_word(self) -> bool {
        !matches!(self, Self::AccDirect | Self::IxDirect)
    }
}

/// Memory destinations accepted by the store instruction.
///
/// ST rejects the register and immediate selectors: they name no memory
/// cell, so a store through them is an illegal-operand fault rather than a
/// silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTarget {
    /// Absolute program-space address from the second word.
    AbsoluteProgram,
    /// Absolute data-space address from the second word.
    AbsoluteData,
    /// Index-modified program-space address.
    IndexedProgram,
    /// Index-modified data-space address.
    IndexedData,
}

impl StoreTarget {
    /// Narrows an addressing mode to a store destination.
    #[must_use]
    pub const fn from_mode(mode: AddressingMode) -> Option<Self> {
        match mode {
            AddressingMode::AbsoluteProgram => Some(Self::AbsoluteProgram),
            AddressingMode::AbsoluteData => Some(Self::AbsoluteData),
            AddressingMode::IndexedProgram => Some(Self::IndexedProgram),
            AddressingMode::IndexedData => Some(Self::IndexedData),
            AddressingMode::AccDirect | AddressingMode::IxDirect | AddressingMode::Immediate => {
                None
            }
        }
    }
}

/// The sixteen branch predicates of the BBC class (low nibble of the byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCondition {
    /// Unconditional.
    Always,
    /// `!ZF`
    NotZero,
    /// `!NF`
    NotNegative,
    /// `!(NF | ZF)`
    Positive,
    /// `!ibuf.ready`
    NoInput,
    /// `!CF`
    NotCarry,
    /// `!(VF ^ NF)`
    GreaterOrEqual,
    /// `!((VF ^ NF) | ZF)`
    Greater,
    /// `VF`
    Overflow,
    /// `ZF`
    Zero,
    /// `NF`
    Negative,
    /// `NF | ZF`
    NegativeOrZero,
    /// `obuf.ready`
    OutputReady,
    /// `CF`
    Carry,
    /// `VF ^ NF`
    Less,
    /// `(VF ^ NF) | ZF`
    LessOrEqual,
}

impl BranchCondition {
    /// Ordered predicate table, indexed by the low nibble.
    pub const ALL: [Self; 16] = [
        Self::Always,
        Self::NotZero,
        Self::NotNegative,
        Self::Positive,
        Self::NoInput,
        Self::NotCarry,
        Self::GreaterOrEqual,
        Self::Greater,
        Self::Overflow,
        Self::Zero,
        Self::Negative,
        Self::NegativeOrZero,
        Self::OutputReady,
        Self::Carry,
        Self::Less,
        Self::LessOrEqual,
    ];

    /// Decodes the 4-bit condition field.
    #[must_use]
    pub const fn from_u4(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Assembly mnemonic for this predicate.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Always => "BA",
            Self::NotZero => "BNZ",
            Self::NotNegative => "BZP",
            Self::Positive => "BP",
            Self::NoInput => "BNI",
            Self::NotCarry => "BNC",
            Self::GreaterOrEqual => "BGE",
            Self::Greater => "BGT",
            Self::Overflow => "BVF",
            Self::Zero => "BZ",
            Self::Negative => "BN",
            Self::NegativeOrZero => "BZN",
            Self::OutputReady => "BNO",
            Self::Carry => "BC",
            Self::Less => "BLT",
            Self::LessOrEqual => "BLE",
        }
    }
}

/// The eight shift/rotate variants (low 3 bits of the `0x4n` class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftMode {
    /// Shift right arithmetic: sign bit replicated.
    Sra,
    /// Shift left arithmetic: zero pushed, VF tracks a sign change.
    Sla,
    /// Shift right logical: zero pushed.
    Srl,
    /// Shift left logical: zero pushed.
    Sll,
    /// Rotate right through carry.
    Rra,
    /// Rotate left through carry, VF tracks a sign change.
    Rla,
    /// Rotate right, LSB wraps to MSB.
    Rrl,
    /// Rotate left, MSB wraps to LSB.
    Rll,
}

impl ShiftMode {
    /// Decodes the 3-bit shift-mode field.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Sra,
            1 => Self::Sla,
            2 => Self::Srl,
            3 => Self::Sll,
            4 => Self::Rra,
            5 => Self::Rla,
            6 => Self::Rrl,
            _ => Self::Rll,
        }
    }

    /// Assembly mnemonic for this variant.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Sra => "SRA",
            Self::Sla => "SLA",
            Self::Srl => "SRL",
            Self::Sll => "SLL",
            Self::Rra => "RRA",
            Self::Rla => "RLA",
            Self::Rrl => "RRL",
            Self::Rll => "RLL",
        }
    }
}

/// Arithmetic/logic operations of the upper opcode classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Sbc,
    Adc,
    Sub,
    Add,
    Eor,
    Or,
    And,
    Cmp,
}

impl AluOp {
    /// Assembly mnemonic for this operation.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Sbc => "SBC",
            Self::Adc => "ADC",
            Self::Sub => "SUB",
            Self::Add => "ADD",
            Self::Eor => "EOR",
            Self::Or => "OR",
            Self::And => "AND",
            Self::Cmp => "CMP",
        }
    }
}

/// Fully decoded instruction, ready for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// No operation.
    Nop,
    /// Halt the machine.
    Hlt,
    /// Jump to the second word, leaving the return address in ACC.
    Jal,
    /// Jump to the address held in ACC.
    Jr,
    /// Copy ACC into the output buffer and raise its ready flag.
    Out,
    /// Copy the input buffer into ACC and drop its ready flag.
    In,
    /// Clear the carry flag.
    Rcf,
    /// Set the carry flag.
    Scf,
    /// Conditional branch to the second word.
    Bbc(BranchCondition),
    /// Shift or rotate the operand-A register.
    Srsm {
        /// Register shifted in place.
        reg: OperandReg,
        /// Shift/rotate variant.
        mode: ShiftMode,
    },
    /// Load operand B into the operand-A register.
    Ld {
        /// Destination register.
        reg: OperandReg,
        /// Source operand.
        operand: AddressingMode,
    },
    /// Store the operand-A register into memory.
    St {
        /// Source register.
        reg: OperandReg,
        /// Memory destination.
        target: StoreTarget,
    },
    /// Arithmetic/logic operation between operand A and operand B.
    Alu {
        /// Operation selector.
        op: AluOp,
        /// Primary register (also the destination, except CMP).
        reg: OperandReg,
        /// Secondary operand.
        operand: AddressingMode,
    },
}

impl Instruction {
    /// Returns `true` when executing this instruction fetches a second word.
    #[must_use]
    pub const fn is_two_word(self) -> bool {
        match self {
            Self::Jal | Self::Bbc(_) | Self::St { .. } => true,
            Self::Ld { operand, .. } | Self::Alu { operand, .. } => operand.needs_second_word(),
            Self::Nop
            | Self::Hlt
            | Self::Jr
            | Self::Out
            | Self::In
            | Self::Rcf
            | Self::Scf
            | Self::Srsm { .. } => false,
        }
    }
}

/// Instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes an instruction byte.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::UnknownInstruction`] for a byte outside every
    /// opcode pattern, and [`FaultCode::IllegalStoreOperand`] for a store
    /// whose operand-B selector names ACC, IX, or an immediate.
    pub fn decode(code: u8) -> Result<Instruction, FaultCode> {
        let Some(mnemonic) = classify_opcode(code) else {
            return Err(FaultCode::UnknownInstruction { code });
        };

        let (reg_bit, operand_bits) = decode_operand_fields(code);
        let reg = OperandReg::from_bit(reg_bit);
        let operand = AddressingMode::from_u3(operand_bits);

        let instruction = match mnemonic {
            Mnemonic::Nop => Instruction::Nop,
            Mnemonic::Hlt => Instruction::Hlt,
            Mnemonic::Jal => Instruction::Jal,
            Mnemonic::Jr => Instruction::Jr,
            Mnemonic::Out => Instruction::Out,
            Mnemonic::In => Instruction::In,
            Mnemonic::Rcf => Instruction::Rcf,
            Mnemonic::Scf => Instruction::Scf,
            Mnemonic::Bbc => Instruction::Bbc(BranchCondition::from_u4(code & 0x0F)),
            Mnemonic::Srsm => Instruction::Srsm {
                reg,
                mode: ShiftMode::from_u3(operand_bits),
            },
            Mnemonic::Ld => Instruction::Ld { reg, operand },
            Mnemonic::St => {
                let Some(target) = StoreTarget::from_mode(operand) else {
                    return Err(FaultCode::IllegalStoreOperand { code });
                };
                Instruction::St { reg, target }
            }
            Mnemonic::Sbc => alu(AluOp::Sbc, reg, operand),
            Mnemonic::Adc => alu(AluOp::Adc, reg, operand),
            Mnemonic::Sub => alu(AluOp::Sub, reg, operand),
            Mnemonic::Add => alu(AluOp::Add, reg, operand),
            Mnemonic::Eor => alu(AluOp::Eor, reg, operand),
            Mnemonic::Or => alu(AluOp::Or, reg, operand),
            Mnemonic::And => alu(AluOp::And, reg, operand),
            Mnemonic::Cmp => alu(AluOp::Cmp, reg, operand),
        };

        Ok(instruction)
    }
}

const fn alu(op: AluOp, reg: OperandReg, operand: AddressingMode) -> Instruction {
    Instruction::Alu { op, reg, operand }
}

#[cfg(test)]
mod tests {
    use super::{
        AddressingMode, AluOp, BranchCondition, Decoder, Instruction, OperandReg, ShiftMode,
        StoreTarget,
    };
    use crate::fault::FaultCode;

    fn decode(code: u8) -> Instruction {
        Decoder::decode(code).expect("should decode")
    }

    #[test]
    fn immediate_fold_maps_raw_3_onto_raw_2() {
        assert_eq!(AddressingMode::from_u3(2), AddressingMode::Immediate);
        assert_eq!(AddressingMode::from_u3(3), AddressingMode::Immediate);
        assert_eq!(decode(0x62), decode(0x63));
        assert_eq!(decode(0xB2), decode(0xB3));
    }

    #[test]
    fn operand_a_bit_selects_register() {
        assert_eq!(
            decode(0x62),
            Instruction::Ld {
                reg: OperandReg::Acc,
                operand: AddressingMode::Immediate
            }
        );
        assert_eq!(
            decode(0x6A),
            Instruction::Ld {
                reg: OperandReg::Ix,
                operand: AddressingMode::Immediate
            }
        );
    }

    #[test]
    fn control_class_disambiguates_packed_encodings() {
        for code in 0x00u8..=0x07 {
            assert_eq!(decode(code), Instruction::Nop, "{code:#04x}");
        }
        for code in 0x0Cu8..=0x0F {
            assert_eq!(decode(code), Instruction::Hlt, "{code:#04x}");
        }
        assert_eq!(decode(0x0A), Instruction::Jal);
        assert_eq!(decode(0x0B), Instruction::Jr);
        assert_eq!(
            Decoder::decode(0x08),
            Err(FaultCode::UnknownInstruction { code: 0x08 })
        );
        assert_eq!(
            Decoder::decode(0x09),
            Err(FaultCode::UnknownInstruction { code: 0x09 })
        );
    }

    #[test]
    fn io_and_carry_classes_split_on_bit3() {
        assert_eq!(decode(0x10), Instruction::Out);
        assert_eq!(decode(0x17), Instruction::Out);
        assert_eq!(decode(0x18), Instruction::In);
        assert_eq!(decode(0x1F), Instruction::In);
        assert_eq!(decode(0x20), Instruction::Rcf);
        assert_eq!(decode(0x28), Instruction::Scf);
        assert_eq!(decode(0x2F), Instruction::Scf);
    }

    #[test]
    fn branch_low_nibble_selects_condition() {
        assert_eq!(decode(0x30), Instruction::Bbc(BranchCondition::Always));
        assert_eq!(decode(0x39), Instruction::Bbc(BranchCondition::Zero));
        assert_eq!(decode(0x3F), Instruction::Bbc(BranchCondition::LessOrEqual));

        for (bits, condition) in (0u8..).zip(BranchCondition::ALL) {
            assert_eq!(decode(0x30 | bits), Instruction::Bbc(condition));
        }
    }

    #[test]
    fn shift_class_decodes_register_and_mode() {
        assert_eq!(
            decode(0x40),
            Instruction::Srsm {
                reg: OperandReg::Acc,
                mode: ShiftMode::Sra
            }
        );
        assert_eq!(
            decode(0x4F),
            Instruction::Srsm {
                reg: OperandReg::Ix,
                mode: ShiftMode::Rll
            }
        );
    }

    #[test]
    fn alu_classes_map_to_operations() {
        let cases: [(u8, AluOp); 8] = [
            (0x80, AluOp::Sbc),
            (0x90, AluOp::Adc),
            (0xA0, AluOp::Sub),
            (0xB0, AluOp::Add),
            (0xC0, AluOp::Eor),
            (0xD0, AluOp::Or),
            (0xE0, AluOp::And),
            (0xF0, AluOp::Cmp),
        ];
        for (code, op) in cases {
            assert_eq!(
                decode(code),
                Instruction::Alu {
                    op,
                    reg: OperandReg::Acc,
                    operand: AddressingMode::AccDirect
                }
            );
        }
    }

    #[test]
    fn store_rejects_register_and_immediate_destinations() {
        for low in [0x00u8, 0x01, 0x02, 0x03] {
            let code = 0x70 | low;
            assert_eq!(
                Decoder::decode(code),
                Err(FaultCode::IllegalStoreOperand { code }),
                "{code:#04x}"
            );
        }
        assert_eq!(
            decode(0x75),
            Instruction::St {
                reg: OperandReg::Acc,
                target: StoreTarget::AbsoluteData
            }
        );
    }

    #[test]
    fn unknown_class_0x50_faults() {
        for code in 0x50u8..=0x5F {
            assert_eq!(
                Decoder::decode(code),
                Err(FaultCode::UnknownInstruction { code })
            );
        }
    }

    #[test]
    fn two_word_classification_matches_addressing() {
        assert!(decode(0x0A).is_two_word()); // JAL
        assert!(decode(0x30).is_two_word()); // BBC
        assert!(decode(0x75).is_two_word()); // ST (d)
        assert!(decode(0x62).is_two_word()); // LD ACC, #imm
        assert!(decode(0xB4).is_two_word()); // ADD ACC, [addr]
        assert!(!decode(0x61).is_two_word()); // LD ACC, IX
        assert!(!decode(0x00).is_two_word()); // NOP
        assert!(!decode(0x40).is_two_word()); // SRA ACC
    }
}

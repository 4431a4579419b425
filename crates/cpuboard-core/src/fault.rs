use thiserror::Error;

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder rejected an instruction byte.
    Decode,
    /// An operand selector named an undefined target for the instruction.
    Operand,
}

/// Fatal conditions raised by the step engine.
///
/// Both categories terminate the run: the engine latches the fault and no
/// further instructions execute. The `Display` output is the human-readable
/// diagnostic surfaced to the host; the exact wording is not part of the
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// The fetched byte matches no opcode pattern.
    #[error("{code:#04x} is an unknown instruction code")]
    UnknownInstruction {
        /// The offending instruction byte.
        code: u8,
    },
    /// A store instruction named ACC, IX, or an immediate as its destination.
    #[error("{code:#04x} is an undefined store destination (ST needs a memory operand)")]
    IllegalStoreOperand {
        /// The offending instruction byte.
        code: u8,
    },
}

impl FaultCode {
    /// Returns the diagnostics class for this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::UnknownInstruction { .. } => FaultClass::Decode,
            Self::IllegalStoreOperand { .. } => FaultClass::Operand,
        }
    }

    /// Returns the instruction byte that raised the fault.
    #[must_use]
    pub const fn instruction_byte(self) -> u8 {
        match self {
            Self::UnknownInstruction { code } | Self::IllegalStoreOperand { code } => code,
        }
    }
}

//! Deterministic opcode classification tables.
//!
//! The instruction byte dispatches on its high nibble, except the `0x0n`,
//! `0x1n`, and `0x2n` classes which pack two (or four) instructions each
//! and are disambiguated by narrower masks. The mask/pattern table below is
//! the single source of truth; any byte matching no entry is illegal by
//! definition.

/// Instruction mnemonics of the Educational CPU Board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Mnemonic {
    Nop,
    Hlt,
    Jal,
    Jr,
    Out,
    In,
    Rcf,
    Scf,
    Bbc,
    Srsm,
    Ld,
    St,
    Sbc,
    Adc,
    Sub,
    Add,
    Eor,
    Or,
    And,
    Cmp,
}

/// Canonical `(mask, pattern, mnemonic)` opcode table.
///
/// A byte `b` encodes a mnemonic when `b & mask == pattern` for the first
/// matching row. `HLT` occupies `0x0C..=0x0F`; `0x08` and `0x09` match
/// nothing.
pub const OPCODE_PATTERN_TABLE: &[(u8, u8, Mnemonic)] = &[
    (0xF8, 0x00, Mnemonic::Nop),
    (0xFF, 0x0A, Mnemonic::Jal),
    (0xFF, 0x0B, Mnemonic::Jr),
    (0xFC, 0x0C, Mnemonic::Hlt),
    (0xF8, 0x10, Mnemonic::Out),
    (0xF8, 0x18, Mnemonic::In),
    (0xF8, 0x20, Mnemonic::Rcf),
    (0xF8, 0x28, Mnemonic::Scf),
    (0xF0, 0x30, Mnemonic::Bbc),
    (0xF0, 0x40, Mnemonic::Srsm),
    (0xF0, 0x60, Mnemonic::Ld),
    (0xF0, 0x70, Mnemonic::St),
    (0xF0, 0x80, Mnemonic::Sbc),
    (0xF0, 0x90, Mnemonic::Adc),
    (0xF0, 0xA0, Mnemonic::Sub),
    (0xF0, 0xB0, Mnemonic::Add),
    (0xF0, 0xC0, Mnemonic::Eor),
    (0xF0, 0xD0, Mnemonic::Or),
    (0xF0, 0xE0, Mnemonic::And),
    (0xF0, 0xF0, Mnemonic::Cmp),
];

/// Returns the mnemonic encoded by an instruction byte.
///
/// `None` means unknown-instruction: `0x08`, `0x09`, and the whole `0x5n`
/// class match no pattern.
#[must_use]
pub fn classify_opcode(code: u8) -> Option<Mnemonic> {
    OPCODE_PATTERN_TABLE
        .iter()
        .find_map(|(mask, pattern, mnemonic)| (code & mask == *pattern).then_some(*mnemonic))
}

/// Extracts the operand fields from an instruction byte.
///
/// Returns `(operand_a, operand_b)`: bit 3 selecting the primary register
/// (0 = ACC, 1 = IX) and the raw low 3-bit operand-B selector.
#[must_use]
pub const fn decode_operand_fields(code: u8) -> (u8, u8) {
    ((code >> 3) & 0x01, code & 0x07)
}

#[cfg(test)]
mod tests {
    use super::{classify_opcode, decode_operand_fields, Mnemonic, OPCODE_PATTERN_TABLE};

    #[test]
    fn table_rows_do_not_overlap() {
        for code in 0u8..=u8::MAX {
            let matches = OPCODE_PATTERN_TABLE
                .iter()
                .filter(|(mask, pattern, _)| code & mask == *pattern)
                .count();
            assert!(matches <= 1, "{code:#04x} matches {matches} rows");
        }
    }

    #[test]
    fn lookup_matches_known_encodings() {
        assert_eq!(classify_opcode(0x00), Some(Mnemonic::Nop));
        assert_eq!(classify_opcode(0x0A), Some(Mnemonic::Jal));
        assert_eq!(classify_opcode(0x0B), Some(Mnemonic::Jr));
        assert_eq!(classify_opcode(0x0F), Some(Mnemonic::Hlt));
        assert_eq!(classify_opcode(0x0C), Some(Mnemonic::Hlt));
        assert_eq!(classify_opcode(0x10), Some(Mnemonic::Out));
        assert_eq!(classify_opcode(0x1F), Some(Mnemonic::In));
        assert_eq!(classify_opcode(0x20), Some(Mnemonic::Rcf));
        assert_eq!(classify_opcode(0x2F), Some(Mnemonic::Scf));
        assert_eq!(classify_opcode(0x34), Some(Mnemonic::Bbc));
        assert_eq!(classify_opcode(0x43), Some(Mnemonic::Srsm));
        assert_eq!(classify_opcode(0x62), Some(Mnemonic::Ld));
        assert_eq!(classify_opcode(0x74), Some(Mnemonic::St));
        assert_eq!(classify_opcode(0x80), Some(Mnemonic::Sbc));
        assert_eq!(classify_opcode(0x90), Some(Mnemonic::Adc));
        assert_eq!(classify_opcode(0xA0), Some(Mnemonic::Sub));
        assert_eq!(classify_opcode(0xB0), Some(Mnemonic::Add));
        assert_eq!(classify_opcode(0xC0), Some(Mnemonic::Eor));
        assert_eq!(classify_opcode(0xD0), Some(Mnemonic::Or));
        assert_eq!(classify_opcode(0xE0), Some(Mnemonic::And));
        assert_eq!(classify_opcode(0xF0), Some(Mnemonic::Cmp));
    }

    #[test]
    fn unassigned_bytes_are_illegal() {
        assert_eq!(classify_opcode(0x08), None);
        assert_eq!(classify_opcode(0x09), None);
        for code in 0x50u8..=0x5F {
            assert_eq!(classify_opcode(code), None, "{code:#04x}");
        }
    }

    #[test]
    fn exhaustive_classification_covers_documented_classes() {
        for code in 0u8..=u8::MAX {
            let unknown = matches!(code, 0x08 | 0x09 | 0x50..=0x5F);
            assert_eq!(
                classify_opcode(code).is_none(),
                unknown,
                "{code:#04x} classification disagrees with opcode map"
            );
        }
    }

    #[test]
    fn operand_fields_extract_bit3_and_low3() {
        assert_eq!(decode_operand_fields(0x60), (0, 0));
        assert_eq!(decode_operand_fields(0x68), (1, 0));
        assert_eq!(decode_operand_fields(0x65), (0, 5));
        assert_eq!(decode_operand_fields(0x6F), (1, 7));
    }
}

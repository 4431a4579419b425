//! Operand resolution helpers for instruction execution.

use crate::decoder::{AddressingMode, OperandReg, StoreTarget};
use crate::memory::{next_pc, MemoryBank};
use crate::state::MachineState;

/// Fetches the second instruction word at PC and advances PC past it.
pub fn fetch_second_word(state: &mut MachineState) -> u8 {
    let word = state.fetch_byte();
    state.pc = next_pc(state.pc);
    word
}

/// Reads the operand-A register.
#[must_use]
pub const fn read_register(state: &MachineState, reg: OperandReg) -> u8 {
    match reg {
        OperandReg::Acc => state.acc,
        OperandReg::Ix => state.ix,
    }
}

/// Writes the operand-A register.
pub const fn write_register(state: &mut MachineState, reg: OperandReg, value: u8) {
    match reg {
        OperandReg::Acc => state.acc = value,
        OperandReg::Ix => state.ix = value,
    }
}

/// Resolves the operand-B value.
///
/// Register modes read ACC/IX directly; every other mode consumes the
/// second word (advancing PC) and resolves it as an immediate or as an
/// address into one of the two banks.
pub fn resolve_operand(state: &mut MachineState, mode: AddressingMode) -> u8 {
    match mode {
        AddressingMode::AccDirect => state.acc,
        AddressingMode::IxDirect => state.ix,
        AddressingMode::Immediate => fetch_second_word(state),
        AddressingMode::AbsoluteProgram => {
            let word = fetch_second_word(state);
            state.mem[MemoryBank::Program.address(word)]
        }
        AddressingMode::AbsoluteData => {
            let word = fetch_second_word(state);
            state.mem[MemoryBank::Data.address(word)]
        }
        AddressingMode::IndexedProgram => {
            let word = fetch_second_word(state);
            state.mem[MemoryBank::Program.indexed_address(state.ix, word)]
        }
        AddressingMode::IndexedData => {
            let word = fetch_second_word(state);
            state.mem[MemoryBank::Data.indexed_address(state.ix, word)]
        }
    }
}

/// Resolves a store destination, consuming the second word.
pub fn resolve_store_address(state: &mut MachineState, target: StoreTarget) -> usize {
    let word = fetch_second_word(state);
    match target {
        StoreTarget::AbsoluteProgram => MemoryBank::Program.address(word),
        StoreTarget::AbsoluteData => MemoryBank::Data.address(word),
        StoreTarget::IndexedProgram => MemoryBank::Program.indexed_address(state.ix, word),
        StoreTarget::IndexedData => MemoryBank::Data.indexed_address(state.ix, word),
    }
}

#[cfg(test)]
mod tests {
    use super::{fetch_second_word, resolve_operand, resolve_store_address};
    use crate::decoder::{AddressingMode, StoreTarget};
    use crate::state::MachineState;

    fn machine_with_program(program: &[u8]) -> MachineState {
        let mut state = MachineState::new();
        state.load_program(program);
        state
    }

    #[test]
    fn second_word_fetch_advances_pc() {
        let mut state = machine_with_program(&[0x12, 0x34]);
        assert_eq!(fetch_second_word(&mut state), 0x12);
        assert_eq!(state.pc, 1);
        assert_eq!(fetch_second_word(&mut state), 0x34);
        assert_eq!(state.pc, 2);
    }

    #[test]
    fn register_modes_resolve_without_extra_fetch() {
        let mut state = MachineState::new();
        state.acc = 0x11;
        state.ix = 0x22;

        assert_eq!(resolve_operand(&mut state, AddressingMode::AccDirect), 0x11);
        assert_eq!(resolve_operand(&mut state, AddressingMode::IxDirect), 0x22);
        assert_eq!(state.pc, 0, "register operands must not consume a word");
    }

    #[test]
    fn immediate_mode_resolves_to_second_word() {
        let mut state = machine_with_program(&[0x7B]);
        assert_eq!(resolve_operand(&mut state, AddressingMode::Immediate), 0x7B);
        assert_eq!(state.pc, 1);
    }

    #[test]
    fn absolute_modes_read_their_bank() {
        let mut state = machine_with_program(&[0x40, 0x40]);
        state.mem[0x040] = 0xAA;
        state.mem[0x140] = 0xBB;

        assert_eq!(
            resolve_operand(&mut state, AddressingMode::AbsoluteProgram),
            0xAA
        );
        assert_eq!(
            resolve_operand(&mut state, AddressingMode::AbsoluteData),
            0xBB
        );
    }

    #[test]
    fn indexed_modes_add_ix_before_the_bank_base() {
        let mut state = machine_with_program(&[0x10, 0x10]);
        state.ix = 0x05;
        state.mem[0x015] = 0xCC;
        state.mem[0x115] = 0xDD;

        assert_eq!(
            resolve_operand(&mut state, AddressingMode::IndexedProgram),
            0xCC
        );
        assert_eq!(
            resolve_operand(&mut state, AddressingMode::IndexedData),
            0xDD
        );
    }

    #[test]
    fn store_addresses_cover_all_four_targets() {
        let mut state = machine_with_program(&[0x20, 0x20, 0x20, 0x20]);
        state.ix = 0x03;

        assert_eq!(
            resolve_store_address(&mut state, StoreTarget::AbsoluteProgram),
            0x020
        );
        assert_eq!(
            resolve_store_address(&mut state, StoreTarget::AbsoluteData),
            0x120
        );
        assert_eq!(
            resolve_store_address(&mut state, StoreTarget::IndexedProgram),
            0x023
        );
        assert_eq!(
            resolve_store_address(&mut state, StoreTarget::IndexedData),
            0x123
        );
        assert_eq!(state.pc, 4);
    }
}

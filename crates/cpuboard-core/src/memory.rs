//! Fixed memory map and address-formation helpers.
//!
//! One physical array of 512 eight-bit cells, addressed as two 256-cell
//! banks: program space at base `0x000` and data space at base `0x100`.
//! Offsets are eight bits wide; the bank-select line picks the base. The
//! program counter is a nine-bit index over the whole array and wraps at
//! the array boundary.

/// Total number of memory cells.
pub const MEMORY_CELLS: usize = 512;
/// Number of cells in each bank.
pub const BANK_CELLS: usize = 256;
/// Base address of program space.
pub const PROGRAM_BASE: usize = 0x000;
/// Base address of data space.
pub const DATA_BASE: usize = 0x100;
/// Mask keeping the program counter inside the 512-cell array.
pub const PC_MASK: u16 = 0x1FF;

/// Bank selector for address formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryBank {
    /// Program space (`0x000..=0x0FF`).
    Program,
    /// Data space (`0x100..=0x1FF`).
    Data,
}

impl MemoryBank {
    /// Returns the fixed base address of this bank.
    #[must_use]
    pub const fn base(self) -> usize {
        match self {
            Self::Program => PROGRAM_BASE,
            Self::Data => DATA_BASE,
        }
    }

    /// Forms an absolute address from an 8-bit offset into this bank.
    #[must_use]
    pub const fn address(self, offset: u8) -> usize {
        self.base() + offset as usize
    }

    /// Forms an index-modified address from `IX` plus an 8-bit offset.
    ///
    /// The sum is taken modulo 256, so an index-modified access never
    /// leaves its bank.
    #[must_use]
    pub const fn indexed_address(self, ix: u8, offset: u8) -> usize {
        self.base() + ix.wrapping_add(offset) as usize
    }

    /// Returns `true` when `addr` belongs to this bank.
    #[must_use]
    pub const fn contains(self, addr: usize) -> bool {
        addr >= self.base() && addr < self.base() + BANK_CELLS
    }
}

/// Advances a program counter by one cell, wrapping at the array boundary.
#[must_use]
pub const fn next_pc(pc: u16) -> u16 {
    pc.wrapping_add(1) & PC_MASK
}

const _: () = assert!(MEMORY_CELLS == 2 * BANK_CELLS, "two equal banks");
const _: () = assert!(DATA_BASE == BANK_CELLS, "data bank follows program bank");

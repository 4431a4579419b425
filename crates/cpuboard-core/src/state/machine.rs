//! The mutable machine-state record passed into every step.

use crate::diag::StepCounters;
use crate::memory::{BANK_CELLS, DATA_BASE, MEMORY_CELLS, PC_MASK, PROGRAM_BASE};
use crate::state::io::IoBuffer;
use crate::state::run_state::RunState;

/// Complete state of one Educational CPU Board.
///
/// All fields are plain and public: the loader populates `mem` and `pc`
/// before simulation starts, the driver reads whatever it wants between
/// steps, and external I/O peers poke `ibuf`/`obuf` directly. The step
/// engine mutates the record in place and never owns it.
///
/// Invariants the engine maintains: `pc` stays below [`MEMORY_CELLS`], and
/// every register and memory cell holds an 8-bit value by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Program counter, an index into `mem`.
    pub pc: u16,
    /// Accumulator.
    pub acc: u8,
    /// Index register.
    pub ix: u8,
    /// 512 cells: program space at `0x000`, data space at `0x100`.
    pub mem: Box<[u8]>,
    /// Carry flag.
    pub cf: bool,
    /// Overflow flag.
    pub vf: bool,
    /// Negative flag.
    pub nf: bool,
    /// Zero flag.
    pub zf: bool,
    /// Input buffer, fed by an external producer.
    pub ibuf: IoBuffer,
    /// Output buffer, drained by an external consumer.
    pub obuf: IoBuffer,
    /// Latched run state observed by the driving loop.
    pub run_state: RunState,
    /// Execution counters and last-fault record.
    pub counters: StepCounters,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Creates a zeroed machine with a full 512-cell memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pc: 0,
            acc: 0,
            ix: 0,
            mem: vec![0; MEMORY_CELLS].into_boxed_slice(),
            cf: false,
            vf: false,
            nf: false,
            zf: false,
            ibuf: IoBuffer::default(),
            obuf: IoBuffer::default(),
            run_state: RunState::Running,
            counters: StepCounters::default(),
        }
    }

    /// Front-panel reset: registers, flags, I/O buffers, run state, and
    /// counters are cleared; the memory image is preserved.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.acc = 0;
        self.ix = 0;
        self.cf = false;
        self.vf = false;
        self.nf = false;
        self.zf = false;
        self.ibuf = IoBuffer::default();
        self.obuf = IoBuffer::default();
        self.run_state = RunState::Running;
        self.counters.reset();
    }

    /// Copies an image into program space, truncated at the bank boundary.
    pub fn load_program(&mut self, image: &[u8]) {
        let len = image.len().min(BANK_CELLS);
        self.mem[PROGRAM_BASE..PROGRAM_BASE + len].copy_from_slice(&image[..len]);
    }

    /// Copies an image into data space, truncated at the bank boundary.
    pub fn load_data(&mut self, image: &[u8]) {
        let len = image.len().min(BANK_CELLS);
        self.mem[DATA_BASE..DATA_BASE + len].copy_from_slice(&image[..len]);
    }

    /// Reads the memory cell the program counter points at.
    #[must_use]
    pub fn fetch_byte(&self) -> u8 {
        self.mem[usize::from(self.pc & PC_MASK)]
    }
}

#[cfg(test)]
mod tests {
    use super::MachineState;
    use crate::fault::FaultCode;
    use crate::memory::{DATA_BASE, MEMORY_CELLS};
    use crate::state::run_state::RunState;

    #[test]
    fn new_machine_is_zeroed_with_full_memory() {
        let state = MachineState::new();
        assert_eq!(state.mem.len(), MEMORY_CELLS);
        assert_eq!(state.pc, 0);
        assert_eq!(state.acc, 0);
        assert_eq!(state.ix, 0);
        assert!(!state.cf && !state.vf && !state.nf && !state.zf);
        assert!(!state.ibuf.ready && !state.obuf.ready);
        assert_eq!(state.run_state, RunState::Running);
    }

    #[test]
    fn reset_preserves_memory_image() {
        let mut state = MachineState::new();
        state.mem[0x000] = 0xB2;
        state.mem[0x1FF] = 0x5A;
        state.pc = 0x42;
        state.acc = 0x99;
        state.cf = true;
        state.run_state = RunState::FaultLatched(FaultCode::UnknownInstruction { code: 0x08 });

        state.reset();

        assert_eq!(state.mem[0x000], 0xB2);
        assert_eq!(state.mem[0x1FF], 0x5A);
        assert_eq!(state.pc, 0);
        assert_eq!(state.acc, 0);
        assert!(!state.cf);
        assert_eq!(state.run_state, RunState::Running);
    }

    #[test]
    fn program_and_data_loads_land_in_their_banks() {
        let mut state = MachineState::new();
        state.load_program(&[0x01, 0x02, 0x03]);
        state.load_data(&[0xAA, 0xBB]);

        assert_eq!(&state.mem[0..3], &[0x01, 0x02, 0x03]);
        assert_eq!(&state.mem[DATA_BASE..DATA_BASE + 2], &[0xAA, 0xBB]);
    }

    #[test]
    fn oversized_image_is_truncated_at_bank_boundary() {
        let mut state = MachineState::new();
        state.load_program(&[0x11; 300]);

        assert_eq!(state.mem[0x0FF], 0x11);
        assert_eq!(state.mem[0x100], 0x00, "data bank must stay untouched");
    }
}

//! Execution counters and last-fault record.
//!
//! A front-panel or debugger host reads these between steps; the engine
//! updates them as instructions retire or faults latch.

use crate::fault::{FaultClass, FaultCode};

/// Snapshot of the fault that most recently latched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FaultRecord {
    /// The latched fault.
    pub code: FaultCode,
    /// Program counter of the offending fetch.
    pub pc: u16,
}

/// Core-owned execution counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StepCounters {
    /// Instructions retired since reset.
    pub instructions_retired: u64,
    /// Saturating counter for decode-class faults.
    pub decode_faults: u16,
    /// Saturating counter for operand-class faults.
    pub operand_faults: u16,
    /// The most recent fault, if any.
    pub last_fault: Option<FaultRecord>,
}

impl StepCounters {
    /// Records one retired instruction.
    pub const fn retire(&mut self) {
        self.instructions_retired = self.instructions_retired.saturating_add(1);
    }

    /// Records a latched fault and bumps its class counter.
    pub const fn record_fault(&mut self, code: FaultCode, pc: u16) {
        self.last_fault = Some(FaultRecord { code, pc });
        match code.class() {
            FaultClass::Decode => {
                self.decode_faults = self.decode_faults.saturating_add(1);
            }
            FaultClass::Operand => {
                self.operand_faults = self.operand_faults.saturating_add(1);
            }
        }
    }

    /// Clears all counters and the last-fault record.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

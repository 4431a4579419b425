//! Condition-flag formulas and the per-instruction update record.
//!
//! The flag conventions are asymmetric on purpose and reproduce the board's
//! documented behavior: ADD leaves CF alone and folds its carry-out into
//! VF, SUB/CMP preserve CF entirely, SBC stores the negated carry-out
//! (borrow convention), and the bitwise ops force VF low. An update of
//! `None` leaves that flag untouched.

use crate::state::MachineState;

/// Which flags an instruction writes, and with what values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagsUpdate {
    /// Carry flag, `None` to preserve.
    pub cf: Option<bool>,
    /// Overflow flag, `None` to preserve.
    pub vf: Option<bool>,
    /// Negative flag, `None` to preserve.
    pub nf: Option<bool>,
    /// Zero flag, `None` to preserve.
    pub zf: Option<bool>,
}

impl FlagsUpdate {
    /// Update that touches no flags.
    pub const NONE: Self = Self {
        cf: None,
        vf: None,
        nf: None,
        zf: None,
    };

    /// Arithmetic update: optional CF, explicit VF, NF/ZF from the result.
    #[must_use]
    pub const fn arithmetic(cf: Option<bool>, vf: bool, result: u8) -> Self {
        Self {
            cf,
            vf: Some(vf),
            nf: Some(negative(result)),
            zf: Some(zero(result)),
        }
    }

    /// Bitwise update: CF preserved, VF forced low, NF/ZF from the result.
    #[must_use]
    pub const fn logical(result: u8) -> Self {
        Self {
            cf: None,
            vf: Some(false),
            nf: Some(negative(result)),
            zf: Some(zero(result)),
        }
    }

    /// Carry-only update used by RCF/SCF.
    #[must_use]
    pub const fn carry_only(cf: bool) -> Self {
        Self {
            cf: Some(cf),
            vf: None,
            nf: None,
            zf: None,
        }
    }

    /// Applies the update to the flag register.
    pub const fn apply(self, state: &mut MachineState) {
        if let Some(cf) = self.cf {
            state.cf = cf;
        }
        if let Some(vf) = self.vf {
            state.vf = vf;
        }
        if let Some(nf) = self.nf {
            state.nf = nf;
        }
        if let Some(zf) = self.zf {
            state.zf = zf;
        }
    }
}

/// Bit 7 of the 8-bit result.
#[must_use]
pub const fn negative(result: u8) -> bool {
    result & 0x80 != 0
}

/// The 8-bit result is zero.
#[must_use]
pub const fn zero(result: u8) -> bool {
    result == 0
}

/// Bit 8 of the 9-bit intermediate sum.
#[must_use]
pub const fn carry_out(sum: u16) -> bool {
    sum & 0x100 != 0
}

/// Signed overflow of adding `a` and `b` yielding `result`.
///
/// Set when both operands share a sign bit the result does not.
#[must_use]
pub const fn signed_overflow(a: u8, b: u8, result: u8) -> bool {
    let a_neg = a & 0x80 != 0;
    let b_neg = b & 0x80 != 0;
    let r_neg = result & 0x80 != 0;
    (a_neg && b_neg && !r_neg) || (!a_neg && !b_neg && r_neg)
}

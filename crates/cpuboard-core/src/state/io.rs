//! Single-register input/output handshake buffers.
//!
//! Each buffer holds one value plus a ready flag. There is no backpressure:
//! posting overwrites whatever is pending, and taking reads whatever value
//! is there even when nothing was posted. External producers feed the input
//! buffer; external consumers drain the output buffer.

/// One I/O buffer: a value plus a ready flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct IoBuffer {
    /// Buffered 8-bit value.
    pub value: u8,
    /// `true` while the value is pending consumption.
    pub ready: bool,
}

impl IoBuffer {
    /// Posts a value and raises the ready flag, overwriting any pending one.
    pub const fn post(&mut self, value: u8) {
        self.value = value;
        self.ready = true;
    }

    /// Takes the buffered value and drops the ready flag.
    ///
    /// Proceeds even when nothing is pending; the stale value is returned.
    pub const fn take(&mut self) -> u8 {
        self.ready = false;
        self.value
    }
}

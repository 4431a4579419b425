//! Machine-state model primitives.

/// I/O handshake buffer model.
pub mod io;
/// The mutable machine-state record owned by the caller.
pub mod machine;
/// Deterministic run-state machine for host-observable control flow.
pub mod run_state;

pub use io::IoBuffer;
pub use machine::MachineState;
pub use run_state::RunState;

//! Flat, C-compatible view of a round.
//!
//! Field order follows the state block a host harness seeds and inspects:
//! both channel slots first, then the three task records.

/// Observable layout of a [`ProtocolState`](crate::ProtocolState).
///
/// `recv1_vote` and `recv2_vote` are zero until the matching `done` flag is
/// set. A source that has sent both values and a receiver that has voted
/// are reported as done, since their next transition is to `Done`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawState {
    /// Value slot of ch1.
    pub ch1_value: u64,
    /// Ready flag of ch1.
    pub ch1_ready: bool,
    /// Value slot of ch2.
    pub ch2_value: u64,
    /// Ready flag of ch2.
    pub ch2_ready: bool,
    /// Source done flag.
    pub source_done: bool,
    /// recv1 done flag.
    pub recv1_done: bool,
    /// recv1 vote.
    pub recv1_vote: u64,
    /// recv2 done flag.
    pub recv2_done: bool,
    /// recv2 vote.
    pub recv2_vote: u64,
}

impl RawState {
    /// Returns true when all three tasks are done.
    pub fn is_terminal(&self) -> bool {
        self.source_done && self.recv1_done && self.recv2_done
    }
}

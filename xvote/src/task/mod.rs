//! Tasks of a broadcast/vote round.
//!
//! - Source: sends one value into each channel, then terminates
//! - Receiver: consumes the value of its channel, votes, then terminates

mod receiver;
mod source;

pub use receiver::{Receiver, ReceiverPhase};
pub use source::{Source, SourcePhase};

use crate::channel::ChannelId;

/// A single task transition taken during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The source entered the given phase.
    Source(SourcePhase),

    /// The receiver bound to the channel entered the given phase.
    Receiver(ChannelId, ReceiverPhase),
}

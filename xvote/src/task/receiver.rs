//! Receiver side of the round.

use crate::channel::{Channel, ChannelId};
use crate::vote::VoteRule;

/// Receiver lifecycle. The vote travels with the phase once computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReceiverPhase {
    /// Polling an empty channel.
    #[default]
    Waiting,

    /// Value received and vote computed.
    Voted(u64),

    /// Terminal.
    Done(u64),
}

/// A voting task bound to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    channel: ChannelId,
    phase: ReceiverPhase,
}

impl Receiver {
    /// Creates a waiting receiver bound to `channel`.
    pub const fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            phase: ReceiverPhase::Waiting,
        }
    }

    /// Returns the channel this receiver consumes from.
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Returns the current phase.
    pub fn phase(&self) -> ReceiverPhase {
        self.phase
    }

    /// Returns true once the receiver has terminated.
    pub fn done(&self) -> bool {
        matches!(self.phase, ReceiverPhase::Done(_))
    }

    /// Returns the vote once the receiver has terminated.
    pub fn vote(&self) -> Option<u64> {
        match self.phase {
            ReceiverPhase::Done(vote) => Some(vote),
            _ => None,
        }
    }

    /// Takes at most one transition. An empty channel means no progress.
    pub(crate) fn step<R: VoteRule>(
        &mut self,
        channel: &mut Channel,
        rule: &R,
    ) -> Option<ReceiverPhase> {
        match self.phase {
            ReceiverPhase::Waiting => {
                let value = match channel.try_receive() {
                    Ok(value) => value,
                    Err(err) => {
                        debug_assert!(err.is_retryable());
                        return None;
                    }
                };
                self.phase = ReceiverPhase::Voted(rule.vote(value));
                Some(self.phase)
            }
            ReceiverPhase::Voted(vote) => {
                self.phase = ReceiverPhase::Done(vote);
                Some(self.phase)
            }
            ReceiverPhase::Done(_) => None,
        }
    }

    pub(crate) fn restore(channel: ChannelId, phase: ReceiverPhase) -> Self {
        Self { channel, phase }
    }
}

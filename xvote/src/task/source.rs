//! Source side of the round.

use crate::channel::{Channel, ChannelId};

/// Source lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourcePhase {
    /// Not every channel has been sent into yet.
    #[default]
    Idle,

    /// Both sends issued; consumption is not awaited.
    Sent,

    /// Terminal.
    Done,
}

/// The broadcasting task.
///
/// Values reach the channels either through direct sends issued by the
/// driver or through values staged before the round starts, which the
/// source sends (ch1 first, then ch2) on its first step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Source {
    phase: SourcePhase,

    /// Channels sent into during this round, indexed by `ChannelId::index`.
    sent: [bool; 2],

    /// Values to broadcast on the next step, if any.
    staged: Option<[u64; 2]>,
}

impl Source {
    /// Creates an idle source with nothing staged.
    pub const fn new() -> Self {
        Self {
            phase: SourcePhase::Idle,
            sent: [false; 2],
            staged: None,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SourcePhase {
        self.phase
    }

    /// Returns true once the source has terminated.
    pub fn done(&self) -> bool {
        self.phase == SourcePhase::Done
    }

    /// Returns true if `id` has been sent into during this round.
    pub fn has_sent(&self, id: ChannelId) -> bool {
        self.sent[id.index()]
    }

    /// Returns the values still waiting to be broadcast.
    pub fn staged(&self) -> Option<[u64; 2]> {
        self.staged
    }

    pub(crate) fn stage(&mut self, values: [u64; 2]) {
        self.staged = Some(values);
    }

    /// Sends `value` into `channel` on behalf of the source.
    ///
    /// # Panics
    ///
    /// Panics if this round already sent into `id`, or if the slot is full.
    pub(crate) fn send(&mut self, id: ChannelId, channel: &mut Channel, value: u64) {
        assert!(
            !self.sent[id.index()],
            "{} already carried a value this round",
            id
        );
        channel.send(value);
        self.sent[id.index()] = true;
    }

    /// Takes at most one transition. Returns the new phase if one was taken.
    pub(crate) fn step(&mut self, channels: &mut [Channel; 2]) -> Option<SourcePhase> {
        match self.phase {
            SourcePhase::Idle => {
                if let Some(values) = self.staged.take() {
                    for id in ChannelId::ALL {
                        if !self.has_sent(id) {
                            self.send(id, &mut channels[id.index()], values[id.index()]);
                        }
                    }
                }

                if self.sent.iter().all(|&sent| sent) {
                    self.phase = SourcePhase::Sent;
                    Some(self.phase)
                } else {
                    None
                }
            }
            SourcePhase::Sent => {
                self.phase = SourcePhase::Done;
                Some(self.phase)
            }
            SourcePhase::Done => None,
        }
    }

    pub(crate) fn restore(phase: SourcePhase, sent: [bool; 2]) -> Self {
        Self {
            phase,
            sent,
            staged: None,
        }
    }
}

//! Single-slot handoff channels.
//!
//! A channel holds at most one value. The `ready` flag is the only
//! synchronization point between its producer and its consumer.

mod slot;

pub use slot::Channel;

/// Identifies one of the two channels of a round.
///
/// `First` carries the source's first value to the first receiver,
/// `Second` carries the second value to the second receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// ch1, bound to recv1.
    First,

    /// ch2, bound to recv2.
    Second,
}

impl ChannelId {
    /// Both channels, in the order the source sends into them.
    pub const ALL: [ChannelId; 2] = [ChannelId::First, ChannelId::Second];

    /// Array index of this channel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ChannelId::First => 0,
            ChannelId::Second => 1,
        }
    }
}

impl core::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChannelId::First => write!(f, "ch1"),
            ChannelId::Second => write!(f, "ch2"),
        }
    }
}

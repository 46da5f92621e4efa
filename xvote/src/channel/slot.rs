//! Capacity-one channel slot.

use crate::error::{Error, ErrorKind, Result};

/// A capacity-one handoff slot gated by a readiness flag.
///
/// `value` is only meaningful while `ready` is set. Sending into a full
/// slot or receiving from an empty one is a caller bug and panics; the
/// `try_` forms report the same conditions as errors instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Channel {
    /// Last value sent.
    value: u64,

    /// Whether `value` has been sent and not yet received.
    ready: bool,
}

impl Channel {
    /// Creates an empty channel.
    pub const fn new() -> Self {
        Self {
            value: 0,
            ready: false,
        }
    }

    /// Returns true if the slot holds an unconsumed value.
    #[inline]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the pending value without consuming it.
    #[inline]
    pub const fn peek(&self) -> Option<u64> {
        if self.ready { Some(self.value) } else { None }
    }

    /// Writes `value` into the empty slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot already holds a pending value.
    pub fn send(&mut self, value: u64) {
        assert!(
            !self.ready,
            "send into a full channel slot (pending value {})",
            self.value
        );
        self.value = value;
        self.ready = true;
    }

    /// Takes the pending value and frees the slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is empty.
    pub fn receive(&mut self) -> u64 {
        assert!(self.ready, "receive from an empty channel slot");
        self.ready = false;
        self.value
    }

    /// Like [`send`](Self::send), but leaves a full slot untouched and
    /// returns `SlotOccupied`.
    pub fn try_send(&mut self, value: u64) -> Result<()> {
        if self.ready {
            return Err(Error::new(ErrorKind::SlotOccupied));
        }
        self.send(value);
        Ok(())
    }

    /// Like [`receive`](Self::receive), but returns `SlotEmpty` so the
    /// caller can retry on a later step.
    pub fn try_receive(&mut self) -> Result<u64> {
        if !self.ready {
            return Err(Error::new(ErrorKind::SlotEmpty));
        }
        Ok(self.receive())
    }

    /// Empties the slot.
    pub fn clear(&mut self) {
        self.value = 0;
        self.ready = false;
    }

    /// Restores a slot from raw fields.
    pub(crate) const fn from_raw(value: u64, ready: bool) -> Self {
        Self { value, ready }
    }

    /// Raw fields, in layout order.
    pub(crate) const fn raw(&self) -> (u64, bool) {
        (self.value, self.ready)
    }
}

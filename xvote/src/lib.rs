//! # XVote - Single-Slot Channels and a Broadcast/Vote Round
//!
//! XVote is a `no_std` implementation of a fixed-topology broadcast/vote
//! round that provides:
//!
//! - **Single-slot channels**: capacity-one handoff gated by a ready flag
//! - **Explicit lifecycles**: every task is a small state machine
//! - **Pluggable votes**: receivers vote through a [`VoteRule`]
//! - **Host-driven stepping**: no threads, no locks, no globals
//! - **Flat layout**: a `#[repr(C)]` view for harnesses that seed and inspect
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!                  │    Source    │  Idle -> Sent -> Done
//!                  └──────┬───────┘
//!              send(v1)   │   send(v2)
//!            ┌────────────┴────────────┐
//!     ┌──────▼──────┐           ┌──────▼──────┐
//!     │  Channel 1  │           │  Channel 2  │  value + ready
//!     └──────┬──────┘           └──────┬──────┘
//!            │ receive()               │ receive()
//!     ┌──────▼──────┐           ┌──────▼──────┐
//!     │  Receiver 1 │           │  Receiver 2 │  Waiting -> Voted -> Done
//!     └─────────────┘           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use xvote::{ChannelId, ProtocolState};
//!
//! let mut state = ProtocolState::new();
//! state.send(ChannelId::First, 11);
//! state.send(ChannelId::Second, 42);
//!
//! while !state.is_terminal() {
//!     xvote::advance(&mut state);
//! }
//! assert_eq!(state.votes(), [Some(11), Some(42)]);
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod channel;
pub mod config;
pub mod error;
pub mod layout;
pub mod state;
pub mod task;
pub mod vote;

// Re-export commonly used types
pub use channel::{Channel, ChannelId};
pub use config::RoundConfig;
pub use error::{Error, ErrorKind, Result};
pub use layout::RawState;
pub use state::{ProtocolState, StepReport, advance};
pub use task::{Receiver, ReceiverPhase, Source, SourcePhase, Transition};
pub use vote::{Rule, VoteRule};

/// Default upper bound on steps a driver spends on one round.
///
/// A round with both values available finishes in two steps.
pub const DEFAULT_MAX_STEPS: usize = 64;

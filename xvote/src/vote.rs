//! Vote rules.
//!
//! A receiver turns the value it received into a vote with a [`VoteRule`].
//! The round uses [`Rule`], a copyable enum over the built-in rules, and
//! defaults to [`Identity`].

use core::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Computes a receiver's vote from its received value.
pub trait VoteRule {
    /// Returns the vote for `value`.
    fn vote(&self, value: u64) -> u64;
}

/// The vote is the received value itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl VoteRule for Identity {
    fn vote(&self, value: u64) -> u64 {
        value
    }
}

/// Votes `1` when the value reaches `min`, `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    /// Smallest value that votes `1`.
    pub min: u64,
}

impl VoteRule for Threshold {
    fn vote(&self, value: u64) -> u64 {
        (value >= self.min) as u64
    }
}

/// Votes the low bit of the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parity;

impl VoteRule for Parity {
    fn vote(&self, value: u64) -> u64 {
        value & 1
    }
}

/// Built-in vote rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rule {
    /// See [`Identity`].
    #[default]
    Identity,
    /// See [`Threshold`]; holds the minimum.
    Threshold(u64),
    /// See [`Parity`].
    Parity,
}

impl VoteRule for Rule {
    fn vote(&self, value: u64) -> u64 {
        match *self {
            Rule::Identity => Identity.vote(value),
            Rule::Threshold(min) => Threshold { min }.vote(value),
            Rule::Parity => Parity.vote(value),
        }
    }
}

/// Parses `identity`, `parity` or `threshold:<min>`.
impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "identity" => return Ok(Rule::Identity),
            "parity" => return Ok(Rule::Parity),
            _ => {}
        }

        let min = s
            .strip_prefix("threshold:")
            .and_then(|n| n.trim().parse::<u64>().ok())
            .ok_or(Error::new(ErrorKind::InvalidRule))?;
        Ok(Rule::Threshold(min))
    }
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Rule::Identity => write!(f, "identity"),
            Rule::Threshold(min) => write!(f, "threshold:{}", min),
            Rule::Parity => write!(f, "parity"),
        }
    }
}

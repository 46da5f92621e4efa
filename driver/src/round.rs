use std::time::Duration;

use anyhow::{Context, bail};
use log::*;
use tokio::time::{Interval, MissedTickBehavior, interval};
use xvote::{ChannelId, ProtocolState, RawState};

use crate::config::DriverConfig;

/// Result of one driven round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: usize,
    pub steps: usize,
    pub votes: [u64; 2],
    pub layout: RawState,
}

/// Owns the round state and steps it forward until every task is done.
pub struct RoundDriver {
    config: DriverConfig,
    state: ProtocolState,
    ticker: Option<Interval>,
}

impl RoundDriver {
    pub fn new(config: DriverConfig) -> Self {
        let state = ProtocolState::with_config(&config.round_config());
        let ticker = (config.tick_ms > 0).then(|| {
            let mut ticker = interval(Duration::from_millis(config.tick_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        Self {
            config,
            state,
            ticker,
        }
    }

    pub fn state(&self) -> &ProtocolState {
        &self.state
    }

    /// Runs every configured round, resetting the state in between.
    pub async fn run(&mut self) -> anyhow::Result<Vec<RoundOutcome>> {
        let mut outcomes = Vec::with_capacity(self.config.rounds);
        for round in 0..self.config.rounds {
            if round > 0 {
                self.state.reset();
            }
            let outcome = self
                .run_round(round)
                .await
                .with_context(|| format!("round {} failed", round))?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Drives the current state to completion.
    pub async fn run_round(&mut self, round: usize) -> anyhow::Result<RoundOutcome> {
        if self.config.direct {
            self.state.send(ChannelId::First, self.config.v1);
            self.state.send(ChannelId::Second, self.config.v2);
            debug!("round {}: sent {} and {} directly", round, self.config.v1, self.config.v2);
        }

        while !self.state.is_terminal() {
            self.tick().await;

            let report = self.state.try_advance()?;
            for transition in report.iter() {
                trace!("round {} step {}: {:?}", round, self.state.steps(), transition);
            }
        }

        let [Some(vote1), Some(vote2)] = self.state.votes() else {
            bail!("round {} terminated without both votes", round);
        };

        let outcome = RoundOutcome {
            round,
            steps: self.state.steps(),
            votes: [vote1, vote2],
            layout: self.state.snapshot(),
        };
        info!(
            "round {} done in {} steps: recv1 vote={} recv2 vote={}",
            round, outcome.steps, vote1, vote2
        );
        Ok(outcome)
    }

    async fn tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
}

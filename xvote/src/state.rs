//! Round state and the step operation.
//!
//! `ProtocolState` owns both channels and all three tasks of one round.
//! The driver owns it and calls [`advance`] until the round is terminal.

use heapless::Vec;

use crate::DEFAULT_MAX_STEPS;
use crate::channel::{Channel, ChannelId};
use crate::config::RoundConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::layout::RawState;
use crate::task::{Receiver, ReceiverPhase, Source, SourcePhase, Transition};
use crate::vote::Rule;

/// Transitions taken by a single [`advance`] call, in task order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    transitions: Vec<Transition, 3>,
}

impl StepReport {
    /// Returns true if no task made progress.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns the number of transitions taken.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Iterates the transitions in task order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter()
    }

    /// Returns true if `transition` was taken in this step.
    pub fn contains(&self, transition: &Transition) -> bool {
        self.transitions.contains(transition)
    }

    fn record(&mut self, transition: Transition) {
        // One slot per task; a task moves at most once per step.
        let recorded = self.transitions.push(transition).is_ok();
        debug_assert!(recorded, "more than three transitions in one step");
    }
}

/// Shared state of one broadcast/vote round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolState {
    channels: [Channel; 2],
    source: Source,
    receivers: [Receiver; 2],
    rule: Rule,

    /// Values staged at construction, re-staged on reset.
    initial_values: Option<[u64; 2]>,

    /// Number of steps in which at least one task moved.
    steps: usize,

    /// Steps allowed before `try_advance` gives up on the round.
    max_steps: usize,
}

impl ProtocolState {
    /// Creates an empty round using the identity vote rule.
    pub fn new() -> Self {
        Self::with_config(&RoundConfig::default())
    }

    /// Creates a round whose source will broadcast `v1` and `v2`.
    pub fn with_values(v1: u64, v2: u64) -> Self {
        Self::with_config(&RoundConfig::default().with_values(v1, v2))
    }

    /// Creates a round from `config`, staging its values if any.
    pub fn with_config(config: &RoundConfig) -> Self {
        let mut state = Self {
            channels: [Channel::new(); 2],
            source: Source::new(),
            receivers: ChannelId::ALL.map(Receiver::new),
            rule: config.rule,
            initial_values: config.values,
            steps: 0,
            max_steps: config.max_steps,
        };
        if let Some(values) = config.values {
            state.source.stage(values);
        }
        state
    }

    /// Restores a round from its flat layout, using the default step limit.
    ///
    /// A channel counts as sent into when it is still ready, when its
    /// receiver is done, or when the source is done. A done flag restores
    /// the terminal phase, so a round snapshotted between a transition and
    /// its immediate follow-up resumes past both.
    pub fn from_raw(raw: &RawState, rule: Rule) -> Self {
        let channels = [
            Channel::from_raw(raw.ch1_value, raw.ch1_ready),
            Channel::from_raw(raw.ch2_value, raw.ch2_ready),
        ];
        let finished = [(raw.recv1_done, raw.recv1_vote), (raw.recv2_done, raw.recv2_vote)];

        let receivers = ChannelId::ALL.map(|id| {
            let (done, vote) = finished[id.index()];
            let phase = if done {
                ReceiverPhase::Done(vote)
            } else {
                ReceiverPhase::Waiting
            };
            Receiver::restore(id, phase)
        });

        let source = if raw.source_done {
            Source::restore(SourcePhase::Done, [true; 2])
        } else {
            let sent = ChannelId::ALL
                .map(|id| channels[id.index()].is_ready() || finished[id.index()].0);
            Source::restore(SourcePhase::Idle, sent)
        };

        Self {
            channels,
            source,
            receivers,
            rule,
            initial_values: None,
            steps: 0,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Sends `value` into channel `id` on behalf of the source.
    ///
    /// # Panics
    ///
    /// Panics if the channel is full or already carried a value this round.
    pub fn send(&mut self, id: ChannelId, value: u64) {
        self.source.send(id, &mut self.channels[id.index()], value);
        log::trace!("{} <- {}", id, value);
    }

    /// Stages values for the source to broadcast on its next step.
    ///
    /// # Panics
    ///
    /// Panics if the source has already left `Idle`.
    pub fn stage(&mut self, v1: u64, v2: u64) {
        assert!(
            self.source.phase() == SourcePhase::Idle,
            "values staged after the source finished sending"
        );
        self.source.stage([v1, v2]);
    }

    /// Performs at most one transition per task, in the order source,
    /// recv1, recv2. A no-op once the round is terminal.
    pub fn advance(&mut self) -> StepReport {
        let mut report = StepReport::default();
        if self.is_terminal() {
            return report;
        }

        if let Some(phase) = self.source.step(&mut self.channels) {
            log::trace!("step {}: source -> {:?}", self.steps, phase);
            report.record(Transition::Source(phase));
        }

        for receiver in self.receivers.iter_mut() {
            let id = receiver.channel();
            if let Some(phase) = receiver.step(&mut self.channels[id.index()], &self.rule) {
                log::trace!("step {}: recv on {} -> {:?}", self.steps, id, phase);
                report.record(Transition::Receiver(id, phase));
            }
        }

        if !report.is_empty() {
            self.steps += 1;
            if self.is_terminal() {
                log::debug!(
                    "round complete after {} steps, votes {:?}",
                    self.steps,
                    self.votes()
                );
            }
        }

        report
    }

    /// Advances one step, treating a step without progress as an error.
    ///
    /// Returns an empty report once terminal. Fails with `Stalled` when no
    /// task can move, since nothing inside the round can unblock it, and
    /// with `StepLimit` once the round has used its configured steps.
    pub fn try_advance(&mut self) -> Result<StepReport> {
        if self.is_terminal() {
            return Ok(StepReport::default());
        }
        if self.steps >= self.max_steps {
            return Err(Error::new(ErrorKind::StepLimit));
        }

        let report = self.advance();
        if report.is_empty() {
            log::debug!("round stalled at step {}", self.steps);
            return Err(Error::new(ErrorKind::Stalled));
        }
        Ok(report)
    }

    /// Advances until terminal, returning the number of steps taken.
    ///
    /// See [`try_advance`](Self::try_advance) for the failure cases.
    pub fn run_to_completion(&mut self) -> Result<usize> {
        let start = self.steps;
        while !self.is_terminal() {
            self.try_advance()?;
        }
        Ok(self.steps - start)
    }

    /// Returns the round to its initial state, keeping the rule and any
    /// configured values.
    pub fn reset(&mut self) {
        self.channels = [Channel::new(); 2];
        self.source = Source::new();
        if let Some(values) = self.initial_values {
            self.source.stage(values);
        }
        self.receivers = ChannelId::ALL.map(Receiver::new);
        self.steps = 0;
        log::debug!("round reset");
    }

    /// Returns true once all three tasks are done.
    pub fn is_terminal(&self) -> bool {
        self.source.done() && self.receivers.iter().all(Receiver::done)
    }

    /// Returns channel `id`.
    pub fn channel(&self, id: ChannelId) -> &Channel {
        &self.channels[id.index()]
    }

    /// Returns the source task.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Returns the receiver bound to channel `id`.
    pub fn receiver(&self, id: ChannelId) -> &Receiver {
        &self.receivers[id.index()]
    }

    /// Votes of recv1 and recv2, `None` until each is done.
    pub fn votes(&self) -> [Option<u64>; 2] {
        ChannelId::ALL.map(|id| self.receiver(id).vote())
    }

    /// Returns the vote rule receivers apply.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Returns the number of steps in which some task moved.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the step limit used by `try_advance`.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Flattens the round into its observable layout.
    ///
    /// `Sent` and `Voted` are followed immediately by `Done`, so the layout
    /// already reports them as done.
    pub fn snapshot(&self) -> RawState {
        let (ch1_value, ch1_ready) = self.channels[0].raw();
        let (ch2_value, ch2_ready) = self.channels[1].raw();
        let [(recv1_done, recv1_vote), (recv2_done, recv2_vote)] =
            self.receivers.map(|receiver| match receiver.phase() {
                ReceiverPhase::Waiting => (false, 0),
                ReceiverPhase::Voted(vote) | ReceiverPhase::Done(vote) => (true, vote),
            });

        RawState {
            ch1_value,
            ch1_ready,
            ch2_value,
            ch2_ready,
            source_done: self.source.phase() != SourcePhase::Idle,
            recv1_done,
            recv1_vote,
            recv2_done,
            recv2_vote,
        }
    }
}

impl Default for ProtocolState {
    fn default() -> Self {
        Self::new()
    }
}

/// Advances `state` by one step. See [`ProtocolState::advance`].
pub fn advance(state: &mut ProtocolState) -> StepReport {
    state.advance()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(state: &mut ProtocolState) -> usize {
        let mut steps = 0;
        while !state.is_terminal() {
            assert!(steps < 16, "round did not terminate");
            advance(state);
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_harness_sends_then_drives() {
        let mut state = ProtocolState::new();
        state.send(ChannelId::First, 11);
        state.send(ChannelId::Second, 42);

        let steps = drive(&mut state);
        assert_eq!(steps, 2);
        assert!(state.source().done());
        assert_eq!(state.votes(), [Some(11), Some(42)]);
        assert!(!state.channel(ChannelId::First).is_ready());
        assert!(!state.channel(ChannelId::Second).is_ready());
    }

    #[test]
    fn test_votes_follow_rule() {
        let config = RoundConfig::new()
            .with_values(11, 42)
            .with_rule(Rule::Threshold(20));
        let mut state = ProtocolState::with_config(&config);

        drive(&mut state);
        assert_eq!(state.votes(), [Some(0), Some(1)]);
        assert!(state.source().done());
    }

    #[test]
    fn test_first_step_transitions() {
        let mut state = ProtocolState::with_values(3, 4);

        let report = state.advance();
        assert_eq!(report.len(), 3);
        assert!(report.contains(&Transition::Source(SourcePhase::Sent)));
        assert!(report.contains(&Transition::Receiver(ChannelId::First, ReceiverPhase::Voted(3))));
        assert!(report.contains(&Transition::Receiver(ChannelId::Second, ReceiverPhase::Voted(4))));

        let report = state.advance();
        assert_eq!(report.len(), 3);
        assert!(state.is_terminal());
        assert_eq!(state.steps(), 2);
    }

    #[test]
    fn test_advance_before_send_changes_nothing() {
        let mut state = ProtocolState::new();
        let before = state.clone();

        for _ in 0..4 {
            assert!(state.advance().is_empty());
        }
        assert_eq!(state, before);
        assert_eq!(state.receiver(ChannelId::First).phase(), ReceiverPhase::Waiting);
        assert_eq!(state.receiver(ChannelId::Second).phase(), ReceiverPhase::Waiting);
    }

    #[test]
    fn test_receiver_waits_for_its_own_channel() {
        let mut state = ProtocolState::new();
        state.send(ChannelId::Second, 42);

        let report = state.advance();
        assert_eq!(report.len(), 1);
        assert_eq!(state.receiver(ChannelId::First).phase(), ReceiverPhase::Waiting);
        assert_eq!(state.source().phase(), SourcePhase::Idle);

        state.advance();
        assert!(state.receiver(ChannelId::Second).done());
        assert!(!state.receiver(ChannelId::First).done());
        assert!(!state.source().done());

        state.send(ChannelId::First, 11);
        drive(&mut state);
        assert_eq!(state.votes(), [Some(11), Some(42)]);
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let mut state = ProtocolState::with_values(1, 2);
        drive(&mut state);
        let done = state.clone();

        for _ in 0..3 {
            assert!(advance(&mut state).is_empty());
        }
        assert_eq!(state, done);
    }

    #[test]
    fn test_double_send_fails_fast() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let mut state = ProtocolState::new();
        state.send(ChannelId::First, 11);

        let result = catch_unwind(AssertUnwindSafe(|| state.send(ChannelId::First, 12)));
        assert!(result.is_err());
        assert_eq!(state.channel(ChannelId::First).peek(), Some(11));
    }

    #[test]
    #[should_panic(expected = "already carried a value")]
    fn test_resend_after_consumption_fails_fast() {
        let mut state = ProtocolState::with_values(1, 2);
        state.advance();
        assert!(!state.channel(ChannelId::First).is_ready());
        state.send(ChannelId::First, 3);
    }

    #[test]
    fn test_restored_channel_is_not_restaged() {
        let raw = RawState {
            ch1_value: 5,
            ch1_ready: true,
            ..RawState::default()
        };
        let mut state = ProtocolState::from_raw(&raw, Rule::Identity);
        state.stage(6, 7);

        drive(&mut state);
        assert_eq!(state.votes(), [Some(5), Some(7)]);
    }

    #[test]
    fn test_run_to_completion() {
        let mut state = ProtocolState::with_values(11, 42);
        assert_eq!(state.run_to_completion(), Ok(2));
        assert_eq!(state.run_to_completion(), Ok(0));
        assert!(state.try_advance().unwrap().is_empty());
    }

    #[test]
    fn test_run_to_completion_stalls_without_values() {
        let mut state = ProtocolState::new();
        let err = state.run_to_completion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Stalled);
    }

    #[test]
    fn test_configured_step_limit() {
        let config = RoundConfig::new().with_values(1, 2).with_max_steps(1);
        let mut state = ProtocolState::with_config(&config);
        assert_eq!(state.max_steps(), 1);

        let err = state.run_to_completion().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StepLimit);
        assert_eq!(state.steps(), 1);
        assert!(!state.is_terminal());

        // The limit covers the whole round, not each call.
        assert_eq!(state.try_advance().unwrap_err().kind(), ErrorKind::StepLimit);

        state.reset();
        assert_eq!(state.max_steps(), 1);
    }

    #[test]
    fn test_done_source_unchanged_while_receiver_waits() {
        let raw = RawState {
            ch2_value: 42,
            ch2_ready: false,
            source_done: true,
            recv1_done: true,
            recv1_vote: 11,
            ..RawState::default()
        };
        let mut state = ProtocolState::from_raw(&raw, Rule::Identity);
        let source = *state.source();
        assert!(source.done());

        // recv2 never gets a value, so only it is left and it cannot move.
        for _ in 0..4 {
            assert!(state.advance().is_empty());
            assert_eq!(*state.source(), source);
        }
        assert_eq!(state.receiver(ChannelId::Second).phase(), ReceiverPhase::Waiting);

        let mut seeded = ProtocolState::from_raw(
            &RawState {
                ch2_ready: true,
                ..raw
            },
            Rule::Identity,
        );
        let source = *seeded.source();
        for _ in 0..2 {
            let report = seeded.advance();
            assert!(report.iter().all(|t| !matches!(t, Transition::Source(_))));
            assert_eq!(*seeded.source(), source);
        }
        assert!(seeded.is_terminal());
        assert_eq!(seeded.votes(), [Some(11), Some(42)]);
    }

    fn check_restore_each_step(mut state: ProtocolState) {
        let mut expected = state.clone();
        drive(&mut expected);

        loop {
            let raw = state.snapshot();
            let mut restored = ProtocolState::from_raw(&raw, state.rule());
            assert_eq!(restored.snapshot(), raw);
            for id in ChannelId::ALL {
                assert_eq!(restored.source().has_sent(id), state.source().has_sent(id));
            }

            // Staged values are not part of the layout.
            if ChannelId::ALL.iter().all(|&id| restored.source().has_sent(id)) {
                drive(&mut restored);
                assert_eq!(restored.votes(), expected.votes());
            }

            if state.is_terminal() {
                break;
            }
            state.advance();
        }
    }

    #[test]
    fn test_restore_each_step_of_staged_round() {
        check_restore_each_step(ProtocolState::with_values(11, 42));
    }

    #[test]
    fn test_restore_each_step_of_direct_round() {
        let mut state = ProtocolState::with_config(&RoundConfig::new().with_rule(Rule::Parity));
        state.send(ChannelId::Second, 42);
        state.advance();

        let raw = state.snapshot();
        let restored = ProtocolState::from_raw(&raw, Rule::Parity);
        assert_eq!(restored.snapshot(), raw);
        assert!(restored.receiver(ChannelId::Second).done());
        assert!(restored.source().has_sent(ChannelId::Second));
        assert!(!restored.source().has_sent(ChannelId::First));

        state.send(ChannelId::First, 11);
        check_restore_each_step(state);
    }

    #[test]
    fn test_restored_mid_round_rejects_resend() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let mut state = ProtocolState::with_values(11, 42);
        state.advance();
        assert_eq!(state.source().phase(), SourcePhase::Sent);

        let mut restored = ProtocolState::from_raw(&state.snapshot(), Rule::Identity);
        assert!(restored.is_terminal());
        assert_eq!(restored.votes(), [Some(11), Some(42)]);

        let result = catch_unwind(AssertUnwindSafe(|| restored.send(ChannelId::First, 99)));
        assert!(result.is_err());
        assert_eq!(restored.channel(ChannelId::First).peek(), None);
    }

    #[test]
    fn test_reset_restages_values() {
        let config = RoundConfig::new().with_values(8, 9).with_rule(Rule::Parity);
        let mut state = ProtocolState::with_config(&config);
        drive(&mut state);
        assert_eq!(state.votes(), [Some(0), Some(1)]);

        state.reset();
        assert!(!state.is_terminal());
        assert_eq!(state.votes(), [None, None]);
        assert_eq!(state.steps(), 0);
        assert_eq!(state.source().staged(), Some([8, 9]));

        drive(&mut state);
        assert_eq!(state.votes(), [Some(0), Some(1)]);
    }

    #[test]
    fn test_snapshot_layout() {
        let mut state = ProtocolState::new();
        state.send(ChannelId::First, 11);

        let raw = state.snapshot();
        assert_eq!(raw.ch1_value, 11);
        assert!(raw.ch1_ready);
        assert!(!raw.ch2_ready);
        assert!(!raw.is_terminal());

        state.send(ChannelId::Second, 42);
        drive(&mut state);
        let raw = state.snapshot();
        assert!(raw.is_terminal());
        assert!(!raw.ch1_ready && !raw.ch2_ready);
        assert_eq!((raw.recv1_vote, raw.recv2_vote), (11, 42));
    }

    #[test]
    fn test_restore_seeded_channels() {
        let raw = RawState {
            ch1_value: 11,
            ch1_ready: true,
            ch2_value: 42,
            ch2_ready: true,
            ..RawState::default()
        };
        let mut state = ProtocolState::from_raw(&raw, Rule::Identity);
        assert!(state.source().has_sent(ChannelId::First));
        assert!(state.source().has_sent(ChannelId::Second));

        drive(&mut state);
        assert_eq!(state.votes(), [Some(11), Some(42)]);
    }

    #[test]
    fn test_restore_terminal_round() {
        let raw = RawState {
            source_done: true,
            recv1_done: true,
            recv1_vote: 1,
            recv2_done: true,
            recv2_vote: 0,
            ..RawState::default()
        };
        let mut state = ProtocolState::from_raw(&raw, Rule::Identity);
        assert!(state.is_terminal());
        assert!(state.advance().is_empty());
        assert_eq!(state.snapshot(), raw);
    }
}

//! Basic round example demonstrating the XVote protocol.
//!
//! This example shows how to:
//! - Hand off a value through a single-slot channel
//! - Drive a round with values sent by the host
//! - Drive a round with values staged on the source
//! - Snapshot a round mid-way and resume from the layout
//!
//! Run with: cargo run --example basic_round --features std

use xvote::{Channel, ChannelId, ProtocolState, RoundConfig, Rule, advance};

fn main() {
    println!("=== XVote Basic Round Example ===\n");

    // Example 1: Single-slot channel
    println!("1. Channel Handoff:");
    let mut channel = Channel::new();
    channel.send(7);
    println!("   Ready after send: {}", channel.is_ready());
    println!("   Second send allowed: {}", channel.try_send(8).is_ok());
    println!("   Received: {}", channel.receive());
    println!("   Ready after receive: {}\n", channel.is_ready());

    // Example 2: Host sends, then steps
    println!("2. Host-Driven Round:");
    let mut state = ProtocolState::new();
    state.send(ChannelId::First, 11);
    state.send(ChannelId::Second, 42);
    while !state.is_terminal() {
        let report = advance(&mut state);
        for transition in report.iter() {
            println!("   step {}: {:?}", state.steps(), transition);
        }
    }
    println!("   Votes: {:?}\n", state.votes());

    // Example 3: Staged values and a threshold rule
    println!("3. Staged Round:");
    let config = RoundConfig::new()
        .with_values(11, 42)
        .with_rule(Rule::Threshold(20));
    let mut state = ProtocolState::with_config(&config);
    let steps = state.run_to_completion().expect("round failed");
    println!("   Rule: {}", state.rule());
    println!("   Steps: {}", steps);
    println!("   Votes: {:?}\n", state.votes());

    // Example 4: Snapshot and resume
    println!("4. Snapshot And Resume:");
    let mut state = ProtocolState::new();
    state.send(ChannelId::Second, 42);
    state.advance();
    let raw = state.snapshot();
    println!("   Layout: {:?}", raw);

    let mut resumed = ProtocolState::from_raw(&raw, Rule::Identity);
    resumed.send(ChannelId::First, 11);
    let steps = resumed.run_to_completion().expect("resumed round failed");
    println!("   Resumed steps: {}", steps);
    println!("   Votes: {:?}", resumed.votes());
}

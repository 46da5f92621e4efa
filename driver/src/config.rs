use clap::Parser;
use xvote::{DEFAULT_MAX_STEPS, RoundConfig, Rule};

/// Drives broadcast/vote rounds and reports the votes.
#[derive(Debug, Clone, Parser)]
#[command(name = "driver", version)]
pub struct DriverConfig {
    /// Value broadcast on ch1.
    #[arg(long, default_value_t = 11)]
    pub v1: u64,

    /// Value broadcast on ch2.
    #[arg(long, default_value_t = 42)]
    pub v2: u64,

    /// Vote rule: identity, parity or threshold:<min>.
    #[arg(long, default_value = "identity")]
    pub rule: Rule,

    /// Number of rounds; the state is reset between rounds.
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,

    /// Steps allowed per round before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Delay between steps in milliseconds, 0 to only yield.
    #[arg(long, default_value_t = 0)]
    pub tick_ms: u64,

    /// Send into the channels from the driver instead of staging the
    /// values with the source.
    #[arg(long)]
    pub direct: bool,
}

impl DriverConfig {
    /// Library configuration for one round.
    pub fn round_config(&self) -> RoundConfig {
        let config = RoundConfig::new()
            .with_rule(self.rule)
            .with_max_steps(self.max_steps);

        if self.direct {
            config
        } else {
            config.with_values(self.v1, self.v2)
        }
    }
}

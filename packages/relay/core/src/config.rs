//! Defines the top level configuration for the relay bot.

use std::str::FromStr;
use std::time::Duration;

use serde_json::Value;
use tracing::Level;

/// The top level configuration for the relay bot.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct RelayConfig {
    /// The strategy to run, by name.
    /// An unrecognized name makes the run a no-op rather than an error.
    pub strategy: String,
    /// Whether to prepend the prerequisite transaction family ahead of the
    /// requested operation.
    #[serde(default)]
    pub dynamic: bool,
    /// The log level for the bot.
    #[serde(default)]
    pub log_level: String,
    /// The queue tuning knobs.
    #[serde(default)]
    pub queue: QueueConfig,
    /// The custom configuration for the chain backend.
    pub chain: Value,
}

impl RelayConfig {
    /// Returns the log level for the bot.
    #[must_use]
    pub fn log_level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::INFO)
    }
}

/// The queue tuning knobs.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct QueueConfig {
    /// Milliseconds between sequencer ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Optional per-step deadline in milliseconds. No deadline when unset.
    #[serde(default)]
    pub step_timeout_ms: Option<u64>,
    /// Abort the run at the first failed step instead of draining the
    /// remaining steps before exiting.
    #[serde(default)]
    pub strict: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            step_timeout_ms: None,
            strict: false,
        }
    }
}

impl QueueConfig {
    /// Returns the tick interval, clamped to at least one millisecond.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(if self.tick_interval_ms == 0 {
            1
        } else {
            self.tick_interval_ms
        })
    }

    /// Returns the per-step deadline, if one is configured.
    #[must_use]
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_ms.map(Duration::from_millis)
    }
}

/// Returns 500, the default number of milliseconds between sequencer ticks.
const fn default_tick_interval_ms() -> u64 {
    500
}

/// Parse a backend configuration value into the target struct while
/// producing path-aware error messages.
///
/// Round-tripping through a string lets the JSON deserializer report the
/// exact path of a failure (e.g. `signer.private_key`), which is worth the
/// one-time cost at startup.
///
/// # Errors
/// Returns an [`anyhow::Error`] carrying the precise path and the original
/// serde error message.
pub fn parse_config<T>(value: Value) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let json_string = value.to_string();

    let mut deserializer = serde_json::Deserializer::from_str(&json_string);
    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(v) => Ok(v),
        Err(e) => Err(anyhow::anyhow!(format!(
            "config error at {}: {}",
            e.path(),
            e
        ))),
    }
}

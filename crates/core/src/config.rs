use std::time::Duration;

use crate::error::Error;
use crate::matcher::ThresholdLadder;

/// Delay between two revealed characters.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(30);

/// The answer shown when nothing in the knowledge base matches.
pub const DEFAULT_FALLBACK_ANSWER: &str = "Sorry, I don't have an answer for that yet. Feel free to ask me something else!";

/// The durable store key the history is kept under.
pub const DEFAULT_STORAGE_KEY: &str = "chat";

/// Builder for [`ChatConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatConfigBuilder {
    tick_interval: Option<Duration>,
    fallback_answer: Option<String>,
    thresholds: Option<Vec<f64>>,
    storage_key: Option<String>,
}

impl ChatConfigBuilder {
    /// Creates a builder with every option left at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay between two revealed characters.
    #[inline]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = Some(tick_interval);
        self
    }

    /// Sets the answer shown when nothing matches.
    #[inline]
    pub fn with_fallback_answer<S: Into<String>>(mut self, answer: S) -> Self {
        self.fallback_answer = Some(answer.into());
        self
    }

    /// Sets the similarity cutoffs, from strictest to loosest.
    #[inline]
    pub fn with_thresholds<I: Into<Vec<f64>>>(mut self, thresholds: I) -> Self {
        self.thresholds = Some(thresholds.into());
        self
    }

    /// Sets the key the history is stored under.
    #[inline]
    pub fn with_storage_key<S: Into<String>>(mut self, key: S) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Validates the options and builds the configuration.
    pub fn build(self) -> Result<ChatConfig, Error> {
        let tick_interval = self.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL);
        if tick_interval.is_zero() {
            return Err(Error::invalid_config()
                .with_reason("tick interval must be greater than zero"));
        }

        let ladder = match self.thresholds {
            Some(thresholds) => ThresholdLadder::new(thresholds)?,
            None => ThresholdLadder::default(),
        };

        let storage_key = self
            .storage_key
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());
        if storage_key.is_empty() {
            return Err(
                Error::invalid_config().with_reason("storage key is empty")
            );
        }

        Ok(ChatConfig {
            tick_interval,
            fallback_answer: self
                .fallback_answer
                .unwrap_or_else(|| DEFAULT_FALLBACK_ANSWER.to_owned()),
            ladder,
            storage_key,
        })
    }
}

/// Configuration of a [`Chat`](crate::Chat).
#[derive(Clone, Debug, PartialEq)]
pub struct ChatConfig {
    pub(crate) tick_interval: Duration,
    pub(crate) fallback_answer: String,
    pub(crate) ladder: ThresholdLadder,
    pub(crate) storage_key: String,
}

impl ChatConfig {
    /// Returns the delay between two revealed characters.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Returns the answer shown when nothing matches.
    #[inline]
    pub fn fallback_answer(&self) -> &str {
        &self.fallback_answer
    }

    /// Returns the threshold ladder.
    #[inline]
    pub fn ladder(&self) -> &ThresholdLadder {
        &self.ladder
    }

    /// Returns the key the history is stored under.
    #[inline]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_owned(),
            ladder: ThresholdLadder::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = ChatConfigBuilder::new().build().unwrap();
        assert_eq!(config, ChatConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(30));
        assert_eq!(config.storage_key(), "chat");
        assert_eq!(config.ladder().thresholds().first(), Some(&1.0));
        assert_eq!(config.ladder().thresholds().last(), Some(&0.55));
    }

    #[test]
    fn test_invalid_values() {
        let err = ChatConfigBuilder::new()
            .with_tick_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        let err = ChatConfigBuilder::new()
            .with_thresholds([0.5, 0.9])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        let err = ChatConfigBuilder::new()
            .with_storage_key("")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record store tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Records written per transaction
    #[serde(default = "StoreSettings::default_batch_size")]
    pub batch_size: usize,
    /// How long a cached file-name listing stays valid without writes
    #[serde(default = "StoreSettings::default_file_list_ttl_secs")]
    pub file_list_ttl_secs: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl StoreSettings {
    const fn default_batch_size() -> usize {
        100
    }

    const fn default_file_list_ttl_secs() -> u64 {
        60
    }

    #[must_use]
    pub const fn file_list_ttl(&self) -> Duration {
        Duration::from_secs(self.file_list_ttl_secs)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            batch_size: Self::default_batch_size(),
            file_list_ttl_secs: Self::default_file_list_ttl_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Exponential backoff for transient storage failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    #[serde(default = "RetryPolicy::default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every later retry
    #[serde(default = "RetryPolicy::default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    const fn default_max_attempts() -> u32 {
        3
    }

    const fn default_base_delay_ms() -> u64 {
        1000
    }

    #[must_use]
    pub const fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1_u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay().saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            base_delay_ms: Self::default_base_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_store_settings_defaults_from_empty_json() {
        let settings: StoreSettings =
            serde_json::from_str("{}").expect("empty object should deserialize");
        assert_eq!(settings.batch_size, 100);
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.base_delay_ms, 1000);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_partial_retry_override() {
        let settings: StoreSettings = serde_json::from_str(r#"{"retry":{"max_attempts":5}}"#)
            .expect("partial retry block should deserialize");
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.base_delay_ms, 1000);

        let policy: RetryPolicy = serde_json::from_str(r#"{"base_delay_ms":10}"#)
            .expect("partial policy should deserialize");
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 10);
    }
}

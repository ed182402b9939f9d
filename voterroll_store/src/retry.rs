//! Connection resilience: classified retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;
use tokio::time::sleep;
use tracing::warn;
use voterroll_core::RetryPolicy;

use crate::error::StoreError;

/// Errors that can tell whether a retry might succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        Self::is_transient(self)
    }
}

/// Run `operation` until it succeeds, fails with a non-transient error, or
/// `policy.max_attempts` attempts have been made.
///
/// After every transient failure `recover` is awaited (to re-establish the
/// connection) and the loop sleeps `base_delay * 2^(attempt - 1)`.
///
/// # Returns
/// The operation's value, or the last error observed.
pub async fn retry_with_backoff<F, Fut, R, RFut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
    mut recover: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: FnMut() -> RFut,
    RFut: Future<Output = ()>,
    E: Transient + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) if attempt >= max_attempts => {
                warn!("Giving up after {attempt} attempts: {e}");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Transient storage failure (attempt {}/{}): {e}. Reconnecting and retrying after {:?}...",
                    attempt, max_attempts, delay
                );
                recover().await;
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

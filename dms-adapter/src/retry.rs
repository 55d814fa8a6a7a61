//! Bounded retry with jittered backoff for transient external failures
//! (§7). Not specific to the DMS transport: shared by `llm-adapter` too.

use std::future::Future;
use std::time::Duration;

/// Retries `f` up to `attempts` times (the first call counts as attempt 1),
/// backing off `base_delay * 2^n` plus up to 20% jitter between attempts.
/// Stops early once `is_retriable` returns false for the latest error.
pub async fn retry_with_backoff<T, E, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    is_retriable: impl Fn(&E) -> bool,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err = None;
    for attempt in 0..attempts.max(1) {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                if !is_retriable(&e) || attempt + 1 == attempts {
                    return Err(e);
                }
                let backoff = base_delay.saturating_mul(1 << attempt.min(8));
                let jitter_frac = rand::random::<f64>() * 0.2;
                let jittered = backoff.mul_f64(1.0 + jitter_frac);
                tracing::debug!(attempt, delay_ms = jittered.as_millis() as u64, "retrying after transient failure");
                tokio::time::sleep(jittered).await;
                last_err = Some(e);
            }
        }
    }
    Err(last_err.expect("loop always returns before exhausting without an error"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &'static str> = retry_with_backoff(
            3,
            Duration::from_millis(1),
            |_e: &&'static str| true,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n < 2 { Err("not yet") } else { Ok(42) } }
            },
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_error_is_not_retriable() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &'static str> = retry_with_backoff(
            5,
            Duration::from_millis(1),
            |_e: &&'static str| false,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err("permanent") }
            },
        )
        .await;
        assert_eq!(result, Err("permanent"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

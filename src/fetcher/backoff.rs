use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter.
///
/// `retry` is zero for the wait before the second attempt.
pub fn calculate_backoff_delay(retry: u32, base: Duration) -> Duration {
    // Cap the exponent so a misconfigured attempt count can't overflow
    let capped = retry.min(10);

    let base_ms = base.as_millis().min(u64::MAX as u128) as u64;
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(capped));

    // Add jitter: ±30% randomness
    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    let delay_with_jitter = (delay_ms as f64 * jitter_factor).round() as u64;

    Duration::from_millis(delay_with_jitter)
}

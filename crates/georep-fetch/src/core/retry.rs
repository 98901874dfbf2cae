use std::time::Duration;

/// Delay before retry `retry_count` (0-indexed) using exponential backoff:
/// `base * 2^retry_count`, saturating instead of overflowing.
///
/// Transfers never retry themselves; this is guidance for whoever schedules
/// the next attempt.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use georep_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(retry_count: u32, base: Duration) -> Duration {
    let Some(factor) = 1_u32.checked_shl(retry_count) else {
        return if base.is_zero() { Duration::ZERO } else { Duration::MAX };
    };
    base.saturating_mul(factor)
}

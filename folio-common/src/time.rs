//! Timestamp utilities
//!
//! Collection rows persist `created_at` as integer Unix epoch milliseconds so
//! that ordering in SQL is numeric rather than lexical.

use chrono::{DateTime, TimeZone, Utc};

/// Current time as Unix epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix epoch milliseconds back to a UTC timestamp
///
/// Out-of-range values clamp to the epoch.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_millis_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }

    #[tokio::test]
    async fn test_now_millis_advances() {
        let first = now_millis();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = now_millis();
        assert!(second > first);
    }

    #[test]
    fn test_from_millis_keeps_millisecond_precision() {
        let ts = from_millis(1_730_000_000_123);
        assert_eq!(ts.timestamp_millis(), 1_730_000_000_123);
    }

    #[test]
    fn test_from_millis_out_of_range_clamps_to_epoch() {
        assert_eq!(from_millis(i64::MAX).timestamp_millis(), 0);
    }
}

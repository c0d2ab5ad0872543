//! Timestamp utilities

use chrono::{DateTime, Duration, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Longest credential lifetime honoured; anything above is capped.
const MAX_LIFETIME_SECS: u64 = 365 * 24 * 3600;

/// Expiry instant for a credential valid for `lifetime_secs`, pulled forward
/// by `margin_secs`.
///
/// Never earlier than `issued_at`: a lifetime shorter than the margin yields a
/// credential that is already expired.
pub fn expiry_with_margin(
    issued_at: DateTime<Utc>,
    lifetime_secs: u64,
    margin_secs: u64,
) -> DateTime<Utc> {
    let effective = lifetime_secs
        .saturating_sub(margin_secs)
        .min(MAX_LIFETIME_SECS);
    issued_at + Duration::seconds(effective as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn test_now_successive_calls_advance() {
        let time1 = now();
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let time2 = now();
        assert!(time2 > time1);
    }

    #[test]
    fn test_expiry_subtracts_margin() {
        let issued = now();
        let expiry = expiry_with_margin(issued, 3600, 60);
        assert_eq!((expiry - issued).num_seconds(), 3540);
    }

    #[test]
    fn test_expiry_short_lifetime_is_immediate() {
        let issued = now();
        let expiry = expiry_with_margin(issued, 30, 60);
        assert_eq!(expiry, issued);
    }

    #[test]
    fn test_expiry_huge_lifetime_does_not_panic() {
        let issued = now();
        let expiry = expiry_with_margin(issued, u64::MAX, 0);
        assert!(expiry > issued);
    }
}

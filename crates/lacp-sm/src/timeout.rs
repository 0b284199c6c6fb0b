//! Protocol timer constants from IEEE 802.1AX clause 5.4.4.
//!
//! The receive machine's countdown runs at three times the periodic
//! transmission interval the partner was asked to use, so three
//! consecutive LACPDUs may be lost before the partner record expires.

use std::time::Duration;

/// Periodic transmission interval when the partner asked for short
/// timeouts.
pub const FAST_PERIODIC_TIME: Duration = Duration::from_secs(1);

/// Periodic transmission interval when the partner asked for long
/// timeouts.
pub const SLOW_PERIODIC_TIME: Duration = Duration::from_secs(30);

/// Receive machine countdown with the short timeout in effect (3 x fast).
pub const SHORT_TIMEOUT_TIME: Duration = Duration::from_secs(3);

/// Receive machine countdown with the long timeout in effect (3 x slow).
pub const LONG_TIMEOUT_TIME: Duration = Duration::from_secs(90);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_three_periodic_intervals() {
        assert_eq!(SHORT_TIMEOUT_TIME, FAST_PERIODIC_TIME * 3);
        assert_eq!(LONG_TIMEOUT_TIME, SLOW_PERIODIC_TIME * 3);
    }
}

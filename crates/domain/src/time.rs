//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp attached to datapoint cells and events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_monotonic_times_across_calls() {
        let first = now();
        let second = now();
        assert!(second >= first);
    }
}

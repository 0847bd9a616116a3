// Time Provider Port (for testability)

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in seconds since epoch
    fn now_secs(&self) -> i64;

    /// Time zone recorded with new data sources (e.g. "+02:00")
    fn time_zone(&self) -> String;
}

/// System clock and local time zone (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn time_zone(&self) -> String {
        chrono::Local::now().offset().to_string()
    }
}

pub mod mocks {
    use super::*;

    /// Fixed clock in UTC
    pub struct FixedTimeProvider(pub i64);

    impl TimeProvider for FixedTimeProvider {
        fn now_secs(&self) -> i64 {
            self.0
        }

        fn time_zone(&self) -> String {
            "+00:00".to_string()
        }
    }
}

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// How long an issued verification code stays valid.
pub fn code_lifetime() -> Duration {
    Duration::hours(2)
}

/// Draw a six digit verification code.
pub fn generate_code() -> u32 {
    rand::rng().random_range(CODE_MIN..=CODE_MAX)
}

pub fn code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + code_lifetime()
}

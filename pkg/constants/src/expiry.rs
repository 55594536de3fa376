//! Expiry scheduler constants.

/// When no delegation request carries an expiry, the scheduler sleeps until
/// this many days from now. The wait primitive needs a finite deadline.
pub const FAR_FUTURE_DAYS: i64 = 365;

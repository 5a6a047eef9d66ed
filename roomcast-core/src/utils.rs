pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

/// Increment added to the reconnect delay on every connection attempt.
pub const RECONNECT_STEP_MS: u64 = 500;
/// Smallest reconnect step accepted from configuration.
pub const RECONNECT_MIN_STEP_MS: u64 = 100;
/// Delay at which the reconnect counter wraps back to zero.
pub const RECONNECT_MAX_MS: u64 = 2500;

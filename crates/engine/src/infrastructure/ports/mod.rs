//! Port traits for infrastructure boundaries.
//!
//! The rules engine itself is pure; the only thing it needs from the outside
//! world is the current time, for stamping `updatedAt` on rebuilt characters.

mod testing;

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;

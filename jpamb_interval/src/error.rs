//! Error handling for interval bound arithmetic.

/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fatal interval-arithmetic errors (§7 "hard" errors: malformed interval
/// arithmetic). These must propagate and abort the current run; they are
/// never silently converted into a saturated bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `∞ + (−∞)` or `∞ − ∞`: undefined by convention, must raise rather
    /// than silently saturate (§4.4).
    #[error("undefined bound arithmetic: opposite infinities combined")]
    UndefinedArithmetic,
    /// A finite, non-zero divisor was expected but zero was supplied to
    /// bound-level division.
    #[error("division by zero on interval bound")]
    DivisionByZero,
}

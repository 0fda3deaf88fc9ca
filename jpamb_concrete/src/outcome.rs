/// A terminal outcome label (§6 Outcome surface). These are program-level
/// observable behaviors, never errors: they are returned, not propagated
/// with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ok,
    DivideByZero,
    AssertionError,
    OutOfBounds,
    NullPointer,
    /// Step-cap exhaustion (non-termination proxy).
    Star,
    /// A run cancelled mid-flight by the supervisor (§4.6, §5). Never
    /// printed to the user (§7).
    NotDone,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Outcome::Ok => "ok",
            Outcome::DivideByZero => "divide by zero",
            Outcome::AssertionError => "assertion error",
            Outcome::OutOfBounds => "out of bounds",
            Outcome::NullPointer => "null pointer",
            Outcome::Star => "*",
            Outcome::NotDone => "not done",
        };
        write!(f, "{label}")
    }
}

/// The result of a single [`crate::step`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// The state was advanced by exactly one opcode.
    Continued,
    /// The run has reached a terminal outcome.
    Terminal(Outcome),
}

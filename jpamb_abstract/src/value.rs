use jpamb_interval::Interval;
use jpamb_opcode::Type;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An abstract value: an interval for the tracked int-shaped types, or an
/// opaque marker for everything else (§3 Value (abstract)).
///
/// References, arrays, and objects carry no abstract payload: the domain
/// only tracks integers, so any opcode that needs to inspect a reference's
/// pointee (array contents, field values) cannot be modeled precisely and
/// instead marks the analysis incomplete at that point (see
/// [`crate::astep`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractValue {
    Int(Interval),
    Untracked,
}

impl AbstractValue {
    #[must_use]
    pub fn point(n: i64, k: Arc<BTreeSet<i64>>) -> Self {
        AbstractValue::Int(Interval::point(n, k))
    }

    /// The initial value of a parameter at method entry: `[min(K), max(K)]`
    /// when the method's constant set is non-empty, otherwise top (§4.2
    /// Initial state).
    #[must_use]
    pub fn initial_param(ty: &Type, k: &Arc<BTreeSet<i64>>) -> Self {
        if !ty.is_tracked_int() {
            return AbstractValue::Untracked;
        }
        if k.is_empty() {
            AbstractValue::Int(Interval::top(Arc::clone(k)))
        } else {
            AbstractValue::Int(Interval::abstract_of(k, Arc::clone(k)))
        }
    }

    #[must_use]
    pub fn interval(&self) -> Option<&Interval> {
        match self {
            AbstractValue::Int(interval) => Some(interval),
            AbstractValue::Untracked => None,
        }
    }

    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (AbstractValue::Int(a), AbstractValue::Int(b)) => AbstractValue::Int(a.join(b)),
            _ => AbstractValue::Untracked,
        }
    }

    #[must_use]
    pub fn widen(&self, other: &Self) -> Self {
        match (self, other) {
            (AbstractValue::Int(a), AbstractValue::Int(b)) => AbstractValue::Int(a.widen(b)),
            _ => AbstractValue::Untracked,
        }
    }
}

use crate::{Error, Result};

/// An interval endpoint: a finite integer or one of the two infinities
/// (§3 Value (abstract), §4.4 Interval lattice).
///
/// Variants are declared `NegInf < Finite(_) < PosInf` so that the derived
/// [`Ord`] implementation already matches the mathematical order on the
/// extended integers; no hand-written comparison is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bound {
    NegInf,
    Finite(i64),
    PosInf,
}

impl Bound {
    #[must_use]
    pub fn is_infinite(self) -> bool {
        !matches!(self, Bound::Finite(_))
    }

    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self <= other { self } else { other }
    }

    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self >= other { self } else { other }
    }

    /// `self + other`, with `∞ + ∞ = ∞` and `∞ + (−∞)` a fatal error
    /// (§4.4: opposite-sign infinities never silently saturate).
    ///
    /// # Errors
    /// Returns [`Error::UndefinedArithmetic`] when adding opposite infinities.
    pub fn checked_add(self, other: Self) -> Result<Self> {
        use Bound::{Finite, NegInf, PosInf};
        match (self, other) {
            (PosInf, NegInf) | (NegInf, PosInf) => Err(Error::UndefinedArithmetic),
            (PosInf, _) | (_, PosInf) => Ok(PosInf),
            (NegInf, _) | (_, NegInf) => Ok(NegInf),
            (Finite(a), Finite(b)) => Ok(Finite(a.saturating_add(b))),
        }
    }

    /// `self - other`, defined as `self + (-other)`.
    ///
    /// # Errors
    /// Returns [`Error::UndefinedArithmetic`] for `∞ − ∞` (same-sign
    /// infinities under negation become opposite-sign and thus undefined).
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.checked_add(other.negate())
    }

    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Bound::NegInf => Bound::PosInf,
            Bound::PosInf => Bound::NegInf,
            Bound::Finite(n) => Bound::Finite(n.saturating_neg()),
        }
    }

    /// `self * other`, with `∞ * 0 = 0` by convention (§4.4) and the sign of
    /// an infinite result following the usual sign rule otherwise.
    ///
    /// # Errors
    /// This operation never fails: every combination of finite values and
    /// infinities has a defined product under the stated convention.
    pub fn checked_mul(self, other: Self) -> Result<Self> {
        use Bound::{Finite, NegInf, PosInf};
        match (self, other) {
            (Finite(0), _) | (_, Finite(0)) => Ok(Finite(0)),
            (Finite(a), Finite(b)) => Ok(Finite(a.saturating_mul(b))),
            (inf_a, inf_b) => {
                let negative = sign_is_negative(inf_a) != sign_is_negative(inf_b);
                Ok(if negative { NegInf } else { PosInf })
            }
        }
    }

    /// `self / other` using floor (truncate-toward-negative-infinity)
    /// division on finite bounds (§4.1 division semantics extended to
    /// bounds), with `∞ / ∞ = 0` by convention (§4.4) and division by a
    /// finite zero a fatal error.
    ///
    /// # Errors
    /// Returns [`Error::DivisionByZero`] if `other` is `Finite(0)`.
    pub fn checked_div(self, other: Self) -> Result<Self> {
        use Bound::{Finite, NegInf, PosInf};
        match (self, other) {
            (_, Finite(0)) => Err(Error::DivisionByZero),
            (Finite(a), Finite(b)) => {
                let q = a / b;
                let r = a % b;
                Ok(Finite(if r != 0 && (r < 0) != (b < 0) { q - 1 } else { q }))
            }
            (PosInf | NegInf, PosInf | NegInf) => Ok(Finite(0)),
            (Finite(_), PosInf) | (Finite(0), _) => Ok(Finite(0)),
            (Finite(a), NegInf) => Ok(if a < 0 { Finite(0) } else { NegInf }),
            (inf_a, Finite(b)) => {
                let negative = sign_is_negative(inf_a) != (b < 0);
                Ok(if negative { NegInf } else { PosInf })
            }
        }
    }
}

fn sign_is_negative(bound: Bound) -> bool {
    match bound {
        Bound::NegInf => true,
        Bound::PosInf => false,
        Bound::Finite(n) => n < 0,
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::NegInf => write!(f, "-inf"),
            Bound::PosInf => write!(f, "+inf"),
            Bound::Finite(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_matches_extended_integers() {
        assert!(Bound::NegInf < Bound::Finite(-1_000_000));
        assert!(Bound::Finite(3) < Bound::Finite(4));
        assert!(Bound::Finite(i64::MAX) < Bound::PosInf);
    }

    #[test]
    fn add_same_sign_infinities_saturates() {
        assert_eq!(Bound::PosInf.checked_add(Bound::PosInf), Ok(Bound::PosInf));
        assert_eq!(Bound::NegInf.checked_add(Bound::NegInf), Ok(Bound::NegInf));
    }

    #[test]
    fn add_opposite_infinities_is_undefined() {
        assert_eq!(
            Bound::PosInf.checked_add(Bound::NegInf),
            Err(Error::UndefinedArithmetic)
        );
    }

    #[test]
    fn mul_infinity_by_zero_is_zero() {
        assert_eq!(Bound::PosInf.checked_mul(Bound::Finite(0)), Ok(Bound::Finite(0)));
        assert_eq!(Bound::Finite(0).checked_mul(Bound::NegInf), Ok(Bound::Finite(0)));
    }

    #[test]
    fn div_by_zero_bound_is_fatal() {
        assert_eq!(
            Bound::Finite(7).checked_div(Bound::Finite(0)),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn div_infinity_by_infinity_is_zero() {
        assert_eq!(Bound::PosInf.checked_div(Bound::NegInf), Ok(Bound::Finite(0)));
    }

    #[test]
    fn finite_division_floors_toward_negative_infinity() {
        assert_eq!(Bound::Finite(-7).checked_div(Bound::Finite(2)), Ok(Bound::Finite(-4)));
    }

    #[test]
    fn finite_division_floors_with_a_negative_divisor() {
        assert_eq!(Bound::Finite(7).checked_div(Bound::Finite(-2)), Ok(Bound::Finite(-4)));
    }
}

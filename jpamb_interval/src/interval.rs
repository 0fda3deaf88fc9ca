use crate::{Bound, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A closed interval of integers bounded by `[lo, hi]`, where either end may
/// be infinite (§3 Value (abstract), §4.4 Interval lattice).
///
/// `K` is the widening constant set: the set of integer literals that occur
/// in the method body under analysis, shared by every interval produced
/// while analyzing that method. Widening snaps a growing bound to the
/// nearest element of `K` on the correct side, falling back to infinity
/// once no such element exists, which is what bounds the number of
/// widening steps in a single method to `2 * |K| + 2` (§8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    lo: Bound,
    hi: Bound,
    k: Arc<BTreeSet<i64>>,
}

impl Interval {
    #[must_use]
    pub fn new(lo: Bound, hi: Bound, k: Arc<BTreeSet<i64>>) -> Self {
        Interval { lo, hi, k }
    }

    /// The bottom element of the lattice: no concrete value belongs to it.
    #[must_use]
    pub fn bottom(k: Arc<BTreeSet<i64>>) -> Self {
        Interval {
            lo: Bound::Finite(1),
            hi: Bound::Finite(0),
            k,
        }
    }

    /// The top element of the lattice: every concrete integer belongs to it.
    #[must_use]
    pub fn top(k: Arc<BTreeSet<i64>>) -> Self {
        Interval {
            lo: Bound::NegInf,
            hi: Bound::PosInf,
            k,
        }
    }

    /// A single-point interval `[n, n]`.
    #[must_use]
    pub fn point(n: i64, k: Arc<BTreeSet<i64>>) -> Self {
        Interval {
            lo: Bound::Finite(n),
            hi: Bound::Finite(n),
            k,
        }
    }

    #[must_use]
    pub fn lo(&self) -> Bound {
        self.lo
    }

    #[must_use]
    pub fn hi(&self) -> Bound {
        self.hi
    }

    #[must_use]
    pub fn k(&self) -> &Arc<BTreeSet<i64>> {
        &self.k
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    #[must_use]
    pub fn contains(&self, member: i64) -> bool {
        !self.is_empty() && self.lo <= Bound::Finite(member) && Bound::Finite(member) <= self.hi
    }

    /// The abstraction of a finite set of concrete integers: the tightest
    /// interval enclosing all of them (§4.4).
    #[must_use]
    pub fn abstract_of(items: &BTreeSet<i64>, k: Arc<BTreeSet<i64>>) -> Self {
        match (items.iter().min(), items.iter().max()) {
            (Some(&lo), Some(&hi)) => Interval {
                lo: Bound::Finite(lo),
                hi: Bound::Finite(hi),
                k,
            },
            _ => Interval::bottom(k),
        }
    }

    /// The concretization of a *finite* interval: the set of every integer
    /// it contains. Callers must not concretize an interval with an
    /// infinite bound.
    ///
    /// # Panics
    /// Panics if either bound is infinite.
    #[must_use]
    pub fn concretize(&self) -> BTreeSet<i64> {
        if self.is_empty() {
            return BTreeSet::new();
        }
        let (Bound::Finite(lo), Bound::Finite(hi)) = (self.lo, self.hi) else {
            panic!("cannot concretize an interval with an infinite bound");
        };
        (lo..=hi).collect()
    }

    /// The subset ordering `self ≤ other` (§4.4): the empty interval is
    /// below every interval, and otherwise containment of ranges.
    #[must_use]
    pub fn order(&self, other: &Self) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        self.lo >= other.lo && self.hi <= other.hi
    }

    /// The lattice join (least upper bound): the smallest interval
    /// enclosing both operands.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Interval {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
            k: Arc::clone(&self.k),
        }
    }

    /// The lattice meet (greatest lower bound): the overlap of both ranges,
    /// or bottom if they are disjoint.
    #[must_use]
    pub fn meet(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Interval::bottom(Arc::clone(&self.k));
        }
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        if lo > hi {
            return Interval::bottom(Arc::clone(&self.k));
        }
        Interval {
            lo,
            hi,
            k: Arc::clone(&self.k),
        }
    }

    /// The widening operator used to force convergence of the worklist
    /// fixed point (§4.4, §8): each bound that has grown past its previous
    /// value is snapped outward to the nearest element of `K` on that side,
    /// or to infinity if `K` has no such element.
    #[must_use]
    pub fn widen(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let lo = widen_lower(self.lo.min(other.lo), &self.k);
        let hi = widen_upper(self.hi.max(other.hi), &self.k);
        Interval {
            lo,
            hi,
            k: Arc::clone(&self.k),
        }
    }
}

/// The largest element of `K` that is `<= candidate`, or `NegInf` if none
/// exists. Mirrors `min_K_J` in the original implementation, generalized to
/// fall back to infinity instead of the smallest element of `K`.
fn widen_lower(candidate: Bound, k: &BTreeSet<i64>) -> Bound {
    let Bound::Finite(candidate) = candidate else {
        return candidate;
    };
    match k.range(..=candidate).next_back() {
        Some(&found) => Bound::Finite(found),
        None => Bound::NegInf,
    }
}

/// The smallest element of `K` that is `>= candidate`, or `PosInf` if none
/// exists. Mirrors `max_K_J` in the original implementation, generalized to
/// fall back to infinity instead of the largest element of `K`.
fn widen_upper(candidate: Bound, k: &BTreeSet<i64>) -> Bound {
    let Bound::Finite(candidate) = candidate else {
        return candidate;
    };
    match k.range(candidate..).next() {
        Some(&found) => Bound::Finite(found),
        None => Bound::PosInf,
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "\u{2205}")
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ks(vals: &[i64]) -> Arc<BTreeSet<i64>> {
        Arc::new(vals.iter().copied().collect())
    }

    #[test]
    fn join_is_idempotent() {
        let a = Interval::new(Bound::Finite(1), Bound::Finite(4), ks(&[]));
        assert_eq!(a.join(&a), a);
    }

    #[test]
    fn meet_is_idempotent() {
        let a = Interval::new(Bound::Finite(1), Bound::Finite(4), ks(&[]));
        assert_eq!(a.meet(&a), a);
    }

    #[test]
    fn join_with_bottom_is_identity() {
        let a = Interval::new(Bound::Finite(1), Bound::Finite(4), ks(&[]));
        let bottom = Interval::bottom(ks(&[]));
        assert_eq!(bottom.join(&a), a);
        assert_eq!(a.join(&bottom), a);
    }

    #[test]
    fn meet_with_top_is_identity() {
        let a = Interval::new(Bound::Finite(1), Bound::Finite(4), ks(&[]));
        let top = Interval::top(ks(&[]));
        assert_eq!(top.meet(&a), a);
        assert_eq!(a.meet(&top), a);
    }

    #[test]
    fn abstraction_of_singleton_is_point_interval() {
        let items: BTreeSet<i64> = [5].into_iter().collect();
        let interval = Interval::abstract_of(&items, ks(&[]));
        assert_eq!(interval, Interval::point(5, ks(&[])));
    }

    #[test]
    fn widening_snaps_to_constants_then_infinity() {
        let k = ks(&[0, 10]);
        let a = Interval::point(0, Arc::clone(&k));
        let b = Interval::new(Bound::Finite(-1), Bound::Finite(11), Arc::clone(&k));
        let widened = a.widen(&b);
        assert_eq!(widened.lo(), Bound::NegInf);
        assert_eq!(widened.hi(), Bound::PosInf);
    }

    #[test]
    fn widening_stays_finite_when_k_bounds_the_growth() {
        let k = ks(&[-5, 0, 5]);
        let a = Interval::new(Bound::Finite(1), Bound::Finite(1), Arc::clone(&k));
        let b = Interval::new(Bound::Finite(0), Bound::Finite(2), Arc::clone(&k));
        let widened = a.widen(&b);
        assert_eq!(widened.lo(), Bound::Finite(0));
        assert_eq!(widened.hi(), Bound::Finite(5));
    }

    #[test]
    fn order_treats_empty_as_bottom() {
        let bottom = Interval::bottom(ks(&[]));
        let a = Interval::point(3, ks(&[]));
        assert!(bottom.order(&a));
        assert!(!a.order(&bottom));
    }

    #[test]
    fn contains_respects_bounds() {
        let a = Interval::new(Bound::Finite(2), Bound::Finite(4), ks(&[]));
        assert!(a.contains(3));
        assert!(!a.contains(5));
    }
}

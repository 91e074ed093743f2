//! Bounded position within an act.

use serde::Serialize;

use crate::error::NavigationError;

/// Snapshot handed to the act's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub current_index: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Index into a fixed number of phases. Always `0 <= current < total`.
///
/// Every move reports whether the index changed; moves past either end and
/// out-of-range jumps are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseNavigator {
    current: usize,
    total: usize,
}

impl PhaseNavigator {
    pub fn new(total: usize) -> Result<Self, NavigationError> {
        Self::with_initial(total, 0)
    }

    /// Start at `initial`, clamped into range.
    pub fn with_initial(total: usize, initial: usize) -> Result<Self, NavigationError> {
        if total == 0 {
            return Err(NavigationError::EmptyAct);
        }
        Ok(Self {
            current: initial.min(total - 1),
            total,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn has_prev(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.total
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn go_to_prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn go_to_next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn go_to_phase(&mut self, index: usize) -> bool {
        if index >= self.total || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_index: self.current,
            total: self.total,
            has_prev: self.has_prev(),
            has_next: self.has_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_act() {
        assert_eq!(PhaseNavigator::new(0), Err(NavigationError::EmptyAct));
    }

    #[test]
    fn clamps_at_both_ends() {
        let mut nav = PhaseNavigator::new(4).unwrap();
        assert!(!nav.has_prev());
        assert!(!nav.go_to_prev());
        assert_eq!(nav.current(), 0);

        for _ in 0..10 {
            nav.go_to_next();
        }
        assert_eq!(nav.current(), 3);
        assert!(!nav.has_next());
        assert!(!nav.go_to_next());
        assert!(nav.has_prev());
    }

    #[test]
    fn out_of_range_jump_is_ignored() {
        let mut nav = PhaseNavigator::new(4).unwrap();
        assert!(nav.go_to_phase(2));
        assert!(!nav.go_to_phase(4));
        assert!(!nav.go_to_phase(usize::MAX));
        assert_eq!(nav.current(), 2);
        assert!(!nav.go_to_phase(2));
    }

    #[test]
    fn initial_index_is_clamped() {
        let nav = PhaseNavigator::with_initial(3, 9).unwrap();
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn single_phase_has_no_neighbours() {
        let mut nav = PhaseNavigator::new(1).unwrap();
        let state = nav.state();
        assert!(!state.has_prev && !state.has_next);
        assert!(!nav.go_to_next());
        assert!(!nav.go_to_prev());
    }

    #[derive(Debug, Clone)]
    enum Move {
        Prev,
        Next,
        Jump(usize),
    }

    fn moves() -> impl Strategy<Value = Move> {
        prop_oneof![
            Just(Move::Prev),
            Just(Move::Next),
            (0usize..12).prop_map(Move::Jump),
        ]
    }

    proptest! {
        #[test]
        fn index_stays_in_bounds(total in 1usize..8, seq in prop::collection::vec(moves(), 0..64)) {
            let mut nav = PhaseNavigator::new(total).unwrap();
            for m in seq {
                let before = nav.current();
                let moved = match m {
                    Move::Prev => nav.go_to_prev(),
                    Move::Next => nav.go_to_next(),
                    Move::Jump(i) => nav.go_to_phase(i),
                };
                prop_assert!(nav.current() < total);
                prop_assert_eq!(moved, nav.current() != before);
                let state = nav.state();
                prop_assert_eq!(state.has_prev, nav.current() > 0);
                prop_assert_eq!(state.has_next, nav.current() + 1 < total);
            }
        }

        #[test]
        fn next_then_prev_round_trips_away_from_the_end(total in 2usize..8, start in 0usize..7) {
            let start = start % (total - 1);
            let mut nav = PhaseNavigator::with_initial(total, start).unwrap();
            prop_assert!(nav.go_to_next());
            prop_assert!(nav.go_to_prev());
            prop_assert_eq!(nav.current(), start);
        }
    }
}

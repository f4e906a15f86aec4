//! Property-based tests for the outcome delta using proptest

use proptest::prelude::*;
use tourney_core::group::GroupStanding;
use tourney_core::standings::{DRAW_POINTS, StandingDelta, WIN_POINTS, outcome_delta};

proptest! {
    /// Every per-team delta satisfies points == 3*wins + draws
    #[test]
    fn points_follow_from_result(s1 in -50i32..50, s2 in -50i32..50) {
        let (d1, d2) = outcome_delta(s1, s2);
        for delta in [d1, d2] {
            let draws = delta.matches_played - delta.wins - delta.losses;
            prop_assert_eq!(delta.points, WIN_POINTS * delta.wins + DRAW_POINTS * draws);
            prop_assert_eq!(delta.matches_played, 1);
        }
    }

    /// The two sides of one match are mirror images
    #[test]
    fn deltas_are_symmetric(s1 in -50i32..50, s2 in -50i32..50) {
        let (d1, d2) = outcome_delta(s1, s2);
        let (r1, r2) = outcome_delta(s2, s1);
        prop_assert_eq!(d1, r2);
        prop_assert_eq!(d2, r1);
        prop_assert_eq!(d1.wins, d2.losses);
        prop_assert_eq!(d1.losses, d2.wins);
    }

    /// One match hands out 2 points total for a draw, 3 for a decision
    #[test]
    fn total_points_per_match(s1 in -50i32..50, s2 in -50i32..50) {
        let (d1, d2) = outcome_delta(s1, s2);
        let expected = if s1 == s2 { 2 * DRAW_POINTS } else { WIN_POINTS };
        prop_assert_eq!(d1.points + d2.points, expected);
    }

    /// Applying then reversing an outcome is the identity on any standing
    #[test]
    fn apply_reverse_is_identity(
        s1 in -50i32..50,
        s2 in -50i32..50,
        played in 0i32..100,
        wins in 0i32..50,
        losses in 0i32..50,
    ) {
        let mut standing = GroupStanding::zero(1, 1);
        standing.matches_played = played;
        standing.wins = wins;
        standing.losses = losses;
        standing.points = WIN_POINTS * wins + DRAW_POINTS * (played - wins - losses);
        let before = standing.clone();

        let (delta, _) = outcome_delta(s1, s2);
        standing.apply(delta);
        standing.apply(-delta);
        prop_assert_eq!(standing, before);
    }

    /// Replacing one outcome by another equals reverse-then-apply,
    /// regardless of order of the algebra
    #[test]
    fn edit_is_reverse_plus_apply(
        old1 in -50i32..50, old2 in -50i32..50,
        new1 in -50i32..50, new2 in -50i32..50,
    ) {
        let (old_delta, _) = outcome_delta(old1, old2);
        let (new_delta, _) = outcome_delta(new1, new2);

        let mut a = GroupStanding::zero(1, 1);
        a.apply(old_delta);
        a.apply(-old_delta);
        a.apply(new_delta);

        let mut b = GroupStanding::zero(1, 1);
        b.apply(old_delta);
        b.apply(new_delta - old_delta);

        prop_assert_eq!(a, b);
    }

    /// Accumulated sums stay exactly the sum of their parts
    #[test]
    fn accumulation_is_linear(scores in prop::collection::vec((-20i32..20, -20i32..20), 0..30)) {
        let mut total = StandingDelta::default();
        let mut standing = GroupStanding::zero(1, 1);
        for (s1, s2) in &scores {
            let (delta, _) = outcome_delta(*s1, *s2);
            total += delta;
            standing.apply(delta);
        }
        prop_assert_eq!(standing.matches_played, total.matches_played);
        prop_assert_eq!(standing.points, total.points);
        prop_assert_eq!(standing.matches_played, scores.len() as i32);
    }
}

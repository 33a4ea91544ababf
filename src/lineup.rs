// Best starting lineup value for a roster.
// Greedy top-k per position against a fixed template:
// 1 QB, 2 RB, 2 WR, 1 TE, 1 FLEX (RB/WR/TE), 1 DST, 1 K. Bench players never start.

use crate::player::Player;
use crate::roster::Roster;

/// Players sorted by projection, highest first. Sorting is stable so equal projections keep roster order.
fn by_projection(players: &[Player]) -> Vec<&Player> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.projected.total_cmp(&a.projected));
    sorted
}

fn sum(players: &[&Player]) -> f64 {
    players.iter().map(|p| p.projected).sum()
}

/// Split a sorted list into (starters, leftovers)
fn take_top<'a>(sorted: &[&'a Player], n: usize) -> (Vec<&'a Player>, Vec<&'a Player>) {
    let split = n.min(sorted.len());
    (sorted[..split].to_vec(), sorted[split..].to_vec())
}

/// Season projection of the best legal starting lineup.
/// Missing starters contribute nothing.
pub fn best_starting_value(roster: &Roster) -> f64 {
    let (qb, _) = take_top(&by_projection(&roster.qb), 1);
    let (rb, rb_rest) = take_top(&by_projection(&roster.rb), 2);
    let (wr, wr_rest) = take_top(&by_projection(&roster.wr), 2);
    let (te, te_rest) = take_top(&by_projection(&roster.te), 1);
    let (dst, _) = take_top(&by_projection(&roster.dst), 1);
    let (k, _) = take_top(&by_projection(&roster.k), 1);

    let mut flex_pool: Vec<&Player> = Vec::new();
    flex_pool.extend(rb_rest);
    flex_pool.extend(wr_rest);
    flex_pool.extend(te_rest);
    flex_pool.extend(roster.flex.iter());
    flex_pool.sort_by(|a, b| b.projected.total_cmp(&a.projected));
    let (flex, _) = take_top(&flex_pool, 1);

    sum(&qb) + sum(&rb) + sum(&wr) + sum(&te) + sum(&flex) + sum(&dst) + sum(&k)
}

/// Per-week share of the season projection
pub fn weekly_value(roster: &Roster, total_weeks: u32) -> f64 {
    best_starting_value(roster) / total_weeks.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Position;
    use crate::roster::{default_slot_limits, Slot};
    use rand::Rng;

    fn p(id: &str, pos: Position, projected: f64) -> Player {
        Player::new(id, id, pos, "FA", projected)
    }

    #[test]
    fn test_empty_roster_is_zero() {
        assert_eq!(best_starting_value(&Roster::default()), 0.0);
    }

    #[test]
    fn test_full_template() {
        let mut roster = Roster::new(&default_slot_limits());
        roster.qb = vec![p("q1", Position::QB, 300.0), p("q2", Position::QB, 350.0)];
        roster.rb = vec![
            p("r1", Position::RB, 200.0),
            p("r2", Position::RB, 250.0),
            p("r3", Position::RB, 180.0),
        ];
        roster.wr = vec![p("w1", Position::WR, 220.0), p("w2", Position::WR, 210.0)];
        roster.te = vec![p("t1", Position::TE, 150.0), p("t2", Position::TE, 190.0)];
        roster.dst = vec![p("d1", Position::DST, 120.0)];
        roster.k = vec![p("k1", Position::K, 130.0)];

        // QB 350, RB 250+200, WR 220+210, TE 190, FLEX max(180, 150) = 180, DST 120, K 130
        let expected = 350.0 + 450.0 + 430.0 + 190.0 + 180.0 + 120.0 + 130.0;
        assert_eq!(best_starting_value(&roster), expected);
    }

    #[test]
    fn test_flex_slot_occupant_counts() {
        let mut roster = Roster::new(&default_slot_limits());
        roster.flex = vec![p("w9", Position::WR, 170.0)];
        assert_eq!(best_starting_value(&roster), 170.0);
    }

    #[test]
    fn test_bench_is_ignored() {
        let mut roster = Roster::new(&default_slot_limits());
        roster.bench = vec![p("q1", Position::QB, 400.0)];
        assert_eq!(best_starting_value(&roster), 0.0);
    }

    #[test]
    fn test_weekly_value_guards_zero_weeks() {
        let mut roster = Roster::new(&default_slot_limits());
        roster.qb = vec![p("q1", Position::QB, 260.0)];
        assert_eq!(weekly_value(&roster, 13), 20.0);
        assert_eq!(weekly_value(&roster, 0), 260.0);
    }

    #[test]
    fn test_adding_players_never_decreases_value() {
        let mut rng = rand::thread_rng();
        let slots = Slot::ORDER;
        for _ in 0..200 {
            let mut roster = Roster::new(&default_slot_limits());
            for i in 0..rng.gen_range(0..15) {
                let pos = Position::ALL[rng.gen_range(0..Position::ALL.len())];
                let player = p(&format!("x{}", i), pos, rng.gen_range(0.0..400.0));
                let slot = slots[rng.gen_range(0..slots.len())];
                roster.move_player(&player, slot);
            }
            let before = best_starting_value(&roster);

            let pos = Position::ALL[rng.gen_range(0..Position::ALL.len())];
            let extra = p("extra", pos, rng.gen_range(0.0..400.0));
            let after = best_starting_value(&roster.with_players_added(&[extra]));
            assert!(after >= before, "value dropped from {} to {}", before, after);
        }
    }
}

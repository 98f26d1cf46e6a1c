//! Simulated peer leaderboard
//!
//! There is no server. A fixed field of synthetic pilots is generated once,
//! their scores creep upward while the player plays, and the live player
//! score is merged in as "YOU".

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Number of synthetic entries
pub const LEADERBOARD_SIZE: usize = 120;
/// Minimum host time between simulation steps
pub const UPDATE_INTERVAL_MS: f64 = 1000.0;
/// Entries shown when the player is near the top
pub const TOP_VIEW_LEN: usize = 8;
/// Entries always shown above the player's context
pub const PODIUM_LEN: usize = 5;
/// Name shown for the live player
pub const PLAYER_NAME: &str = "YOU";

const PILOT_NAMES: [&str; 20] = [
    "CosmicAce",
    "StarLord",
    "NebulaNinja",
    "VoidWalker",
    "GalaxyGuardian",
    "SpaceCadet",
    "RocketMan",
    "AlienHunter",
    "MeteorMasher",
    "CometChaser",
    "PlanetPilot",
    "StellarSurfer",
    "AstroBoy",
    "LunarLegend",
    "SolarSoldier",
    "OrbitOperator",
    "GravityGuru",
    "BlackHoleBoss",
    "QuasarQueen",
    "PulsarPrince",
];

const ACTIVE_CHANCE: f64 = 0.3;
const MAX_CREEP: u64 = 50;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub is_player: bool,
}

/// An entry together with its 1-based rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// What the leaderboard modal shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaderboardView {
    pub top: Vec<RankedEntry>,
    /// Rows around the player when they are outside the podium
    pub context: Vec<RankedEntry>,
    /// None until the player has an entry
    pub player_rank: Option<usize>,
}

/// Simulated leaderboard
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    rng: Pcg32,
    last_update_ms: Option<f64>,
}

impl Leaderboard {
    /// Generate the synthetic field
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut entries = Vec::with_capacity(LEADERBOARD_SIZE + 1);
        for i in 0..LEADERBOARD_SIZE {
            let name = format!(
                "{}{}",
                PILOT_NAMES[i % PILOT_NAMES.len()],
                rng.random_range(0..1000)
            );
            let score = if i < PODIUM_LEN {
                50_000 - i as u64 * 1000
            } else {
                let drop = i as u64 * 400 + rng.random_range(0..500);
                50_000u64.saturating_sub(drop)
            };
            entries.push(LeaderboardEntry {
                name,
                score,
                is_player: false,
            });
        }
        let mut board = Self {
            entries,
            rng,
            last_update_ms: None,
        };
        board.sort();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 0-based position of the player's entry
    pub fn player_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_player)
    }

    /// Merge the player's score and let the field creep upward
    ///
    /// Runs at most once per [`UPDATE_INTERVAL_MS`] of `now_ms`. Returns true
    /// when the board changed.
    pub fn update(&mut self, player_score: u64, now_ms: f64) -> bool {
        if let Some(last) = self.last_update_ms {
            if now_ms - last < UPDATE_INTERVAL_MS {
                return false;
            }
        }
        self.last_update_ms = Some(now_ms);

        match self.player_index() {
            Some(i) => self.entries[i].score = player_score,
            None => self.entries.push(LeaderboardEntry {
                name: PLAYER_NAME.to_string(),
                score: player_score,
                is_player: true,
            }),
        }

        for entry in self.entries.iter_mut().filter(|e| !e.is_player) {
            if self.rng.random_bool(ACTIVE_CHANCE) {
                entry.score += self.rng.random_range(0..MAX_CREEP);
            }
        }

        self.sort();
        true
    }

    /// Highest first; ties keep their previous order
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }

    fn ranked(&self, start: usize, end: usize) -> Vec<RankedEntry> {
        self.entries[start..end]
            .iter()
            .enumerate()
            .map(|(i, entry)| RankedEntry {
                rank: start + i + 1,
                entry: entry.clone(),
            })
            .collect()
    }

    /// Podium plus the rows around the player
    pub fn view(&self) -> LeaderboardView {
        let n = self.entries.len();
        let index = self.player_index();
        let player_rank = index.map(|i| i + 1);

        match index {
            Some(i) if i >= PODIUM_LEN => {
                let start = PODIUM_LEN.max(i - 1);
                let end = n.min(i + 2);
                LeaderboardView {
                    top: self.ranked(0, PODIUM_LEN),
                    context: self.ranked(start, end),
                    player_rank,
                }
            }
            _ => LeaderboardView {
                top: self.ranked(0, n.min(TOP_VIEW_LEN)),
                context: Vec::new(),
                player_rank,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_field() {
        let board = Leaderboard::new(1);
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board.entries()[0].score, 50_000);
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
        // The first five pilots are seeded at fixed 1000-point steps
        for i in 0..PODIUM_LEN as u64 {
            let score = 50_000 - i * 1000;
            assert!(board.entries().iter().any(|e| e.score == score), "missing {}", score);
        }
        assert!(board.entries().iter().all(|e| !e.is_player));
        assert!(board.entries()[0].name.starts_with("CosmicAce"));
        assert_eq!(board.player_index(), None);
    }

    #[test]
    fn test_view_without_player() {
        let view = Leaderboard::new(1).view();
        assert_eq!(view.top.len(), TOP_VIEW_LEN);
        assert!(view.context.is_empty());
        assert_eq!(view.player_rank, None);
        assert_eq!(view.top[7].rank, 8);
    }

    #[test]
    fn test_update_is_throttled() {
        let mut board = Leaderboard::new(2);
        assert!(board.update(0, 10_000.0));
        assert!(!board.update(100, 10_500.0));
        assert_eq!(board.entries()[board.player_index().unwrap()].score, 0);
        assert!(board.update(100, 11_000.0));
        assert_eq!(board.entries()[board.player_index().unwrap()].score, 100);
        assert_eq!(board.len(), LEADERBOARD_SIZE + 1);
    }

    #[test]
    fn test_last_place_player_gets_context() {
        let mut board = Leaderboard::new(3);
        board.update(0, 0.0);
        let view = board.view();
        assert_eq!(view.player_rank, Some(121));
        assert_eq!(view.top.len(), PODIUM_LEN);
        let ranks: Vec<usize> = view.context.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![120, 121]);
        assert!(view.context[1].entry.is_player);
        assert_eq!(view.context[1].entry.name, PLAYER_NAME);
    }

    fn ranks_around(player_index: usize) -> (Vec<usize>, Vec<usize>) {
        let mut board = Leaderboard::new(6);
        board.entries.insert(
            player_index,
            LeaderboardEntry {
                name: PLAYER_NAME.to_string(),
                score: 0,
                is_player: true,
            },
        );
        let view = board.view();
        assert_eq!(view.player_rank, Some(player_index + 1));
        (
            view.top.iter().map(|r| r.rank).collect(),
            view.context.iter().map(|r| r.rank).collect(),
        )
    }

    #[test]
    fn test_context_window() {
        let (top, context) = ranks_around(12);
        assert_eq!(top, vec![1, 2, 3, 4, 5]);
        assert_eq!(context, vec![12, 13, 14]);

        assert_eq!(ranks_around(8).1, vec![8, 9, 10]);
        assert_eq!(ranks_around(100).1, vec![100, 101, 102]);
        // Rows never repeat the podium
        assert_eq!(ranks_around(5).1, vec![6, 7]);
        assert_eq!(ranks_around(6).1, vec![6, 7, 8]);

        let (top, context) = ranks_around(4);
        assert_eq!(top, (1..=TOP_VIEW_LEN).collect::<Vec<_>>());
        assert!(context.is_empty());
    }

    #[test]
    fn test_leader_sees_top_eight() {
        let mut board = Leaderboard::new(4);
        board.update(1_000_000, 0.0);
        let view = board.view();
        assert_eq!(view.player_rank, Some(1));
        assert_eq!(view.top.len(), TOP_VIEW_LEN);
        assert!(view.top[0].entry.is_player);
        assert!(view.context.is_empty());
    }

    #[test]
    fn test_field_scores_only_grow() {
        let mut board = Leaderboard::new(5);
        let before: u64 = board.entries().iter().map(|e| e.score).sum();
        for t in 0..20 {
            board.update(0, t as f64 * 1000.0);
        }
        let after: u64 = board.entries().iter().map(|e| e.score).sum();
        assert!(after > before);
    }

    proptest! {
        #[test]
        fn prop_view_ranks_are_consistent(
            seed in any::<u64>(),
            score in 0u64..80_000,
            updates in 1usize..5,
        ) {
            let mut board = Leaderboard::new(seed);
            for t in 0..updates {
                board.update(score, t as f64 * UPDATE_INTERVAL_MS);
            }
            let view = board.view();
            let index = board.player_index().unwrap();
            prop_assert_eq!(view.player_rank, Some(index + 1));

            for (i, row) in view.top.iter().enumerate() {
                prop_assert_eq!(row.rank, i + 1);
                prop_assert_eq!(&row.entry, &board.entries()[i]);
            }

            if index < PODIUM_LEN {
                prop_assert_eq!(view.top.len(), TOP_VIEW_LEN.min(board.len()));
                prop_assert!(view.context.is_empty());
            } else {
                prop_assert_eq!(view.top.len(), PODIUM_LEN);
                prop_assert!(view.context.iter().any(|r| r.entry.is_player));
                prop_assert!(view.context.iter().all(|r| r.rank > PODIUM_LEN));
                for pair in view.context.windows(2) {
                    prop_assert_eq!(pair[1].rank, pair[0].rank + 1);
                }
                for row in &view.context {
                    prop_assert_eq!(&row.entry, &board.entries()[row.rank - 1]);
                }
            }
        }
    }
}

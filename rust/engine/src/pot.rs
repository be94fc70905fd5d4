//! Main pot and side pots.
//!
//! Pots are always rebuilt from every player's total wager for the hand, never
//! patched incrementally, so recomputing twice without new chips gives the same
//! list.

use serde::{Deserialize, Serialize};

use crate::errors::InvariantViolation;
use crate::player::{Player, PlayerId, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    /// Hand-wager level that caps this layer
    pub threshold: u32,
    /// Non-folded players who put in at least `threshold`, in seat order
    pub eligible: Vec<PlayerId>,
}

#[derive(Debug, Default, Clone)]
pub struct PotManager {
    pots: Vec<Pot>,
}

impl PotManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds pots from raw hand contributions `(player, amount, folded)`.
    pub fn from_contributions<I>(contrib: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, u32, bool)>,
    {
        let entries: Vec<Contribution> = contrib
            .into_iter()
            .map(|(id, amount, folded)| Contribution { id, amount, folded })
            .collect();
        Self {
            pots: layer(&entries),
        }
    }

    /// Discards the current pots and rebuilds them from `players`.
    pub fn recompute(&mut self, players: &[Player]) -> &[Pot] {
        self.pots = compute_pots(players);
        tracing::debug!(
            pots = self.pots.len(),
            total = self.total(),
            "pots recomputed"
        );
        &self.pots
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn main_pot(&self) -> u32 {
        self.pots.first().map_or(0, |p| p.amount)
    }

    pub fn side_pots(&self) -> Vec<u32> {
        self.pots.iter().skip(1).map(|p| p.amount).collect()
    }

    pub fn total(&self) -> u64 {
        self.pots.iter().map(|p| u64::from(p.amount)).sum()
    }

    pub fn clear(&mut self) {
        self.pots.clear();
    }

    /// Checks the pot list against the players it was built from.
    pub fn verify(&self, players: &[Player]) -> Result<(), InvariantViolation> {
        let committed: u64 = players.iter().map(|p| u64::from(p.hand_wager())).sum();
        if self.total() != committed {
            return Err(InvariantViolation::PotTotal {
                pots: self.total(),
                committed,
            });
        }
        for (index, pot) in self.pots.iter().enumerate() {
            if index > 0 && self.pots[index - 1].threshold >= pot.threshold {
                return Err(InvariantViolation::PotOrder(index));
            }
            for &id in &pot.eligible {
                let ok = players
                    .iter()
                    .find(|p| p.id() == id)
                    .is_some_and(|p| p.is_live() && p.hand_wager() >= pot.threshold);
                if !ok {
                    return Err(InvariantViolation::PotEligibility { index, player: id });
                }
            }
        }
        Ok(())
    }
}

/// Partitions every chip wagered this hand into ascending pot layers.
pub fn compute_pots(players: &[Player]) -> Vec<Pot> {
    let entries: Vec<Contribution> = players
        .iter()
        .filter(|p| p.status() != PlayerStatus::SittingOut)
        .map(|p| Contribution {
            id: p.id(),
            amount: p.hand_wager(),
            folded: p.status() == PlayerStatus::Folded,
        })
        .collect();
    layer(&entries)
}

struct Contribution {
    id: PlayerId,
    amount: u32,
    folded: bool,
}

fn layer(entries: &[Contribution]) -> Vec<Pot> {
    let mut levels: Vec<u32> = entries
        .iter()
        .map(|c| c.amount)
        .filter(|&a| a > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    // chips from layers nobody live can win, waiting for a pot to join
    let mut dead = 0u32;
    let mut prev = 0u32;
    for level in levels {
        let contributors = entries.iter().filter(|c| c.amount >= level).count() as u64;
        // tables cap their chips at u32::MAX; anything larger fails `verify`
        let amount = u32::try_from(u64::from(level - prev) * contributors).unwrap_or(u32::MAX);
        prev = level;
        if amount == 0 {
            continue;
        }
        let eligible: Vec<PlayerId> = entries
            .iter()
            .filter(|c| !c.folded && c.amount >= level)
            .map(|c| c.id)
            .collect();

        if eligible.is_empty() {
            match pots.last_mut() {
                Some(last) => last.amount = last.amount.saturating_add(amount),
                None => dead = dead.saturating_add(amount),
            }
            continue;
        }
        match pots.last_mut() {
            Some(last) if last.eligible == eligible => {
                last.amount = last.amount.saturating_add(amount);
                last.threshold = level;
            }
            _ => pots.push(Pot {
                amount: amount.saturating_add(std::mem::take(&mut dead)),
                threshold: level,
                eligible,
            }),
        }
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wagers(levels: &[(u32, PlayerStatus)]) -> Vec<Player> {
        levels
            .iter()
            .enumerate()
            .map(|(id, &(w, s))| Player::with_wager(id, w, s))
            .collect()
    }

    #[test]
    fn heads_up_uncalled_excess_is_its_own_layer() {
        let pm = PotManager::from_contributions([(0, 500, false), (1, 1000, false)]);
        assert_eq!(pm.main_pot(), 1000);
        assert_eq!(pm.side_pots(), vec![500]);
        assert_eq!(pm.pots()[1].eligible, vec![1]);
    }

    #[test]
    fn folded_chips_stay_in_the_pot_they_reached() {
        use PlayerStatus::*;
        // folded player put in 50, two live players are all-in for 100
        let players = wagers(&[(50, Folded), (100, AllIn), (100, AllIn)]);
        let pots = compute_pots(&players);
        assert_eq!(pots.len(), 1, "same eligible set must not split");
        assert_eq!(pots[0].amount, 250);
        assert_eq!(pots[0].threshold, 100);
        assert_eq!(pots[0].eligible, vec![1, 2]);
    }

    #[test]
    fn layer_without_live_contributors_joins_lower_pot() {
        use PlayerStatus::*;
        let players = wagers(&[(300, Folded), (100, AllIn), (100, Active)]);
        let pots = compute_pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 500);
        assert_eq!(pots[0].eligible, vec![1, 2]);
    }

    #[test]
    fn recompute_is_idempotent() {
        use PlayerStatus::*;
        let players = wagers(&[(40, AllIn), (90, AllIn), (200, Active), (200, Active)]);
        let mut pm = PotManager::new();
        let first = pm.recompute(&players).to_vec();
        let second = pm.recompute(&players).to_vec();
        assert_eq!(first, second);
        assert_eq!(pm.total(), 530);
        pm.verify(&players).unwrap();
    }

    #[test]
    fn verify_flags_a_total_mismatch() {
        use PlayerStatus::*;
        let players = wagers(&[(100, Active), (100, Active)]);
        let pm = PotManager::from_contributions([(0, 100, false), (1, 50, false)]);
        assert!(matches!(
            pm.verify(&players),
            Err(InvariantViolation::PotTotal { .. })
        ));
    }
}

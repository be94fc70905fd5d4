use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::BettingRound;
use crate::hand::Category;
use crate::player::{ActionKind, PlayerId};

/// One entry of the hand's append-only action log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player_id: PlayerId,
    pub action: ActionKind,
    /// Chips moved from the player's stack by this action
    pub amount: u32,
    pub round: BettingRound,
}

/// Chips awarded to a player at the end of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub player_id: PlayerId,
    pub amount: u32,
}

/// Winners of one pot.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotResult {
    pub amount: u32,
    pub winners: Vec<PlayerId>,
    /// Winning hand category; `None` when the pot was uncontested
    #[serde(default)]
    pub category: Option<Category>,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Every player who won at least one pot
    pub winners: Vec<PlayerId>,
    pub pots: Vec<PotResult>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Complete record of a finished hand, handed to history collaborators.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Shuffle seed, when the deck was shuffled by the engine
    pub seed: Option<u64>,
    pub button: PlayerId,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub payouts: Vec<Payout>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
    /// RFC 3339 settlement time
    #[serde(default)]
    pub ts: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub(crate) fn today() -> String {
    chrono::Utc::now().format("%Y%m%d").to_string()
}

pub(crate) fn now_rfc3339() -> String {
    use chrono::{SecondsFormat, Utc};
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_ids_are_zero_padded() {
        assert_eq!(format_hand_id("20251231", 1), "20251231-000001");
        assert_eq!(format_hand_id("20251231", 123456), "20251231-123456");
    }

    #[test]
    fn generated_dates_and_timestamps_have_expected_shape() {
        assert_eq!(today().len(), 8);
        assert!(now_rfc3339().ends_with('Z'));
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::ActionError;

/// Stable player identifier chosen by the caller; distinct from the seat index.
pub type PlayerId = usize;

/// Default starting stack size for each player in chips
pub const STARTING_STACK: u32 = 20_000;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// In the hand and able to act
    Active,
    Folded,
    /// In the hand with no chips left behind
    AllIn,
    /// Not dealt into the current hand
    SittingOut,
}

/// A decision submitted by a player. `Bet` and `Raise` carry the total the
/// player's wager on this street is raised *to*, not the increment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u32),
    Raise(u32),
    /// Wager every remaining chip; may be a call, bet or raise
    AllIn,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Bet(_) => ActionKind::Bet,
            PlayerAction::Raise(_) => ActionKind::Raise,
            PlayerAction::AllIn => ActionKind::AllIn,
        }
    }

    /// Builds an action from a kind and an optional amount, as received at an API boundary.
    pub fn from_parts(kind: ActionKind, amount: Option<u32>) -> Result<Self, ActionError> {
        match (kind, amount) {
            (ActionKind::Fold, _) => Ok(PlayerAction::Fold),
            (ActionKind::Check, _) => Ok(PlayerAction::Check),
            (ActionKind::Call, _) => Ok(PlayerAction::Call),
            (ActionKind::AllIn, _) => Ok(PlayerAction::AllIn),
            (ActionKind::Bet, Some(n)) => Ok(PlayerAction::Bet(n)),
            (ActionKind::Raise, Some(n)) => Ok(PlayerAction::Raise(n)),
            (ActionKind::Bet | ActionKind::Raise, None) => Err(ActionError::IllegalAction(
                format!("{kind} requires an amount"),
            )),
            (_, _) => Err(ActionError::IllegalAction(format!(
                "{kind} cannot be submitted by a player"
            ))),
        }
    }
}

/// Label of an action in the hand log. Forced postings have their own kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Give up the hand
    Fold,
    /// Pass with nothing to call
    Check,
    /// Match the current bet
    Call,
    /// Open the betting on a street
    Bet,
    /// Increase an existing bet
    Raise,
    /// Put in the whole stack
    AllIn,
    /// Forced ante
    PostAnte,
    /// Forced small blind
    PostSmallBlind,
    /// Forced big blind
    PostBigBlind,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all_in",
            ActionKind::PostAnte => "post_ante",
            ActionKind::PostSmallBlind => "post_small_blind",
            ActionKind::PostBigBlind => "post_big_blind",
        };
        f.write_str(s)
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    /// Accepts the spellings clients send (`"all-in"`, `"all_in"`, `"ALL IN"`, `"allin"`...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "fold" => Ok(ActionKind::Fold),
            "check" => Ok(ActionKind::Check),
            "call" => Ok(ActionKind::Call),
            "bet" => Ok(ActionKind::Bet),
            "raise" => Ok(ActionKind::Raise),
            "allin" | "shove" => Ok(ActionKind::AllIn),
            _ => Err(ActionError::IllegalAction(format!(
                "unknown action type {s:?}"
            ))),
        }
    }
}

/// One seat's chips and cards. Stacks persist across hands; wagers are per hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    stack: u32,
    street_wager: u32,
    hand_wager: u32,
    status: PlayerStatus,
    hole: Option<[Card; 2]>,
}

impl Player {
    pub fn new(id: PlayerId, stack: u32) -> Self {
        Self {
            id,
            stack,
            street_wager: 0,
            hand_wager: 0,
            status: PlayerStatus::Active,
            hole: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn street_wager(&self) -> u32 {
        self.street_wager
    }
    pub fn hand_wager(&self) -> u32 {
        self.hand_wager
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }

    /// Still contesting the pot (active or all-in).
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Can still make decisions this hand.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active && self.stack > 0
    }

    pub(crate) fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
    }

    pub(crate) fn give_hole_cards(&mut self, cards: [Card; 2]) {
        self.hole = Some(cards);
    }

    /// Moves up to `amount` chips from the stack into the wagers, going all-in
    /// when the stack runs out. Returns the chips actually moved.
    pub(crate) fn commit(&mut self, amount: u32, counts_toward_street: bool) -> u32 {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.hand_wager += moved;
        if counts_toward_street {
            self.street_wager += moved;
        }
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        moved
    }

    /// Returns the new stack, or `None` (leaving the stack alone) on overflow.
    pub(crate) fn add_chips(&mut self, amount: u32) -> Option<u32> {
        self.stack = self.stack.checked_add(amount)?;
        Some(self.stack)
    }

    pub(crate) fn clear_street(&mut self) {
        self.street_wager = 0;
    }

    /// Forgets the hand's wagers once the pots have been paid out.
    pub(crate) fn clear_wagers(&mut self) {
        self.street_wager = 0;
        self.hand_wager = 0;
    }

    /// Resets per-hand state. Players without chips sit the hand out.
    pub(crate) fn reset_for_hand(&mut self, sitting_out: bool) {
        self.street_wager = 0;
        self.hand_wager = 0;
        self.hole = None;
        self.status = if sitting_out || self.stack == 0 {
            PlayerStatus::SittingOut
        } else {
            PlayerStatus::Active
        };
    }

    #[cfg(test)]
    pub(crate) fn with_wager(id: PlayerId, hand_wager: u32, status: PlayerStatus) -> Self {
        Self {
            id,
            stack: 0,
            street_wager: 0,
            hand_wager,
            status,
            hole: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut p = Player::new(7, 150);
        assert_eq!(p.commit(100, true), 100);
        assert_eq!(p.status(), PlayerStatus::Active);
        assert_eq!(p.commit(100, true), 50);
        assert_eq!(p.stack(), 0);
        assert_eq!(p.street_wager(), 150);
        assert_eq!(p.hand_wager(), 150);
        assert_eq!(p.status(), PlayerStatus::AllIn);
    }

    #[test]
    fn overflowing_add_leaves_stack_alone() {
        let mut p = Player::new(2, u32::MAX - 5);
        assert_eq!(p.add_chips(10), None);
        assert_eq!(p.stack(), u32::MAX - 5);
        assert_eq!(p.add_chips(5), Some(u32::MAX));
    }

    #[test]
    fn antes_count_toward_hand_only() {
        let mut p = Player::new(1, 1_000);
        p.commit(25, false);
        assert_eq!(p.street_wager(), 0);
        assert_eq!(p.hand_wager(), 25);
    }

    #[test]
    fn all_in_spellings_normalize_to_one_kind() {
        for s in ["all-in", "all_in", "allin", "ALL IN", " All-In "] {
            assert_eq!(s.parse::<ActionKind>().unwrap(), ActionKind::AllIn, "{s}");
        }
        assert!("limp".parse::<ActionKind>().is_err());
    }

    #[test]
    fn from_parts_requires_amount_for_sized_actions() {
        assert_eq!(
            PlayerAction::from_parts(ActionKind::Raise, Some(300)).unwrap(),
            PlayerAction::Raise(300)
        );
        assert!(PlayerAction::from_parts(ActionKind::Bet, None).is_err());
        assert!(PlayerAction::from_parts(ActionKind::PostBigBlind, Some(100)).is_err());
    }
}

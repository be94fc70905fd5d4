use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::{GameError, InvariantViolation};
use crate::history::{ActionRecord, HandRecord};
use crate::player::{Player, PlayerId, PlayerStatus};
use crate::pot::{Pot, PotManager};

/// Largest table the engine deals to.
pub const MAX_SEATS: usize = 10;

/// Every chip on a table must fit in one stack, so no pot or stack can overflow.
pub const MAX_TABLE_CHIPS: u64 = u32::MAX as u64;

/// Street of the current hand; `Showdown` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingRound {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl BettingRound {
    pub fn next(self) -> BettingRound {
        match self {
            BettingRound::Preflop => BettingRound::Flop,
            BettingRound::Flop => BettingRound::Turn,
            BettingRound::Turn => BettingRound::River,
            BettingRound::River | BettingRound::Showdown => BettingRound::Showdown,
        }
    }

    /// Board size once this street has been dealt.
    pub fn board_len(self) -> usize {
        match self {
            BettingRound::Preflop => 0,
            BettingRound::Flop => 3,
            BettingRound::Turn => 4,
            BettingRound::River | BettingRound::Showdown => 5,
        }
    }
}

/// Per-street betting state owned by the round controller.
#[derive(Debug, Clone, Default)]
pub(crate) struct StreetState {
    /// Highest street wager a player must match
    pub bet_to_match: u32,
    /// Increment of the last full bet or raise; the big blind when none
    pub min_raise: u32,
    /// `bet_to_match` as of the last full bet or raise
    pub reopen_level: u32,
    /// Seats that still owe a decision before the street can close
    pub needs_action: Vec<bool>,
    /// Bet level each seat last voluntarily acted at; `None` before acting
    pub acted_at: Vec<Option<u32>>,
}

impl StreetState {
    pub(crate) fn new(seats: usize, big_blind: u32) -> Self {
        Self {
            bet_to_match: 0,
            min_raise: big_blind,
            reopen_level: 0,
            needs_action: vec![false; seats],
            acted_at: vec![None; seats],
        }
    }
}

/// Everything one table owns: seats, button, the hand in progress.
///
/// Engine operations in [`crate::engine`] take the game explicitly; nothing
/// here is shared between tables.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) config: TableConfig,
    pub(crate) players: Vec<Player>,
    pub(crate) button: usize,
    pub(crate) board: Vec<Card>,
    pub(crate) pots: PotManager,
    pub(crate) round: BettingRound,
    pub(crate) to_act: Option<usize>,
    pub(crate) street: StreetState,
    pub(crate) deck: Option<Deck>,
    pub(crate) actions: Vec<ActionRecord>,
    pub(crate) hand_in_progress: bool,
    /// Hole cards were compared at the end of the last hand
    pub(crate) cards_shown: bool,
    pub(crate) hand_number: u32,
    pub(crate) hand_start_chips: u64,
    pub(crate) last_hand: Option<HandRecord>,
    pub(crate) sitting_out: Vec<bool>,
    pub(crate) rng: ChaCha20Rng,
}

impl Game {
    /// Seats one player per stack with ids `0..stacks.len()`.
    pub fn new(config: TableConfig, stacks: &[u32]) -> Result<Self, GameError> {
        let players = stacks
            .iter()
            .enumerate()
            .map(|(id, &stack)| Player::new(id, stack))
            .collect();
        Self::with_players(config, players)
    }

    pub fn with_players(config: TableConfig, players: Vec<Player>) -> Result<Self, GameError> {
        config
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        if players.len() > MAX_SEATS {
            return Err(GameError::TooManyPlayers {
                max: MAX_SEATS,
                actual: players.len(),
            });
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.id() == p.id()) {
                return Err(GameError::DuplicatePlayer(p.id()));
            }
        }
        let mut table_chips = 0u64;
        for p in &players {
            table_chips += u64::from(p.stack()) + u64::from(p.hand_wager());
            if table_chips > MAX_TABLE_CHIPS {
                return Err(GameError::ChipOverflow(p.id()));
            }
        }
        if config.button >= players.len().max(1) {
            return Err(GameError::InvalidButton {
                button: config.button,
                seats: players.len(),
            });
        }
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::seed_from_u64(rand::random()),
        };
        let seats = players.len();
        Ok(Self {
            button: config.button,
            street: StreetState::new(seats, config.big_blind),
            config,
            players,
            board: Vec::with_capacity(5),
            pots: PotManager::new(),
            round: BettingRound::Preflop,
            to_act: None,
            deck: None,
            actions: Vec::new(),
            hand_in_progress: false,
            cards_shown: false,
            hand_number: 0,
            hand_start_chips: 0,
            last_hand: None,
            sitting_out: vec![false; seats],
            rng,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }
    pub fn seat_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn pots(&self) -> &[Pot] {
        self.pots.pots()
    }
    pub fn round(&self) -> BettingRound {
        self.round
    }
    pub fn bet_to_match(&self) -> u32 {
        self.street.bet_to_match
    }
    pub fn min_raise(&self) -> u32 {
        self.street.min_raise
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
    pub fn is_hand_in_progress(&self) -> bool {
        self.hand_in_progress
    }
    /// True once a hand has ended in a showdown that compared hole cards.
    pub fn cards_shown(&self) -> bool {
        self.cards_shown
    }
    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }
    pub fn last_hand(&self) -> Option<&HandRecord> {
        self.last_hand.as_ref()
    }

    /// Player whose decision the hand is waiting on.
    pub fn to_act(&self) -> Option<PlayerId> {
        self.to_act.map(|seat| self.players[seat].id())
    }

    /// Chips committed this hand and not yet paid out.
    pub fn committed(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.hand_wager())).sum()
    }

    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.stack())).sum::<u64>() + self.committed()
    }

    /// Keeps a player out of the next hands until [`Game::sit_in`]. Takes effect
    /// from the next `start_hand`.
    pub fn sit_out(&mut self, id: PlayerId) -> Result<(), GameError> {
        let seat = self.seat_of(id).ok_or(GameError::UnknownPlayer(id))?;
        self.sitting_out[seat] = true;
        Ok(())
    }

    pub fn sit_in(&mut self, id: PlayerId) -> Result<(), GameError> {
        let seat = self.seat_of(id).ok_or(GameError::UnknownPlayer(id))?;
        self.sitting_out[seat] = false;
        Ok(())
    }

    /// Adds chips to a player's stack between hands.
    pub fn rebuy(&mut self, id: PlayerId, amount: u32) -> Result<(), GameError> {
        if self.hand_in_progress {
            return Err(GameError::HandInProgress);
        }
        let seat = self.seat_of(id).ok_or(GameError::UnknownPlayer(id))?;
        if self.total_chips() + u64::from(amount) > MAX_TABLE_CHIPS {
            return Err(GameError::ChipOverflow(id));
        }
        self.players[seat]
            .add_chips(amount)
            .ok_or(GameError::ChipOverflow(id))?;
        Ok(())
    }

    /// Checks chip conservation and pot consistency for the hand in progress.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let stacks: u64 = self.players.iter().map(|p| u64::from(p.stack())).sum();
        let committed = self.committed();
        if self.hand_in_progress && stacks + committed != self.hand_start_chips {
            return Err(InvariantViolation::ChipConservation {
                stacks,
                committed,
                expected: self.hand_start_chips,
            });
        }
        if self.pots.total() > committed {
            return Err(InvariantViolation::PotTotal {
                pots: self.pots.total(),
                committed,
            });
        }
        Ok(())
    }

    /// Like [`Game::check_invariants`] but fatal. Used by the engine after every mutation.
    pub(crate) fn assert_invariants(&self, context: &str) {
        if let Err(violation) = self.check_invariants() {
            abort_on_violation(context, &violation);
        }
    }

    /// First seat after `from` (exclusive, wrapping) that satisfies `pred`.
    pub(crate) fn next_seat_where<F>(&self, from: usize, pred: F) -> Option<usize>
    where
        F: Fn(usize, &Player) -> bool,
    {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&seat| pred(seat, &self.players[seat]))
    }

    /// Seats in clockwise order starting left of the button.
    pub(crate) fn seats_from_button(&self) -> impl Iterator<Item = usize> + '_ {
        let n = self.players.len();
        (1..=n).map(move |step| (self.button + step) % n)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_live()).count()
    }

    pub(crate) fn actionable_count(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    pub(crate) fn status_of(&self, seat: usize) -> PlayerStatus {
        self.players[seat].status()
    }
}

pub(crate) fn abort_on_violation(context: &str, violation: &InvariantViolation) -> ! {
    tracing::error!(context, error = %violation, "engine invariant violated");
    panic!("engine invariant violated during {context}: {violation}");
}

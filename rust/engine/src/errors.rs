use thiserror::Error;

use crate::cards::Card;
use crate::player::PlayerId;

/// Rejections from [`crate::engine::apply_action`]. None of them change the game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Player {0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("Illegal action: {0}")]
    IllegalAction(String),
    #[error("Invalid bet amount: {amount}, allowed: {minimum}..={maximum}")]
    IllegalAmount {
        amount: u32,
        minimum: u32,
        maximum: u32,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("Deck exhausted: requested {requested} cards, {remaining} remaining")]
    Empty { requested: usize, remaining: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Hand evaluation needs 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Invalid card notation: {0:?}")]
    InvalidNotation(String),
    #[error("Invalid rank character: {0:?}")]
    InvalidRank(char),
    #[error("Invalid suit character: {0:?}")]
    InvalidSuit(char),
}

/// Table setup and hand start failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Need at least 2 players with chips to start a hand, found {0}")]
    NotEnoughPlayers(usize),
    #[error("At most {max} seats are supported, got {actual}")]
    TooManyPlayers { max: usize, actual: usize },
    #[error("Player id {0} is seated twice")]
    DuplicatePlayer(PlayerId),
    #[error("Player {0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("Button seat {button} is out of range for {seats} seats")]
    InvalidButton { button: usize, seats: usize },
    #[error("Hand already in progress")]
    HandInProgress,
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("Chips for player {0} would exceed the table limit of {max} chips", max = u32::MAX)]
    ChipOverflow(PlayerId),
    #[error("Card {0} appears more than once in the supplied deck")]
    DuplicateCard(Card),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

/// A broken engine invariant. Never a user error: the engine panics on these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("chip conservation broken: stacks {stacks} + committed {committed} != {expected}")]
    ChipConservation {
        stacks: u64,
        committed: u64,
        expected: u64,
    },
    #[error("pot total {pots} does not match committed chips {committed}")]
    PotTotal { pots: u64, committed: u64 },
    #[error("pot {index} lists player {player} who is folded or under its threshold")]
    PotEligibility { index: usize, player: PlayerId },
    #[error("pots are not strictly ascending by threshold at index {0}")]
    PotOrder(usize),
    #[error("deck ran out mid-hand: {0}")]
    Deck(DeckError),
    #[error("showdown evaluation failed: {0}")]
    Evaluation(EvalError),
    #[error("stack of player {0} overflowed")]
    StackOverflow(PlayerId),
}

use serde::{Deserialize, Serialize};

use crate::errors::ActionError;
use crate::game::Game;
use crate::history::ActionRecord;
use crate::player::{ActionKind, PlayerAction as A, PlayerId, PlayerStatus};

/// An action that passed validation. Amounts are the chips leaving the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Bet(u32),
    Raise(u32),
    AllIn(u32),
}

impl ValidatedAction {
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(n)
            | ValidatedAction::Bet(n)
            | ValidatedAction::Raise(n)
            | ValidatedAction::AllIn(n) => n,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ValidatedAction::Fold => ActionKind::Fold,
            ValidatedAction::Check => ActionKind::Check,
            ValidatedAction::Call(_) => ActionKind::Call,
            ValidatedAction::Bet(_) => ActionKind::Bet,
            ValidatedAction::Raise(_) => ActionKind::Raise,
            ValidatedAction::AllIn(_) => ActionKind::AllIn,
        }
    }
}

/// A legal option for the player to act. For bet and raise the amounts are
/// street totals ("raise to"); for call and all-in they are chips added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidAction {
    pub kind: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<u32>,
}

/// Result of one action at street level, before any street transition.
#[derive(Debug, Clone)]
pub(crate) struct RoundUpdate {
    pub record: ActionRecord,
    pub street_closed: bool,
    pub went_all_in: bool,
}

/// Validates `action` for `player_id` against the current street without
/// touching the game.
///
/// # Errors
///
/// - [`ActionError::NoHandInProgress`] outside a hand
/// - [`ActionError::UnknownPlayer`] / [`ActionError::NotYourTurn`] for the wrong seat
/// - [`ActionError::IllegalAction`] for an action the situation does not allow,
///   e.g. checking while owing chips or re-raising after a short all-in
/// - [`ActionError::IllegalAmount`] for a bet or raise total below the minimum
///   or beyond the player's chips
///
/// # Examples
///
/// ```
/// use holdem_engine::config::TableConfig;
/// use holdem_engine::engine::start_hand;
/// use holdem_engine::errors::ActionError;
/// use holdem_engine::game::Game;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::rules::{validate_action, ValidatedAction};
///
/// let mut game = Game::new(TableConfig::with_blinds(50, 100), &[1_000, 1_000]).unwrap();
/// start_hand(&mut game).unwrap();
/// // heads-up: the button posted the small blind and acts first
/// let sb = game.to_act().unwrap();
/// assert_eq!(validate_action(&game, sb, PlayerAction::Call), Ok(ValidatedAction::Call(50)));
/// assert!(matches!(
///     validate_action(&game, sb, PlayerAction::Check),
///     Err(ActionError::IllegalAction(_))
/// ));
/// assert!(matches!(
///     validate_action(&game, sb, PlayerAction::Raise(150)),
///     Err(ActionError::IllegalAmount { minimum: 200, .. })
/// ));
/// ```
pub fn validate_action(
    game: &Game,
    player_id: PlayerId,
    action: A,
) -> Result<ValidatedAction, ActionError> {
    let seat = acting_seat(game, player_id)?;
    let player = &game.players[seat];
    let street = &game.street;

    let stack = player.stack();
    let wager = player.street_wager();
    let to_call = street.bet_to_match.saturating_sub(wager);
    let max_total = wager + stack;
    let min_total = street.bet_to_match + street.min_raise;

    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(ActionError::IllegalAction(format!(
                    "cannot check while owing {to_call}"
                )))
            }
        }
        A::Call => {
            if to_call == 0 {
                Err(ActionError::IllegalAction(
                    "nothing to call; check instead".into(),
                ))
            } else {
                Ok(ValidatedAction::Call(to_call.min(stack)))
            }
        }
        A::Bet(total) => {
            if street.bet_to_match > 0 {
                return Err(ActionError::IllegalAction(format!(
                    "a bet of {} is already open; raise instead",
                    street.bet_to_match
                )));
            }
            let chips = sized_wager(total, wager, min_total, max_total)?;
            Ok(ValidatedAction::Bet(chips))
        }
        A::Raise(total) => {
            if street.bet_to_match == 0 {
                return Err(ActionError::IllegalAction(
                    "no bet to raise; bet instead".into(),
                ));
            }
            if stack <= to_call {
                return Err(ActionError::IllegalAction(
                    "stack only covers a call".into(),
                ));
            }
            if lone_actor(game) {
                return Err(ActionError::IllegalAction(
                    "every opponent is all-in; only call or fold".into(),
                ));
            }
            if !raise_open(game, seat) {
                return Err(ActionError::IllegalAction(
                    "betting was not reopened; only call or fold".into(),
                ));
            }
            let chips = sized_wager(total, wager, min_total, max_total)?;
            Ok(ValidatedAction::Raise(chips))
        }
        A::AllIn => {
            let raises = street.bet_to_match > 0 && stack > to_call;
            if raises && lone_actor(game) {
                return Err(ActionError::IllegalAction(
                    "every opponent is all-in; only call or fold".into(),
                ));
            }
            if raises && !raise_open(game, seat) {
                return Err(ActionError::IllegalAction(
                    "betting was not reopened; only call or fold".into(),
                ));
            }
            Ok(ValidatedAction::AllIn(stack))
        }
    }
}

/// Lists what `player_id` may do right now. Empty when it is not their turn.
pub fn valid_actions(game: &Game, player_id: PlayerId) -> Vec<ValidAction> {
    let Ok(seat) = acting_seat(game, player_id) else {
        return Vec::new();
    };
    let player = &game.players[seat];
    let street = &game.street;
    let stack = player.stack();
    let wager = player.street_wager();
    let to_call = street.bet_to_match.saturating_sub(wager);
    let max_total = wager + stack;
    let min_total = (street.bet_to_match + street.min_raise).min(max_total);

    let mut out = vec![ValidAction {
        kind: ActionKind::Fold,
        min_amount: None,
        max_amount: None,
    }];
    if to_call == 0 {
        out.push(ValidAction {
            kind: ActionKind::Check,
            min_amount: None,
            max_amount: None,
        });
    } else {
        let call = to_call.min(stack);
        out.push(ValidAction {
            kind: ActionKind::Call,
            min_amount: Some(call),
            max_amount: Some(call),
        });
    }

    let open = raise_open(game, seat) && !lone_actor(game);
    if street.bet_to_match == 0 {
        out.push(ValidAction {
            kind: ActionKind::Bet,
            min_amount: Some(min_total),
            max_amount: Some(max_total),
        });
    } else if stack > to_call && open {
        out.push(ValidAction {
            kind: ActionKind::Raise,
            min_amount: Some(min_total),
            max_amount: Some(max_total),
        });
    }
    if street.bet_to_match == 0 || stack <= to_call || open {
        out.push(ValidAction {
            kind: ActionKind::AllIn,
            min_amount: Some(stack),
            max_amount: Some(stack),
        });
    }
    out
}

/// Validates and applies one action, then moves the turn. Rejected actions
/// leave the game untouched.
pub(crate) fn apply_action(
    game: &mut Game,
    player_id: PlayerId,
    action: A,
) -> Result<RoundUpdate, ActionError> {
    let validated = validate_action(game, player_id, action)?;
    let seat = acting_seat(game, player_id)?;
    let round = game.round;

    let chips = validated.chips();
    match validated {
        ValidatedAction::Fold => {
            game.players[seat].set_status(PlayerStatus::Folded);
        }
        ValidatedAction::Check => {}
        ValidatedAction::Call(_)
        | ValidatedAction::Bet(_)
        | ValidatedAction::Raise(_)
        | ValidatedAction::AllIn(_) => {
            game.players[seat].commit(chips, true);
            raise_bet_level(game, seat);
        }
    }
    game.street.needs_action[seat] = false;
    if validated != ValidatedAction::Fold {
        game.street.acted_at[seat] = Some(game.street.bet_to_match);
    }

    let went_all_in = game.players[seat].status() == PlayerStatus::AllIn;
    if went_all_in {
        game.pots.recompute(&game.players);
    }

    let record = ActionRecord {
        player_id,
        action: action.kind(),
        amount: chips,
        round,
    };
    game.actions.push(record.clone());

    game.to_act = next_to_act(game, seat);
    let street_closed = game.live_count() <= 1 || game.to_act.is_none();
    if street_closed {
        game.to_act = None;
    }

    Ok(RoundUpdate {
        record,
        street_closed,
        went_all_in,
    })
}

/// Raises `bet_to_match` after `seat` put in more than it, and decides whether
/// the increase reopens betting.
pub(crate) fn raise_bet_level(game: &mut Game, seat: usize) {
    let wager = game.players[seat].street_wager();
    let previous = game.street.bet_to_match;
    if wager <= previous {
        return;
    }
    let increment = wager - previous;
    game.street.bet_to_match = wager;
    if increment >= game.street.min_raise {
        game.street.min_raise = increment;
        game.street.reopen_level = wager;
    } else if wager.saturating_sub(game.street.reopen_level) >= game.street.min_raise {
        // short all-ins that add up to a full raise reopen betting; the
        // minimum increment stays the last full raise
        game.street.reopen_level = wager;
    }
    // everyone still able to act owes a response to the new level; whether they
    // may raise again is decided by `raise_open`
    for other in 0..game.players.len() {
        if other != seat && game.players[other].can_act() {
            game.street.needs_action[other] = true;
        }
    }
}

/// Next seat after `from` that still owes a decision on this street.
pub(crate) fn next_to_act(game: &Game, from: usize) -> Option<usize> {
    game.next_seat_where(from, |seat, _| owes_action(game, seat))
}

pub(crate) fn owes_action(game: &Game, seat: usize) -> bool {
    let player = &game.players[seat];
    if !player.can_act() || !game.street.needs_action[seat] {
        return false;
    }
    // a lone player who already covers every live opponent has nothing to answer
    !(lone_actor(game) && player.street_wager() >= highest_other_wager(game, seat))
}

/// Only one player can still make decisions; everyone else live is all-in.
fn lone_actor(game: &Game) -> bool {
    game.actionable_count() == 1
}

/// Largest street wager among live players other than `seat`. Can sit below
/// `bet_to_match` when the big blind was posted short.
fn highest_other_wager(game: &Game, seat: usize) -> u32 {
    game.players
        .iter()
        .enumerate()
        .filter(|&(other, p)| other != seat && p.is_live())
        .map(|(_, p)| p.street_wager())
        .max()
        .unwrap_or(0)
}

/// A player may raise unless they already acted at or above the level of the
/// last full bet or raise. Short all-ins only reopen once they sum to a full raise.
fn raise_open(game: &Game, seat: usize) -> bool {
    match game.street.acted_at[seat] {
        None => true,
        Some(level) => level < game.street.reopen_level,
    }
}

fn acting_seat(game: &Game, player_id: PlayerId) -> Result<usize, ActionError> {
    if !game.hand_in_progress {
        return Err(ActionError::NoHandInProgress);
    }
    let seat = game
        .seat_of(player_id)
        .ok_or(ActionError::UnknownPlayer(player_id))?;
    let expected = game.to_act.ok_or(ActionError::NoHandInProgress)?;
    if seat != expected {
        return Err(ActionError::NotYourTurn {
            expected: game.players[expected].id(),
            actual: player_id,
        });
    }
    if game.status_of(seat) != PlayerStatus::Active {
        return Err(ActionError::IllegalAction(format!(
            "player {player_id} cannot act while {:?}",
            game.status_of(seat)
        )));
    }
    Ok(seat)
}

/// Chips needed to take the street wager from `wager` to `total`. Putting in
/// every chip is always allowed; otherwise `total` must reach `min_total`.
fn sized_wager(total: u32, wager: u32, min_total: u32, max_total: u32) -> Result<u32, ActionError> {
    let illegal = || ActionError::IllegalAmount {
        amount: total,
        minimum: min_total.min(max_total),
        maximum: max_total,
    };
    if total > max_total {
        return Err(illegal());
    }
    if total < min_total && total != max_total {
        return Err(illegal());
    }
    Ok(total - wager)
}

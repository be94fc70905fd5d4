//! Hand lifecycle: blinds and dealing, street progression, run-outs and settlement.
//!
//! These free functions are the only way the outside world mutates a [`Game`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{ActionError, DeckError, GameError, InvariantViolation};
use crate::game::{abort_on_violation, BettingRound, Game, StreetState};
use crate::history::{format_hand_id, now_rfc3339, today, ActionRecord, HandRecord, Payout};
use crate::player::{ActionKind, PlayerAction, PlayerId, PlayerStatus};
use crate::rules::{self, ValidAction};
use crate::showdown;
use crate::view::{self, TableView};

/// What happened after a successful [`apply_action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub record: ActionRecord,
    /// The betting round this action belonged to has ended
    pub street_closed: bool,
    /// Round after any transitions this action caused
    pub round: BettingRound,
    pub next_to_act: Option<PlayerId>,
    pub hand_complete: bool,
    /// Stack deltas, present once the hand is settled
    pub payouts: Vec<Payout>,
}

/// Starts the next hand with a freshly shuffled deck.
///
/// The shuffle seed comes from the game's seeded RNG, so a table built with a
/// seed replays identically.
pub fn start_hand(game: &mut Game) -> Result<(), GameError> {
    let seed: u64 = game.rng.random();
    start_hand_with_deck(game, Deck::new_shuffled(Some(seed)))
}

/// Starts the next hand dealing from `deck` in order.
pub fn start_hand_with_deck(game: &mut Game, deck: Deck) -> Result<(), GameError> {
    if game.hand_in_progress {
        return Err(GameError::HandInProgress);
    }
    let dealt_in: Vec<bool> = game
        .players
        .iter()
        .zip(&game.sitting_out)
        .map(|(p, &out)| p.stack() > 0 && !out)
        .collect();
    let seated = dealt_in.iter().filter(|&&d| d).count();
    if seated < 2 {
        return Err(GameError::NotEnoughPlayers(seated));
    }
    let undealt = deck.undealt();
    for (i, card) in undealt.iter().enumerate() {
        if undealt[..i].contains(card) {
            return Err(GameError::DuplicateCard(*card));
        }
    }
    let needed = 2 * seated + 8;
    if deck.remaining() < needed {
        return Err(DeckError::Empty {
            requested: needed,
            remaining: deck.remaining(),
        }
        .into());
    }

    let button = if game.hand_number == 0 && dealt_in[game.button] {
        game.button
    } else {
        game.next_seat_where(game.button, |seat, _| dealt_in[seat])
            .ok_or(GameError::NotEnoughPlayers(seated))?
    };

    // Setup is complete; from here on nothing fails.
    game.button = button;
    for (seat, player) in game.players.iter_mut().enumerate() {
        player.reset_for_hand(!dealt_in[seat]);
    }
    game.board.clear();
    game.pots.clear();
    game.actions.clear();
    game.last_hand = None;
    game.round = BettingRound::Preflop;
    game.street = StreetState::new(game.players.len(), game.config.big_blind);
    game.hand_number += 1;
    game.hand_start_chips = game.total_chips();
    game.hand_in_progress = true;
    game.cards_shown = false;
    game.deck = Some(deck);

    tracing::info!(
        hand = game.hand_number,
        button = game.players[button].id(),
        players = seated,
        small_blind = game.config.small_blind,
        big_blind = game.config.big_blind,
        "hand started"
    );

    post_forced_bets(game, &dealt_in);
    deal_hole_cards(game, &dealt_in);

    if game.players.iter().any(|p| p.status() == PlayerStatus::AllIn) {
        game.pots.recompute(&game.players);
    }
    game.assert_invariants("start_hand");

    let bb_seat = big_blind_seat(game, &dealt_in);
    game.to_act = rules::next_to_act(game, bb_seat);
    if game.to_act.is_none() {
        // blinds and antes left nobody with a decision to make
        close_street(game);
    }
    Ok(())
}

/// Applies one player decision. This is the sole mutation entry point during a hand.
pub fn apply_action(
    game: &mut Game,
    player_id: PlayerId,
    action: PlayerAction,
) -> Result<ActionOutcome, ActionError> {
    let update = match rules::apply_action(game, player_id, action) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(player_id, action = ?action, error = %err, "action rejected");
            return Err(err);
        }
    };
    tracing::debug!(
        player_id,
        action = %update.record.action,
        amount = update.record.amount,
        round = ?update.record.round,
        all_in = update.went_all_in,
        "action applied"
    );
    game.assert_invariants("apply_action");

    let payouts = if update.street_closed {
        close_street(game).unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(ActionOutcome {
        record: update.record,
        street_closed: update.street_closed,
        round: game.round,
        next_to_act: game.to_act(),
        hand_complete: !game.hand_in_progress,
        payouts,
    })
}

/// Legal options for `player_id`, empty when it is not their turn.
pub fn get_valid_actions(game: &Game, player_id: PlayerId) -> Vec<ValidAction> {
    rules::valid_actions(game, player_id)
}

/// Public snapshot of the table, safe to broadcast.
pub fn current_view(game: &Game) -> TableView {
    view::table_view(game, None)
}

/// Snapshot for one player, including their own hole cards.
pub fn player_view(game: &Game, viewer: PlayerId) -> TableView {
    view::table_view(game, Some(viewer))
}

fn post_forced_bets(game: &mut Game, dealt_in: &[bool]) {
    let ante = game.config.ante;
    if ante > 0 {
        let seats: Vec<usize> = game.seats_from_button().filter(|&s| dealt_in[s]).collect();
        for seat in seats {
            post(game, seat, ante, ActionKind::PostAnte);
        }
    }

    let sb_seat = small_blind_seat(game, dealt_in);
    let bb_seat = big_blind_seat(game, dealt_in);
    let (small_blind, big_blind) = (game.config.small_blind, game.config.big_blind);
    post(game, sb_seat, small_blind, ActionKind::PostSmallBlind);
    post(game, bb_seat, big_blind, ActionKind::PostBigBlind);

    // the big blind is a full bet even when posted short
    game.street.bet_to_match = big_blind;
    game.street.min_raise = big_blind;
    game.street.reopen_level = big_blind;
    for seat in 0..game.players.len() {
        game.street.needs_action[seat] = game.players[seat].can_act();
    }
}

fn post(game: &mut Game, seat: usize, amount: u32, kind: ActionKind) {
    let antes_are_dead = kind == ActionKind::PostAnte;
    let player = &mut game.players[seat];
    if amount == 0 || player.stack() == 0 {
        return;
    }
    let moved = player.commit(amount, !antes_are_dead);
    let record = ActionRecord {
        player_id: player.id(),
        action: kind,
        amount: moved,
        round: BettingRound::Preflop,
    };
    game.actions.push(record);
}

/// Heads-up the button posts the small blind.
fn small_blind_seat(game: &Game, dealt_in: &[bool]) -> usize {
    let seated = dealt_in.iter().filter(|&&d| d).count();
    if seated == 2 {
        game.button
    } else {
        game.next_seat_where(game.button, |s, _| dealt_in[s])
            .unwrap_or(game.button)
    }
}

fn big_blind_seat(game: &Game, dealt_in: &[bool]) -> usize {
    let sb = small_blind_seat(game, dealt_in);
    game.next_seat_where(sb, |s, _| dealt_in[s]).unwrap_or(sb)
}

fn deal_hole_cards(game: &mut Game, dealt_in: &[bool]) {
    let order: Vec<usize> = game.seats_from_button().filter(|&s| dealt_in[s]).collect();
    let mut first: Vec<Card> = Vec::with_capacity(order.len());
    let mut second: Vec<Card> = Vec::with_capacity(order.len());
    for pass in [&mut first, &mut second] {
        for _ in &order {
            pass.push(draw(game, 1)[0]);
        }
    }
    for (i, &seat) in order.iter().enumerate() {
        game.players[seat].give_hole_cards([first[i], second[i]]);
    }
}

/// Deals from the hand's deck. The deck size is checked when the hand starts,
/// so running out here is an engine defect.
fn draw(game: &mut Game, n: usize) -> Vec<Card> {
    let dealt = match game.deck.as_mut() {
        Some(deck) => deck.deal(n),
        None => Err(DeckError::Empty {
            requested: n,
            remaining: 0,
        }),
    };
    match dealt {
        Ok(cards) => cards,
        Err(err) => abort_on_violation("deal", &InvariantViolation::Deck(err)),
    }
}

fn deal_street(game: &mut Game, round: BettingRound) {
    let count = round.board_len() - game.board.len();
    if count == 0 {
        return;
    }
    draw(game, 1); // burn
    let cards = draw(game, count);
    game.board.extend(cards);
}

/// Runs every transition that follows a closed street. Returns the payouts
/// when the hand was settled.
fn close_street(game: &mut Game) -> Option<Vec<Payout>> {
    loop {
        game.pots.recompute(&game.players);
        if let Err(violation) = game.pots.verify(&game.players) {
            abort_on_violation("close_street", &violation);
        }

        if game.live_count() <= 1 {
            // everyone else folded: no more cards, no comparison
            game.round = BettingRound::Showdown;
            return Some(settle(game));
        }
        if game.round == BettingRound::River {
            game.round = BettingRound::Showdown;
            game.cards_shown = true;
            return Some(settle(game));
        }
        if game.actionable_count() <= 1 {
            while game.round != BettingRound::Showdown {
                let next = game.round.next();
                deal_street(game, next);
                game.round = next;
            }
            game.cards_shown = true;
            tracing::debug!(board = ?game.board, "board run out with no further betting");
            return Some(settle(game));
        }

        let next = game.round.next();
        deal_street(game, next);
        game.round = next;
        for player in game.players.iter_mut() {
            player.clear_street();
        }
        game.street = StreetState::new(game.players.len(), game.config.big_blind);
        for seat in 0..game.players.len() {
            game.street.needs_action[seat] = game.players[seat].can_act();
        }
        game.to_act = rules::next_to_act(game, game.button);
        tracing::debug!(round = ?game.round, board = ?game.board, "street dealt");
        if game.to_act.is_some() {
            return None;
        }
    }
}

fn settle(game: &mut Game) -> Vec<Payout> {
    game.to_act = None;
    let (payouts, pot_results) = match showdown::resolve_pots(game) {
        Ok(result) => result,
        Err(err) => abort_on_violation("showdown", &InvariantViolation::Evaluation(err)),
    };
    let paid: u64 = payouts.iter().map(|p| u64::from(p.amount)).sum();
    if paid != game.committed() {
        abort_on_violation(
            "settle",
            &InvariantViolation::PotTotal {
                pots: paid,
                committed: game.committed(),
            },
        );
    }

    for payout in &payouts {
        if let Some(seat) = game.seat_of(payout.player_id) {
            if game.players[seat].add_chips(payout.amount).is_none() {
                let violation = InvariantViolation::StackOverflow(payout.player_id);
                abort_on_violation("settle", &violation);
            }
        }
    }
    for player in game.players.iter_mut() {
        player.clear_wagers();
    }
    game.pots.clear();
    game.assert_invariants("settle");
    game.hand_in_progress = false;

    let showdown = showdown::summarize(&pot_results);
    let record = HandRecord {
        hand_id: format_hand_id(&today(), game.hand_number),
        seed: game.deck.as_ref().and_then(Deck::seed),
        button: game.players[game.button].id(),
        actions: std::mem::take(&mut game.actions),
        board: game.board.clone(),
        payouts: payouts.clone(),
        showdown,
        ts: Some(now_rfc3339()),
    };
    tracing::info!(
        hand_id = %record.hand_id,
        payouts = ?payouts,
        board = ?game.board,
        "hand settled"
    );
    game.last_hand = Some(record);
    game.deck = None;
    payouts
}

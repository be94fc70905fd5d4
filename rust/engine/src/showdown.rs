//! Pot-by-pot winner selection.

use crate::cards::Card;
use crate::errors::EvalError;
use crate::game::Game;
use crate::hand::{evaluate, HandRank};
use crate::history::{Payout, PotResult, ShowdownInfo};
use crate::player::PlayerId;
use crate::pot::Pot;

/// Awards every pot of the hand and returns the chips each winner receives,
/// summed per player in the order they were first paid.
///
/// A pot with a single eligible player goes to that player without looking at
/// cards. Otherwise the best hand among the eligible players (hole cards plus
/// board) takes it; tied hands split it evenly and any odd chips are handed out
/// one at a time starting with the first tied winner left of the button.
pub fn resolve(game: &Game) -> Result<Vec<Payout>, EvalError> {
    resolve_pots(game).map(|(payouts, _)| payouts)
}

/// Like [`resolve`] but also returns the per-pot breakdown for the hand record.
pub fn resolve_pots(game: &Game) -> Result<(Vec<Payout>, Vec<PotResult>), EvalError> {
    let order: Vec<PlayerId> = game
        .seats_from_button()
        .map(|seat| game.players[seat].id())
        .collect();

    let mut payouts: Vec<Payout> = Vec::new();
    let mut results = Vec::with_capacity(game.pots().len());
    for pot in game.pots() {
        let result = award(game, pot, &order)?;
        let shares = split(pot.amount, &result.winners);
        for (player_id, amount) in shares {
            match payouts.iter_mut().find(|p| p.player_id == player_id) {
                Some(existing) => existing.amount += amount,
                None => payouts.push(Payout { player_id, amount }),
            }
        }
        results.push(result);
    }
    payouts.retain(|p| p.amount > 0);
    Ok((payouts, results))
}

/// Collapses per-pot results into the hand record's showdown summary.
pub fn summarize(results: &[PotResult]) -> Option<ShowdownInfo> {
    if results.is_empty() {
        return None;
    }
    let mut winners: Vec<PlayerId> = Vec::new();
    for id in results.iter().flat_map(|r| r.winners.iter().copied()) {
        if !winners.contains(&id) {
            winners.push(id);
        }
    }
    let notes = if results.iter().all(|r| r.category.is_none()) {
        Some("uncontested".to_string())
    } else {
        None
    };
    Some(ShowdownInfo {
        winners,
        pots: results.to_vec(),
        notes,
    })
}

/// Winners of one pot, ordered clockwise from the left of the button.
fn award(game: &Game, pot: &Pot, order: &[PlayerId]) -> Result<PotResult, EvalError> {
    let mut contenders: Vec<PlayerId> = order
        .iter()
        .copied()
        .filter(|id| pot.eligible.contains(id))
        .collect();
    if contenders.len() <= 1 {
        return Ok(PotResult {
            amount: pot.amount,
            winners: contenders,
            category: None,
        });
    }

    let mut best: Option<HandRank> = None;
    let mut winners: Vec<PlayerId> = Vec::new();
    for id in contenders.drain(..) {
        let rank = rank_of(game, id)?;
        match best.as_ref().map(|b| rank.cmp(b)) {
            None | Some(std::cmp::Ordering::Greater) => {
                best = Some(rank);
                winners.clear();
                winners.push(id);
            }
            Some(std::cmp::Ordering::Equal) => winners.push(id),
            Some(std::cmp::Ordering::Less) => {}
        }
    }
    Ok(PotResult {
        amount: pot.amount,
        winners,
        category: best.map(|b| b.category),
    })
}

fn rank_of(game: &Game, id: PlayerId) -> Result<HandRank, EvalError> {
    let hole = game.player(id).and_then(|p| p.hole_cards());
    let mut cards: Vec<Card> = hole.map(Vec::from).unwrap_or_default();
    cards.extend_from_slice(game.board());
    evaluate(&cards)
}

/// Even split with the remainder going one chip at a time down `winners`.
fn split(amount: u32, winners: &[PlayerId]) -> Vec<(PlayerId, u32)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u32;
    let share = amount / n;
    let odd = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, share + u32::from(i < odd)))
        .collect()
}

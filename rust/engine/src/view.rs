//! Serializable table snapshots for clients.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{BettingRound, Game};
use crate::player::{PlayerId, PlayerStatus};
use crate::pot::Pot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub seat: usize,
    pub stack: u32,
    pub street_wager: u32,
    pub hand_wager: u32,
    pub status: PlayerStatus,
    /// Only filled in for the viewer and for live hands at showdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole_cards: Option<[Card; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub hand_number: u32,
    pub hand_in_progress: bool,
    pub round: BettingRound,
    pub button: PlayerId,
    pub board: Vec<Card>,
    pub pots: Vec<Pot>,
    pub pot_total: u64,
    pub bet_to_match: u32,
    pub min_raise: u32,
    pub to_act: Option<PlayerId>,
    pub players: Vec<PlayerView>,
}

impl TableView {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub(crate) fn table_view(game: &Game, viewer: Option<PlayerId>) -> TableView {
    let revealed = game.cards_shown();
    let players = game
        .players()
        .iter()
        .enumerate()
        .map(|(seat, p)| {
            let visible = viewer == Some(p.id()) || (revealed && p.is_live());
            PlayerView {
                id: p.id(),
                seat,
                stack: p.stack(),
                street_wager: p.street_wager(),
                hand_wager: p.hand_wager(),
                status: p.status(),
                hole_cards: if visible { p.hole_cards() } else { None },
            }
        })
        .collect();

    TableView {
        hand_number: game.hand_number(),
        hand_in_progress: game.is_hand_in_progress(),
        round: game.round(),
        button: game
            .players()
            .get(game.button())
            .map_or(game.button(), |p| p.id()),
        board: game.board().to_vec(),
        pots: game.pots().to_vec(),
        // pots are rebuilt on all-ins and street ends; wagers are always current
        pot_total: game.committed(),
        bet_to_match: game.bet_to_match(),
        min_raise: game.min_raise(),
        to_act: game.to_act(),
        players,
    }
}

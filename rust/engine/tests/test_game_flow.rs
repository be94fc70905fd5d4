use holdem_engine::cards::{full_deck, parse_cards, Card};
use holdem_engine::config::TableConfig;
use holdem_engine::deck::Deck;
use holdem_engine::engine::{apply_action, start_hand, start_hand_with_deck};
use holdem_engine::errors::{DeckError, GameError};
use holdem_engine::game::{BettingRound, Game};
use holdem_engine::player::{ActionKind, PlayerAction, PlayerStatus};

/// Deck that deals `holes` (in dealing order, starting left of the button) and
/// then the given board, with filler cards in the burn slots.
fn stacked_deck(holes: &[&str], board: &str) -> Deck {
    let holes: Vec<Vec<Card>> = holes.iter().map(|h| parse_cards(h).unwrap()).collect();
    let board = parse_cards(board).unwrap();
    let mut used: Vec<Card> = holes.iter().flatten().copied().collect();
    used.extend(&board);
    let mut filler = full_deck().into_iter().filter(|c| !used.contains(c));
    let mut burn = || filler.next().unwrap();

    let mut cards = Vec::new();
    for pass in 0..2 {
        cards.extend(holes.iter().map(|h| h[pass]));
    }
    cards.push(burn());
    cards.extend(&board[..3]);
    cards.push(burn());
    cards.push(board[3]);
    cards.push(burn());
    cards.push(board[4]);
    cards.extend(filler);
    Deck::from_cards(cards)
}

#[test]
fn heads_up_button_posts_small_blind_and_acts_first() {
    let mut game = Game::new(TableConfig::with_blinds(50, 100), &[1_000, 1_000]).unwrap();
    start_hand(&mut game).unwrap();
    assert_eq!(game.players()[0].street_wager(), 50);
    assert_eq!(game.players()[1].street_wager(), 100);
    assert_eq!(game.to_act(), Some(0));
    let posts: Vec<ActionKind> = game.actions().iter().map(|a| a.action).collect();
    assert_eq!(
        posts,
        vec![ActionKind::PostSmallBlind, ActionKind::PostBigBlind]
    );

    apply_action(&mut game, 0, PlayerAction::Call).unwrap();
    let outcome = apply_action(&mut game, 1, PlayerAction::Check).unwrap();
    assert!(outcome.street_closed);
    assert_eq!(outcome.round, BettingRound::Flop);
    // postflop the big blind acts first
    assert_eq!(outcome.next_to_act, Some(1));
    assert_eq!(game.board().len(), 3);
    assert_eq!(game.players()[0].street_wager(), 0);
}

#[test]
fn everyone_folding_awards_the_blinds_without_showdown() {
    let mut game = Game::new(TableConfig::with_blinds(5, 10), &[1_000, 1_000, 1_000]).unwrap();
    start_hand(&mut game).unwrap();
    apply_action(&mut game, 0, PlayerAction::Fold).unwrap();
    let outcome = apply_action(&mut game, 1, PlayerAction::Fold).unwrap();
    assert!(outcome.hand_complete);
    assert_eq!(outcome.next_to_act, None);
    assert_eq!(outcome.payouts.len(), 1);
    assert_eq!(outcome.payouts[0].player_id, 2);
    assert_eq!(outcome.payouts[0].amount, 15);
    assert_eq!(outcome.round, BettingRound::Showdown);
    assert_eq!(game.round(), BettingRound::Showdown);
    assert!(!game.cards_shown());
    assert!(game.board().is_empty());

    let stacks: Vec<u32> = game.players().iter().map(|p| p.stack()).collect();
    assert_eq!(stacks, vec![1_000, 995, 1_005]);
    assert_eq!(game.committed(), 0);
    assert!(game.pots().is_empty());
}

#[test]
fn all_in_preflop_runs_out_the_board_with_burns() {
    let mut game = Game::new(TableConfig::with_blinds(50, 100), &[1_000, 1_000]).unwrap();
    let deck = stacked_deck(&["As Ad", "Kc Kd"], "2h 7s 9c Jd 3h");
    start_hand_with_deck(&mut game, deck).unwrap();
    // seat 1 (left of the button) is dealt first
    assert_eq!(
        game.players()[1].hole_cards(),
        Some([parse_cards("As").unwrap()[0], parse_cards("Ad").unwrap()[0]])
    );

    apply_action(&mut game, 0, PlayerAction::AllIn).unwrap();
    let outcome = apply_action(&mut game, 1, PlayerAction::Call).unwrap();
    assert!(outcome.hand_complete);
    assert_eq!(outcome.round, BettingRound::Showdown);
    assert_eq!(game.board(), parse_cards("2h 7s 9c Jd 3h").unwrap().as_slice());
    assert_eq!(game.players()[1].stack(), 2_000);
    assert_eq!(game.players()[0].stack(), 0);

    let record = game.last_hand().unwrap();
    assert_eq!(record.payouts.len(), 1);
    assert_eq!(record.payouts[0].amount, 2_000);
}

#[test]
fn tied_pot_gives_odd_chip_left_of_button() {
    let cfg = TableConfig::with_blinds(1, 2);
    let mut game = Game::new(cfg, &[1_000, 1_000, 1_000]).unwrap();
    // dealing order is seat 1, seat 2, seat 0
    let deck = stacked_deck(&["2c 3d", "4c 5d", "6c 7d"], "Ah Kh Qh Jh Th");
    start_hand_with_deck(&mut game, deck).unwrap();

    apply_action(&mut game, 0, PlayerAction::Raise(50)).unwrap();
    apply_action(&mut game, 1, PlayerAction::Fold).unwrap();
    apply_action(&mut game, 2, PlayerAction::Call).unwrap();
    while game.is_hand_in_progress() {
        let id = game.to_act().unwrap();
        apply_action(&mut game, id, PlayerAction::Check).unwrap();
    }

    let record = game.last_hand().unwrap();
    let showdown = record.showdown.as_ref().unwrap();
    assert_eq!(showdown.pots.len(), 1);
    assert_eq!(showdown.pots[0].amount, 101);
    assert_eq!(showdown.pots[0].winners, vec![2, 0]);
    let stacks: Vec<u32> = game.players().iter().map(|p| p.stack()).collect();
    assert_eq!(stacks, vec![1_000, 999, 1_001]);
    assert_eq!(game.total_chips(), 3_000);
}

#[test]
fn button_moves_to_next_player_with_chips() {
    let mut game = Game::new(TableConfig::with_blinds(5, 10), &[1_000, 1_000, 1_000]).unwrap();
    start_hand(&mut game).unwrap();
    assert_eq!(game.button(), 0);
    while game.is_hand_in_progress() {
        let id = game.to_act().unwrap();
        apply_action(&mut game, id, PlayerAction::Fold).unwrap();
    }
    game.sit_out(1).unwrap();
    start_hand(&mut game).unwrap();
    assert_eq!(game.button(), 2);
    let sitting = &game.players()[1];
    assert_eq!(sitting.status(), PlayerStatus::SittingOut);
    assert!(sitting.hole_cards().is_none());
    // heads-up between seats 2 and 0: the button posts the small blind
    assert_eq!(game.players()[2].street_wager(), 5);
    assert_eq!(game.players()[0].street_wager(), 10);
}

#[test]
fn antes_are_dead_money_outside_the_street_wager() {
    let cfg = TableConfig {
        ante: 2,
        ..TableConfig::with_blinds(5, 10)
    };
    let mut game = Game::new(cfg, &[1_000, 1_000, 1_000]).unwrap();
    start_hand(&mut game).unwrap();
    let antes = game
        .actions()
        .iter()
        .filter(|a| a.action == ActionKind::PostAnte)
        .count();
    assert_eq!(antes, 3);
    assert_eq!(game.players()[0].street_wager(), 0);
    assert_eq!(game.players()[0].hand_wager(), 2);
    assert_eq!(game.players()[2].street_wager(), 10);
    assert_eq!(game.players()[2].hand_wager(), 12);
    assert_eq!(game.committed(), 21);
    // calling the big blind still costs the full blind
    let outcome = apply_action(&mut game, 0, PlayerAction::Call).unwrap();
    assert_eq!(outcome.record.amount, 10);
}

#[test]
fn short_big_blind_still_sets_the_full_price() {
    let mut game = Game::new(TableConfig::with_blinds(5, 10), &[1_000, 1_000, 4]).unwrap();
    start_hand(&mut game).unwrap();
    assert_eq!(game.players()[2].status(), PlayerStatus::AllIn);
    assert_eq!(game.players()[2].street_wager(), 4);
    assert_eq!(game.bet_to_match(), 10);
    let outcome = apply_action(&mut game, 0, PlayerAction::Call).unwrap();
    assert_eq!(outcome.record.amount, 10);
}

#[test]
fn start_hand_rejects_bad_setups() {
    let mut game = Game::new(TableConfig::default(), &[1_000, 0]).unwrap();
    assert_eq!(start_hand(&mut game), Err(GameError::NotEnoughPlayers(1)));

    let mut game = Game::new(TableConfig::default(), &[1_000, 1_000]).unwrap();
    let short = Deck::from_cards(full_deck()[..10].to_vec());
    assert_eq!(
        start_hand_with_deck(&mut game, short),
        Err(GameError::Deck(DeckError::Empty {
            requested: 12,
            remaining: 10
        }))
    );
    let mut dup = full_deck();
    dup[5] = dup[0];
    assert_eq!(
        start_hand_with_deck(&mut game, Deck::from_cards(dup)),
        Err(GameError::DuplicateCard(full_deck()[0]))
    );
    assert!(!game.is_hand_in_progress());

    start_hand(&mut game).unwrap();
    assert_eq!(start_hand(&mut game), Err(GameError::HandInProgress));
    assert_eq!(game.rebuy(0, 100), Err(GameError::HandInProgress));
}

#[test]
fn table_size_is_bounded() {
    let stacks = [100u32; 11];
    assert!(matches!(
        Game::new(TableConfig::default(), &stacks),
        Err(GameError::TooManyPlayers { max: 10, actual: 11 })
    ));
    assert!(Game::new(TableConfig::default(), &stacks[..10]).is_ok());
}

#[test]
fn seeded_tables_replay_identically() {
    let cfg = TableConfig {
        seed: Some(2024),
        ..TableConfig::default()
    };
    let mut a = Game::new(cfg.clone(), &[1_000, 1_000, 1_000]).unwrap();
    let mut b = Game::new(cfg, &[1_000, 1_000, 1_000]).unwrap();
    start_hand(&mut a).unwrap();
    start_hand(&mut b).unwrap();
    let holes = |g: &Game| -> Vec<_> { g.players().iter().map(|p| p.hole_cards()).collect() };
    assert_eq!(holes(&a), holes(&b));
}

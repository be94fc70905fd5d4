use holdem_engine::config::TableConfig;
use holdem_engine::engine::{apply_action, start_hand};
use holdem_engine::game::Game;
use holdem_engine::player::PlayerAction;
use holdem_engine::pot::PotManager;

#[test]
fn heads_up_simple_side_pot() {
    let pm = PotManager::from_contributions([(0, 500, false), (1, 1000, false)]);
    assert_eq!(pm.main_pot(), 1000);
    assert_eq!(pm.side_pots(), vec![500]);
}

#[test]
fn equal_stacks_no_side_pot() {
    let pm = PotManager::from_contributions([(0, 100, false), (1, 100, false), (2, 100, false)]);
    assert_eq!(pm.pots().len(), 1);
    assert_eq!(pm.main_pot(), 300);
    assert!(pm.side_pots().is_empty());
    assert_eq!(pm.pots()[0].eligible, vec![0, 1, 2]);
}

#[test]
fn short_stack_caps_the_main_pot() {
    let pm = PotManager::from_contributions([(0, 100, false), (1, 500, false), (2, 500, false)]);
    assert_eq!(pm.pots().len(), 2);
    assert_eq!(pm.main_pot(), 300);
    assert_eq!(pm.pots()[0].eligible, vec![0, 1, 2]);
    assert_eq!(pm.side_pots(), vec![800]);
    assert_eq!(pm.pots()[1].eligible, vec![1, 2]);
}

#[test]
fn two_short_stacks_leave_one_side_pot() {
    let pm = PotManager::from_contributions([(0, 100, false), (1, 100, false), (2, 500, false)]);
    assert_eq!(pm.pots().len(), 2);
    assert_eq!(pm.main_pot(), 300);
    assert_eq!(pm.side_pots(), vec![400]);
    assert_eq!(pm.pots()[1].eligible, vec![2]);
}

#[test]
fn folded_chips_stay_but_folded_players_cannot_win() {
    // player 1 folded after putting in 300
    let pm = PotManager::from_contributions([(0, 100, false), (1, 300, true), (2, 500, false)]);
    assert_eq!(pm.total(), 900);
    assert_eq!(pm.main_pot(), 300);
    assert!(pm.pots().iter().all(|p| !p.eligible.contains(&1)));
    // 100..300 and 300..500 both belong to player 2 alone
    assert_eq!(pm.side_pots(), vec![600]);
}

#[test]
fn pots_partition_every_chip_after_mixed_all_ins() {
    let mut game = Game::new(TableConfig::with_blinds(5, 10), &[100, 500, 500]).unwrap();
    start_hand(&mut game).unwrap();
    // button 0 acts first three-handed
    apply_action(&mut game, 0, PlayerAction::AllIn).unwrap();
    apply_action(&mut game, 1, PlayerAction::AllIn).unwrap();
    // mid-street pots already account for every committed chip
    let in_pots: u64 = game.pots().iter().map(|p| u64::from(p.amount)).sum();
    assert_eq!(in_pots, game.committed());
    assert_eq!(game.pots()[0].eligible, vec![0, 1, 2]);

    let outcome = apply_action(&mut game, 2, PlayerAction::Call).unwrap();
    assert!(outcome.hand_complete);
    let record = game.last_hand().unwrap();
    let showdown = record.showdown.as_ref().unwrap();
    let amounts: Vec<u32> = showdown.pots.iter().map(|p| p.amount).collect();
    assert_eq!(amounts, vec![300, 800]);
    assert_eq!(game.total_chips(), 1100);
}

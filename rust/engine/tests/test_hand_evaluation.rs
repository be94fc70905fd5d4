use std::cmp::Ordering;

use holdem_engine::cards::parse_cards;
use holdem_engine::errors::EvalError;
use holdem_engine::hand::{compare_hands, evaluate, Category, HandRank};

fn best(cards: &str) -> HandRank {
    evaluate(&parse_cards(cards).unwrap()).unwrap()
}

#[test]
fn straight_beats_trips_on_paired_board() {
    let board = "Kh Qs Jd 2c 2h";
    let straight = best(&format!("{board} Ah Th"));
    let trips = best(&format!("{board} 2d 9c"));
    assert_eq!(straight.category, Category::Straight);
    assert_eq!(straight.tiebreak[0], 14);
    assert_eq!(trips.category, Category::ThreeOfAKind);
    assert_eq!(compare_hands(&straight, &trips), Ordering::Greater);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = best("Ah 2c 3d 4s 5h");
    let six_high = best("2c 3d 4s 5h 6c");
    let ten_high = best("6c 7d 8s 9h Tc");
    let ace_high = best("Ah Kc Qd 9s 7h");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.tiebreak[0], 5);
    assert!(wheel < six_high);
    assert!(six_high < ten_high);
    assert!(wheel > ace_high);
}

#[test]
fn category_order_is_total() {
    let ladder = [
        "2c 5d 9h Js Kd",
        "2c 2d 9h Js Kd",
        "2c 2d 9h 9s Kd",
        "2c 2d 2h Js Kd",
        "9c Td Jh Qs Kd",
        "2d 5d 9d Jd Kd",
        "2c 2d 2h Ks Kd",
        "2c 2d 2h 2s Kd",
        "9d Td Jd Qd Kd",
    ];
    let ranks: Vec<HandRank> = ladder.iter().map(|h| best(h)).collect();
    for pair in ranks.windows(2) {
        assert!(pair[0] < pair[1], "{} should lose to {}", pair[0], pair[1]);
    }
    assert_eq!(ranks[8].category, Category::StraightFlush);
}

#[test]
fn kickers_break_ties_and_identical_hands_tie() {
    let high_kicker = best("Ac Ad Kh 7s 3c 2d 4h");
    let low_kicker = best("Ac Ad Qh 7s 3c 2d 4h");
    assert_eq!(compare_hands(&high_kicker, &low_kicker), Ordering::Greater);

    // both play the board
    let a = best("Ah Kh Qh Jh Th 2c 3d");
    let b = best("Ah Kh Qh Jh Th 4c 5d");
    assert_eq!(compare_hands(&a, &b), Ordering::Equal);
}

#[test]
fn seven_cards_pick_the_best_five() {
    let r = best("Ks Kd 8s 7s 2s 3s 8d");
    assert_eq!(r.category, Category::Flush);
    assert_eq!(r.tiebreak, [13, 8, 7, 3, 2]);
    assert_eq!(r.to_string(), "flush, king high");
}

#[test]
fn rejects_bad_card_sets() {
    let four = parse_cards("As Ks Qs Js").unwrap();
    assert_eq!(evaluate(&four), Err(EvalError::InvalidCardCount(4)));
    let dup = parse_cards("As Ks Qs Js As").unwrap();
    assert!(matches!(evaluate(&dup), Err(EvalError::DuplicateCard(_))));
}

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::EvalError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// No pair; five unrelated cards
    HighCard = 0,
    /// Two cards of one rank
    OnePair = 1,
    /// Two different pairs
    TwoPair = 2,
    /// Three cards of one rank
    ThreeOfAKind = 3,
    /// Five consecutive ranks, A-2-3-4-5 included
    Straight = 4,
    /// Five cards of one suit
    Flush = 5,
    /// Three of a kind plus a pair
    FullHouse = 6,
    /// Four cards of one rank
    FourOfAKind = 7,
    /// Straight in a single suit
    StraightFlush = 8,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::HighCard => "high card",
            Category::OnePair => "one pair",
            Category::TwoPair => "two pair",
            Category::ThreeOfAKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourOfAKind => "four of a kind",
            Category::StraightFlush => "straight flush",
        };
        f.write_str(name)
    }
}

/// Strength of a five-card hand.
///
/// Ordering is by `category`, then `tiebreak` lexicographically. `tiebreak` lists
/// rank values (2..=14) from most to least significant, zero padded: the grouped
/// ranks first (quads, trips, pairs) and then kickers high to low. Straights store
/// only their top card, so the wheel stores 5.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandRank {
    pub category: Category,
    pub tiebreak: [u8; 5],
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} high", self.category, rank_name(self.tiebreak[0]))
    }
}

/// Best five-card hand from 5 to 7 distinct cards, trying every 5-card subset.
pub fn evaluate(cards: &[Card]) -> Result<HandRank, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::InvalidCardCount(cards.len()));
    }
    for (i, c) in cards.iter().enumerate() {
        if cards[i + 1..].contains(c) {
            return Err(EvalError::DuplicateCard(*c));
        }
    }

    let n = cards.len();
    let mut best: Option<HandRank> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let rank =
                            rank_five(&[cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.is_none_or(|current| rank > current) {
                            best = Some(rank);
                        }
                    }
                }
            }
        }
    }
    // n >= 5 guarantees at least one subset
    best.ok_or(EvalError::InvalidCardCount(n))
}

/// Ranks exactly five cards. Duplicates are not checked here; see [`evaluate`].
pub fn rank_five(cards: &[Card; 5]) -> HandRank {
    let mut rank_mask: u16 = 0;
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        let r = c.rank.value();
        rank_mask |= 1u16 << r;
        rank_counts[r as usize] += 1;
    }
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = straight_high_from_mask(rank_mask);

    if let Some(high) = straight {
        let category = if flush {
            Category::StraightFlush
        } else {
            Category::Straight
        };
        return HandRank {
            category,
            tiebreak: [high, 0, 0, 0, 0],
        };
    }

    // (count, rank) groups, largest group first, then higher rank first
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let mut tiebreak = [0u8; 5];
    for (slot, &(_, r)) in tiebreak.iter_mut().zip(groups.iter()) {
        *slot = r;
    }

    let category = match (groups[0].0, groups.get(1).map(|g| g.0)) {
        (4, _) => Category::FourOfAKind,
        (3, Some(2)) => Category::FullHouse,
        _ if flush => Category::Flush,
        (3, _) => Category::ThreeOfAKind,
        (2, Some(2)) => Category::TwoPair,
        (2, _) => Category::OnePair,
        _ => Category::HighCard,
    };
    HandRank { category, tiebreak }
}

pub fn compare_hands(a: &HandRank, b: &HandRank) -> Ordering {
    a.cmp(b)
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    for high in (5..=14u8).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if (m & window) == window {
            return Some(high);
        }
    }
    None
}

fn rank_name(v: u8) -> &'static str {
    match v {
        2 => "two",
        3 => "three",
        4 => "four",
        5 => "five",
        6 => "six",
        7 => "seven",
        8 => "eight",
        9 => "nine",
        10 => "ten",
        11 => "jack",
        12 => "queen",
        13 => "king",
        _ => "ace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> HandRank {
        let v = parse_cards(s).unwrap();
        rank_five(&[v[0], v[1], v[2], v[3], v[4]])
    }

    #[test]
    fn full_house_tiebreak_lists_trips_then_pair() {
        let r = five("9c 9d 9h 4s 4c");
        assert_eq!(r.category, Category::FullHouse);
        assert_eq!(r.tiebreak, [9, 4, 0, 0, 0]);
    }

    #[test]
    fn two_pair_orders_pairs_then_kicker() {
        let r = five("3c 3d Kh Ks 7c");
        assert_eq!(r.category, Category::TwoPair);
        assert_eq!(r.tiebreak, [13, 3, 7, 0, 0]);
    }

    #[test]
    fn wheel_is_five_high() {
        let r = five("Ah 2c 3d 4s 5h");
        assert_eq!(r.category, Category::Straight);
        assert_eq!(r.tiebreak[0], 5);
    }

    #[test]
    fn ace_does_not_wrap_around() {
        let r = five("Qh Kc Ad 2s 3h");
        assert_eq!(r.category, Category::HighCard);
    }

    #[test]
    fn display_names_category_and_top_rank() {
        assert_eq!(five("Ah Kh Qh Jh Th").to_string(), "straight flush, ace high");
    }
}

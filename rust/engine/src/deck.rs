use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::DeckError;

/// The 52 cards of one hand, dealt front to back. Build a new deck every hand.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    seed: Option<u64>,
}

impl Deck {
    /// Shuffles a full deck with ChaCha20. The same seed always yields the same order;
    /// without one a seed is drawn from the thread RNG.
    pub fn new_shuffled(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut cards = full_deck();
        cards.shuffle(&mut rng);
        Self {
            cards,
            position: 0,
            seed: Some(seed),
        }
    }

    /// A deck that deals `cards` in the given order. Used for replays and fixed scenarios.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            position: 0,
            seed: None,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Deals `n` cards, or none at all if fewer than `n` remain.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(DeckError::Empty {
                requested: n,
                remaining,
            });
        }
        let dealt = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(dealt)
    }

    pub fn burn_card(&mut self) -> Result<(), DeckError> {
        self.deal(1).map(|_| ())
    }

    /// Cards not yet dealt, in dealing order.
    pub fn undealt(&self) -> &[Card] {
        &self.cards[self.position.min(self.cards.len())..]
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

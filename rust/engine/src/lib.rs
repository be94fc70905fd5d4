//! # holdem-engine: No-Limit Texas Hold'em table engine
//!
//! Runs hands for one table of 2 to 10 seats: blinds and antes, betting-round
//! legality, all-in handling, side pots, hand evaluation and showdown payouts.
//! Every chip is accounted for after every action; a broken invariant is a
//! panic, never a silent repair.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation and two-character text encoding
//! - [`deck`] - Seeded ChaCha20 shuffles and fixed-order decks
//! - [`hand`] - Best-of-seven hand evaluation and ordering
//! - [`player`] - Seats, stacks, wagers and player actions
//! - [`pot`] - Main and side pot partitioning
//! - [`rules`] - Action validation and street bookkeeping
//! - [`game`] - Table state and invariant checks
//! - [`engine`] - Hand lifecycle and the public entry points
//! - [`showdown`] - Pot-by-pot winner selection and odd-chip rule
//! - [`view`] - Serializable table snapshots
//! - [`history`] - Records of finished hands
//! - [`config`] - Table configuration from defaults, TOML and environment
//! - [`logging`] - `tracing` subscriber setup and test capture
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::engine::{apply_action, current_view, start_hand};
//! use holdem_engine::game::Game;
//! use holdem_engine::player::PlayerAction;
//!
//! let config = TableConfig { seed: Some(42), ..TableConfig::with_blinds(5, 10) };
//! let mut game = Game::new(config, &[1_000, 1_000, 1_000])?;
//! start_hand(&mut game)?;
//!
//! // everyone folds to the big blind
//! while game.is_hand_in_progress() {
//!     let id = game.to_act().expect("hand in progress has a player to act");
//!     apply_action(&mut game, id, PlayerAction::Fold)?;
//! }
//! assert_eq!(game.total_chips(), 3_000);
//! println!("{}", current_view(&game).to_json()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Hand Evaluation
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! assert_eq!(evaluate(&cards).unwrap().category, Category::StraightFlush);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod logging;
pub mod player;
pub mod pot;
pub mod rules;
pub mod showdown;
pub mod view;

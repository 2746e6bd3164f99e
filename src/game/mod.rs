//! Core match-game entities: cards, deck building, the board's match engine,
//! the difficulty catalog and multiplayer players.

mod board;
mod card;
mod deck;
mod difficulty;
mod player;

pub use board::{Board, BoardPhase, Outcome, Progress, Resolution};
pub use card::{Card, CardId, FaceState, PairId};
pub use deck::{build_deck, deal_pairs, Deck};
pub use difficulty::{Difficulty, ParseDifficultyError};
pub use player::{sanitize_name, winners, Player, DEFAULT_PLAYER_NAME};

//! Kropki-Rust: rules engine and bot for a territory-capture point game.
//!
//! Two players alternately place points on a grid of intersections.
//! Enclosing opponent points captures them and turns enclosed empty space
//! into territory; a player with no legal move loses. This crate is the
//! rule core and the move-picking bot; rendering, input and persistence
//! live in the consuming application.
//!
//! ## Modules
//!
//! - [`constants`] - Feature layout, search tiers and tuning scales
//! - [`board`] - Sparse copy-on-write board storage and cell states
//! - [`state`] - Match settings and the immutable game snapshot
//! - [`rules`] - Legality, move application, end-of-game detection
//! - [`capture`] - Enclosure flood-fill and the hover-preview simulator
//! - [`bot`] - Policy engine: pruning, linear scoring, defensive lookahead
//! - [`weights`] - Learned weight-file interface
//!
//! ## Example
//!
//! ```
//! use kropki_rust::state::{GameMode, GameSettings, GameState};
//! use kropki_rust::rules::{is_legal, play_turn};
//!
//! let state = GameState::new(GameSettings::new(9, 9, GameMode::PlayerVsPlayer));
//! assert!(is_legal(&state, 4, 4));
//! let state = play_turn(&state, 4, 4).expect("legal move");
//! assert_eq!(state.move_history.len(), 1);
//! ```

pub mod board;
pub mod bot;
pub mod capture;
pub mod constants;
pub mod rules;
pub mod state;
pub mod weights;

pub use board::{Board, CellState, Player};
pub use bot::{BotOptions, choose_move, choose_move_with_weights};
pub use capture::{PotentialCapture, immediate_captures, potential_capture, resolve_captures};
pub use rules::{
    EndConditions, apply_move, empty_legal_moves, end_conditions, is_legal, legal_moves,
    play_turn, surrender,
};
pub use state::{
    BotDifficulty, GameMode, GameOutcome, GameSettings, GameState, GameStatus, MoveRecord,
};
pub use weights::Weights;

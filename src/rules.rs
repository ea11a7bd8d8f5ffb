//! Move legality, move application and end-of-game detection.
//!
//! `apply_move` is the only state transition: place a point, log it,
//! toggle the turn, resolve captures, credit the mover. Legality is a
//! precondition of `apply_move`, checked by the caller; `play_turn` is the
//! checked wrapper the application layer uses, and it also freezes the
//! state when the move leaves the opponent without a reply.

use crate::board::CellState;
use crate::capture::resolve_captures;
use crate::state::{GameOutcome, GameState, GameStatus, MoveRecord};

/// Result of scanning the board for the current player's options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EndConditions {
    pub finished: bool,
    pub outcome: Option<GameOutcome>,
}

/// True iff the current player may place at (x, y): the game is running,
/// the cell is in bounds, and it is empty or the player's own territory.
/// Any point - active or captured - and opponent territory are never
/// placeable.
pub fn is_legal(state: &GameState, x: i32, y: i32) -> bool {
    if state.status != GameStatus::Playing {
        return false;
    }
    if !state.settings.in_bounds(x, y) {
        return false;
    }
    match state.board.get(x, y) {
        CellState::Empty => true,
        CellState::Point { .. } => false,
        CellState::Territory { owner } => owner == state.current_player,
    }
}

/// Place the current player's point at (x, y) and resolve captures.
///
/// Precondition: `is_legal(state, x, y)`. Calling this on an illegal move
/// is a caller error; use [`play_turn`] for the checked path. Placement,
/// history append, turn toggle and capture resolution are one atomic
/// transition - there is no place-without-capture-check operation.
pub fn apply_move(state: &GameState, x: i32, y: i32) -> GameState {
    let mover = state.current_player;
    let board = state
        .board
        .set(x, y, CellState::Point { owner: mover, captured_by: None });

    let mut history = state.move_history.clone();
    history.push(MoveRecord { x, y, player: mover });

    let mut next = GameState {
        settings: state.settings.clone(),
        board,
        score: state.score,
        current_player: mover.opponent(),
        status: state.status,
        outcome: state.outcome,
        move_history: history,
    };

    let captures = resolve_captures(&next);
    next.board = captures.board;
    next.score[mover.index()] += captures.score_delta;
    next
}

/// Whether the game is over and who won.
///
/// A state that is already frozen passes its stored result through.
/// Otherwise the player to move loses exactly when no cell is legal for
/// them; exhaustion is never a draw.
pub fn end_conditions(state: &GameState) -> EndConditions {
    if state.status != GameStatus::Playing {
        return EndConditions {
            finished: state.status == GameStatus::Finished,
            outcome: state.outcome,
        };
    }
    for y in 0..state.settings.height {
        for x in 0..state.settings.width {
            if is_legal(state, x, y) {
                return EndConditions { finished: false, outcome: None };
            }
        }
    }
    EndConditions {
        finished: true,
        outcome: Some(GameOutcome::Winner(state.current_player.opponent())),
    }
}

/// All legal moves for the current player, scanned row by row.
pub fn legal_moves(state: &GameState) -> Vec<(i32, i32)> {
    if state.status != GameStatus::Playing {
        return Vec::new();
    }
    let mut moves = Vec::new();
    for y in 0..state.settings.height {
        for x in 0..state.settings.width {
            if is_legal(state, x, y) {
                moves.push((x, y));
            }
        }
    }
    moves
}

/// Legal moves on empty cells only. Preferred over playing into own
/// territory, which costs a cell that is already scored ground.
pub fn empty_legal_moves(state: &GameState) -> Vec<(i32, i32)> {
    legal_moves(state)
        .into_iter()
        .filter(|&(x, y)| state.board.get(x, y).is_empty())
        .collect()
}

/// Checked move application for the application layer: `None` when the
/// move is illegal, otherwise the new state, frozen with the mover as
/// winner when the opponent has no reply left.
pub fn play_turn(state: &GameState, x: i32, y: i32) -> Option<GameState> {
    if !is_legal(state, x, y) {
        return None;
    }
    let mut next = apply_move(state, x, y);
    let end = end_conditions(&next);
    if end.finished {
        next.status = GameStatus::Finished;
        next.outcome = end.outcome;
    }
    Some(next)
}

/// Concede: the opponent of the player to move wins. A finished game is
/// returned unchanged.
pub fn surrender(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    next.status = GameStatus::Finished;
    next.outcome = Some(GameOutcome::Winner(state.current_player.opponent()));
    next
}

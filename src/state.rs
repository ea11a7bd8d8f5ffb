//! Match settings and the immutable game state value.
//!
//! A `GameState` is a snapshot: every rules operation builds a new one from
//! the previous snapshot plus a board delta. The shared board storage makes
//! that cheap, and any retained snapshot stays valid forever.

use std::fmt;

use crate::board::{Board, CellState, Player};

/// Who is playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameMode {
    PlayerVsPlayer,
    PlayerVsBot,
}

/// Bot strength tag. Only the learned linear policy exists today.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BotDifficulty {
    Neuro,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Finished,
}

/// How a finished match ended. A draw never arises from move exhaustion;
/// it can only be imposed from outside (e.g. a double surrender).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Match configuration. Colors are cosmetic and never read by the rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSettings {
    pub width: i32,
    pub height: i32,
    pub mode: GameMode,
    pub bot_difficulty: Option<BotDifficulty>,
    pub player_colors: [String; 2],
}

impl GameSettings {
    /// New settings with default colors. Dimensions are clamped to at
    /// least 1x1.
    pub fn new(width: i32, height: i32, mode: GameMode) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            mode,
            bot_difficulty: match mode {
                GameMode::PlayerVsBot => Some(BotDifficulty::Neuro),
                GameMode::PlayerVsPlayer => None,
            },
            player_colors: ["#d33".to_string(), "#33d".to_string()],
        }
    }

    pub fn cell_count(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Cells on the outer boundary. A flood-fill region touching one of
    /// these is open to the outside and cannot be captured.
    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        x == 0 || x == self.width - 1 || y == 0 || y == self.height - 1
    }
}

/// One entry of the append-only move log.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub x: i32,
    pub y: i32,
    pub player: Player,
}

/// Immutable snapshot of a match.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: GameSettings,
    pub board: Board,
    /// Capture counts, indexed by [`Player::index`].
    pub score: [u32; 2],
    pub current_player: Player,
    pub status: GameStatus,
    pub outcome: Option<GameOutcome>,
    /// Replay log in play order; also the bot's randomness seed.
    pub move_history: Vec<MoveRecord>,
}

impl GameState {
    /// Fresh match: empty board, 0:0, player one to move.
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            board: Board::new(),
            score: [0, 0],
            current_player: Player::One,
            status: GameStatus::Playing,
            outcome: None,
            move_history: Vec::new(),
        }
    }

    pub fn score_of(&self, player: Player) -> u32 {
        self.score[player.index()]
    }
}

impl fmt::Display for GameState {
    /// ASCII rendering: `X`/`O` active points, `x`/`o` captured points
    /// (by original owner), `+`/`-` territory, `.` empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.settings.height {
            for x in 0..self.settings.width {
                let ch = match self.board.get(x, y) {
                    CellState::Empty => '.',
                    CellState::Point { owner: Player::One, captured_by: None } => 'X',
                    CellState::Point { owner: Player::Two, captured_by: None } => 'O',
                    CellState::Point { owner: Player::One, .. } => 'x',
                    CellState::Point { owner: Player::Two, .. } => 'o',
                    CellState::Territory { owner: Player::One } => '+',
                    CellState::Territory { owner: Player::Two } => '-',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

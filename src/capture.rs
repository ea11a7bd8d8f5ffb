//! Capture resolution: the enclosure flood-fill.
//!
//! After every placement the board is checked for enclosed opponent
//! regions. The flood-fill is 4-directional and its wall definition is
//! dynamic: only *active* points of the player who just moved block
//! passage. Captured points of either owner, territory of either owner and
//! empty cells are all passable, so a previously captured point never
//! shields a region again.
//!
//! Regions are seeded from active opponent points only. A region that is
//! entirely territory and captured points contains no seed and is never
//! visited; that is what keeps already-resolved territory from being
//! re-scored on later moves.

use crate::board::{Board, CellState, Player};
use crate::constants::ORTHOGONAL;
use crate::rules::is_legal;
use crate::state::{GameSettings, GameState};

/// Board after capture resolution plus the mover's score delta.
#[derive(Clone, Debug)]
pub struct CaptureOutcome {
    pub board: Board,
    /// Number of opponent points newly captured by this resolution.
    pub score_delta: u32,
}

/// Cells a resolution would change: opponent active points that become
/// captured and empty cells that become the capturing player's territory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PotentialCapture {
    pub territory: Vec<(i32, i32)>,
    pub captured_points: Vec<(i32, i32)>,
}

/// Flood-fill the board and collect every cell an enclosure by `capturing`
/// would change. Returns (points to capture, empties to convert).
fn collect_captures(
    settings: &GameSettings,
    board: &Board,
    capturing: Player,
) -> (Vec<(i32, i32)>, Vec<(i32, i32)>) {
    let opponent = capturing.opponent();
    let width = settings.width;
    let height = settings.height;
    let idx = |x: i32, y: i32| (y * width + x) as usize;

    // Walls are active points of the capturing player, nothing else.
    let passable = |x: i32, y: i32| {
        settings.in_bounds(x, y) && !board.get(x, y).is_active_point_of(capturing)
    };

    // Seed points: every active opponent point still on the board.
    let mut seeds = Vec::new();
    for x in 0..width {
        for y in 0..height {
            if board.get(x, y).is_active_point_of(opponent) {
                seeds.push((x, y));
            }
        }
    }

    let cells = (width as usize) * (height as usize);
    let mut processed = vec![false; cells];
    let mut to_capture = Vec::new();
    let mut to_territory = Vec::new();

    for (sx, sy) in seeds {
        if processed[idx(sx, sy)] {
            continue;
        }

        // BFS over passable cells; the queue doubles as the visited list.
        let mut visited = vec![false; cells];
        let mut queue = vec![(sx, sy)];
        visited[idx(sx, sy)] = true;
        let mut reached_edge = false;
        let mut head = 0;

        while head < queue.len() {
            let (x, y) = queue[head];
            head += 1;
            if settings.is_edge(x, y) {
                reached_edge = true;
            }
            for (dx, dy) in ORTHOGONAL {
                let (nx, ny) = (x + dx, y + dy);
                if !passable(nx, ny) || visited[idx(nx, ny)] {
                    continue;
                }
                visited[idx(nx, ny)] = true;
                queue.push((nx, ny));
            }
        }

        // Every visited cell is consumed by this region, open or not, so a
        // later seed never re-floods the same component.
        for &(x, y) in &queue {
            processed[idx(x, y)] = true;
            if reached_edge {
                continue;
            }
            match board.get(x, y) {
                cell if cell.is_active_point_of(opponent) => to_capture.push((x, y)),
                CellState::Empty => to_territory.push((x, y)),
                // Territory and captured points count as visited but are
                // left structurally unchanged.
                _ => {}
            }
        }
    }

    (to_capture, to_territory)
}

/// Resolve captures on a state whose board already has the new point placed
/// and whose `current_player` has already been toggled: the capturing
/// player is the one who just moved.
///
/// A resolution that changes nothing returns the input board's storage
/// unchanged and a zero delta. The delta counts newly captured points only;
/// territory conversion does not score.
pub fn resolve_captures(state: &GameState) -> CaptureOutcome {
    let capturing = state.current_player.opponent();
    let (to_capture, to_territory) =
        collect_captures(&state.settings, &state.board, capturing);

    if to_capture.is_empty() && to_territory.is_empty() {
        return CaptureOutcome { board: state.board.clone(), score_delta: 0 };
    }

    let opponent = capturing.opponent();
    let mut updates = Vec::with_capacity(to_capture.len() + to_territory.len());
    for &(x, y) in &to_capture {
        updates.push((
            x,
            y,
            CellState::Point { owner: opponent, captured_by: Some(capturing) },
        ));
    }
    for &(x, y) in &to_territory {
        updates.push((x, y, CellState::Territory { owner: capturing }));
    }

    CaptureOutcome {
        board: state.board.set_many(&updates),
        score_delta: to_capture.len() as u32,
    }
}

/// Place `mover`'s point at (x, y) and settle the enclosure in one step,
/// without going through a full state transition. Returns the settled
/// board and the capture count. Used by the bot's lookahead, where whole
/// `GameState` snapshots per simulated ply would be wasted work.
pub(crate) fn place_and_resolve(
    settings: &GameSettings,
    board: &Board,
    mover: Player,
    x: i32,
    y: i32,
) -> (Board, u32) {
    let placed = board.set(x, y, CellState::Point { owner: mover, captured_by: None });
    let (to_capture, to_territory) = collect_captures(settings, &placed, mover);
    if to_capture.is_empty() && to_territory.is_empty() {
        return (placed, 0);
    }
    let opponent = mover.opponent();
    let mut updates = Vec::with_capacity(to_capture.len() + to_territory.len());
    for &(cx, cy) in &to_capture {
        updates.push((
            cx,
            cy,
            CellState::Point { owner: opponent, captured_by: Some(mover) },
        ));
    }
    for &(tx, ty) in &to_territory {
        updates.push((tx, ty, CellState::Territory { owner: mover }));
    }
    (placed.set_many(&updates), to_capture.len() as u32)
}

/// Points the current player would capture by placing at (x, y).
///
/// Dry run only; the real state is never touched. Callers are expected to
/// have checked legality, mirroring `apply_move`'s contract.
pub fn immediate_captures(state: &GameState, x: i32, y: i32) -> u32 {
    let mover = state.current_player;
    let board = state
        .board
        .set(x, y, CellState::Point { owner: mover, captured_by: None });
    let (to_capture, _) = collect_captures(&state.settings, &board, mover);
    to_capture.len() as u32
}

/// What the current player's hypothetical move at (x, y) would change.
///
/// `None` when the move is illegal or captures nothing. Pure with respect
/// to the real state, cheap enough to call on every pointer hover.
pub fn potential_capture(state: &GameState, x: i32, y: i32) -> Option<PotentialCapture> {
    if !is_legal(state, x, y) {
        return None;
    }
    let mover = state.current_player;
    let board = state
        .board
        .set(x, y, CellState::Point { owner: mover, captured_by: None });
    let (captured_points, territory) = collect_captures(&state.settings, &board, mover);
    if captured_points.is_empty() {
        return None;
    }
    Some(PotentialCapture { territory, captured_points })
}

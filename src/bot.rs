//! Bot policy engine: candidate pruning, linear scoring and defensive
//! lookahead under a wall-clock budget.
//!
//! The policy is a pure function of the state and the weight vector.
//! Candidates are pruned to the neighborhood of existing points, ranked by
//! an offensive composite (immediate captures dominate, then proximity to
//! the opponent, then the learned linear score), and the top of that
//! ranking is blended against a defensive pick when the opponent has a
//! capture threat. The blend is decided by a pseudo-random draw seeded
//! entirely from the state, so the same position always produces the same
//! move.
//!
//! Every simulation loop polls a deadline and truncates when the budget
//! runs out; the first-ranked candidate is always available as a fallback,
//! even if no lookahead completed.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::board::{Board, CellState, Player, to_key};
use crate::capture::{immediate_captures, place_and_resolve};
use crate::constants::{
    FEATURE_COUNT, NEAR_OPPONENT_RADIUS, OFFENSE_CAPTURE_SCALE, OFFENSE_DISTANCE_SCALE,
    search_tier,
};
use crate::rules::{empty_legal_moves, legal_moves};
use crate::state::{BotDifficulty, GameSettings, GameState};
use crate::weights::Weights;

/// Caller-tunable knobs. The time budget defaults to the search tier's
/// value for the board size.
#[derive(Copy, Clone, Debug, Default)]
pub struct BotOptions {
    pub time_budget_ms: Option<u64>,
}

/// A candidate move with its precomputed ranking ingredients.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    pt: (i32, i32),
    /// Points captured immediately by this move.
    captures: u32,
    /// Chebyshev distance to the nearest active opponent point (0 when the
    /// opponent has none).
    distance: i32,
    /// Learned linear-model score.
    linear: f64,
    /// Composite used for the offensive shortlist.
    offensive: f64,
}

/// Shortlist entry with its one-reply lookahead results.
#[derive(Copy, Clone, Debug)]
struct Evaluated {
    cand: Candidate,
    /// Opponent's best immediate capture after this bot move.
    reply_caps: u32,
    /// Bot's own best capture after the opponent's best reply.
    bot_after: u32,
}

fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

fn xorshift_mix(mut h: u64) -> u64 {
    h ^= h << 13;
    h ^= h >> 7;
    h ^= h << 17;
    h
}

/// Deterministic draw seed: a rolling xorshift hash over the move count,
/// both scores and every history entry. Identical states seed identically;
/// any difference in the move log changes the seed.
pub fn bot_seed(state: &GameState) -> u64 {
    let mut h = 0x9e37_79b9_7f4a_7c15_u64 ^ (state.move_history.len() as u64);
    h ^= ((state.score[0] as u64) << 32) | state.score[1] as u64;
    h = xorshift_mix(h);
    for record in &state.move_history {
        h ^= to_key(record.x, record.y) ^ ((record.player.index() as u64) << 63);
        h = xorshift_mix(h);
    }
    h
}

/// Board-level placement legality for `player`, ignoring game status: in
/// bounds and on an empty cell or the player's own territory.
fn placeable(settings: &GameSettings, board: &Board, player: Player, x: i32, y: i32) -> bool {
    if !settings.in_bounds(x, y) {
        return false;
    }
    match board.get(x, y) {
        CellState::Empty => true,
        CellState::Point { .. } => false,
        CellState::Territory { owner } => owner == player,
    }
}

/// All active points of either player; the anchors for relevance pruning.
fn active_anchors(board: &Board) -> Vec<(i32, i32)> {
    board
        .iter()
        .filter(|&(_, cell)| matches!(cell, CellState::Point { captured_by: None, .. }))
        .map(|(pt, _)| pt)
        .collect()
}

/// Best single-move capture `mover` can get on this board, scanning
/// placements near existing activity. Truncates at the deadline and
/// returns the best found so far.
fn best_capture_on_board(
    settings: &GameSettings,
    board: &Board,
    mover: Player,
    radius: i32,
    deadline: Instant,
) -> u32 {
    best_reply_on_board(settings, board, mover, radius, deadline)
        .map(|(_, caps)| caps)
        .unwrap_or(0)
}

/// The placement maximizing `mover`'s immediate captures, with its count.
/// `None` when no cell is placeable at all.
fn best_reply_on_board(
    settings: &GameSettings,
    board: &Board,
    mover: Player,
    radius: i32,
    deadline: Instant,
) -> Option<((i32, i32), u32)> {
    let anchors = active_anchors(board);
    let mut best: Option<((i32, i32), u32)> = None;
    for y in 0..settings.height {
        for x in 0..settings.width {
            if !placeable(settings, board, mover, x, y) {
                continue;
            }
            if !anchors.is_empty()
                && !anchors.iter().any(|&a| chebyshev((x, y), a) <= radius)
            {
                continue;
            }
            if best.is_some() && Instant::now() >= deadline {
                return best;
            }
            let (_, caps) = place_and_resolve(settings, board, mover, x, y);
            match best {
                Some((_, best_caps)) if best_caps >= caps => {}
                _ => best = Some(((x, y), caps)),
            }
        }
    }
    best
}

/// One reply of lookahead from a board where the bot has just moved:
/// the opponent's best capture, then the bot's best capture on the board
/// that reply leaves behind.
fn counter_capture_after(
    settings: &GameSettings,
    board_after_bot: &Board,
    bot: Player,
    radius: i32,
    deadline: Instant,
) -> (u32, u32) {
    match best_reply_on_board(settings, board_after_bot, bot.opponent(), radius, deadline) {
        Some(((rx, ry), reply_caps)) => {
            let (settled, _) =
                place_and_resolve(settings, board_after_bot, bot.opponent(), rx, ry);
            let bot_after = best_capture_on_board(settings, &settled, bot, radius, deadline);
            (reply_caps, bot_after)
        }
        // Opponent has no placement left; the bot keeps the board as-is.
        None => (
            0,
            best_capture_on_board(settings, board_after_bot, bot, radius, deadline),
        ),
    }
}

/// Choose a move for the current player using the embedded weight file.
/// Returns `None` only when no legal move exists.
pub fn choose_move(
    state: &GameState,
    difficulty: BotDifficulty,
    options: BotOptions,
) -> Option<(i32, i32)> {
    choose_move_with_weights(state, difficulty, options, &Weights::default())
}

/// [`choose_move`] with an explicit weight vector (trained file override,
/// tests). A vector that does not match [`FEATURE_COUNT`] degrades to the
/// first candidate move instead of failing.
pub fn choose_move_with_weights(
    state: &GameState,
    _difficulty: BotDifficulty,
    options: BotOptions,
    weights: &Weights,
) -> Option<(i32, i32)> {
    // Prefer empty cells; fall back to own territory only when forced.
    let mut moves = empty_legal_moves(state);
    if moves.is_empty() {
        moves = legal_moves(state);
    }
    if moves.is_empty() {
        return None;
    }

    let tier = search_tier(state.settings.cell_count());

    // Relevance pruning: with any active point on the board, only moves
    // near existing activity are worth considering.
    let anchors = active_anchors(&state.board);
    if !anchors.is_empty() {
        let pruned: Vec<(i32, i32)> = moves
            .iter()
            .copied()
            .filter(|&pt| anchors.iter().any(|&a| chebyshev(pt, a) <= tier.prune_radius))
            .collect();
        if !pruned.is_empty() {
            moves = pruned;
        }
    }

    if !weights.matches_feature_count() {
        return moves.first().copied();
    }

    let budget = Duration::from_millis(options.time_budget_ms.unwrap_or(tier.time_budget_ms));
    let deadline = Instant::now() + budget;

    let opponent = state.current_player.opponent();
    let opponent_points = state.board.active_points(opponent);

    // Offensive pass: score every candidate, deadline permitting.
    let mut candidates: Vec<Candidate> = Vec::with_capacity(moves.len());
    for &pt in &moves {
        if !candidates.is_empty() && Instant::now() >= deadline {
            break;
        }
        let (x, y) = pt;
        let captures = immediate_captures(state, x, y);
        let cell = state.board.get(x, y);
        let features = [
            1.0,
            flag(cell.is_empty()),
            flag(matches!(cell, CellState::Territory { owner } if owner == state.current_player)),
            flag(captures > 0),
            flag(opponent_points.iter().any(|&p| chebyshev(pt, p) <= NEAR_OPPONENT_RADIUS)),
        ];
        debug_assert_eq!(features.len(), FEATURE_COUNT);
        let linear = weights.score(&features);
        let distance = opponent_points
            .iter()
            .map(|&p| chebyshev(pt, p))
            .min()
            .unwrap_or(0);
        let offensive = captures as f64 * OFFENSE_CAPTURE_SCALE
            - distance as f64 * OFFENSE_DISTANCE_SCALE
            + linear;
        candidates.push(Candidate { pt, captures, distance, linear, offensive });
    }

    candidates.sort_by(|a, b| b.offensive.partial_cmp(&a.offensive).unwrap_or(Ordering::Equal));
    candidates.truncate(tier.top_k);
    let offensive_choice = candidates[0].pt;

    // What the opponent could take on their next turn if the board stayed
    // as it is. No threat means there is nothing to defend against.
    let lost_next_turn =
        best_capture_on_board(&state.settings, &state.board, opponent, tier.prune_radius, deadline);
    if lost_next_turn == 0 {
        return Some(offensive_choice);
    }

    // Lookahead over the shortlist: bot move, best opponent reply, and the
    // bot's best capture after that reply.
    let mut evaluated: Vec<Evaluated> = Vec::with_capacity(candidates.len());
    for cand in &candidates {
        if !evaluated.is_empty() && Instant::now() >= deadline {
            break;
        }
        let (board_after, _) = place_and_resolve(
            &state.settings,
            &state.board,
            state.current_player,
            cand.pt.0,
            cand.pt.1,
        );
        let (reply_caps, bot_after) = counter_capture_after(
            &state.settings,
            &board_after,
            state.current_player,
            tier.prune_radius,
            deadline,
        );
        evaluated.push(Evaluated { cand: *cand, reply_caps, bot_after });
    }

    let bot_best_after = evaluated.iter().map(|e| e.bot_after).max().unwrap_or(0);
    let defense_probability = if bot_best_after == 0 {
        // A threat with no offensive counter-threat: always defend.
        1.0
    } else {
        lost_next_turn as f64 / (lost_next_turn + bot_best_after) as f64
    };

    let mut rng = fastrand::Rng::with_seed(bot_seed(state));
    if rng.f64() < defense_probability {
        let defensive = evaluated.iter().min_by(|a, b| {
            a.reply_caps
                .cmp(&b.reply_caps)
                .then(b.cand.captures.cmp(&a.cand.captures))
                .then(a.cand.distance.cmp(&b.cand.distance))
                .then(b.cand.linear.partial_cmp(&a.cand.linear).unwrap_or(Ordering::Equal))
        });
        if let Some(best) = defensive {
            return Some(best.cand.pt);
        }
    }
    Some(offensive_choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::apply_move;
    use crate::state::{GameMode, GameSettings, GameStatus};

    fn bot_state(width: i32, height: i32) -> GameState {
        GameState::new(GameSettings::new(width, height, GameMode::PlayerVsBot))
    }

    fn active(owner: Player) -> CellState {
        CellState::Point { owner, captured_by: None }
    }

    #[test]
    fn test_none_when_finished() {
        let mut state = bot_state(5, 5);
        state.status = GameStatus::Finished;
        assert_eq!(
            choose_move(&state, BotDifficulty::Neuro, BotOptions::default()),
            None
        );
    }

    #[test]
    fn test_returns_legal_move_on_empty_board() {
        let state = bot_state(5, 5);
        let mv = choose_move(&state, BotDifficulty::Neuro, BotOptions::default())
            .expect("board has moves");
        assert!(state.settings.in_bounds(mv.0, mv.1));
    }

    #[test]
    fn test_deterministic_for_same_state() {
        let mut state = bot_state(7, 7);
        state = apply_move(&state, 3, 3);
        state = apply_move(&state, 2, 3);
        let a = choose_move(&state, BotDifficulty::Neuro, BotOptions::default());
        let b = choose_move(&state, BotDifficulty::Neuro, BotOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_is_pure_and_history_sensitive() {
        let mut state = bot_state(5, 5);
        state = apply_move(&state, 1, 1);
        assert_eq!(bot_seed(&state), bot_seed(&state));

        let other = apply_move(&bot_state(5, 5), 2, 2);
        assert_ne!(bot_seed(&state), bot_seed(&other));
    }

    #[test]
    fn test_mismatched_weights_fall_back_to_first_candidate() {
        let state = bot_state(5, 5);
        let short = Weights::new(vec![1.0, 2.0, 3.0]);
        let mv = choose_move_with_weights(
            &state,
            BotDifficulty::Neuro,
            BotOptions::default(),
            &short,
        );
        // Empty board: no pruning, first row-scan candidate.
        assert_eq!(mv, Some((0, 0)));
    }

    #[test]
    fn test_takes_available_capture() {
        // One's point at (2,2) with the ring all but closed; two to move.
        // One has no counter-threat, so the offensive pick must be the
        // capturing move (2,3).
        let mut state = bot_state(5, 5);
        state.board = state
            .board
            .set(2, 2, active(Player::One))
            .set(1, 2, active(Player::Two))
            .set(3, 2, active(Player::Two))
            .set(2, 1, active(Player::Two));
        state.current_player = Player::Two;
        let mv = choose_move(&state, BotDifficulty::Neuro, BotOptions::default());
        assert_eq!(mv, Some((2, 3)));
    }

    #[test]
    fn test_defends_own_threatened_point() {
        // Two's point at (2,2) is one move away from being enclosed by
        // one. Two has no capture of its own, so the bot must block the
        // gap at (2,3).
        let mut state = bot_state(5, 5);
        state.board = state
            .board
            .set(2, 2, active(Player::Two))
            .set(1, 2, active(Player::One))
            .set(3, 2, active(Player::One))
            .set(2, 1, active(Player::One));
        state.current_player = Player::Two;
        let mv = choose_move(&state, BotDifficulty::Neuro, BotOptions::default());
        assert_eq!(mv, Some((2, 3)));
    }

    #[test]
    fn test_zero_budget_still_moves() {
        let state = bot_state(30, 30);
        let mv = choose_move(
            &state,
            BotDifficulty::Neuro,
            BotOptions { time_budget_ms: Some(0) },
        );
        assert!(mv.is_some());
    }

    #[test]
    fn test_prunes_to_neighborhood_of_activity() {
        // A lone point in a corner of a large board: the chosen move must
        // stay within the tier's pruning radius of it.
        let mut state = bot_state(20, 20);
        state = apply_move(&state, 2, 2); // one
        let mv = choose_move(&state, BotDifficulty::Neuro, BotOptions::default())
            .expect("moves exist");
        let radius = search_tier(state.settings.cell_count()).prune_radius;
        assert!(
            chebyshev(mv, (2, 2)) <= radius,
            "move {mv:?} outside pruning radius {radius}"
        );
    }

    #[test]
    fn test_territory_only_board_still_moves() {
        // Everything but one cell is two's territory; the empty cell and
        // the territory are all legal, and the bot must return something.
        let mut state = bot_state(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    state.board =
                        state.board.set(x, y, CellState::Territory { owner: Player::Two });
                }
            }
        }
        state.current_player = Player::Two;
        let mv = choose_move(&state, BotDifficulty::Neuro, BotOptions::default());
        assert!(mv.is_some());
    }
}

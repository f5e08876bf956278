//! 单层贪心策略：优先立即获胜，否则按格子权重打分。

use crate::game::moves::{generate_moves, has_moves};
use crate::game::{Board, Placement, Player};

use super::evaluator::{cell_weight, classify, WIN_SCORE};

/// 落子前按格子分类累加两个格子的权重。
pub fn placement_score(board: &Board, placement: Placement, mover: Player) -> i32 {
    placement
        .cells()
        .iter()
        .map(|&index| cell_weight(classify(board, index), mover))
        .sum()
}

/// 贪心选择及其得分，直接获胜记为 [`WIN_SCORE`]。
pub fn greedy_choice(board: &Board, player: Player) -> Option<(Placement, i32)> {
    let placements = generate_moves(board, player);

    let mut working = board.clone();
    for &placement in &placements {
        working.place(placement, player);
        let opponent_stuck = !has_moves(&working, player.opponent());
        working.clear(placement);
        if opponent_stuck {
            return Some((placement, WIN_SCORE));
        }
    }

    let mut best: Option<(Placement, i32)> = None;
    for placement in placements {
        let score = placement_score(board, placement, player);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((placement, score));
        }
    }
    best
}

pub fn pick_greedy(board: &Board, player: Player) -> Option<Placement> {
    greedy_choice(board, player).map(|(placement, _)| placement)
}

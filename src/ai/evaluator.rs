//! 格子分类与局面评估。

use serde::{Deserialize, Serialize};

use crate::game::moves::{generate_moves, has_moves};
use crate::game::{Board, Player};

pub const WIN_SCORE: i32 = 1000;

const OWN_ONLY_WEIGHT: i32 = -5;
const OPPONENT_ONLY_WEIGHT: i32 = 1;
const NEUTRAL_WEIGHT: i32 = 3;

/// 空格还能被哪个方向的骨牌覆盖。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CellClass {
    None,
    VerticalOnly,
    HorizontalOnly,
    Neutral,
}

pub fn classify(board: &Board, index: usize) -> CellClass {
    if !board.is_free(index) {
        return CellClass::None;
    }
    let size = board.size();
    let row = board.row(index);
    let col = board.col(index);

    let vertical = (row + 1 < size && board.is_free(index + size))
        || (row > 0 && board.is_free(index - size));
    let horizontal = (col + 1 < size && board.is_free(index + 1))
        || (col > 0 && board.is_free(index - 1));

    match (vertical, horizontal) {
        (true, true) => CellClass::Neutral,
        (true, false) => CellClass::VerticalOnly,
        (false, true) => CellClass::HorizontalOnly,
        (false, false) => CellClass::None,
    }
}

pub fn classify_all(board: &Board) -> Vec<CellClass> {
    (0..board.len()).map(|index| classify(board, index)).collect()
}

/// 落子方占用某类格子的权重：己方独占 -5，对方独占 +1，双方可用 +3。
pub fn cell_weight(class: CellClass, mover: Player) -> i32 {
    match (class, mover) {
        (CellClass::VerticalOnly, Player::Vertical)
        | (CellClass::HorizontalOnly, Player::Horizontal) => OWN_ONLY_WEIGHT,
        (CellClass::HorizontalOnly, Player::Vertical)
        | (CellClass::VerticalOnly, Player::Horizontal) => OPPONENT_ONLY_WEIGHT,
        (CellClass::Neutral, _) => NEUTRAL_WEIGHT,
        (CellClass::None, _) => 0,
    }
}

/// 以 `ai` 视角的静态评估。
pub fn evaluate(board: &Board, ai: Player) -> i32 {
    if !has_moves(board, ai.opponent()) {
        return WIN_SCORE;
    }

    let placements = generate_moves(board, ai);
    if placements.is_empty() {
        return -WIN_SCORE;
    }

    placements
        .iter()
        .flat_map(|placement| placement.cells())
        .map(|index| cell_weight(classify(board, index), ai))
        .sum()
}

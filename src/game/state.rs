use serde::{Deserialize, Serialize};

use super::moves;

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 10;

/// 玩家身份，同时也是其放置骨牌的方向。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Player {
    Vertical,
    Horizontal,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Vertical => Player::Horizontal,
            Player::Horizontal => Player::Vertical,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Player::Vertical)
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::Vertical
    }
}

impl std::str::FromStr for Player {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical" | "v" => Ok(Player::Vertical),
            "horizontal" | "h" => Ok(Player::Horizontal),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Vertical,
    Horizontal,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Vertical => Cell::Vertical,
            Player::Horizontal => Cell::Horizontal,
        }
    }
}

/// 一次落子占据的两个格子（行优先索引）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Placement {
    pub first: usize,
    pub second: usize,
}

impl Placement {
    pub fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    pub fn cells(&self) -> [usize; 2] {
        [self.first, self.second]
    }
}

impl From<(usize, usize)> for Placement {
    fn from((first, second): (usize, usize)) -> Self {
        Self::new(first, second)
    }
}

/// N×N 棋盘，按行优先存放在一维数组中。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    #[cfg(test)]
    pub(crate) fn with_occupied(size: usize, occupied: &[usize], owner: Player) -> Self {
        let mut board = Self::new(size);
        for &index in occupied {
            if index < board.cells.len() {
                board.cells[index] = owner.into();
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, index: usize) -> usize {
        index / self.size
    }

    pub fn col(&self, index: usize) -> usize {
        index % self.size
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_free(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(Cell::Empty))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell != Cell::Empty).count()
    }

    /// 标记落子的两个格子，不做合法性检查。
    pub fn place(&mut self, placement: Placement, player: Player) {
        let cell = Cell::from(player);
        self.cells[placement.first] = cell;
        self.cells[placement.second] = cell;
    }

    /// 撤销 [`Board::place`]。
    pub fn clear(&mut self, placement: Placement) {
        self.cells[placement.first] = Cell::Empty;
        self.cells[placement.second] = Cell::Empty;
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(IntegrityError::BoardSizeOutOfRange { size: self.size });
        }
        if self.cells.len() != self.size * self.size {
            return Err(IntegrityError::CellCountMismatch {
                expected: self.size * self.size,
                actual: self.cells.len(),
            });
        }
        Ok(())
    }
}

/// 对局的最终结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Player,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GamePhase {
    AwaitingPlacement { player: Player },
    GameOver { winner: Player },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    BoardSizeOutOfRange { size: usize },
    CellCountMismatch { expected: usize, actual: usize },
    OutcomeMismatch { side_to_move: Player, has_moves: bool },
    WinnerMismatch { expected: Player, actual: Player },
}

/// 游戏整体状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub vertical_remaining: u32,
    pub horizontal_remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// 新对局，竖方先行；剩余骨牌数 `N*N/2` 由双方平分，奇数的一块归横方。
    pub fn new(size: usize) -> Self {
        let total = (size * size / 2) as u32;
        let vertical_remaining = total / 2;
        Self {
            board: Board::new(size),
            current_player: Player::Vertical,
            vertical_remaining,
            horizontal_remaining: total - vertical_remaining,
            outcome: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome.map(|outcome| outcome.winner)
    }

    pub fn phase(&self) -> GamePhase {
        match self.outcome {
            Some(GameOutcome { winner }) => GamePhase::GameOver { winner },
            None => GamePhase::AwaitingPlacement {
                player: self.current_player,
            },
        }
    }

    pub fn remaining(&self, player: Player) -> u32 {
        match player {
            Player::Vertical => self.vertical_remaining,
            Player::Horizontal => self.horizontal_remaining,
        }
    }

    pub fn consume_piece(&mut self, player: Player) {
        match player {
            Player::Vertical => {
                self.vertical_remaining = self.vertical_remaining.saturating_sub(1)
            }
            Player::Horizontal => {
                self.horizontal_remaining = self.horizontal_remaining.saturating_sub(1)
            }
        }
    }

    pub fn switch_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    pub fn declare_victory(&mut self, winner: Player) -> GameOutcome {
        let outcome = GameOutcome { winner };
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
        outcome
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        self.board.integrity_check()?;
        let has_moves = moves::has_moves(&self.board, self.current_player);
        // 当且仅当行棋方无子可下时对局结束，胜者是刚落子的一方。
        if self.is_finished() == has_moves {
            return Err(IntegrityError::OutcomeMismatch {
                side_to_move: self.current_player,
                has_moves,
            });
        }
        if let Some(actual) = self.winner() {
            let expected = self.current_player.opponent();
            if actual != expected {
                return Err(IntegrityError::WinnerMismatch { expected, actual });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_splits_piece_counts() {
        let state = GameState::new(8);
        assert_eq!(state.vertical_remaining, 16);
        assert_eq!(state.horizontal_remaining, 16);

        let state = GameState::new(3);
        assert_eq!(state.vertical_remaining, 2);
        assert_eq!(state.horizontal_remaining, 2);

        let state = GameState::new(5);
        assert_eq!(state.vertical_remaining, 6);
        assert_eq!(state.horizontal_remaining, 6);

        let state = GameState::new(7);
        assert_eq!(state.vertical_remaining, 12);
        assert_eq!(state.horizontal_remaining, 12);
    }

    #[test]
    fn row_and_col_follow_row_major_layout() {
        let board = Board::new(4);
        assert_eq!(board.len(), 16);
        assert_eq!(board.row(7), 1);
        assert_eq!(board.col(7), 3);
        assert_eq!(board.row(12), 3);
        assert_eq!(board.col(12), 0);
    }

    #[test]
    fn place_then_clear_restores_board() {
        let mut board = Board::new(3);
        let before = board.clone();
        board.place(Placement::new(1, 4), Player::Vertical);
        assert_eq!(board.cell(1), Some(Cell::Vertical));
        assert_eq!(board.cell(4), Some(Cell::Vertical));
        assert_eq!(board.occupied_count(), 2);
        board.clear(Placement::new(1, 4));
        assert_eq!(board, before);
    }

    #[test]
    fn piece_counts_saturate_at_zero() {
        let mut state = GameState::new(3);
        for _ in 0..5 {
            state.consume_piece(Player::Vertical);
        }
        assert_eq!(state.vertical_remaining, 0);
        assert_eq!(state.horizontal_remaining, 2);
    }

    #[test]
    fn integrity_check_rejects_bad_states() {
        let mut state = GameState::new(4);
        assert!(state.integrity_check().is_ok());

        state.declare_victory(Player::Horizontal);
        assert!(matches!(
            state.integrity_check(),
            Err(IntegrityError::OutcomeMismatch { .. })
        ));

        let state = GameState::new(2);
        assert_eq!(
            state.integrity_check(),
            Err(IntegrityError::BoardSizeOutOfRange { size: 2 })
        );
    }

    #[test]
    fn integrity_check_requires_the_stuck_side_to_lose() {
        let mut state = GameState::new(3);
        state.board = Board::with_occupied(3, &[0, 1, 2, 3, 4, 5], Player::Horizontal);
        state.current_player = Player::Vertical;

        let mut stuck_side_wins = state.clone();
        stuck_side_wins.declare_victory(Player::Vertical);
        assert_eq!(
            stuck_side_wins.integrity_check(),
            Err(IntegrityError::WinnerMismatch {
                expected: Player::Horizontal,
                actual: Player::Vertical
            })
        );

        state.declare_victory(Player::Horizontal);
        assert_eq!(state.integrity_check(), Ok(()));
    }

    #[test]
    fn phase_tracks_outcome() {
        let mut state = GameState::new(3);
        assert_eq!(
            state.phase(),
            GamePhase::AwaitingPlacement {
                player: Player::Vertical
            }
        );
        state.declare_victory(Player::Vertical);
        state.declare_victory(Player::Horizontal);
        assert_eq!(
            state.phase(),
            GamePhase::GameOver {
                winner: Player::Vertical
            }
        );
    }
}

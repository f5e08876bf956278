//! 合法落子生成。

use super::state::{Board, Placement, Player};

/// 以 `index` 为锚点（竖方取上格，横方取左格）的落子，越界或被占时返回 `None`。
pub fn placement_at(board: &Board, index: usize, player: Player) -> Option<Placement> {
    if index >= board.len() {
        return None;
    }
    let size = board.size();
    let second = match player {
        Player::Vertical if board.row(index) + 1 < size => index + size,
        Player::Horizontal if board.col(index) + 1 < size => index + 1,
        _ => return None,
    };
    if board.is_free(index) && board.is_free(second) {
        Some(Placement::new(index, second))
    } else {
        None
    }
}

fn legal_placements(board: &Board, player: Player) -> impl Iterator<Item = Placement> + '_ {
    (0..board.len()).filter_map(move |index| placement_at(board, index, player))
}

/// 按锚点升序列出全部合法落子。
pub fn generate_moves(board: &Board, player: Player) -> Vec<Placement> {
    legal_placements(board, player).collect()
}

pub fn has_moves(board: &Board, player: Player) -> bool {
    legal_placements(board, player).next().is_some()
}

pub fn count_moves(board: &Board, player: Player) -> usize {
    legal_placements(board, player).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Cell;

    fn pairs(moves: &[Placement]) -> Vec<(usize, usize)> {
        moves.iter().map(|p| (p.first, p.second)).collect()
    }

    #[test]
    fn empty_three_by_three_vertical_moves() {
        let board = Board::new(3);
        let moves = generate_moves(&board, Player::Vertical);
        assert_eq!(
            pairs(&moves),
            vec![(0, 3), (1, 4), (2, 5), (3, 6), (4, 7), (5, 8)]
        );
    }

    #[test]
    fn horizontal_moves_never_wrap_rows() {
        let board = Board::new(3);
        let moves = generate_moves(&board, Player::Horizontal);
        assert_eq!(
            pairs(&moves),
            vec![(0, 1), (1, 2), (3, 4), (4, 5), (6, 7), (7, 8)]
        );
        assert!(placement_at(&board, 2, Player::Horizontal).is_none());
        assert!(placement_at(&board, 6, Player::Vertical).is_none());
    }

    #[test]
    fn top_rows_filled_leaves_room_for_one_horizontal_domino() {
        let mut board = Board::with_occupied(3, &[0, 1, 2, 3, 4, 5], Player::Vertical);
        assert!(generate_moves(&board, Player::Vertical).is_empty());
        assert!(!has_moves(&board, Player::Vertical));
        assert!(has_moves(&board, Player::Horizontal));

        let moves = generate_moves(&board, Player::Horizontal);
        assert_eq!(pairs(&moves), vec![(6, 7), (7, 8)]);

        // Both anchors overlap on cell 7, so only one domino ever fits.
        board.place(moves[0], Player::Horizontal);
        assert!(!has_moves(&board, Player::Horizontal));
    }

    #[test]
    fn out_of_range_anchor_is_rejected() {
        let board = Board::new(4);
        assert!(placement_at(&board, 16, Player::Vertical).is_none());
        assert!(placement_at(&board, 99, Player::Horizontal).is_none());
    }

    #[test]
    fn generated_moves_only_cover_free_cells() {
        let board = Board::with_occupied(5, &[0, 6, 7, 12, 18, 19, 24], Player::Horizontal);
        for player in [Player::Vertical, Player::Horizontal] {
            let moves = generate_moves(&board, player);
            assert_eq!(moves.len(), count_moves(&board, player));
            assert_eq!(moves.is_empty(), !has_moves(&board, player));
            for placement in moves {
                assert!(placement.second < board.len());
                assert_eq!(board.cell(placement.first), Some(Cell::Empty));
                assert_eq!(board.cell(placement.second), Some(Cell::Empty));
                match player {
                    Player::Vertical => assert_eq!(placement.second, placement.first + 5),
                    Player::Horizontal => {
                        assert_eq!(placement.second, placement.first + 1);
                        assert_eq!(board.row(placement.first), board.row(placement.second));
                    }
                }
            }
        }
    }
}

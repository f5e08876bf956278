use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::console_log;
use crate::game::moves::{generate_moves, has_moves};
use crate::game::{Board, Placement, Player};
use crate::utils::Stopwatch;

use super::evaluator::{evaluate, WIN_SCORE};
use super::greedy::greedy_choice;

pub const DEFAULT_DEPTH: u8 = 6;
/// 搜索深度上限，10×10 棋盘上更深的搜索会长时间阻塞浏览器主线程。
pub const MAX_DEPTH: u8 = 8;
pub const DEFAULT_REPLY_DELAY_MS: u32 = 500;
pub const DEFAULT_THINK_DELAY_MS: u32 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    Minimax,
    Greedy,
}

impl FromStr for AiMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "alphabeta" | "alpha-beta" => Ok(AiMode::Minimax),
            "greedy" | "heuristic" => Ok(AiMode::Greedy),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Normal,
    Hard,
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "normal" | "medium" => Ok(AiDifficulty::Normal),
            "hard" => Ok(AiDifficulty::Hard),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    pub mode: AiMode,
    pub depth: u8,
    /// AI 开始“思考”前的等待。
    pub reply_delay_ms: u32,
    /// 显示思考提示的时长。
    pub think_delay_ms: u32,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        let base = Self::default();
        match difficulty {
            AiDifficulty::Easy => Self {
                mode: AiMode::Greedy,
                depth: 1,
                ..base
            },
            AiDifficulty::Normal => Self { depth: 4, ..base },
            AiDifficulty::Hard => base,
        }
    }

    pub fn with_mode(mut self, mode: AiMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth.clamp(1, MAX_DEPTH);
        self
    }

    pub fn without_delays(mut self) -> Self {
        self.reply_delay_ms = 0;
        self.think_delay_ms = 0;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            mode: AiMode::Minimax,
            depth: DEFAULT_DEPTH,
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            think_delay_ms: DEFAULT_THINK_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    pub player: Player,
    /// minimax 模式下按竖方视角计分（竖方占优为正）；贪心模式下是该落子自身的得分。
    pub evaluation: i32,
    pub nodes: u64,
    pub duration_ms: u64,
    pub mode: AiMode,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub nodes: u64,
}

/// 终局分数，竖方视角。
fn win_for(player: Player) -> i32 {
    match player {
        Player::Vertical => WIN_SCORE,
        Player::Horizontal => -WIN_SCORE,
    }
}

fn leaf_score(board: &Board, ai: Player) -> i32 {
    let score = evaluate(board, ai);
    if ai.is_vertical() {
        score
    } else {
        -score
    }
}

/// 带 alpha-beta 剪枝的极小化极大搜索。
///
/// 分数始终以竖方视角给出：竖方取最大、横方取最小，`+1000` 为竖方必胜，`-1000` 为横方必胜。
/// 同分时保留生成顺序中的第一个落子；`board` 原地标记并在返回前复原。
pub fn minimax(
    board: &mut Board,
    depth: u8,
    to_move: Player,
    mut alpha: i32,
    mut beta: i32,
    ai: Player,
    stats: &mut SearchStats,
) -> (Option<Placement>, i32) {
    stats.nodes += 1;

    let placements = generate_moves(board, to_move);
    if depth == 0 || placements.is_empty() {
        return (None, leaf_score(board, ai));
    }

    let maximizing = to_move.is_vertical();
    let mut best_placement = None;
    let mut best_score = if maximizing { i32::MIN } else { i32::MAX };

    for placement in placements {
        board.place(placement, to_move);
        if !has_moves(board, to_move.opponent()) {
            board.clear(placement);
            return (Some(placement), win_for(to_move));
        }
        let (_, score) = minimax(
            board,
            depth - 1,
            to_move.opponent(),
            alpha,
            beta,
            ai,
            stats,
        );
        board.clear(placement);

        if maximizing {
            if score > best_score {
                best_score = score;
                best_placement = Some(placement);
            }
            alpha = alpha.max(best_score);
        } else {
            if score < best_score {
                best_score = score;
                best_placement = Some(placement);
            }
            beta = beta.min(best_score);
        }

        if beta <= alpha {
            break;
        }
    }

    (best_placement, best_score)
}

/// 在棋盘副本上以全窗口调用 [`minimax`]。
pub fn search(board: &Board, depth: u8, to_move: Player, ai: Player) -> (Option<Placement>, i32) {
    let mut working = board.clone();
    let mut stats = SearchStats::default();
    minimax(&mut working, depth, to_move, i32::MIN, i32::MAX, ai, &mut stats)
}

pub struct AiAgent {
    config: AiConfig,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 为行棋方 `ai` 选择落子。
    pub fn decide(&self, board: &Board, ai: Player) -> AiDecision {
        let stopwatch = Stopwatch::start();
        let mut stats = SearchStats::default();

        let (placement, evaluation) = match self.config.mode {
            AiMode::Minimax => {
                let mut working = board.clone();
                minimax(
                    &mut working,
                    self.config.depth.clamp(1, MAX_DEPTH),
                    ai,
                    i32::MIN,
                    i32::MAX,
                    ai,
                    &mut stats,
                )
            }
            AiMode::Greedy => {
                stats.nodes = 1;
                match greedy_choice(board, ai) {
                    Some((placement, score)) => (Some(placement), score),
                    None => (None, evaluate(board, ai)),
                }
            }
        };

        let decision = AiDecision {
            placement,
            player: ai,
            evaluation,
            nodes: stats.nodes,
            duration_ms: stopwatch.elapsed().as_millis() as u64,
            mode: self.config.mode,
        };

        console_log!(
            "AI is {:?}; best move {:?} (score {}, {} nodes, {} ms, {:?})",
            ai,
            decision.placement.map(|p| (p.first, p.second)),
            decision.evaluation,
            decision.nodes,
            decision.duration_ms,
            decision.mode,
        );

        decision
    }
}

impl Default for AiAgent {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

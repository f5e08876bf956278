//! AI 模块：格子分类评估、极小化极大搜索与贪心策略。

pub mod evaluator;
pub mod greedy;
pub mod minimax;

pub use evaluator::{cell_weight, classify, classify_all, evaluate, CellClass, WIN_SCORE};
pub use greedy::{greedy_choice, pick_greedy, placement_score};
pub use minimax::{
    minimax, search, AiAgent, AiConfig, AiDecision, AiDifficulty, AiMode, SearchStats,
    DEFAULT_DEPTH, MAX_DEPTH,
};

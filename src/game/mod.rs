//! 游戏核心逻辑模块（棋盘状态、走法生成、对局控制器与事件）。

pub mod events;
pub mod moves;
pub mod rules;
pub mod state;

pub use events::{GameEvent, GameObserver, NullObserver};
pub use moves::{count_moves, generate_moves, has_moves, placement_at};
pub use rules::{AiTicket, GameController, GameError, GameMode, TurnResolution};
pub use state::{
    Board,
    Cell,
    GameOutcome,
    GamePhase,
    GameState,
    IntegrityError,
    Placement,
    Player,
    MAX_BOARD_SIZE,
    MIN_BOARD_SIZE,
};

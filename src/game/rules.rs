use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::{AiAgent, AiConfig, AiDecision};
use crate::console_log;

use super::{
    events::{GameEvent, GameObserver, NullObserver},
    moves::{has_moves, placement_at},
    state::{GameState, IntegrityError, Placement, Player, MAX_BOARD_SIZE, MIN_BOARD_SIZE},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Single,
    Multi,
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "ai" | "1p" => Ok(GameMode::Single),
            "multi" | "local" | "2p" => Ok(GameMode::Multi),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum GameError {
    #[error("board size {size} is outside 3..=10")]
    InvalidBoardSize { size: usize },
    #[error("{player:?} cannot place a domino at cell {index}")]
    IllegalPlacement { index: usize, player: Player },
    #[error("the game is already over")]
    GameFinished,
    #[error("it is not the human player's turn")]
    NotPlayerTurn,
    #[error("no game in progress")]
    NoActiveGame,
    #[error("an AI move is already pending")]
    AiMovePending,
    #[error("it is not the AI's turn")]
    NotAiTurn,
    #[error("no AI move is pending for this game")]
    NoPendingAiTurn,
    #[error("state failed integrity check: {error:?}")]
    IntegrityViolation { error: IntegrityError },
}

/// 一次操作后的状态快照与事件，供前端一次性刷新。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResolution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<GameState>,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<AiDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
}

impl TurnResolution {
    pub fn new(state: Option<&GameState>, events: Vec<GameEvent>) -> Self {
        Self {
            winner: state.and_then(GameState::winner),
            state: state.cloned(),
            events,
            decision: None,
        }
    }

    pub fn with_decision(mut self, decision: AiDecision) -> Self {
        self.decision = Some(decision);
        self
    }
}

/// AI 回合的凭证，只对发放它的那一局有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTicket {
    game_id: u64,
}

struct Session {
    game_id: u64,
    mode: GameMode,
    human: Player,
    state: GameState,
    ai_pending: bool,
}

impl Session {
    fn ai_player(&self) -> Option<Player> {
        match self.mode {
            GameMode::Single => Some(self.human.opponent()),
            GameMode::Multi => None,
        }
    }

    fn is_ai_turn(&self) -> bool {
        !self.state.is_finished() && self.ai_player() == Some(self.state.current_player)
    }
}

/// 对局控制器：持有当前棋局、轮次与 AI 回合守卫。
pub struct GameController {
    agent: AiAgent,
    session: Option<Session>,
    next_game_id: u64,
    observer: Box<dyn GameObserver>,
}

impl GameController {
    pub fn new(config: AiConfig) -> Self {
        Self {
            agent: AiAgent::new(config),
            session: None,
            next_game_id: 0,
            observer: Box::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observer = observer;
    }

    pub fn ai_config(&self) -> &AiConfig {
        self.agent.config()
    }

    pub fn set_ai_config(&mut self, config: AiConfig) {
        self.agent = AiAgent::new(config);
    }

    pub fn state(&self) -> Option<&GameState> {
        self.session.as_ref().map(|session| &session.state)
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.session.as_ref().map(|session| session.mode)
    }

    pub fn human(&self) -> Option<Player> {
        self.session.as_ref().map(|session| session.human)
    }

    pub fn ai_player(&self) -> Option<Player> {
        self.session.as_ref().and_then(Session::ai_player)
    }

    pub fn is_ai_turn(&self) -> bool {
        self.session.as_ref().map_or(false, Session::is_ai_turn)
    }

    pub fn is_ai_pending(&self) -> bool {
        self.session.as_ref().map_or(false, |session| session.ai_pending)
    }

    pub fn start_game(
        &mut self,
        mode: GameMode,
        human: Player,
        board_size: usize,
    ) -> Result<Vec<GameEvent>, GameError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&board_size) {
            return Err(GameError::InvalidBoardSize { size: board_size });
        }

        let state = GameState::new(board_size);
        let events = vec![
            GameEvent::GameStarted { board_size, human },
            GameEvent::CountsChanged {
                vertical_remaining: state.vertical_remaining,
                horizontal_remaining: state.horizontal_remaining,
            },
            GameEvent::TurnChanged {
                player: state.current_player,
            },
        ];
        self.install(mode, human, state);
        console_log!("new {:?} game on a {board_size}x{board_size} board", mode);
        Ok(self.publish(events))
    }

    /// 从存档恢复对局，先做完整性检查。
    pub fn resume(
        &mut self,
        mode: GameMode,
        human: Player,
        state: GameState,
    ) -> Result<Vec<GameEvent>, GameError> {
        state
            .integrity_check()
            .map_err(|error| GameError::IntegrityViolation { error })?;

        let mut events = vec![
            GameEvent::CountsChanged {
                vertical_remaining: state.vertical_remaining,
                horizontal_remaining: state.horizontal_remaining,
            },
            GameEvent::TurnChanged {
                player: state.current_player,
            },
        ];
        if let Some(winner) = state.winner() {
            events.push(GameEvent::GameOver { winner });
        }
        self.install(mode, human, state);
        Ok(self.publish(events))
    }

    pub fn return_to_menu(&mut self) {
        self.session = None;
    }

    pub fn attempt_placement(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        if session.state.is_finished() {
            return Err(GameError::GameFinished);
        }
        if session.ai_pending || session.is_ai_turn() {
            return Err(GameError::NotPlayerTurn);
        }

        let player = session.state.current_player;
        let placement = placement_at(&session.state.board, index, player)
            .ok_or(GameError::IllegalPlacement { index, player })?;

        let mut events = Vec::new();
        apply_placement(&mut session.state, placement, player, &mut events);
        advance_turn(&mut session.state, &mut events);
        Ok(self.publish(events))
    }

    /// 占用 AI 回合；同一时间只允许一个待执行的 AI 回合。
    pub fn begin_ai_turn(&mut self) -> Result<(AiTicket, Vec<GameEvent>), GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        if session.state.is_finished() {
            return Err(GameError::GameFinished);
        }
        if session.ai_pending {
            return Err(GameError::AiMovePending);
        }
        if !session.is_ai_turn() {
            return Err(GameError::NotAiTurn);
        }

        session.ai_pending = true;
        let ticket = AiTicket {
            game_id: session.game_id,
        };
        Ok((ticket, self.publish(vec![GameEvent::AiThinkingStarted])))
    }

    pub fn finish_ai_turn(
        &mut self,
        ticket: AiTicket,
    ) -> Result<(AiDecision, Vec<GameEvent>), GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        if session.game_id != ticket.game_id || !session.ai_pending {
            return Err(GameError::NoPendingAiTurn);
        }
        session.ai_pending = false;

        let ai = session.state.current_player;
        let decision = self.agent.decide(&session.state.board, ai);
        let mut events = vec![GameEvent::AiThinkingEnded];

        match decision.placement {
            Some(placement) => {
                if placement_at(&session.state.board, placement.first, ai) != Some(placement) {
                    self.publish(events);
                    return Err(GameError::IllegalPlacement {
                        index: placement.first,
                        player: ai,
                    });
                }
                apply_placement(&mut session.state, placement, ai, &mut events);

                // 人类玩家可能已无子可下，交出回合前先判定。
                if !has_moves(&session.state.board, ai.opponent()) {
                    session.state.switch_turn();
                    events.push(GameEvent::TurnChanged {
                        player: session.state.current_player,
                    });
                    declare_winner(&mut session.state, ai, &mut events);
                } else {
                    advance_turn(&mut session.state, &mut events);
                }
            }
            None => declare_winner(&mut session.state, session.human, &mut events),
        }

        Ok((decision, self.publish(events)))
    }

    pub fn play_ai_turn(&mut self) -> Result<(AiDecision, Vec<GameEvent>), GameError> {
        let (ticket, mut events) = self.begin_ai_turn()?;
        let (decision, mut applied) = self.finish_ai_turn(ticket)?;
        events.append(&mut applied);
        Ok((decision, events))
    }

    fn install(&mut self, mode: GameMode, human: Player, state: GameState) {
        self.next_game_id += 1;
        self.session = Some(Session {
            game_id: self.next_game_id,
            mode,
            human,
            state,
            ai_pending: false,
        });
    }

    fn publish(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            self.observer.on_event(event);
        }
        events
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

fn apply_placement(
    state: &mut GameState,
    placement: Placement,
    player: Player,
    events: &mut Vec<GameEvent>,
) {
    state.board.place(placement, player);
    state.consume_piece(player);
    events.push(GameEvent::PlacementApplied { player, placement });
    events.push(GameEvent::CountsChanged {
        vertical_remaining: state.vertical_remaining,
        horizontal_remaining: state.horizontal_remaining,
    });
}

/// 交换行棋方，无子可下的一方立即判负。
fn advance_turn(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.switch_turn();
    let next = state.current_player;
    events.push(GameEvent::TurnChanged { player: next });
    if !has_moves(&state.board, next) {
        declare_winner(state, next.opponent(), events);
    }
}

fn declare_winner(state: &mut GameState, winner: Player, events: &mut Vec<GameEvent>) {
    state.declare_victory(winner);
    console_log!("{:?} wins", winner);
    events.push(GameEvent::GameOver { winner });
}

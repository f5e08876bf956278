pub mod ai;
pub mod game;
pub mod utils;

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Function, Promise};

pub use ai::{
    AiAgent, AiConfig, AiDecision, AiDifficulty, AiMode, CellClass, SearchStats, DEFAULT_DEPTH,
    MAX_DEPTH, WIN_SCORE,
};
pub use game::{
    AiTicket, Board, Cell, GameController, GameError, GameEvent, GameMode, GameObserver,
    GameOutcome, GamePhase, GameState, IntegrityError, NullObserver, Placement, Player,
    TurnResolution,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: GameError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_player(value: &str) -> Result<Player, JsValue> {
    Player::from_str(value).map_err(|_| JsValue::from_str(&format!("unknown player: {value}")))
}

fn parse_mode(value: &str) -> Result<GameMode, JsValue> {
    GameMode::from_str(value).map_err(|_| JsValue::from_str(&format!("unknown game mode: {value}")))
}

/// 解析 JSON 状态，并保证棋盘形状可以安全索引。
fn parse_state(state_json: &str) -> Result<GameState, JsValue> {
    let state: GameState = serde_json::from_str(state_json).map_err(serde_to_js_error)?;
    state
        .board
        .integrity_check()
        .map_err(|error| to_js_error(GameError::IntegrityViolation { error }))?;
    Ok(state)
}

/// `mode` 可以是 AI 模式名或难度名，无法识别时使用默认配置。
fn build_config(mode: Option<String>, depth: Option<u8>) -> AiConfig {
    let mut config = AiConfig::default();
    if let Some(value) = mode.as_deref() {
        if let Ok(mode) = AiMode::from_str(value) {
            config = config.with_mode(mode);
        } else if let Ok(difficulty) = AiDifficulty::from_str(value) {
            config = AiConfig::from_difficulty(difficulty);
        }
    }
    if let Some(depth) = depth {
        config = config.with_depth(depth);
    }
    config
}

fn notify(callback: Option<&Function>, events: &[GameEvent]) {
    let Some(callback) = callback else {
        return;
    };
    for event in events {
        match to_value(event) {
            Ok(value) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                    console_log!("onEvent callback threw: {:?}", err);
                }
            }
            Err(err) => console_log!("failed to serialize event: {err}"),
        }
    }
}

fn resolution_value(resolution: &TurnResolution) -> Result<JsValue, JsValue> {
    to_value(resolution).map_err(JsValue::from)
}

/// 浏览器侧的对局句柄；事件在释放借用后才回调 `onEvent`，回调中可以再次调用引擎。
#[wasm_bindgen]
pub struct GameEngine {
    controller: Rc<RefCell<GameController>>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(ai_mode: Option<String>, depth: Option<u8>, on_event: Option<Function>) -> GameEngine {
        let controller = GameController::new(build_config(ai_mode, depth));
        GameEngine {
            controller: Rc::new(RefCell::new(controller)),
            on_event,
        }
    }

    #[wasm_bindgen(js_name = "startGame")]
    pub fn start_game(&self, mode: &str, human: &str, board_size: usize) -> Result<JsValue, JsValue> {
        let mode = parse_mode(mode)?;
        let human = parse_player(human)?;
        let resolution = {
            let mut controller = self.controller.borrow_mut();
            let events = controller
                .start_game(mode, human, board_size)
                .map_err(to_js_error)?;
            TurnResolution::new(controller.state(), events)
        };
        notify(self.on_event.as_ref(), &resolution.events);
        resolution_value(&resolution)
    }

    /// 从 JSON 恢复一局棋，状态需通过完整性检查。
    #[wasm_bindgen(js_name = "loadStateJson")]
    pub fn load_state_json(&self, mode: &str, human: &str, json: &str) -> Result<JsValue, JsValue> {
        let mode = parse_mode(mode)?;
        let human = parse_player(human)?;
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        let resolution = {
            let mut controller = self.controller.borrow_mut();
            let events = controller
                .resume(mode, human, state)
                .map_err(to_js_error)?;
            TurnResolution::new(controller.state(), events)
        };
        notify(self.on_event.as_ref(), &resolution.events);
        resolution_value(&resolution)
    }

    #[wasm_bindgen(js_name = "attemptPlacement")]
    pub fn attempt_placement(&self, index: usize) -> Result<JsValue, JsValue> {
        let resolution = {
            let mut controller = self.controller.borrow_mut();
            let events = controller.attempt_placement(index).map_err(to_js_error)?;
            TurnResolution::new(controller.state(), events)
        };
        notify(self.on_event.as_ref(), &resolution.events);
        resolution_value(&resolution)
    }

    #[wasm_bindgen(js_name = "isAiTurn")]
    pub fn is_ai_turn(&self) -> bool {
        self.controller.borrow().is_ai_turn()
    }

    #[wasm_bindgen(js_name = "isAiPending")]
    pub fn is_ai_pending(&self) -> bool {
        self.controller.borrow().is_ai_pending()
    }

    /// 延迟后执行 AI 回合；已有待执行回合、重新开局或返回菜单时 Promise 被拒绝。
    #[wasm_bindgen(js_name = "playAiTurn")]
    pub fn play_ai_turn(&self) -> Promise {
        // 异步部分要到下一个微任务才执行，先同步占用回合。
        let begun = self.controller.borrow_mut().begin_ai_turn();
        let (ticket, mut events) = match begun {
            Ok(begun) => begun,
            Err(error) => return Promise::reject(&to_js_error(error)),
        };
        let config = self.controller.borrow().ai_config().clone();
        notify(self.on_event.as_ref(), &events);

        let controller = Rc::clone(&self.controller);
        let on_event = self.on_event.clone();

        future_to_promise(async move {
            if config.reply_delay_ms > 0 {
                TimeoutFuture::new(config.reply_delay_ms).await;
            }
            if config.think_delay_ms > 0 {
                TimeoutFuture::new(config.think_delay_ms).await;
            }

            let finished = controller.borrow_mut().finish_ai_turn(ticket);
            let (decision, applied) = finished.map_err(to_js_error)?;
            let state = controller.borrow().state().cloned();
            notify(on_event.as_ref(), &applied);

            events.extend(applied);
            let resolution = TurnResolution::new(state.as_ref(), events).with_decision(decision);
            resolution_value(&resolution)
        })
    }

    #[wasm_bindgen(js_name = "stateJson")]
    pub fn state_json(&self) -> Result<Option<String>, JsValue> {
        self.controller
            .borrow()
            .state()
            .map(|state| serde_json::to_string(state).map_err(serde_to_js_error))
            .transpose()
    }

    #[wasm_bindgen(js_name = "returnToMenu")]
    pub fn return_to_menu(&self) {
        self.controller.borrow_mut().return_to_menu();
    }
}

/// 列出某一方在给定局面下的全部合法落子。
#[wasm_bindgen(js_name = "generateMoves")]
pub fn generate_moves(state_json: &str, player: &str) -> Result<JsValue, JsValue> {
    let state = parse_state(state_json)?;
    let player = parse_player(player)?;
    to_value(&game::generate_moves(&state.board, player)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "classifyCells")]
pub fn classify_cells(state_json: &str) -> Result<JsValue, JsValue> {
    let state = parse_state(state_json)?;
    to_value(&ai::classify_all(&state.board)).map_err(JsValue::from)
}

/// 无状态地计算一步 AI 落子，不修改传入的局面。
#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    state_json: &str,
    ai_player: &str,
    mode: Option<String>,
    depth: Option<u8>,
) -> Result<JsValue, JsValue> {
    let state = parse_state(state_json)?;
    let ai_player = parse_player(ai_player)?;
    let agent = AiAgent::new(build_config(mode, depth));
    let decision = agent.decide(&state.board, ai_player);
    to_value(&decision).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state_json: &str) -> Result<(), JsValue> {
    let state: GameState = serde_json::from_str(state_json).map_err(serde_to_js_error)?;
    state
        .integrity_check()
        .map_err(|error| to_js_error(GameError::IntegrityViolation { error }))?;
    Ok(())
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accepts_modes_and_difficulties() {
        assert_eq!(build_config(None, None), AiConfig::default());
        assert_eq!(build_config(Some("greedy".into()), None).mode, AiMode::Greedy);
        assert_eq!(
            build_config(Some("easy".into()), None),
            AiConfig::from_difficulty(AiDifficulty::Easy)
        );
        let config = build_config(Some("alpha-beta".into()), Some(3));
        assert_eq!((config.mode, config.depth), (AiMode::Minimax, 3));
        assert_eq!(build_config(Some("nonsense".into()), Some(0)).depth, 1);
        assert_eq!(build_config(None, Some(255)).depth, MAX_DEPTH);
    }
}

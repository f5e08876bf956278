use serde::{Deserialize, Serialize};

use super::state::{Placement, Player};

/// 对局过程中产生的事件流，UI 通过它们刷新界面。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    GameStarted {
        board_size: usize,
        human: Player,
    },
    PlacementApplied {
        player: Player,
        placement: Placement,
    },
    CountsChanged {
        vertical_remaining: u32,
        horizontal_remaining: u32,
    },
    TurnChanged {
        player: Player,
    },
    AiThinkingStarted,
    AiThinkingEnded,
    GameOver {
        winner: Player,
    },
}

/// 控制器通知的监听者；`on_event` 默认分发到各个回调，覆盖它可直接接收事件流。
pub trait GameObserver {
    fn on_game_started(&mut self, _board_size: usize, _human: Player) {}

    fn on_placement(&mut self, _player: Player, _placement: Placement) {}

    fn on_counts_changed(&mut self, _vertical_remaining: u32, _horizontal_remaining: u32) {}

    fn on_turn_changed(&mut self, _player: Player) {}

    fn on_ai_thinking_started(&mut self) {}

    fn on_ai_thinking_ended(&mut self) {}

    fn on_game_over(&mut self, _winner: Player) {}

    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::GameStarted { board_size, human } => self.on_game_started(board_size, human),
            GameEvent::PlacementApplied { player, placement } => {
                self.on_placement(player, placement)
            }
            GameEvent::CountsChanged {
                vertical_remaining,
                horizontal_remaining,
            } => self.on_counts_changed(vertical_remaining, horizontal_remaining),
            GameEvent::TurnChanged { player } => self.on_turn_changed(player),
            GameEvent::AiThinkingStarted => self.on_ai_thinking_started(),
            GameEvent::AiThinkingEnded => self.on_ai_thinking_ended(),
            GameEvent::GameOver { winner } => self.on_game_over(winner),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        turns: Vec<Player>,
        counts: Option<(u32, u32)>,
        thinking: i32,
        winner: Option<Player>,
    }

    impl GameObserver for Tally {
        fn on_turn_changed(&mut self, player: Player) {
            self.turns.push(player);
        }

        fn on_counts_changed(&mut self, vertical_remaining: u32, horizontal_remaining: u32) {
            self.counts = Some((vertical_remaining, horizontal_remaining));
        }

        fn on_ai_thinking_started(&mut self) {
            self.thinking += 1;
        }

        fn on_ai_thinking_ended(&mut self) {
            self.thinking -= 1;
        }

        fn on_game_over(&mut self, winner: Player) {
            self.winner = Some(winner);
        }
    }

    #[test]
    fn on_event_dispatches_to_typed_callbacks() {
        let mut tally = Tally::default();
        let events = [
            GameEvent::TurnChanged {
                player: Player::Horizontal,
            },
            GameEvent::CountsChanged {
                vertical_remaining: 3,
                horizontal_remaining: 4,
            },
            GameEvent::AiThinkingStarted,
            GameEvent::AiThinkingEnded,
            GameEvent::PlacementApplied {
                player: Player::Vertical,
                placement: Placement::new(0, 3),
            },
            GameEvent::GameOver {
                winner: Player::Vertical,
            },
        ];
        for event in &events {
            tally.on_event(event);
        }
        assert_eq!(tally.turns, vec![Player::Horizontal]);
        assert_eq!(tally.counts, Some((3, 4)));
        assert_eq!(tally.thinking, 0);
        assert_eq!(tally.winner, Some(Player::Vertical));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&GameEvent::TurnChanged {
            player: Player::Vertical,
        })
        .expect("event should serialize");
        assert_eq!(json, r#"{"type":"TurnChanged","player":"Vertical"}"#);
    }
}

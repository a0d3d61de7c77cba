use warfront_protocol::{PlayerId, Tick};

use crate::execution::Execution;
use crate::game::Game;

/// Displays an emoji reaction. Senders that rate-limit their emojis
/// track their own cooldowns.
pub struct EmojiExecution {
    player: PlayerId,
    recipient: PlayerId,
    emoji: u16,
    active: bool,
}

impl EmojiExecution {
    pub fn new(player: PlayerId, recipient: PlayerId, emoji: u16) -> Self {
        Self {
            player,
            recipient,
            emoji,
            active: true,
        }
    }
}

impl Execution for EmojiExecution {
    fn init(&mut self, game: &mut Game, _tick: Tick) {
        self.active = false;
        if game.player(self.recipient).is_none() || game.player(self.player).is_none() {
            return;
        }
        game.push_event(crate::game::GameEvent::Emoji {
            sender: self.player,
            recipient: self.recipient,
            emoji: self.emoji,
        });
    }

    fn tick(&mut self, _game: &mut Game, _tick: Tick) {}

    fn owner(&self) -> PlayerId {
        self.player
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

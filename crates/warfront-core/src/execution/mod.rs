//! Tick-driven executions. Every long-running effect in the game is an
//! execution: attacks, boat transports, AI drivers, delayed chat
//! responses. The engine calls `init` exactly once on the tick after an
//! execution was added, then `tick` every tick until `is_active` turns
//! false.

use warfront_protocol::{Intent, PlayerId, PlayerType, Tick};

use crate::game::Game;

mod attack;
mod bot;
mod chat_response;
mod donate;
mod emoji;
mod nation;
mod spawn;
mod transport;

pub use attack::AttackExecution;
pub use bot::BotExecution;
pub use chat_response::NationChatResponseExecution;
pub use donate::{DonateGoldExecution, DonateTroopsExecution};
pub use emoji::EmojiExecution;
pub use nation::NationExecution;
pub use spawn::SpawnExecution;
pub use transport::TransportExecution;

pub trait Execution: Send {
    /// Runs once, on the first tick this execution is scheduled for.
    fn init(&mut self, game: &mut Game, tick: Tick);

    fn tick(&mut self, game: &mut Game, tick: Tick);

    fn owner(&self) -> PlayerId;

    /// The engine drops the execution once this returns false.
    fn is_active(&self) -> bool;

    fn active_during_spawn_phase(&self) -> bool {
        false
    }
}

/// Translates a validated intent into zero or more executions.
/// Intents with immediate effect (diplomacy, targeting) mutate the game
/// directly and return nothing.
pub fn spawn_executions_for_intent(game: &mut Game, intent: &Intent) -> Vec<Box<dyn Execution>> {
    match intent.clone() {
        Intent::Spawn { player, tile } => vec![Box::new(SpawnExecution::new(player, tile))],
        Intent::Attack {
            player,
            target,
            troops,
        } => vec![Box::new(AttackExecution::new(player, target, troops))],
        Intent::BoatAttack {
            player,
            target,
            destination,
            troops,
        } => vec![Box::new(TransportExecution::new(
            player,
            target,
            destination,
            troops,
        ))],
        Intent::DonateGold {
            player,
            recipient,
            amount,
        } => vec![Box::new(DonateGoldExecution::new(player, recipient, amount))],
        Intent::DonateTroops {
            player,
            recipient,
            troops,
        } => vec![Box::new(DonateTroopsExecution::new(player, recipient, troops))],
        Intent::Emoji {
            player,
            recipient,
            emoji,
        } => vec![Box::new(EmojiExecution::new(player, recipient, emoji))],
        Intent::QuickChat {
            player,
            recipient,
            key,
            target,
        } => {
            game.push_event(crate::game::GameEvent::Chat {
                sender: player,
                recipient,
                key: key.clone(),
                target,
            });
            let is_nation = game
                .player(recipient)
                .map(|p| p.player_type() == PlayerType::Nation)
                .unwrap_or(false);
            if is_nation {
                vec![Box::new(NationChatResponseExecution::new(
                    recipient, player, key, target,
                ))]
            } else {
                Vec::new()
            }
        }
        Intent::MarkTarget { player, target } => {
            if let Some(p) = game.player_mut(player) {
                p.add_target(target);
            }
            Vec::new()
        }
        Intent::AllianceRequest { player, recipient } => {
            game.request_alliance(player, recipient);
            Vec::new()
        }
        Intent::AllianceReply {
            player,
            requestor,
            accept,
        } => {
            game.reply_alliance(requestor, player, accept);
            Vec::new()
        }
        Intent::BreakAlliance { player, target } => {
            game.break_alliance(player, target);
            Vec::new()
        }
    }
}

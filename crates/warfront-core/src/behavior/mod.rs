//! AI decision layer. Behaviors are pure decision-makers owned by the
//! per-AI driver executions; they read the game, roll the shared match
//! RNG, and queue intents or executions. They never mutate territory
//! directly.

mod attack;
mod chat;

pub use attack::AttackBehavior;
pub use chat::ChatBehavior;

/// Emoji table indices shared by the AI vocabularies.
pub mod emoji {
    pub const THUMBS_UP: u16 = 0;
    pub const THUMBS_DOWN: u16 = 1;
    pub const ANGRY: u16 = 2;
    pub const SKULL: u16 = 3;
    pub const HEART: u16 = 4;
    pub const SHRUG: u16 = 5;
    pub const HOURGLASS: u16 = 6;
    pub const SHIELD: u16 = 7;
    pub const WARNING: u16 = 8;
    pub const SCREAM: u16 = 9;
    pub const SOS: u16 = 10;
    pub const WHITE_FLAG: u16 = 11;
    pub const DOVE: u16 = 12;
    pub const YAWN: u16 = 13;
    pub const FACEPALM: u16 = 14;
    pub const PLEADING: u16 = 15;
    pub const TARGET: u16 = 16;
    pub const FIRE: u16 = 17;
    pub const HANDSHAKE: u16 = 18;
    pub const MUSCLE: u16 = 19;
    pub const CLOWN: u16 = 20;
    pub const SAILBOAT: u16 = 21;

    /// Sent to players who attack a nation.
    pub const HECKLE: &[u16] = &[CLOWN, ANGRY];
    /// Granted help or an accepted alliance.
    pub const ACCEPT: &[u16] = &[THUMBS_UP, HANDSHAKE, MUSCLE, HEART];
    /// Granted attack request.
    pub const ATTACK_ACCEPT: &[u16] = &[TARGET, FIRE, SKULL];
    /// Accepted an assist call.
    pub const ASSIST_ACCEPT: &[u16] = &[THUMBS_UP, SAILBOAT, HANDSHAKE, TARGET];
    /// Assist refusals, by reason.
    pub const RELATION_TOO_LOW: &[u16] = &[YAWN, FACEPALM];
    pub const TARGET_ME: &[u16] = &[PLEADING, SKULL];
    pub const TARGET_ALLY: &[u16] = &[DOVE, THUMBS_DOWN];
    pub const BUSY: &[u16] = &[HOURGLASS, SHIELD, WARNING];
    pub const TOO_STRONG: &[u16] = &[SCREAM, SKULL, SOS];
    pub const LOW_TROOPS: &[u16] = &[WHITE_FLAG, PLEADING];
    /// Failed the chance roll.
    pub const REJECT: &[u16] = &[YAWN, SHRUG];
    /// Chat-request refusals, by the nation's disposition.
    pub const REJECT_HOSTILE: &[u16] = &[THUMBS_DOWN, ANGRY, SKULL];
    pub const REJECT_NEUTRAL: &[u16] = &[YAWN, SHRUG, FACEPALM];
    pub const REJECT_BUSY: &[u16] = &[HOURGLASS, SHIELD, WARNING];
}

use serde::{Deserialize, Serialize};

use crate::{Gold, PlayerId, TileRef, Troops};

/// All possible player-submitted actions. Fully serializable.
///
/// An intent is immutable once queued; the scheduler preserves arrival order
/// within a turn. `Attack { target: None }` attacks unclaimed land
/// (terra nullius).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Spawn-phase placement request.
    Spawn { player: PlayerId, tile: TileRef },

    /// Land attack against a player or unclaimed land.
    Attack {
        player: PlayerId,
        target: Option<PlayerId>,
        troops: Troops,
    },

    /// Boat attack landing at a destination shore tile.
    BoatAttack {
        player: PlayerId,
        target: PlayerId,
        destination: TileRef,
        troops: Troops,
    },

    DonateGold {
        player: PlayerId,
        recipient: PlayerId,
        amount: Gold,
    },

    DonateTroops {
        player: PlayerId,
        recipient: PlayerId,
        troops: Troops,
    },

    /// Emoji reaction shown to a recipient (index into the emoji table).
    Emoji {
        player: PlayerId,
        recipient: PlayerId,
        emoji: u16,
    },

    /// Quick-chat request to an AI nation ("help.troops", "help.gold",
    /// "attack.attack"). `target` carries the attack target, if any.
    QuickChat {
        player: PlayerId,
        recipient: PlayerId,
        key: String,
        target: Option<PlayerId>,
    },

    /// Mark a player as a priority target (allies may assist).
    MarkTarget { player: PlayerId, target: PlayerId },

    AllianceRequest {
        player: PlayerId,
        recipient: PlayerId,
    },

    AllianceReply {
        player: PlayerId,
        requestor: PlayerId,
        accept: bool,
    },

    BreakAlliance {
        player: PlayerId,
        target: PlayerId,
    },
}

impl Intent {
    /// The player who issued this intent.
    pub fn issuer(&self) -> PlayerId {
        match self {
            Intent::Spawn { player, .. }
            | Intent::Attack { player, .. }
            | Intent::BoatAttack { player, .. }
            | Intent::DonateGold { player, .. }
            | Intent::DonateTroops { player, .. }
            | Intent::Emoji { player, .. }
            | Intent::QuickChat { player, .. }
            | Intent::MarkTarget { player, .. }
            | Intent::AllianceRequest { player, .. }
            | Intent::AllianceReply { player, .. }
            | Intent::BreakAlliance { player, .. } => *player,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Game IDs are strings minted by the lobby (stable across rejoin/replay).
pub type GameId = String;

/// Client IDs identify a connected human client; bots and nations have none.
pub type ClientId = String;

/// Player ID is a stable integer assigned at player creation.
///
/// Humans get low sequential ids from the session; AI players draw ids from
/// the seeded PRNG so replays mint the same ids. Used as the ordering and
/// map key everywhere — never compare players by pointer identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Deterministic, stable hash of a string identifier (FNV-1a 64-bit).
///
/// Used to derive PRNG seeds from game ids so every client seeds the same
/// stream from the same lobby.
pub fn simple_hash(s: &str) -> u64 {
    crate::wire::hash_bytes_fnv1a64(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_hash_is_stable() {
        let a = simple_hash("game-abc123");
        let b = simple_hash("game-abc123");
        assert_eq!(a, b);
        assert_ne!(a, simple_hash("game-abc124"));
    }
}

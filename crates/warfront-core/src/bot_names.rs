//! Name pools for spawned bots.

pub const BOT_NAMES: &[&str] = &[
    "Aldoria", "Belmont", "Caldera", "Drakmoor", "Eastmarch", "Fenwick",
    "Galdren", "Hollowvale", "Ironridge", "Jorvik", "Kestrel", "Larkspur",
    "Midgard", "Northwind", "Oakhaven", "Pendrell", "Quillon", "Ravenholm",
    "Stormgate", "Thornfield", "Umberland", "Vexmark", "Westfall", "Yarrow",
    "Zephyria", "Ashford", "Briarwood", "Coldspring", "Dunmore", "Elderglen",
    "Frostholm", "Greymoor", "Highcliff", "Ivoryport", "Juniper", "Kingsreach",
    "Lowmarsh", "Mistral", "Nightvale", "Oxbow", "Palemount", "Quarryton",
    "Redmane", "Saltmere", "Tidewater", "Underhill", "Volkmar", "Wintermoor",
    "Yewbranch", "Zenith",
];

/// Rare flavor names. Drawing one does not consume the shuffled main
/// pool, so the main sequence stays aligned across clients.
pub const SPECIAL_NAMES: &[&str] = &[
    "The Remnant",
    "Last Bastion",
    "Free Company",
    "The Exiles",
    "Old Guard",
    "Silent Order",
    "The Forgotten",
    "Iron Pact",
    "The Wardens",
    "Broken Crown",
];

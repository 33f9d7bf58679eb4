//! Game logic layer machinery.

/// Character hitbox size as a fraction of tile size.
pub const CHARACTER_EXTENT: f32 = 0.8;

/// Item hitbox size as a fraction of tile size.
pub const ITEM_EXTENT: f32 = 0.6;

/// How close a foe must be, in taxicab steps, for AI to go after it.
pub const FOE_ALERT_RADIUS: i32 = 5;

/// How close an ally must be for AI to drift towards it.
pub const ALLY_GATHER_RADIUS: i32 = 3;

/// Maximum number of enemies, one for each free corner of the map.
pub const MAX_ENEMIES: usize = 3;

mod ai;
pub use ai::{should_drop_bomb, think, Arena, Brain};

mod bomb;
pub use bomb::{Bomb, Bombs, ChainRule, Detonation};

mod config;
pub use config::Config;

mod explosion;
pub use explosion::{Explosions, Segment, SegmentKind};

mod item;
pub use item::{Item, ItemKind, Items};

mod mapgen;
pub use mapgen::SafeZone;

mod mob;
pub use mob::{Character, CharacterId, Dir, Movement, Role};

mod msg;
pub use msg::Msg;

mod pathing;
pub use pathing::{find_escape_route, find_path, is_danger_zone};

pub mod prelude;

mod runtime;
pub use runtime::{Input, Runtime};

mod terrain;
pub use terrain::Terrain;

mod tile;
pub use tile::Tile;

mod time;
pub use time::Timer;

pub type Result<T> = anyhow::Result<T>;

/// How a round is going.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Debug,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ScenarioStatus {
    #[default]
    Ongoing,
    Won,
    Lost,
}

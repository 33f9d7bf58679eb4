pub use crate::{
    Bomb, Bombs, Character, CharacterId, Config, Dir, Explosions, Input,
    ItemKind, Items, Msg, Result, Role, Runtime, ScenarioStatus, Terrain,
    Tile, Timer,
};
pub use glam::{ivec2, vec2, IVec2, Vec2};
pub use util::{GameRng, IndexMap, VecExt, DIR_4};

use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, ChainRule, MAX_ENEMIES};

/// Tunable game data for a round.
///
/// Durations are given in milliseconds in the data and converted to seconds
/// by the accessor methods, the engine uses seconds everywhere.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Tile edge length in world units.
    pub tile_size: u32,
    /// Chance of a destructible block on each free cell.
    pub block_density: f32,
    /// Taxicab radius of the block-free area around spawn points.
    pub safe_zone_radius: i32,
    pub enemy_count: usize,

    pub bomb_fuse_ms: f32,
    pub explosion_duration_ms: f32,
    pub initial_bombs: usize,
    pub initial_range: i32,
    pub chain_rule: ChainRule,

    pub item_lifetime_ms: f32,
    /// Relative weights of item drops, the `none` entry is the weight of not
    /// dropping anything.
    pub item_drop_rates: IndexMap<ItemKind, f32>,
    /// Speed multiplier from a speed up item.
    pub speed_up_factor: f32,

    /// Base movement speed in tiles per second.
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub ai_speed_multiplier: f32,
    pub ai_bomb_cooldown_ms: f32,
    /// Chance an enemy drops a bomb when it wouldn't hit anything.
    pub ai_bomb_chance: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grid_width: 15,
            grid_height: 13,
            tile_size: 40,
            block_density: 0.7,
            safe_zone_radius: 2,
            enemy_count: 3,

            bomb_fuse_ms: 3000.0,
            explosion_duration_ms: 500.0,
            initial_bombs: 1,
            initial_range: 2,
            chain_rule: ChainRule::Stop,

            item_lifetime_ms: 10000.0,
            item_drop_rates: [
                (ItemKind::None, 0.6),
                (ItemKind::BombCountUp, 0.15),
                (ItemKind::BlastRangeUp, 0.15),
                (ItemKind::SpeedUp, 0.1),
            ]
            .into_iter()
            .collect(),
            speed_up_factor: 1.1,

            player_speed: 4.0,
            enemy_speed: 4.0,
            ai_speed_multiplier: 0.75,
            ai_bomb_cooldown_ms: 2000.0,
            ai_bomb_chance: 0.1,
        }
    }
}

impl Config {
    /// Parse config from IDM data.
    pub fn from_idm(s: &str) -> Result<Self> {
        let ret: Config = idm::from_str(s).context("invalid IDM config")?;
        Ok(ret)
    }

    /// Parse config from JSON data.
    pub fn from_json(s: &str) -> Result<Self> {
        let ret: Config =
            serde_json::from_str(s).context("invalid JSON config")?;
        Ok(ret)
    }

    /// Load config from a file, JSON if the extension says so and IDM
    /// otherwise.
    ///
    /// The loaded config is validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        let ret = if path.extension().is_some_and(|e| e == "json") {
            Config::from_json(&text)?
        } else {
            Config::from_idm(&text)?
        };
        ret.validate()
            .with_context(|| format!("bad config in {}", path.display()))?;
        Ok(ret)
    }

    /// Check that the values make up a playable round.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= 5 && self.grid_height >= 5,
            "grid must be at least 5x5, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width % 2 == 1 && self.grid_height % 2 == 1,
            "grid dimensions must be odd to fit the pillar lattice"
        );
        ensure!(self.tile_size > 0, "tile size must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.block_density),
            "block density must be between 0 and 1"
        );
        ensure!(self.safe_zone_radius >= 0, "negative safe zone radius");
        ensure!(
            self.enemy_count <= MAX_ENEMIES,
            "at most {MAX_ENEMIES} enemies supported"
        );

        ensure!(self.bomb_fuse_ms > 0.0, "bomb fuse must be positive");
        ensure!(
            self.explosion_duration_ms > 0.0,
            "explosion duration must be positive"
        );
        ensure!(self.initial_bombs >= 1, "need at least one bomb");
        ensure!(self.initial_range >= 1, "blast range must be at least 1");

        ensure!(self.item_lifetime_ms > 0.0, "item lifetime must be positive");
        for (kind, w) in &self.item_drop_rates {
            ensure!(
                w.is_finite() && *w >= 0.0,
                "bad drop weight {w} for {kind:?}"
            );
        }
        ensure!(self.speed_up_factor > 0.0, "speed up factor must be positive");

        for (name, speed) in [
            ("player speed", self.player_speed),
            ("enemy speed", self.enemy_speed),
            ("AI speed multiplier", self.ai_speed_multiplier),
        ] {
            ensure!(
                speed.is_finite() && speed > 0.0,
                "{name} must be positive"
            );
        }
        ensure!(
            self.ai_bomb_cooldown_ms > 0.0,
            "AI bomb cooldown must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.ai_bomb_chance),
            "AI bomb chance must be between 0 and 1"
        );

        Ok(())
    }

    pub fn fuse(&self) -> f32 {
        self.bomb_fuse_ms / 1000.0
    }

    pub fn explosion_duration(&self) -> f32 {
        self.explosion_duration_ms / 1000.0
    }

    pub fn item_lifetime(&self) -> f32 {
        self.item_lifetime_ms / 1000.0
    }

    pub fn ai_bomb_cooldown(&self) -> f32 {
        self.ai_bomb_cooldown_ms / 1000.0
    }

    /// Player speed in world units per second.
    pub fn player_world_speed(&self) -> f32 {
        self.player_speed * self.tile_size as f32
    }

    /// Enemy speed in world units per second.
    pub fn enemy_world_speed(&self) -> f32 {
        self.enemy_speed * self.ai_speed_multiplier * self.tile_size as f32
    }
}

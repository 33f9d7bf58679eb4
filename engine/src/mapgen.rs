use rand::prelude::*;
use serde::{Deserialize, Serialize};
use util::RngExt;

use crate::prelude::*;

/// Area around a spawn point that is kept clear of blocks.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct SafeZone {
    pub center: IVec2,
    /// Taxicab radius.
    pub radius: i32,
}

impl SafeZone {
    pub fn new(center: IVec2, radius: i32) -> Self {
        SafeZone { center, radius }
    }

    pub fn contains(&self, p: IVec2) -> bool {
        self.center.taxi_dist(&p) <= self.radius
    }
}

/// Map generation parameters.
struct Level<'a> {
    width: i32,
    height: i32,
    tile_size: u32,
    density: f32,
    safe_zones: &'a [SafeZone],
}

impl Level<'_> {
    fn is_border(&self, p: IVec2) -> bool {
        p.x == 0 || p.y == 0 || p.x == self.width - 1 || p.y == self.height - 1
    }

    fn is_pillar(&self, p: IVec2) -> bool {
        p.x % 2 == 0 && p.y % 2 == 0
    }

    fn is_safe(&self, p: IVec2) -> bool {
        self.safe_zones.iter().any(|z| z.contains(p))
    }
}

impl Distribution<Terrain> for Level<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Terrain {
        let mut ret = Terrain::new(self.width, self.height, self.tile_size);

        for y in 0..self.height {
            for x in 0..self.width {
                let p = ivec2(x, y);
                if self.is_border(p) || self.is_pillar(p) {
                    ret.set(p, Tile::Wall);
                } else if !self.is_safe(p) && rng.chance(self.density) {
                    ret.set(p, Tile::Block);
                }
            }
        }

        ret
    }
}

impl Terrain {
    /// Generate a new round map.
    ///
    /// The map has an outer wall ring and a lattice of wall pillars on every
    /// even coordinate pair. The remaining cells get destructible blocks with
    /// probability `density`, except inside the safe zones.
    pub fn generate(
        width: i32,
        height: i32,
        tile_size: u32,
        safe_zones: &[SafeZone],
        density: f32,
        rng: &mut (impl Rng + ?Sized),
    ) -> Terrain {
        Level {
            width,
            height,
            tile_size,
            density,
            safe_zones,
        }
        .sample(rng)
    }
}

use std::fmt;

use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Rectangular tile grid of a single round.
///
/// Dimensions never change after construction. Everything outside the grid
/// reads as wall so callers don't need to bounds-check their queries.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Terrain {
    width: i32,
    height: i32,
    tile_size: u32,
    tiles: Vec<Tile>,
}

impl Terrain {
    /// Create an all-empty grid.
    pub fn new(width: i32, height: i32, tile_size: u32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Terrain {
            width,
            height,
            tile_size: tile_size.max(1),
            tiles: vec![Tile::Empty; (width * height) as usize],
        }
    }

    /// Parse an ASCII map.
    ///
    /// Leading and trailing whitespace on each line is ignored, as are
    /// blank lines.
    ///
    /// ```
    /// use engine::{Terrain, Tile};
    /// use glam::ivec2;
    ///
    /// let t = Terrain::from_ascii("
    ///     ####
    ///     #%#
    ///     ####", 32).unwrap();
    /// assert_eq!(t.get(ivec2(1, 1)), Tile::Block);
    /// ```
    pub fn from_ascii(s: &str, tile_size: u32) -> Result<Self> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        ensure!(!lines.is_empty(), "empty map");

        let width = lines[0].chars().count();
        let mut ret = Terrain::new(width as i32, lines.len() as i32, tile_size);

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                bail!("non-rectangular map, line {} has a different width", y);
            }
            for (x, c) in line.chars().enumerate() {
                let Ok(t) = Tile::try_from(c) else {
                    bail!("invalid map char {c:?} at ({x}, {y})");
                };
                ret.set(ivec2(x as i32, y as i32), t);
            }
        }

        Ok(ret)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tile edge length in world units.
    pub fn tile_size(&self) -> f32 {
        self.tile_size as f32
    }

    pub fn contains(&self, p: IVec2) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn idx(&self, p: IVec2) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// Tile at position, out of bounds positions are walls.
    pub fn get(&self, p: IVec2) -> Tile {
        self.idx(p).map_or(Tile::Wall, |i| self.tiles[i])
    }

    /// Set a tile. Out of bounds positions are ignored.
    pub fn set(&mut self, p: IVec2, tile: Tile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = tile;
        }
    }

    /// Characters can walk on empty cells and step onto bombs.
    pub fn is_walkable(&self, p: IVec2) -> bool {
        self.get(p).is_walkable()
    }

    /// Iterate over all in-bounds cells along with their contents.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &t)| {
            let i = i as i32;
            (ivec2(i % self.width, i / self.width), t)
        })
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Grid cell that contains a world position.
    pub fn world_to_grid(&self, pos: Vec2) -> IVec2 {
        (pos / self.tile_size()).floor().as_ivec2()
    }

    /// World position of the center of a grid cell.
    pub fn grid_to_world(&self, p: IVec2) -> Vec2 {
        (p.as_vec2() + vec2(0.5, 0.5)) * self.tile_size()
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", char::from(self.get(ivec2(x, y))))?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    use super::*;

    #[quickcheck]
    fn outside_is_wall(x: i32, y: i32) -> bool {
        let t = Terrain::new(7, 5, 32);
        let p = ivec2(x, y);
        t.contains(p) || t.get(p) == Tile::Wall
    }

    #[test]
    fn boundary() {
        let mut t = Terrain::new(3, 3, 32);
        for p in [ivec2(-1, 0), ivec2(3, 0), ivec2(0, -1), ivec2(0, 3)] {
            assert_eq!(t.get(p), Tile::Wall);
            // Writes out of bounds are no-ops.
            t.set(p, Tile::Empty);
            assert_eq!(t.get(p), Tile::Wall);
            assert!(!t.is_walkable(p));
        }
        assert_eq!(t.count(Tile::Empty), 9);
    }

    #[test]
    fn ascii_roundtrip() {
        let map = "\
#####
#.%o#
#####";
        let t = Terrain::from_ascii(map, 32).unwrap();
        assert_eq!(t.width(), 5);
        assert_eq!(t.height(), 3);
        assert_eq!(t.get(ivec2(2, 1)), Tile::Block);
        assert_eq!(t.get(ivec2(3, 1)), Tile::Bomb);
        assert_eq!(t.to_string(), map);
    }

    #[test]
    fn bad_ascii() {
        assert!(Terrain::from_ascii("", 32).is_err());
        assert!(Terrain::from_ascii("###\n##", 32).is_err());
        assert!(Terrain::from_ascii("#x#", 32).is_err());
    }

    #[test]
    fn coordinates() {
        let t = Terrain::new(5, 5, 40);
        assert_eq!(t.grid_to_world(ivec2(0, 0)), vec2(20.0, 20.0));
        assert_eq!(t.grid_to_world(ivec2(2, 1)), vec2(100.0, 60.0));
        assert_eq!(t.world_to_grid(vec2(100.0, 60.0)), ivec2(2, 1));
        assert_eq!(t.world_to_grid(vec2(79.9, 0.0)), ivec2(1, 0));
        assert_eq!(t.world_to_grid(vec2(-0.1, 0.0)), ivec2(-1, 0));
    }
}

use serde::{Deserialize, Serialize};

/// Contents of a single map cell.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub enum Tile {
    #[default]
    Empty,
    /// Indestructible wall.
    Wall,
    /// Destructible block, gets blown up by explosions.
    Block,
    /// Cell has a live bomb on it.
    Bomb,
}

use Tile::*;

impl Tile {
    pub fn is_walkable(self) -> bool {
        matches!(self, Empty | Bomb)
    }

    /// Whether the tile stops explosions from passing through.
    pub fn blocks_blast(self) -> bool {
        matches!(self, Wall | Block)
    }
}

impl TryFrom<char> for Tile {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(Empty),
            '#' => Ok(Wall),
            '%' => Ok(Block),
            'o' => Ok(Bomb),
            _ => Err("invalid tile char"),
        }
    }
}

impl From<Tile> for char {
    fn from(val: Tile) -> Self {
        // NB. This must match Tile's TryFrom inputs above.
        match val {
            Empty => '.',
            Wall => '#',
            Block => '%',
            Bomb => 'o',
        }
    }
}

//! Logic for player and enemy characters.
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use util::Aabb;

use crate::{ai::Brain, prelude::*, CHARACTER_EXTENT};

/// Index of a character in the round.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub struct CharacterId(pub usize);

/// Cardinal directions, clock face order.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub fn vec(self) -> IVec2 {
        DIR_4[self as usize]
    }

    /// Direction for a unit step vector.
    pub fn from_vec(v: IVec2) -> Option<Dir> {
        DIR_4.iter().position(|&d| d == v).map(|i| match i {
            0 => Dir::Up,
            1 => Dir::Right,
            2 => Dir::Down,
            _ => Dir::Left,
        })
    }

    /// Direction of the step from one cell to an adjacent one.
    pub fn between(a: IVec2, b: IVec2) -> Option<Dir> {
        Dir::from_vec(b - a)
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Dir::Left | Dir::Right)
    }
}

#[derive(Copy, Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub enum Movement {
    #[default]
    Idle,
    /// Sliding towards the adjacent cell in `dir`, `progress` world units
    /// covered so far.
    Moving { dir: Dir, progress: f32 },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy(Brain),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub role: Role,
    /// Continuous position of the character's center.
    pub pos: Vec2,
    /// Grid cell the character is standing on. Changes when a move
    /// completes.
    pub cell: IVec2,
    /// Movement speed in world units per second.
    pub speed: f32,
    pub max_bombs: usize,
    pub blast_range: i32,
    pub alive: bool,
    pub movement: Movement,
    /// Overshoot from the last completed move, consumed by the next one.
    carry: f32,
}

impl Character {
    pub fn new(
        id: CharacterId,
        role: Role,
        terrain: &Terrain,
        cell: IVec2,
        speed: f32,
        max_bombs: usize,
        blast_range: i32,
    ) -> Self {
        Character {
            id,
            role,
            pos: terrain.grid_to_world(cell),
            cell,
            speed,
            max_bombs,
            blast_range,
            alive: true,
            movement: Movement::Idle,
            carry: 0.0,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.role, Role::Enemy(_))
    }

    /// Characters on opposing sides.
    pub fn is_foe(&self, other: &Character) -> bool {
        self.is_player() != other.is_player()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.movement, Movement::Idle)
    }

    pub fn brain_mut(&mut self) -> Option<&mut Brain> {
        match &mut self.role {
            Role::Enemy(brain) => Some(brain),
            Role::Player => None,
        }
    }

    /// Start moving towards an adjacent cell.
    ///
    /// Fails if the character is dead, already moving or the target cell is
    /// not walkable.
    pub fn try_move(&mut self, dir: Dir, terrain: &Terrain) -> bool {
        if !self.alive || !self.is_idle() {
            return false;
        }

        if !terrain.is_walkable(self.cell + dir.vec()) {
            return false;
        }

        self.movement = Movement::Moving {
            dir,
            progress: self.carry,
        };
        self.carry = 0.0;
        true
    }

    /// Advance movement by `dt` seconds.
    pub fn integrate(&mut self, dt: f32, terrain: &Terrain) {
        let tile = terrain.tile_size();
        let Movement::Moving { dir, progress } = self.movement else {
            // Overshoot only survives into a move started right away.
            if dt > 0.0 {
                self.carry = 0.0;
            }
            self.pos = terrain.grid_to_world(self.cell);
            return;
        };

        let mut progress = progress + self.speed * dt.max(0.0);
        if progress < tile {
            self.movement = Movement::Moving { dir, progress };
            self.pos = terrain.grid_to_world(self.cell)
                + dir.vec().as_vec2() * progress;
            return;
        }

        // A long tick can cover several cells, keep going in the same
        // direction until the distance runs out or the way is blocked.
        loop {
            self.cell += dir.vec();
            progress -= tile;
            if progress < tile {
                break;
            }
            if !terrain.is_walkable(self.cell + dir.vec()) {
                // Ran into something, the rest of the distance is lost.
                progress = 0.0;
                break;
            }
        }
        self.pos = terrain.grid_to_world(self.cell);
        self.movement = Movement::Idle;
        // Always below one tile so a zero-length tick can't finish a move.
        self.carry = progress;
    }

    /// Hit by an explosion. One hit is lethal.
    ///
    /// Returns true if this killed the character.
    pub fn take_damage(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.movement = Movement::Idle;
        true
    }

    pub fn bounds(&self, tile_size: f32) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(tile_size * CHARACTER_EXTENT))
    }
}

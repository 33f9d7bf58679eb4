//! Grid pathfinding and blast prediction.
use pathfinding::prelude::bfs;
use rand::{seq::SliceRandom, Rng};
use util::{bfs_path, neighbors_4};

use crate::prelude::*;

/// Whether standing on `pos` would get a character caught by one of the
/// unexploded bombs in `bombs`.
///
/// Only indestructible walls shelter from a blast here. Both arguments can
/// be hypothetical copies of the live state for what-if planning.
pub fn is_danger_zone(terrain: &Terrain, bombs: &[Bomb], pos: IVec2) -> bool {
    bombs
        .iter()
        .filter(|b| b.is_armed())
        .any(|b| in_blast(terrain, b, pos))
}

fn in_blast(terrain: &Terrain, bomb: &Bomb, pos: IVec2) -> bool {
    let d = pos - bomb.pos;
    if d == IVec2::ZERO {
        return true;
    }
    if d.x != 0 && d.y != 0 {
        return false;
    }

    let dist = d.taxi_len();
    if dist > bomb.range {
        return false;
    }

    let step = d.signum();
    (1..dist).all(|i| terrain.get(bomb.pos + step * i) != Tile::Wall)
}

/// Shortest four-connected path from `start` to `goal`.
///
/// The path does not include `start`, and is empty if the goal can't be
/// reached. The goal cell is accepted as the last step even when it isn't
/// walkable itself so a path can lead up to a block that is to be blown up.
///
/// `walkable` must be false everywhere outside a finite area.
pub fn find_path(
    start: IVec2,
    goal: IVec2,
    walkable: impl Fn(IVec2) -> bool,
) -> Vec<IVec2> {
    let walkable = &walkable;
    bfs_path(
        &start,
        |&p| neighbors_4(p).filter(move |&n| n == goal || walkable(n)),
        |&p| p == goal,
    )
}

/// Find the quickest way out of danger from `from`.
///
/// Paths along empty cells that aren't burning to the closest cell that is
/// not in any bomb's blast. Neighbors are explored in random order so that
/// ties are broken differently on every evaluation. Returns an empty path if
/// `from` is already safe and `None` if there is no escape.
pub fn find_escape_route(
    terrain: &Terrain,
    bombs: &[Bomb],
    explosions: &Explosions,
    from: IVec2,
    rng: &mut (impl Rng + ?Sized),
) -> Option<Vec<IVec2>> {
    let mut path = bfs(
        &from,
        |&p| {
            let mut ns: Vec<IVec2> = neighbors_4(p)
                .filter(|&n| {
                    // You can walk off a bomb but not over one.
                    terrain.get(n) == Tile::Empty && !explosions.is_burning(n)
                })
                .collect();
            ns.shuffle(&mut *rng);
            ns
        },
        |&p| !is_danger_zone(terrain, bombs, p) && !explosions.is_burning(p),
    )?;
    path.remove(0);
    Some(path)
}

//! Characters figuring out what to do on their own.
use std::collections::VecDeque;

use rand::{seq::IteratorRandom, Rng};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use util::{dijkstra_map, neighbors_4, RngExt};

use crate::{
    find_escape_route, find_path, is_danger_zone, prelude::*,
    ALLY_GATHER_RADIUS, FOE_ALERT_RADIUS,
};

/// Planning state of a computer-controlled character.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Brain {
    /// Planned steps, next one at the front.
    path: VecDeque<IVec2>,
    /// Where the current path is headed.
    target: Option<IVec2>,
    bomb_cooldown: Timer,
}

impl Brain {
    /// Make a brain that waits for `cooldown` seconds before its first bomb
    /// decision.
    pub fn new(cooldown: f32) -> Self {
        Brain {
            bomb_cooldown: Timer::new(cooldown),
            ..Default::default()
        }
    }

    /// Forget the current plan, a new one is made on the next think.
    pub fn invalidate(&mut self) {
        self.path.clear();
        self.target = None;
    }

    pub fn target(&self) -> Option<IVec2> {
        self.target
    }

    fn set_path(&mut self, target: IVec2, path: impl Into<VecDeque<IVec2>>) {
        self.target = Some(target);
        self.path = path.into();
    }
}

/// Read-only view of the round for decision making.
#[derive(Copy, Clone)]
pub struct Arena<'a> {
    pub terrain: &'a Terrain,
    pub bombs: &'a Bombs,
    pub explosions: &'a Explosions,
    pub characters: &'a [Character],
    pub config: &'a Config,
}

impl Arena<'_> {
    pub fn is_danger_zone(&self, pos: IVec2) -> bool {
        is_danger_zone(self.terrain, self.bombs, pos)
    }

    pub fn is_burning(&self, pos: IVec2) -> bool {
        self.explosions.is_burning(pos)
    }

    /// Cell can be entered without walking into a predicted blast.
    pub fn is_safe_walkable(&self, pos: IVec2) -> bool {
        self.terrain.get(pos) == Tile::Empty
            && !self.is_danger_zone(pos)
            && !self.is_burning(pos)
    }

    fn foes_of<'b>(
        &'b self,
        me: &'b Character,
    ) -> impl Iterator<Item = &'b Character> + 'b {
        self.characters
            .iter()
            .filter(move |c| c.alive && c.is_foe(me))
    }

    fn allies_of<'b>(
        &'b self,
        me: &'b Character,
    ) -> impl Iterator<Item = &'b Character> + 'b {
        self.characters
            .iter()
            .filter(move |c| c.alive && c.id != me.id && !c.is_foe(me))
    }
}

/// Decide what character `me` does this tick.
///
/// `brain` is the character's planning state, kept separate from the arena
/// so that the arena can borrow the character list.
pub fn think(
    arena: &Arena,
    me: usize,
    brain: &mut Brain,
    dt: f32,
    rng: &mut (impl Rng + ?Sized),
) -> Input {
    let mut ret = Input::default();
    let Some(c) = arena.characters.get(me) else {
        return ret;
    };
    if !c.alive {
        return ret;
    }

    brain.bomb_cooldown.tick(dt);

    // Moves run to completion, nothing to decide until the next cell.
    if !c.is_idle() {
        return ret;
    }
    let here = c.cell;

    let mut fleeing = arena.is_danger_zone(here) || arena.is_burning(here);

    if brain.bomb_cooldown.is_done() {
        brain.bomb_cooldown = Timer::new(arena.config.ai_bomb_cooldown());
        if let Some(escape) = plan_bomb(arena, me, rng) {
            ret.place_bomb = true;
            if let Some(&end) = escape.last() {
                brain.set_path(end, escape);
            }
            fleeing = true;
        }
    }

    if fleeing {
        if !ret.place_bomb {
            brain.invalidate();
            if let Some(escape) = find_escape_route(
                arena.terrain,
                arena.bombs,
                arena.explosions,
                here,
                rng,
            ) {
                if let Some(&end) = escape.last() {
                    brain.set_path(end, escape);
                }
            }
        }
    } else if brain.path.is_empty() || brain.target == Some(here) {
        brain.invalidate();
        if let Some((target, path)) = plan(arena, c, rng) {
            brain.set_path(target, path);
        }
    }

    let Some(&next) = brain.path.front() else {
        return ret;
    };

    if brain.target == Some(next) && !arena.terrain.is_walkable(next) {
        // Right next to the block we were going for.
        brain.invalidate();
        return ret;
    }

    let step_ok = (next - here).is_adjacent()
        && arena.terrain.get(next) == Tile::Empty
        && !arena.is_burning(next)
        && (fleeing || !arena.is_danger_zone(next));
    if !step_ok {
        log::debug!("think: {:?} dropping stale path at {next}", c.id);
        brain.invalidate();
        return ret;
    }

    brain.path.pop_front();
    ret.dir = Dir::between(here, next);
    ret
}

/// Whether character `me` should put down a bomb where it stands right now.
///
/// A bomb is dropped when it would hit something or on a random whim, but
/// only when there's a way out of the blast that can be walked before the
/// fuse runs out.
pub fn should_drop_bomb(
    arena: &Arena,
    me: usize,
    rng: &mut (impl Rng + ?Sized),
) -> bool {
    plan_bomb(arena, me, rng).is_some()
}

/// Escape route to take after dropping a bomb, if dropping one is a good
/// idea.
fn plan_bomb(
    arena: &Arena,
    me: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Option<Vec<IVec2>> {
    let c = arena.characters.get(me)?;
    if !c.alive
        || arena.bombs.placed_by(c.id) >= c.max_bombs
        || arena.terrain.get(c.cell) != Tile::Empty
    {
        return None;
    }

    if !is_useful_bomb_spot(arena, c)
        && !rng.chance(arena.config.ai_bomb_chance)
    {
        return None;
    }

    // What if the bomb was here.
    let fuse = arena.config.fuse();
    let mut terrain = arena.terrain.clone();
    let mut bombs = arena.bombs.clone();
    terrain.set(c.cell, Tile::Bomb);
    bombs.push(Bomb::new(c.cell, c.id, fuse, c.blast_range));

    let escape =
        find_escape_route(&terrain, &bombs, arena.explosions, c.cell, rng)?;
    let walk_time = escape.len() as f32 * terrain.tile_size() / c.speed;
    (walk_time < fuse).then_some(escape)
}

/// A bomb dropped by `c` right now would blow up a block or catch a foe.
fn is_useful_bomb_spot(arena: &Arena, c: &Character) -> bool {
    let foe_at = |p: IVec2| arena.foes_of(c).any(|f| f.cell == p);
    if foe_at(c.cell) {
        return true;
    }

    for dir in Dir::iter() {
        for dist in 1..=c.blast_range {
            let p = c.cell + dir.vec() * dist;
            match arena.terrain.get(p) {
                Tile::Wall | Tile::Bomb => break,
                Tile::Block => return true,
                Tile::Empty if foe_at(p) => return true,
                Tile::Empty => {}
            }
        }
    }
    false
}

/// Pick a new target and a path to it.
///
/// Goes for foes that are close by first, then nearby allies, then the
/// nearest block that can be blown up, and wanders off at random if there's
/// nothing to go for.
fn plan(
    arena: &Arena,
    c: &Character,
    rng: &mut (impl Rng + ?Sized),
) -> Option<(IVec2, Vec<IVec2>)> {
    let here = c.cell;
    let walk = |p| arena.is_safe_walkable(p);

    let mut foes: Vec<IVec2> = arena
        .foes_of(c)
        .map(|f| f.cell)
        .filter(|p| p.taxi_dist(&here) <= FOE_ALERT_RADIUS)
        .collect();
    foes.sort_by_key(|p| p.taxi_dist(&here));
    for foe in foes {
        let path = find_path(here, foe, walk);
        if !path.is_empty() {
            return Some((foe, path));
        }
    }

    let mut allies: Vec<IVec2> = arena
        .allies_of(c)
        .map(|a| a.cell)
        .filter(|p| (2..=ALLY_GATHER_RADIUS).contains(&p.taxi_dist(&here)))
        .collect();
    allies.sort_by_key(|p| p.taxi_dist(&here));
    for ally in allies {
        let mut path = find_path(here, ally, walk);
        // Stop next to the ally instead of on top of it.
        path.pop();
        if !path.is_empty() {
            return Some((ally, path));
        }
    }

    // Flood out over safe cells until something explodable turns up.
    let block = dijkstra_map(
        |&p: &IVec2| neighbors_4(p).filter(move |&n| walk(n)),
        [here],
    )
    .find_map(|(p, _)| {
        neighbors_4(p).find(|&n| arena.terrain.get(n) == Tile::Block)
    });
    if let Some(block) = block {
        let path = find_path(here, block, walk);
        if !path.is_empty() {
            return Some((block, path));
        }
    }

    let step = neighbors_4(here).filter(|&n| walk(n)).choose(rng)?;
    Some((step, vec![step]))
}

//! Bomb fuses and explosion propagation.
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{prelude::*, SegmentKind};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: IVec2,
    pub owner: CharacterId,
    pub fuse: Timer,
    pub range: i32,
    pub exploded: bool,
}

impl Bomb {
    pub fn new(pos: IVec2, owner: CharacterId, fuse: f32, range: i32) -> Self {
        Bomb {
            pos,
            owner,
            fuse: Timer::new(fuse),
            range,
            exploded: false,
        }
    }

    /// How much of the fuse is left, for pulsing display.
    pub fn fuse_fraction(&self) -> f32 {
        self.fuse.fraction_left()
    }

    pub fn is_armed(&self) -> bool {
        !self.exploded
    }
}

/// What happens to a blast ray when it reaches another bomb.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChainRule {
    /// Set off the other bomb and end the ray there.
    #[default]
    Stop,
    /// Set off the other bomb and keep going.
    PassThrough,
}

/// Side effects of one or more bombs going off.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Detonation {
    /// Explosion segments in emission order. A cell can show up more than
    /// once when several blasts cross it.
    pub segments: Vec<(IVec2, SegmentKind)>,
    /// Cells where a destructible block was blown up.
    pub destroyed: Vec<IVec2>,
    /// Bombs that went off, in explosion order.
    pub exploded: Vec<(CharacterId, IVec2)>,
}

impl Detonation {
    pub fn is_empty(&self) -> bool {
        self.exploded.is_empty()
    }

    /// Whether an explosion segment was emitted at position.
    pub fn hits(&self, pos: IVec2) -> bool {
        self.segments.iter().any(|&(p, _)| p == pos)
    }

    fn emit(&mut self, pos: IVec2, kind: SegmentKind) {
        self.segments.push((pos, kind));
    }
}

/// Set of live bombs.
///
/// At most one bomb can be on any cell, ensured by placement only being
/// possible on empty terrain and bomb terrain marking the cell.
#[derive(Clone, Default, Debug, Deref, Serialize, Deserialize)]
pub struct Bombs(Vec<Bomb>);

impl Bombs {
    /// Number of bombs in the live set owned by a character.
    ///
    /// Bombs count against the owner until they are removed on the tick after
    /// they exploded.
    pub fn placed_by(&self, owner: CharacterId) -> usize {
        self.0.iter().filter(|b| b.owner == owner).count()
    }

    pub fn at(&self, pos: IVec2) -> Option<&Bomb> {
        self.0.iter().find(|b| b.pos == pos)
    }

    /// Place a new bomb for `owner`.
    ///
    /// Returns false and does nothing if the cell isn't empty or the owner
    /// already has its maximum number of bombs out.
    pub fn place(
        &mut self,
        terrain: &mut Terrain,
        owner: &Character,
        pos: IVec2,
        fuse: f32,
        range: i32,
    ) -> bool {
        if terrain.get(pos) != Tile::Empty || self.at(pos).is_some() {
            return false;
        }
        if self.placed_by(owner.id) >= owner.max_bombs {
            return false;
        }

        terrain.set(pos, Tile::Bomb);
        self.0.push(Bomb::new(pos, owner.id, fuse, range));
        true
    }

    /// Insert a bomb without the ownership checks of `place`.
    ///
    /// Used for building hypothetical bomb sets for planning.
    pub fn push(&mut self, bomb: Bomb) {
        self.0.push(bomb);
    }

    /// Advance fuses by `dt` seconds.
    ///
    /// Bombs that exploded on the previous tick are removed first, then every
    /// bomb whose fuse runs out explodes right away along with whatever it
    /// sets off.
    ///
    /// Bombs going off on the same tick explode one after another in
    /// placement order, each on the terrain the previous ones left behind.
    pub fn tick(
        &mut self,
        dt: f32,
        terrain: &mut Terrain,
        chain: ChainRule,
    ) -> Detonation {
        self.remove_spent(terrain);

        let mut ret = Detonation::default();
        for b in self.0.iter_mut().filter(|b| b.is_armed()) {
            b.fuse.tick(dt);
        }
        for i in 0..self.0.len() {
            if self.0[i].is_armed() && self.0[i].fuse.is_done() {
                self.explode(i, terrain, chain, &mut ret);
            }
        }
        ret
    }

    /// Set off the bomb at position immediately, if there is an unexploded
    /// one.
    pub fn detonate_at(
        &mut self,
        pos: IVec2,
        terrain: &mut Terrain,
        chain: ChainRule,
    ) -> Detonation {
        let mut ret = Detonation::default();
        if let Some(i) = self.0.iter().position(|b| b.pos == pos) {
            self.explode(i, terrain, chain, &mut ret);
        }
        ret
    }

    /// Drop exploded bombs from the live set and clear their cells.
    pub fn remove_spent(&mut self, terrain: &mut Terrain) {
        for b in self.0.iter().filter(|b| b.exploded) {
            if terrain.get(b.pos) == Tile::Bomb {
                terrain.set(b.pos, Tile::Empty);
            }
        }
        self.0.retain(|b| !b.exploded);
    }

    fn explode(
        &mut self,
        i: usize,
        terrain: &mut Terrain,
        chain: ChainRule,
        out: &mut Detonation,
    ) {
        if self.0[i].exploded {
            return;
        }
        // Flag goes up before the rays are walked so a chain coming back to
        // this bomb stops here.
        self.0[i].exploded = true;
        let Bomb {
            pos, owner, range, ..
        } = self.0[i];
        out.exploded.push((owner, pos));
        out.emit(pos, SegmentKind::Center);

        for dir in Dir::iter() {
            for dist in 1..=range {
                let p = pos + dir.vec() * dist;
                let is_last = dist == range;

                match terrain.get(p) {
                    Tile::Wall => break,
                    Tile::Block => {
                        out.emit(p, SegmentKind::End(dir));
                        terrain.set(p, Tile::Empty);
                        out.destroyed.push(p);
                        break;
                    }
                    Tile::Bomb => {
                        let stop = chain == ChainRule::Stop;
                        out.emit(
                            p,
                            SegmentKind::along(dir, stop || is_last),
                        );
                        if let Some(j) =
                            self.0.iter().position(|b| b.pos == p)
                        {
                            self.explode(j, terrain, chain, out);
                        }
                        if stop {
                            break;
                        }
                    }
                    Tile::Empty => {
                        out.emit(p, SegmentKind::along(dir, is_last));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mob::Role;

    fn owner(id: usize, t: &Terrain, max_bombs: usize) -> Character {
        Character::new(
            CharacterId(id),
            Role::Player,
            t,
            ivec2(1, 1),
            100.0,
            max_bombs,
            2,
        )
    }

    fn open(n: i32) -> Terrain {
        Terrain::new(n, n, 32)
    }

    fn cells(d: &Detonation) -> Vec<IVec2> {
        let mut ret: Vec<IVec2> = d.segments.iter().map(|&(p, _)| p).collect();
        ret.sort_by_key(|p| (p.y, p.x));
        ret.dedup();
        ret
    }

    #[test]
    fn exclusive_placement() {
        let mut t = open(7);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 2);
        let b = owner(1, &t, 2);

        assert!(bombs.place(&mut t, &a, ivec2(3, 3), 3.0, 2));
        assert_eq!(t.get(ivec2(3, 3)), Tile::Bomb);
        assert!(!bombs.place(&mut t, &a, ivec2(3, 3), 3.0, 2));
        assert!(!bombs.place(&mut t, &b, ivec2(3, 3), 3.0, 2));
        assert_eq!(bombs.len(), 1);
        assert_eq!(bombs.at(ivec2(3, 3)).unwrap().owner, CharacterId(0));

        // No bombs in walls or blocks.
        t.set(ivec2(1, 1), Tile::Block);
        assert!(!bombs.place(&mut t, &b, ivec2(1, 1), 3.0, 2));
        assert!(!bombs.place(&mut t, &b, ivec2(-1, 1), 3.0, 2));
    }

    #[test]
    fn bomb_allowance() {
        let mut t = open(7);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 1);

        assert!(bombs.place(&mut t, &a, ivec2(1, 1), 1.0, 1));
        assert!(!bombs.place(&mut t, &a, ivec2(5, 5), 1.0, 1));
        assert_eq!(bombs.placed_by(a.id), 1);

        // Exploding doesn't free the slot yet.
        let d = bombs.tick(1.0, &mut t, ChainRule::Stop);
        assert_eq!(d.exploded, vec![(a.id, ivec2(1, 1))]);
        assert_eq!(bombs.placed_by(a.id), 1);
        assert!(!bombs.place(&mut t, &a, ivec2(5, 5), 1.0, 1));

        // Next tick removes the spent bomb.
        let d = bombs.tick(0.1, &mut t, ChainRule::Stop);
        assert!(d.is_empty());
        assert_eq!(bombs.placed_by(a.id), 0);
        assert_eq!(t.get(ivec2(1, 1)), Tile::Empty);
        assert!(bombs.place(&mut t, &a, ivec2(5, 5), 1.0, 1));
    }

    #[test]
    fn fuse_burns_down() {
        let mut t = open(7);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 1);
        bombs.place(&mut t, &a, ivec2(3, 3), 3.0, 1);

        assert!(bombs.tick(1.0, &mut t, ChainRule::Stop).is_empty());
        assert!(bombs.tick(1.5, &mut t, ChainRule::Stop).is_empty());
        assert!((bombs[0].fuse_fraction() - 0.5 / 3.0).abs() < 1e-5);
        let d = bombs.tick(0.5, &mut t, ChainRule::Stop);
        assert_eq!(d.exploded.len(), 1);
        assert!(bombs[0].exploded);
    }

    #[test]
    fn cross_shape() {
        use SegmentKind::*;

        let mut t = open(7);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 1);
        bombs.place(&mut t, &a, ivec2(3, 3), 3.0, 2);

        let d = bombs.detonate_at(ivec2(3, 3), &mut t, ChainRule::Stop);
        assert_eq!(d.segments.len(), 9);

        let mut segs = d.segments.clone();
        segs.sort_by_key(|&(p, _)| (p.y, p.x));
        assert_eq!(
            segs,
            vec![
                (ivec2(3, 1), End(Dir::Up)),
                (ivec2(3, 2), Vertical),
                (ivec2(1, 3), End(Dir::Left)),
                (ivec2(2, 3), Horizontal),
                (ivec2(3, 3), Center),
                (ivec2(4, 3), Horizontal),
                (ivec2(5, 3), End(Dir::Right)),
                (ivec2(3, 4), Vertical),
                (ivec2(3, 5), End(Dir::Down)),
            ]
        );
        assert!(d.destroyed.is_empty());
    }

    #[test]
    fn blocks_absorb_blast() {
        let mut t = Terrain::from_ascii(
            "
            .........
            .........
            .........
            .........
            ....o.%..
            .........
            .........
            .........
            .........",
            32,
        )
        .unwrap();
        let mut bombs = Bombs::default();
        bombs.push(Bomb::new(ivec2(4, 4), CharacterId(0), 1.0, 3));

        let d = bombs.detonate_at(ivec2(4, 4), &mut t, ChainRule::Stop);
        assert_eq!(d.destroyed, vec![ivec2(6, 4)]);
        assert_eq!(t.get(ivec2(6, 4)), Tile::Empty);
        assert!(d.hits(ivec2(5, 4)));
        assert!(d.hits(ivec2(6, 4)));
        assert!(!d.hits(ivec2(7, 4)));
        assert!(d
            .segments
            .contains(&(ivec2(6, 4), SegmentKind::End(Dir::Right))));
        // Other rays go full length.
        assert!(d.hits(ivec2(1, 4)));
        assert!(d.hits(ivec2(4, 7)));
    }

    #[test]
    fn simultaneous_bombs_go_in_order() {
        use SegmentKind::*;

        let mut t = Terrain::from_ascii(
            "
            #########
            #.o.%.o.#
            #########",
            32,
        )
        .unwrap();
        let mut bombs = Bombs::default();
        bombs.push(Bomb::new(ivec2(2, 1), CharacterId(0), 1.0, 3));
        bombs.push(Bomb::new(ivec2(6, 1), CharacterId(1), 1.0, 3));

        let d = bombs.tick(1.0, &mut t, ChainRule::Stop);
        assert_eq!(
            d.exploded,
            vec![(CharacterId(0), ivec2(2, 1)), (CharacterId(1), ivec2(6, 1))]
        );
        // The first bomb clears the block, the second one's ray then goes
        // through the cleared cell.
        assert_eq!(d.destroyed, vec![ivec2(4, 1)]);
        assert!(d.segments.contains(&(ivec2(4, 1), End(Dir::Right))));
        assert!(d.segments.contains(&(ivec2(4, 1), Horizontal)));
        assert!(d.segments.contains(&(ivec2(3, 1), End(Dir::Left))));
    }

    #[test]
    fn walls_stop_blast() {
        let mut t = Terrain::from_ascii(
            "
            .......
            .......
            ...#...
            .#.o...
            ...%...
            ...#...
            .......",
            32,
        )
        .unwrap();
        let before = t.clone();
        let mut bombs = Bombs::default();
        bombs.push(Bomb::new(ivec2(3, 3), CharacterId(0), 1.0, 3));

        let d = bombs.detonate_at(ivec2(3, 3), &mut t, ChainRule::Stop);
        assert!(!d.hits(ivec2(3, 2)));
        assert!(!d.hits(ivec2(3, 1)));
        assert!(d.hits(ivec2(2, 3)));
        assert!(!d.hits(ivec2(1, 3)));
        assert!(!d.hits(ivec2(0, 3)));
        assert_eq!(t.get(ivec2(3, 2)), Tile::Wall);
        assert_eq!(t.get(ivec2(1, 3)), Tile::Wall);

        // Only the block to the south got blown up.
        assert_eq!(d.destroyed, vec![ivec2(3, 4)]);
        let mut expected = before;
        expected.set(ivec2(3, 4), Tile::Empty);
        assert_eq!(t, expected);
    }

    #[test]
    fn chain_reaction_same_step() {
        let mut t = open(9);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 2);
        bombs.place(&mut t, &a, ivec2(2, 4), 3.0, 2);
        bombs.place(&mut t, &a, ivec2(4, 4), 10.0, 2);

        // A's fuse runs out and its blast reaches B two tiles away.
        let d = bombs.tick(3.0, &mut t, ChainRule::Stop);
        assert_eq!(
            d.exploded,
            vec![(a.id, ivec2(2, 4)), (a.id, ivec2(4, 4))]
        );
        assert!(bombs.iter().all(|b| b.exploded));
        // B's own rays got applied.
        assert!(d.hits(ivec2(6, 4)));
        assert!(d.hits(ivec2(4, 2)));
        assert!(d.hits(ivec2(4, 6)));
    }

    #[test]
    fn chain_from_fresh_bomb() {
        let mut t = open(9);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 2);
        bombs.place(&mut t, &a, ivec2(2, 4), 3.0, 3);
        bombs.place(&mut t, &a, ivec2(4, 4), 10.0, 1);
        t.set(ivec2(4, 3), Tile::Block);

        let d = bombs.detonate_at(ivec2(2, 4), &mut t, ChainRule::Stop);
        assert_eq!(d.exploded.len(), 2);
        // B's fuse was far from done, but its ray still destroyed the block
        // in the same call.
        assert_eq!(d.destroyed, vec![ivec2(4, 3)]);
        assert_eq!(t.get(ivec2(4, 3)), Tile::Empty);
    }

    #[test]
    fn chain_stop_and_pass_through() {
        let setup = || {
            let mut t = open(11);
            let mut bombs = Bombs::default();
            bombs.push(Bomb::new(ivec2(2, 5), CharacterId(0), 1.0, 4));
            bombs.push(Bomb::new(ivec2(4, 5), CharacterId(1), 9.0, 1));
            t.set(ivec2(2, 5), Tile::Bomb);
            t.set(ivec2(4, 5), Tile::Bomb);
            (t, bombs)
        };

        // Canonical rule: ray from A ends at B, cells beyond are only covered
        // by B's own range 1 blast.
        let (mut t, mut bombs) = setup();
        let d = bombs.detonate_at(ivec2(2, 5), &mut t, ChainRule::Stop);
        assert!(d.hits(ivec2(5, 5)));
        assert!(!d.hits(ivec2(6, 5)));
        assert!(d
            .segments
            .contains(&(ivec2(4, 5), SegmentKind::End(Dir::Right))));

        let (mut t, mut bombs) = setup();
        let d = bombs.detonate_at(ivec2(2, 5), &mut t, ChainRule::PassThrough);
        assert!(d.hits(ivec2(6, 5)));
        assert!(!d.hits(ivec2(7, 5)));
        assert_eq!(d.exploded.len(), 2);
    }

    #[test]
    fn explode_is_idempotent() {
        let mut t = open(7);
        let mut bombs = Bombs::default();
        let a = owner(0, &t, 1);
        bombs.place(&mut t, &a, ivec2(3, 3), 3.0, 2);

        let first = bombs.detonate_at(ivec2(3, 3), &mut t, ChainRule::Stop);
        assert_eq!(cells(&first).len(), 9);
        let again = bombs.detonate_at(ivec2(3, 3), &mut t, ChainRule::Stop);
        assert!(again.is_empty());
        assert!(again.segments.is_empty());
    }

    #[test]
    fn mutual_chain_terminates() {
        // Two bombs in each other's range, both ways.
        let mut t = open(7);
        let mut bombs = Bombs::default();
        for x in [2, 3, 4] {
            bombs.push(Bomb::new(ivec2(x, 3), CharacterId(0), 1.0, 6));
            t.set(ivec2(x, 3), Tile::Bomb);
        }
        let d = bombs.detonate_at(ivec2(3, 3), &mut t, ChainRule::PassThrough);
        assert_eq!(d.exploded.len(), 3);

        let d = bombs.tick(0.1, &mut t, ChainRule::Stop);
        assert!(d.is_empty());
        assert!(bombs.is_empty());
        assert_eq!(t.count(Tile::Bomb), 0);
    }
}

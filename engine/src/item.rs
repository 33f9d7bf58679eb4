//! Power-up items dropped from destroyed blocks.

use derive_more::Deref;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use util::Aabb;

use crate::{prelude::*, ITEM_EXTENT};

#[derive(
    Copy,
    Clone,
    Default,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    // Have a baked-in None value so this can double as the "no drop" entry of
    // a drop table.
    #[default]
    None,
    BombCountUp,
    BlastRangeUp,
    SpeedUp,
}

impl ItemKind {
    pub fn is_some(&self) -> bool {
        !matches!(self, ItemKind::None)
    }

    /// Apply the item's effect on a character.
    pub fn apply(&self, c: &mut Character, speed_up_factor: f32) {
        use ItemKind::*;
        match self {
            None => {}
            BombCountUp => c.max_bombs += 1,
            BlastRangeUp => c.blast_range += 1,
            SpeedUp => c.speed *= speed_up_factor,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Item {
    pub pos: IVec2,
    pub kind: ItemKind,
    pub remaining: Timer,
    pub active: bool,
}

impl Item {
    pub fn bounds(&self, terrain: &Terrain) -> Aabb {
        Aabb::centered(
            terrain.grid_to_world(self.pos),
            Vec2::splat(terrain.tile_size() * ITEM_EXTENT),
        )
    }
}

#[derive(Clone, Default, Debug, Deref, Serialize, Deserialize)]
pub struct Items(Vec<Item>);

impl Items {
    pub fn active_at(&self, pos: IVec2) -> Option<&Item> {
        self.0.iter().find(|i| i.active && i.pos == pos)
    }

    /// Spawn an item directly. Fails if the cell already has an active item.
    pub fn spawn(&mut self, pos: IVec2, kind: ItemKind, lifetime: f32) -> bool {
        if !kind.is_some() || self.active_at(pos).is_some() {
            return false;
        }
        self.0.push(Item {
            pos,
            kind,
            remaining: Timer::new(lifetime),
            active: true,
        });
        true
    }

    /// Roll the drop table and maybe spawn an item at `pos`.
    ///
    /// Weights are relative and don't need to sum to one. Returns the kind
    /// of the spawned item.
    pub fn maybe_drop_at(
        &mut self,
        pos: IVec2,
        table: &IndexMap<ItemKind, f32>,
        lifetime: f32,
        rng: &mut (impl Rng + ?Sized),
    ) -> Option<ItemKind> {
        let entries: Vec<(&ItemKind, &f32)> = table.iter().collect();
        let Ok(&(&kind, _)) =
            entries.choose_weighted(rng, |e| e.1.max(0.0))
        else {
            log::warn!("maybe_drop_at: unusable drop table {table:?}");
            return None;
        };

        self.spawn(pos, kind, lifetime).then_some(kind)
    }

    pub fn tick(&mut self, dt: f32) {
        for i in self.0.iter_mut() {
            i.remaining.tick(dt);
            if i.remaining.is_done() {
                i.active = false;
            }
        }
        self.0.retain(|i| i.active);
    }

    /// Let a character pick up every active item it overlaps.
    ///
    /// Returns the kinds of the picked up items.
    pub fn check_pickup(
        &mut self,
        c: &mut Character,
        terrain: &Terrain,
        speed_up_factor: f32,
    ) -> Vec<ItemKind> {
        if !c.alive {
            return Vec::new();
        }
        let bounds = c.bounds(terrain.tile_size());

        let mut ret = Vec::new();
        for i in self.0.iter_mut().filter(|i| i.active) {
            if bounds.intersects(&i.bounds(terrain)) {
                i.kind.apply(c, speed_up_factor);
                i.active = false;
                ret.push(i.kind);
            }
        }
        self.0.retain(|i| i.active);
        ret
    }
}

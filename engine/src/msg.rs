//! Events about things that happened during a tick, for the UI layer.

use crate::prelude::*;

/// Instant game event.
///
/// The runtime queues these up as they happen, collect them with
/// `Runtime::take_messages`.
#[derive(Clone, PartialEq, Debug)]
pub enum Msg {
    /// A character put down a bomb.
    BombPlaced { owner: CharacterId, pos: IVec2 },

    /// A bomb went off, either from its fuse or from a chain reaction.
    BombExploded { owner: CharacterId, pos: IVec2 },

    /// A destructible block was blown up.
    BlockDestroyed(IVec2),

    /// A power-up dropped out of a destroyed block.
    ItemSpawned { pos: IVec2, kind: ItemKind },

    /// A character picked up a power-up.
    ItemCollected { who: CharacterId, kind: ItemKind },

    /// Character was caught in an explosion.
    Died(CharacterId),

    /// All enemies are dead.
    RoundWon,

    /// The player is dead.
    RoundLost,
}

use anyhow::ensure;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::{
    ai::{self, Arena, Brain},
    prelude::*,
    Detonation, SafeZone,
};

/// What the player wants to do this tick.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Input {
    pub dir: Option<Dir>,
    pub place_bomb: bool,
}

/// Main data container for a round of the game.
///
/// The player is always the first character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Runtime {
    config: Config,
    terrain: Terrain,
    bombs: Bombs,
    explosions: Explosions,
    items: Items,
    characters: Vec<Character>,
    rng: GameRng,
    status: ScenarioStatus,
    /// Seconds of simulated time.
    elapsed: f32,
    /// Brain for running the player on autopilot.
    autopilot: Brain,
    #[serde(skip)]
    messages: Vec<Msg>,
}

impl Runtime {
    /// Start a new round on a generated map.
    ///
    /// The player starts at the top left corner and enemies take the other
    /// corners.
    pub fn new(config: Config, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = GameRng::seed_from_u64(seed);

        let (w, h) = (config.grid_width, config.grid_height);
        let spawns = [
            ivec2(1, 1),
            ivec2(w - 2, 1),
            ivec2(1, h - 2),
            ivec2(w - 2, h - 2),
        ];
        let safe_zones: Vec<SafeZone> = spawns
            .iter()
            .map(|&p| SafeZone::new(p, config.safe_zone_radius))
            .collect();

        let terrain = Terrain::generate(
            w,
            h,
            config.tile_size,
            &safe_zones,
            config.block_density,
            &mut rng,
        );
        log::info!(
            "Runtime::new: {w}x{h} map with {} blocks, seed {seed:x}",
            terrain.count(Tile::Block)
        );

        let enemies = &spawns[1..1 + config.enemy_count];
        Runtime::build(config, terrain, spawns[0], enemies, rng)
    }

    /// Start a round on a prepared map.
    ///
    /// Spawn cells must be empty. The map's tile size must match the
    /// config, its dimensions don't need to.
    pub fn from_terrain(
        config: Config,
        terrain: Terrain,
        player: IVec2,
        enemies: &[IVec2],
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        ensure!(
            terrain.tile_size() == config.tile_size as f32,
            "map tile size {} does not match config {}",
            terrain.tile_size(),
            config.tile_size
        );
        Runtime::build(
            config,
            terrain,
            player,
            enemies,
            GameRng::seed_from_u64(seed),
        )
    }

    fn build(
        config: Config,
        terrain: Terrain,
        player: IVec2,
        enemies: &[IVec2],
        rng: GameRng,
    ) -> Result<Self> {
        for &p in std::iter::once(&player).chain(enemies) {
            ensure!(
                terrain.get(p) == Tile::Empty,
                "spawn point {p} is not on an empty cell"
            );
        }

        let mut characters = vec![Character::new(
            CharacterId(0),
            Role::Player,
            &terrain,
            player,
            config.player_world_speed(),
            config.initial_bombs,
            config.initial_range,
        )];
        for &p in enemies {
            characters.push(Character::new(
                CharacterId(characters.len()),
                Role::Enemy(Brain::new(config.ai_bomb_cooldown())),
                &terrain,
                p,
                config.enemy_world_speed(),
                config.initial_bombs,
                config.initial_range,
            ));
        }

        Ok(Runtime {
            autopilot: Brain::new(config.ai_bomb_cooldown()),
            config,
            terrain,
            bombs: Default::default(),
            explosions: Default::default(),
            items: Default::default(),
            characters,
            rng,
            status: ScenarioStatus::Ongoing,
            elapsed: 0.0,
            messages: Vec::new(),
        })
    }

    /// Advance the round by `dt` seconds.
    ///
    /// Does nothing once the round is over.
    pub fn tick(&mut self, dt: f32, input: Input) {
        if self.status != ScenarioStatus::Ongoing {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        // Decide.
        let mut intents = vec![Input::default(); self.characters.len()];
        intents[0] = input;
        for (i, intent) in intents.iter_mut().enumerate().skip(1) {
            let Some(mut brain) =
                self.characters[i].brain_mut().map(std::mem::take)
            else {
                continue;
            };
            let (arena, rng) = self.arena();
            *intent = ai::think(&arena, i, &mut brain, dt, rng);
            if let Some(b) = self.characters[i].brain_mut() {
                *b = brain;
            }
        }

        // Act.
        for (i, intent) in intents.into_iter().enumerate() {
            let c = &mut self.characters[i];
            if !c.alive {
                continue;
            }
            if let Some(dir) = intent.dir {
                if !c.try_move(dir, &self.terrain) {
                    if let Some(brain) = c.brain_mut() {
                        brain.invalidate();
                    }
                }
            }
            if intent.place_bomb {
                self.drop_bomb(CharacterId(i));
            }
        }

        // Move.
        for c in self.characters.iter_mut().filter(|c| c.alive) {
            c.integrate(dt, &self.terrain);
        }

        for c in self.characters.iter_mut() {
            for kind in self.items.check_pickup(
                c,
                &self.terrain,
                self.config.speed_up_factor,
            ) {
                log::debug!("tick: {:?} picked up {kind:?}", c.id);
                self.messages.push(Msg::ItemCollected { who: c.id, kind });
            }
        }

        self.explosions.tick(dt);
        self.items.tick(dt);

        let detonation =
            self.bombs.tick(dt, &mut self.terrain, self.config.chain_rule);
        self.apply(detonation);

        // Anyone still standing in the fire gets hit.
        for c in self.characters.iter_mut() {
            if self.explosions.is_burning(c.cell) && c.take_damage() {
                log::info!("tick: {:?} walked into fire at {}", c.id, c.cell);
                self.messages.push(Msg::Died(c.id));
            }
        }

        self.update_status();
    }

    fn apply(&mut self, detonation: Detonation) {
        if detonation.is_empty() {
            return;
        }

        let duration = self.config.explosion_duration();
        for &(owner, pos) in &detonation.exploded {
            self.messages.push(Msg::BombExploded { owner, pos });
        }
        for &(pos, kind) in &detonation.segments {
            self.explosions.spawn(pos, kind, duration);
        }

        for &pos in &detonation.destroyed {
            self.messages.push(Msg::BlockDestroyed(pos));
            if let Some(kind) = self.items.maybe_drop_at(
                pos,
                &self.config.item_drop_rates,
                self.config.item_lifetime(),
                &mut self.rng,
            ) {
                log::debug!("apply: {kind:?} dropped at {pos}");
                self.messages.push(Msg::ItemSpawned { pos, kind });
            }
        }

        for c in self.characters.iter_mut() {
            if detonation.hits(c.cell) && c.take_damage() {
                log::info!("apply: {:?} caught in blast at {}", c.id, c.cell);
                self.messages.push(Msg::Died(c.id));
            }
        }
    }

    fn update_status(&mut self) {
        let mut enemies = self.characters.iter().filter(|c| c.is_enemy());
        let has_enemies = enemies.clone().next().is_some();
        let enemies_dead = enemies.all(|c| !c.alive);

        // Player dying takes precedence over the last enemy dying on the
        // same tick.
        self.status = if !self.player().alive {
            ScenarioStatus::Lost
        } else if has_enemies && enemies_dead {
            ScenarioStatus::Won
        } else {
            ScenarioStatus::Ongoing
        };

        match self.status {
            ScenarioStatus::Ongoing => {}
            ScenarioStatus::Won => {
                log::info!("Round won after {:.1} s", self.elapsed);
                self.messages.push(Msg::RoundWon);
            }
            ScenarioStatus::Lost => {
                log::info!("Round lost after {:.1} s", self.elapsed);
                self.messages.push(Msg::RoundLost);
            }
        }
    }

    /// Have character put down a bomb on the cell it's on.
    ///
    /// Fails silently if the character is dead or out of bombs or the cell
    /// is not empty.
    pub fn drop_bomb(&mut self, id: CharacterId) -> bool {
        let Some(c) = self.characters.get(id.0).filter(|c| c.alive) else {
            return false;
        };
        let pos = c.cell;
        if !self.bombs.place(
            &mut self.terrain,
            c,
            pos,
            self.config.fuse(),
            c.blast_range,
        ) {
            return false;
        }

        log::debug!("drop_bomb: {id:?} at {pos}");
        self.messages.push(Msg::BombPlaced { owner: id, pos });
        true
    }

    /// Let the computer decide the player's next input.
    ///
    /// `dt` is the length of the tick the input is for.
    pub fn autopilot_input(&mut self, dt: f32) -> Input {
        let mut brain = std::mem::take(&mut self.autopilot);
        let (arena, rng) = self.arena();
        let ret = ai::think(&arena, 0, &mut brain, dt, rng);
        self.autopilot = brain;
        ret
    }

    fn arena(&mut self) -> (Arena<'_>, &mut GameRng) {
        (
            Arena {
                terrain: &self.terrain,
                bombs: &self.bombs,
                explosions: &self.explosions,
                characters: &self.characters,
                config: &self.config,
            },
            &mut self.rng,
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn bombs(&self) -> &Bombs {
        &self.bombs
    }

    pub fn explosions(&self) -> &Explosions {
        &self.explosions
    }

    pub fn items(&self) -> &Items {
        &self.items
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.0)
    }

    pub fn player(&self) -> &Character {
        &self.characters[0]
    }

    /// Return whether the round is still going or if it has ended in
    /// victory or defeat.
    pub fn status(&self) -> ScenarioStatus {
        self.status
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Drain the events that happened since the last call.
    pub fn take_messages(&mut self) -> Vec<Msg> {
        std::mem::take(&mut self.messages)
    }
}

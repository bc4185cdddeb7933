//! # Game Session
//!
//! The explicit session struct holding all mutable gameplay state.
//!
//! `GameSession` wraps the pure functions in [`crate::game::rules`] with the
//! bookkeeping a tick handler needs: proximity checks against the current
//! island's hotspots, entity commands for the renderer, a status line, an
//! event log and a dirty flag telling the caller when to persist.

use crate::config::{GameConfig, RulesConfig, DEFAULT_ZOOM, TILE_SIZE};
use crate::game::crafting::{CraftedCounts, ItemKind, Recipe, RecipeBook};
use crate::game::entities::{EntityArena, EntityCommand, EntityKind, EntityVariant};
use crate::game::islands::{default_islands, Island, ResourceNode};
use crate::game::quest::Quest;
use crate::game::resources::{Inventory, ResourceType};
use crate::game::rules::{self, HarvestYield, NpcOutcome, RuleViolation};
use crate::game::save::SaveRecord;
use crate::game::WorldPoint;
use crate::generation::{BiomeGrid, Generator, IslandTerrainGenerator};
use crate::{IslesError, IslesResult};
use log::{debug, info};

/// Something that happened during a tick, for HUD messages and statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Harvested { kind: ResourceType },
    Crafted { item: ItemKind },
    Sailed { from: usize, to: usize },
    QuestAdvanced { quest: Quest },
    RecipeSelected { index: usize },
    Message { text: String },
}

/// What the interact button ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Harvested(HarvestYield),
    Talked(NpcOutcome),
}

/// Central session state for one player.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: RulesConfig,
    generator: IslandTerrainGenerator,
    islands: Vec<Island>,
    island_index: usize,
    terrain: BiomeGrid,
    nodes: Vec<ResourceNode>,
    inventory: Inventory,
    crafted: CraftedCounts,
    recipes: RecipeBook,
    quest: Quest,
    player: WorldPoint,
    camera_zoom: f32,
    entities: EntityArena,
    status: String,
    events: Vec<GameEvent>,
    dirty: bool,
}

impl GameSession {
    /// Creates a session on the stock islands.
    ///
    /// # Examples
    ///
    /// ```
    /// use ladybug_isles::{GameConfig, GameSession};
    ///
    /// let session = GameSession::new(&GameConfig::for_testing()).unwrap();
    /// assert_eq!(session.island_index(), 0);
    /// assert_eq!(session.island().name, "Mossy Nest");
    /// ```
    pub fn new(config: &GameConfig) -> IslesResult<Self> {
        Self::with_islands(config, default_islands())
    }

    /// Creates a session on a custom island catalog.
    ///
    /// Every island's terrain is generated once up front so a broken layout
    /// is reported here rather than mid-voyage.
    pub fn with_islands(config: &GameConfig, islands: Vec<Island>) -> IslesResult<Self> {
        if islands.is_empty() {
            return Err(IslesError::InvalidState("island catalog is empty".to_string()));
        }
        config.validate()?;

        let generator = IslandTerrainGenerator::new(config.terrain.clone(), config.seed_offset);
        for island in &islands {
            generator.generate(island)?;
        }
        let terrain = generator.generate(&islands[0])?;

        let mut session = Self {
            rules: config.rules.clone(),
            generator,
            islands,
            island_index: 0,
            terrain,
            nodes: Vec::new(),
            inventory: Inventory::new(),
            crafted: CraftedCounts::new(),
            recipes: RecipeBook::default(),
            quest: Quest::Dormant,
            player: WorldPoint::default(),
            camera_zoom: config.rules.clamp_zoom(DEFAULT_ZOOM),
            entities: EntityArena::new(),
            status: String::new(),
            events: Vec::new(),
            dirty: false,
        };
        session.load_island(0)?;
        session.status = "Collect resources with E. Travel islands on the dock (SPACE).".to_string();
        Ok(session)
    }

    /// Loads an island: regenerates its terrain, respawns every resource node
    /// un-harvested, rebuilds island-local entities and moves the player to
    /// the island's spawn tile.
    pub fn load_island(&mut self, index: usize) -> IslesResult<()> {
        #[cfg(feature = "dev-tools")]
        let _span = tracing::debug_span!("load_island", index).entered();

        let island = self.islands.get(index).ok_or_else(|| {
            IslesError::InvalidState(format!(
                "island index {} outside catalog of {}",
                index,
                self.islands.len()
            ))
        })?;
        let terrain = self.generator.generate(island)?;

        self.entities.clear();
        self.entities.place(EntityKind::Dock, island.dock);
        self.entities.place(EntityKind::Bench, island.bench);
        if let Some(npc) = &island.npc {
            self.entities.place(EntityKind::Npc, npc.tile);
        }
        self.nodes = island
            .resources
            .iter()
            .map(|spawn| {
                let id = self.entities.place(EntityKind::Resource(spawn.kind), spawn.tile);
                ResourceNode::new(id, spawn.kind, spawn.tile)
            })
            .collect();

        self.player = island.spawn.center();
        self.terrain = terrain;
        self.island_index = index;
        info!(
            "Loaded island {} ({}) with {} resource nodes",
            index,
            island.name,
            self.nodes.len()
        );
        Ok(())
    }

    /// The island being explored.
    pub fn island(&self) -> &Island {
        &self.islands[self.island_index]
    }

    /// Index of the island being explored.
    pub fn island_index(&self) -> usize {
        self.island_index
    }

    /// The island catalog in travel order.
    pub fn islands(&self) -> &[Island] {
        &self.islands
    }

    /// Biome grid of the current island.
    pub fn terrain(&self) -> &BiomeGrid {
        &self.terrain
    }

    /// Resource nodes of the current island.
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Material counts.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Crafted item counts.
    pub fn crafted(&self) -> &CraftedCounts {
        &self.crafted
    }

    /// The recipe catalog and cursor.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Lantern quest progress.
    pub fn quest(&self) -> Quest {
        self.quest
    }

    /// Player position in world units.
    pub fn player_position(&self) -> WorldPoint {
        self.player
    }

    /// Current camera zoom.
    pub fn camera_zoom(&self) -> f32 {
        self.camera_zoom
    }

    /// Rules configuration in effect.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Last status line for the HUD.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the status line.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    /// Places the player directly, bypassing terrain checks.
    ///
    /// Intended for tools and tests; regular movement goes through
    /// [`GameSession::move_player`].
    pub fn teleport_player(&mut self, position: WorldPoint) {
        self.player = position;
    }

    /// Moves the player by a move intent over `dt` seconds.
    ///
    /// The intent is clamped to the unit square and normalized so diagonals
    /// are not faster. Each axis is tried on its own, so the player slides
    /// along the coast instead of sticking to it. Returns true if the player
    /// moved.
    pub fn move_player(&mut self, intent: (f32, f32), dt: f32) -> bool {
        let (mut ix, mut iy) = (intent.0.clamp(-1.0, 1.0), intent.1.clamp(-1.0, 1.0));
        if ix.is_nan() || iy.is_nan() || dt <= 0.0 {
            return false;
        }
        let length = (ix * ix + iy * iy).sqrt();
        if length == 0.0 {
            return false;
        }
        if length > 1.0 {
            ix /= length;
            iy /= length;
        }

        let step = self.rules.move_speed * dt;
        let start = self.player;
        let along_x = WorldPoint::new(self.player.x + ix * step, self.player.y);
        if self.can_stand_at(along_x) {
            self.player = along_x;
        }
        let along_y = WorldPoint::new(self.player.x, self.player.y + iy * step);
        if self.can_stand_at(along_y) {
            self.player = along_y;
        }
        self.player != start
    }

    fn can_stand_at(&self, point: WorldPoint) -> bool {
        let island = self.island();
        let max_x = island.width as f32 * TILE_SIZE;
        let max_y = island.height as f32 * TILE_SIZE;
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < max_x
            && point.y < max_y
            && self.terrain.is_walkable(point.tile())
    }

    /// Whether the player stands within crafting range of the bench.
    pub fn near_bench(&self) -> bool {
        self.player.distance(self.island().bench.center()) <= self.rules.bench_radius
    }

    /// Whether the player stands within sailing range of the dock.
    pub fn near_dock(&self) -> bool {
        self.player.distance(self.island().dock.center()) <= self.rules.dock_radius
    }

    /// Whether the player is close enough to talk to the island's NPC.
    pub fn near_npc(&self) -> bool {
        self.npc_position()
            .is_some_and(|npc| self.player.distance(npc) <= self.rules.npc_radius)
    }

    fn npc_position(&self) -> Option<WorldPoint> {
        self.island().npc.as_ref().map(|npc| npc.tile.center())
    }

    fn npc_name(&self) -> &str {
        self.island().npc.as_ref().map_or("Someone", |npc| npc.name.as_str())
    }

    fn reject<T>(&mut self, violation: RuleViolation) -> IslesResult<T> {
        debug!("Rejected action: {:?}", violation);
        self.status = violation.to_string();
        Err(IslesError::Rule(violation))
    }

    fn record(&mut self, event: GameEvent, status: String) {
        self.events.push(event);
        self.status = status;
        self.dirty = true;
    }

    /// Harvests the nearest un-harvested resource node in range.
    pub fn harvest(&mut self) -> IslesResult<HarvestYield> {
        match rules::harvest(
            self.player,
            &mut self.nodes,
            self.rules.harvest_radius,
            &mut self.inventory,
        ) {
            Ok(yielded) => {
                self.entities.set_variant(yielded.entity, EntityVariant::Depleted);
                self.record(
                    GameEvent::Harvested { kind: yielded.kind },
                    format!("Collected {}.", yielded.kind),
                );
                Ok(yielded)
            }
            Err(violation) => self.reject(violation),
        }
    }

    /// Crafts the selected recipe.
    pub fn craft(&mut self) -> IslesResult<ItemKind> {
        let near_bench = self.near_bench();
        let recipe = self.recipes.selected().clone();
        match rules::craft(&recipe, &mut self.inventory, &mut self.crafted, near_bench) {
            Ok(item) => {
                self.record(
                    GameEvent::Crafted { item },
                    format!("Crafted a {}! ({})", recipe.label, recipe.cost_summary()),
                );
                Ok(item)
            }
            Err(violation) => self.reject(violation),
        }
    }

    fn announce_recipe(&mut self) -> &Recipe {
        let index = self.recipes.selected_index();
        let recipe = self.recipes.selected();
        let status = format!("Recipe: {} ({})", recipe.label, recipe.cost_summary());
        self.record(GameEvent::RecipeSelected { index }, status);
        self.recipes.selected()
    }

    /// Moves the recipe cursor forward, wrapping around.
    pub fn select_next_recipe(&mut self) -> &Recipe {
        self.recipes.select_next();
        self.announce_recipe()
    }

    /// Moves the recipe cursor back, wrapping around.
    pub fn select_previous_recipe(&mut self) -> &Recipe {
        self.recipes.select_previous();
        self.announce_recipe()
    }

    /// Sails to the next island in the catalog.
    ///
    /// The destination is reloaded from scratch: nodes un-harvested, the
    /// player at the spawn tile, island-local entities rebuilt.
    pub fn travel(&mut self) -> IslesResult<usize> {
        let from = self.island_index;
        let to = match rules::travel(from, self.islands.len(), self.near_dock()) {
            Ok(to) => to,
            Err(violation) => return self.reject(violation),
        };
        self.load_island(to)?;
        let status = format!("Sailed to {}.", self.island().name);
        self.record(GameEvent::Sailed { from, to }, status);
        Ok(to)
    }

    /// Talks to the island NPC.
    pub fn talk_to_npc(&mut self) -> IslesResult<NpcOutcome> {
        let before = self.quest;
        let outcome = rules::npc_interact(
            self.player,
            self.npc_position(),
            self.rules.npc_radius,
            &mut self.quest,
            &mut self.crafted,
            &mut self.inventory,
            self.rules.quest_reward_fiber,
        );
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(violation) => return self.reject(violation),
        };

        let name = self.npc_name().to_string();
        let line = match outcome {
            NpcOutcome::Requested => {
                format!("{name}: My lantern went out! Could you craft me a Bug Lantern?")
            }
            NpcOutcome::AwaitingLantern => {
                format!("{name}: Still hoping for that Bug Lantern (1 wood + 2 stone).")
            }
            NpcOutcome::Delivered { reward: (resource, amount) } => {
                format!("{name}: It glows! Take these {amount} {resource}.")
            }
            NpcOutcome::AlreadyHelped => {
                format!("{name}: The lantern keeps the dark away. Thank you!")
            }
        };

        if self.quest != before {
            self.record(GameEvent::QuestAdvanced { quest: self.quest }, line);
        } else {
            self.events.push(GameEvent::Message { text: line.clone() });
            self.status = line;
        }
        Ok(outcome)
    }

    /// The interact button: harvest if a node is in range, otherwise talk to
    /// a nearby NPC.
    pub fn interact(&mut self) -> IslesResult<Interaction> {
        match self.harvest() {
            Ok(yielded) => Ok(Interaction::Harvested(yielded)),
            Err(IslesError::Rule(RuleViolation::NothingToHarvest)) if self.near_npc() => {
                self.talk_to_npc().map(Interaction::Talked)
            }
            Err(error) => Err(error),
        }
    }

    /// Changes the camera zoom by `steps` zoom increments, clamped.
    pub fn adjust_zoom(&mut self, steps: i32) -> f32 {
        let zoom = self
            .rules
            .clamp_zoom(self.camera_zoom + steps as f32 * self.rules.zoom_step);
        if zoom != self.camera_zoom {
            self.camera_zoom = zoom;
            self.dirty = true;
        }
        zoom
    }

    /// Returns and clears the "needs saving" flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Takes the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Takes the entity commands recorded since the last call.
    pub fn drain_entity_commands(&mut self) -> Vec<EntityCommand> {
        self.entities.drain_commands()
    }

    /// Commands that rebuild every live entity from scratch.
    pub fn replay_entities(&self) -> Vec<EntityCommand> {
        self.entities.replay()
    }

    /// Captures everything that survives a restart.
    pub fn snapshot(&self) -> SaveRecord {
        SaveRecord::capture(
            self.island_index,
            &self.inventory,
            &self.crafted,
            self.recipes.selected_index(),
            self.quest,
            Some(self.camera_zoom),
        )
    }

    /// Restores a snapshot, clamping out-of-range values.
    ///
    /// The island is reloaded, so resource nodes come back un-harvested and
    /// the player starts at the spawn tile.
    pub fn restore(&mut self, record: &SaveRecord) -> IslesResult<()> {
        #[cfg(feature = "dev-tools")]
        let _span = tracing::debug_span!("restore", island = record.island_index).entered();

        let island_index = record.clamped_island_index(self.islands.len());
        let recipe_index = record.clamped_recipe_index(self.recipes.len());
        let inventory = record.inventory();
        let crafted = record.crafted();
        let quest = record.quest();
        let zoom = record.camera_zoom.map(|z| self.rules.clamp_zoom(z));

        self.load_island(island_index)?;
        self.recipes.select(recipe_index)?;
        self.inventory = inventory;
        self.crafted = crafted;
        self.quest = quest;
        if let Some(zoom) = zoom {
            self.camera_zoom = zoom;
        }
        self.status = format!("Welcome back to {}.", self.island().name);
        self.dirty = false;
        info!("Restored session on island {}", island_index);
        Ok(())
    }

    /// Creates a session and restores a snapshot into it.
    pub fn from_snapshot(config: &GameConfig, record: &SaveRecord) -> IslesResult<Self> {
        let mut session = Self::new(config)?;
        session.restore(record)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    fn session() -> GameSession {
        GameSession::new(&GameConfig::for_testing()).unwrap()
    }

    fn stand_on(session: &mut GameSession, tile: Position) {
        session.teleport_player(tile.center());
    }

    #[test]
    fn test_session_creation() {
        let mut session = session();
        assert_eq!(session.island_index(), 0);
        assert_eq!(session.nodes().len(), 5);
        assert_eq!(session.player_position(), session.island().spawn.center());
        assert_eq!(session.camera_zoom(), 1.0);
        assert!(!session.take_dirty());
        // dock + bench + 5 nodes
        assert_eq!(session.drain_entity_commands().len(), 7);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = GameSession::with_islands(&GameConfig::for_testing(), Vec::new());
        assert!(matches!(result, Err(IslesError::InvalidState(_))));
    }

    #[test]
    fn test_harvest_marks_depleted_and_dirty() {
        let mut session = session();
        let tile = session.nodes()[0].tile;
        stand_on(&mut session, tile);
        session.drain_entity_commands();

        let yielded = session.harvest().unwrap();
        assert_eq!(yielded.kind, ResourceType::Wood);
        assert_eq!(session.inventory().count(ResourceType::Wood), 1);
        assert_eq!(session.status(), "Collected wood.");
        assert!(session.take_dirty());

        let commands = session.drain_entity_commands();
        assert_eq!(
            commands,
            vec![EntityCommand::SetVariant {
                id: yielded.entity,
                variant: EntityVariant::Depleted
            }]
        );
    }

    #[test]
    fn test_rejection_sets_status_without_dirty() {
        let mut session = session();
        stand_on(&mut session, Position::new(10, 10));
        let result = session.craft();
        assert!(matches!(result, Err(IslesError::Rule(RuleViolation::NotNearBench))));
        assert_eq!(session.status(), "Stand by the craft bench to craft.");
        assert!(!session.take_dirty());
    }

    #[test]
    fn test_travel_requires_dock() {
        let mut session = session();
        let result = session.travel();
        assert!(matches!(result, Err(IslesError::Rule(RuleViolation::NotNearDock))));
        assert_eq!(session.island_index(), 0);

        let dock = session.island().dock;
        stand_on(&mut session, dock);
        assert_eq!(session.travel().unwrap(), 1);
        assert_eq!(session.island().name, "Pebble Ring");
        assert_eq!(session.player_position(), session.island().spawn.center());
        assert!(session
            .drain_events()
            .contains(&GameEvent::Sailed { from: 0, to: 1 }));
    }

    #[test]
    fn test_move_player_blocked_by_water() {
        let mut session = session();
        let start = session.player_position();
        assert!(session.move_player((1.0, 0.0), 0.5));
        assert_eq!(session.player_position().x, start.x + 30.0);
        assert_eq!(session.player_position().y, start.y);

        // Walk north for a long time: the coast stops the player.
        for _ in 0..200 {
            session.move_player((0.0, -1.0), 0.1);
        }
        let tile = session.player_position().tile();
        assert!(session.terrain().is_walkable(tile));
        assert!(tile.y >= 0);
        assert!(!session.move_player((0.0, -1.0), 0.1));
    }

    #[test]
    fn test_move_player_normalizes_diagonals() {
        let mut session = session();
        let start = session.player_position();
        session.move_player((1.0, 1.0), 0.1);
        let moved = start.distance(session.player_position());
        assert!((moved - 6.0).abs() < 1e-3);
        assert!(!session.move_player((0.0, 0.0), 0.1));
        assert!(!session.move_player((f32::NAN, 0.0), 0.1));
    }

    #[test]
    fn test_interact_falls_back_to_npc() {
        let mut session = session();
        let dock = session.island().dock;
        stand_on(&mut session, dock);
        session.travel().unwrap();

        let npc = session.island().npc.clone().unwrap();
        stand_on(&mut session, npc.tile);
        let interaction = session.interact().unwrap();
        assert_eq!(interaction, Interaction::Talked(NpcOutcome::Requested));
        assert_eq!(session.quest(), Quest::Requested);
        assert!(session.status().starts_with("Old Beetle:"));
    }

    #[test]
    fn test_talk_without_npc() {
        let mut session = session();
        let result = session.talk_to_npc();
        assert!(matches!(result, Err(IslesError::Rule(RuleViolation::NoNpcOnIsland))));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut session = session();
        assert_eq!(session.adjust_zoom(1), 1.25);
        assert!(session.take_dirty());
        assert_eq!(session.adjust_zoom(100), 2.25);
        assert_eq!(session.adjust_zoom(-100), 0.75);
        session.take_dirty();
        assert_eq!(session.adjust_zoom(-1), 0.75);
        assert!(!session.take_dirty());
    }

    #[test]
    fn test_recipe_selection_wraps() {
        let mut session = session();
        assert_eq!(session.select_next_recipe().key, ItemKind::BugLantern);
        assert_eq!(session.select_next_recipe().key, ItemKind::RaftKit);
        assert_eq!(session.select_previous_recipe().key, ItemKind::BugLantern);
        assert_eq!(session.status(), "Recipe: Bug Lantern (1 wood + 2 stone)");
    }
}

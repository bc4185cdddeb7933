//! Property-based and randomized tests for the rules engine and the terrain
//! classifier.

use ladybug_isles::game::rules;
use ladybug_isles::{
    classify, default_islands, edge_blend, Biome, BiomeGrid, CraftedCounts, GameConfig, GameSession,
    Inventory, ItemKind, Quest, RecipeBook, ResourceType, TerrainConfig,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

proptest! {
    #[test]
    fn craft_succeeds_iff_affordable(
        wood in 0u32..5,
        stone in 0u32..5,
        fiber in 0u32..5,
        index in 0usize..2,
    ) {
        let book = RecipeBook::default();
        let recipe = book.recipe(index).unwrap().clone();
        let before = Inventory::with_counts(wood, stone, fiber);
        let affordable = recipe
            .cost
            .iter()
            .all(|(resource, amount)| before.count(*resource) >= *amount);

        let mut inventory = before;
        let mut crafted = CraftedCounts::new();
        let result = rules::craft(&recipe, &mut inventory, &mut crafted, true);

        prop_assert_eq!(result.is_ok(), affordable);
        if affordable {
            for resource in ResourceType::ALL {
                let cost = recipe
                    .cost
                    .iter()
                    .find(|(kind, _)| *kind == resource)
                    .map_or(0, |(_, amount)| *amount);
                prop_assert_eq!(inventory.count(resource), before.count(resource) - cost);
            }
            prop_assert_eq!(crafted.count(recipe.key), 1);
        } else {
            prop_assert_eq!(inventory, before);
            prop_assert_eq!(crafted.count(recipe.key), 0);
        }
    }

    #[test]
    fn craft_away_from_bench_never_mutates(wood in 0u32..5, stone in 0u32..5, fiber in 0u32..5) {
        let book = RecipeBook::default();
        let before = Inventory::with_counts(wood, stone, fiber);
        let mut inventory = before;
        let mut crafted = CraftedCounts::new();
        prop_assert!(rules::craft(book.selected(), &mut inventory, &mut crafted, false).is_err());
        prop_assert_eq!(inventory, before);
        prop_assert_eq!(crafted, CraftedCounts::new());
    }

    #[test]
    fn travel_always_lands_in_catalog(current in 0usize..10, count in 1usize..10) {
        let current = current % count;
        let next = rules::travel(current, count, true).unwrap();
        prop_assert!(next < count);
        prop_assert_eq!(next, (current + 1) % count);
        prop_assert!(rules::travel(current, count, false).is_err());
    }

    #[test]
    fn classify_is_deterministic(x in -4i32..24, y in -4i32..16, seed in any::<u32>()) {
        let config = TerrainConfig::new();
        let first = classify(x, y, seed, 20, 12, &config);
        let second = classify(x, y, seed, 20, 12, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn grid_border_is_water_and_center_is_grass(seed in any::<u32>()) {
        let grid = BiomeGrid::classify(20, 12, seed, &TerrainConfig::new());
        for (pos, cell) in grid.iter() {
            if pos.x == 0 || pos.y == 0 || pos.x == 19 || pos.y == 11 {
                prop_assert_eq!(cell.biome, Biome::Water);
            }
        }
        prop_assert_eq!(grid.biome_at(ladybug_isles::Position::new(9, 5)), Biome::Grass);
    }

    #[test]
    fn blends_only_point_at_lower_biomes(seed in any::<u32>()) {
        let grid = BiomeGrid::classify(20, 12, seed, &TerrainConfig::new());
        for (pos, cell) in grid.iter() {
            for blend in edge_blend(pos.x, pos.y, &grid) {
                prop_assert!(blend.target < cell.biome);
            }
        }
    }
}

#[test]
fn random_play_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(0x1ad_b06);
    let config = GameConfig::for_testing();
    let island_count = default_islands().len();

    for _ in 0..8 {
        let mut session = GameSession::new(&config).unwrap();
        let mut quest = session.quest();

        for _ in 0..400 {
            match rng.gen_range(0..8) {
                0..=2 => {
                    let intent = (rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
                    session.move_player(intent, rng.gen_range(0.0..0.3));
                }
                3 => {
                    let _ = session.interact();
                }
                4 => {
                    let _ = session.craft();
                }
                5 => {
                    let _ = session.travel();
                }
                6 => {
                    session.select_next_recipe();
                }
                _ => {
                    // Teleport next to a random hotspot to make actions likely.
                    let tiles = session.island().hotspot_tiles();
                    let tile = tiles[rng.gen_range(0..tiles.len())];
                    session.teleport_player(tile.center());
                }
            }

            assert!(session.island_index() < island_count);
            assert!(session.quest() >= quest, "quest went backwards");
            quest = session.quest();

            let tile = session.player_position().tile();
            assert!(session.island().contains(tile));
            let zoom = session.camera_zoom();
            assert!(zoom >= session.rules().min_zoom && zoom <= session.rules().max_zoom);

            let restored = GameSession::from_snapshot(&config, &session.snapshot()).unwrap();
            assert_eq!(restored.snapshot(), session.snapshot());
        }
    }
}

#[test]
fn random_play_never_loses_crafted_items_without_delivery() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut session = GameSession::new(&GameConfig::for_testing()).unwrap();
    let mut lanterns = session.crafted().count(ItemKind::BugLantern);

    for _ in 0..1000 {
        let tiles = session.island().hotspot_tiles();
        let tile = tiles[rng.gen_range(0..tiles.len())];
        session.teleport_player(tile.center());
        if rng.gen_bool(0.3) {
            session.select_next_recipe();
        }
        let quest_before = session.quest();
        let _ = session.interact();
        let _ = session.craft();
        let _ = session.travel();

        let now = session.crafted().count(ItemKind::BugLantern);
        if now < lanterns {
            assert_eq!(quest_before, Quest::Requested);
            assert_eq!(session.quest(), Quest::Delivered);
        }
        lanterns = now;
    }
}

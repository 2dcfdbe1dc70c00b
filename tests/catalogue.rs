// Invariants of the built-in level catalogue.
// These tests avoid wasm/browser APIs and run natively.

use std::collections::HashSet;

use block_hop::{CharacterTimings, Hopper, LevelConfig, LevelController, levels};

#[test]
fn catalogue_is_nonempty_with_unique_names() {
    let mut seen = HashSet::new();
    assert!(!levels().is_empty());
    for spec in levels() {
        assert!(!spec.name.is_empty());
        assert!(seen.insert(spec.name.as_str()), "duplicate level name '{}'", spec.name);
    }
}

#[test]
fn every_level_is_13_columns_wide() {
    for spec in levels() {
        for (i, row) in spec.blocks.iter().enumerate() {
            assert_eq!(row.len(), 13, "row {} of '{}' has width {}", i, spec.name, row.len());
        }
    }
}

#[test]
fn default_spawn_lands_on_a_block_in_every_level() {
    let cfg = LevelConfig::default();
    for spec in levels() {
        let hopper = Hopper::new(cfg.spawn, &cfg, &CharacterTimings::default());
        let level = LevelController::new(spec, &cfg, hopper).unwrap();
        assert!(
            level.grid().at(cfg.spawn).is_some(),
            "spawn {} is a pit in '{}'",
            cfg.spawn,
            spec.name
        );
        assert_eq!(level.grid().len(), spec.block_count());
    }
}

#[test]
fn no_level_starts_cleared() {
    for spec in levels() {
        let unsolved = spec
            .blocks
            .iter()
            .flatten()
            .flatten()
            .filter(|kind| **kind != spec.ref_block)
            .count();
        assert!(unsolved > 0, "'{}' is already solved", spec.name);
    }
}

#[test]
fn diamond_has_two_pre_solved_corners() {
    let diamond = levels().iter().find(|s| s.name == "Diamond").unwrap();
    let solved = diamond
        .blocks
        .iter()
        .flatten()
        .flatten()
        .filter(|kind| **kind == diamond.ref_block)
        .count();
    assert_eq!(solved, 2);
}

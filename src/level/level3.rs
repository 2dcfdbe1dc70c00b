// Level 3: a diamond whose outer corners already show the reference face.
use super::{BlockKind, LevelSpec};

pub fn level3() -> LevelSpec {
    let mut spec = LevelSpec::from_pattern(
        "Diamond",
        "red",
        "purple",
        &[
            "......#......",
            ".....#.#.....",
            "....#.#.#....",
            "...#.#.#.#...",
            "....#.#.#....",
            ".....#.#.....",
            "......#......",
        ],
    );
    // Left and right corners: both faces are red, so they stay solved.
    for (row, column) in [(3, 3), (3, 9)] {
        spec.blocks[row][column] = Some(BlockKind::from("red"));
    }
    spec
}

// Level 2: a pyramid with holes punched through the middle rows.
use super::LevelSpec;

pub fn level2() -> LevelSpec {
    LevelSpec::from_pattern(
        "Broken Steps",
        "green",
        "grey",
        &[
            "......#......",
            ".....#.#.....",
            "....#...#....",
            "...#.#.#.#...",
            "..#.#...#.#..",
            ".#.#.#.#.#.#.",
        ],
    )
}

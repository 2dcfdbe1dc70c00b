// Level 1: the classic pyramid. Every block starts yellow and must turn blue.
use super::LevelSpec;

pub fn level1() -> LevelSpec {
    LevelSpec::from_pattern(
        "Pyramid",
        "blue",
        "yellow",
        &[
            "......#......",
            ".....#.#.....",
            "....#.#.#....",
            "...#.#.#.#...",
            "..#.#.#.#.#..",
            ".#.#.#.#.#.#.",
            "#.#.#.#.#.#.#",
        ],
    )
}

use super::block::BlockKind;
use super::grid::BlockGrid;

/// True when every placed block shows `target`. An empty grid is never cleared.
pub fn is_level_cleared(grid: &BlockGrid, target: &BlockKind) -> bool {
    !grid.is_empty() && grid.iter().all(|(_, block)| block.current_face() == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Direction;
    use crate::level::Block;

    fn grid_of(kinds: &[&str]) -> BlockGrid {
        let mut g = BlockGrid::new();
        for (i, k) in kinds.iter().enumerate() {
            g.set(0, i as i32, Block::new(BlockKind::from(*k), BlockKind::from("A"), 10.0));
        }
        g
    }

    #[test]
    fn test_empty_grid_is_not_cleared() {
        assert!(!is_level_cleared(&BlockGrid::new(), &BlockKind::from("A")));
    }

    #[test]
    fn test_grid_without_target_face_is_not_cleared() {
        let g = grid_of(&["B", "B", "C"]);
        assert!(!is_level_cleared(&g, &BlockKind::from("A")));
    }

    #[test]
    fn test_cleared_once_every_block_reaches_target() {
        let mut g = grid_of(&["B", "B"]);
        let target = BlockKind::from("A");
        g.get_mut(0, 0).unwrap().rotate(Direction::DownLeft);
        assert!(!is_level_cleared(&g, &target));
        g.get_mut(0, 1).unwrap().rotate(Direction::DownRight);
        assert!(is_level_cleared(&g, &target));
        g.get_mut(0, 1).unwrap().rotate(Direction::UpLeft);
        assert!(!is_level_cleared(&g, &target));
    }

    #[test]
    fn test_block_already_at_target_counts() {
        let g = grid_of(&["A"]);
        assert!(is_level_cleared(&g, &BlockKind::from("A")));
    }
}

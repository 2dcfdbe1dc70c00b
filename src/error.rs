use crate::level::GridCoord;

/// Failures raised by the level core.
///
/// Falling into a pit is not an error: it is an ordinary game event that
/// `BlockGrid::get` reports as `None`.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The character stood on a coordinate that should hold a block by construction.
    #[error("grid inconsistency: no block under the character at {0}")]
    GridInconsistency(GridCoord),

    #[error("level layout contains no blocks")]
    EmptyLayout,

    #[error("respawn requested while the block at {0} is still rotating")]
    RotationInFlight(GridCoord),

    #[error("invalid level data: {0}")]
    InvalidLevelData(String),
}

pub type LevelResult<T> = Result<T, LevelError>;

use serde::{Deserialize, Serialize};

/// One grid position with its mine, visibility, and marker state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    /// Exact number of mines among the neighbors; always 0 on mine cells.
    pub adjacent_mine_count: u8,
    pub is_revealed: bool,
    pub is_flagged: bool,
}

impl Cell {
    /// Neither revealed nor flagged, a candidate for reveal or auto-flagging.
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }
}

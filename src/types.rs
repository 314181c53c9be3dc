//! Core types shared by the focus, portal and context modules.

// =============================================================================
// Grid Position
// =============================================================================

/// A cell in the focus grid.
///
/// Rows grow downward, columns grow rightward. Positions are either given
/// explicitly by a focusable or assigned from the focus manager's running
/// row/column cursor during registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

// =============================================================================
// Navigation Direction
// =============================================================================

/// Direction of a focus move.
///
/// `Next`/`Prev` are the Tab/Shift+Tab intents; the arrows are spatial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Next,
    Prev,
}

impl Direction {
    /// Whether a linear fallback for this direction advances the flat index.
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right | Direction::Next)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

// =============================================================================
// Portal Layer
// =============================================================================

/// Stacking layer of a portal. Ordered bottom to top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    #[default]
    Base,
    Overlay,
    Modal,
    Toast,
    Tooltip,
}

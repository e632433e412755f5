use crossterm::style::{Color, StyledContent, Stylize};

use std::fmt;

/// Represents a single cell of the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Impassable.
    Wall,
    /// Passable and not yet visited.
    Empty,
    /// Passable cell carrying a region id during generation, or a discovery
    /// order during breadth-first search.
    Label(u32),
    /// Trail marker left by solvers and by path reconstruction.
    Visited,
    /// Dead end discovered by depth-first search.
    BadWay,
    Start,
    Goal,
}

impl Cell {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }

    pub fn label(self) -> Option<u32> {
        match self {
            Cell::Label(n) => Some(n),
            _ => None,
        }
    }

    /// Whether a solver may step onto this cell.
    pub fn is_open(self) -> bool {
        matches!(self, Cell::Empty | Cell::Goal)
    }

    pub fn styled(self) -> StyledContent<&'static str> {
        let styled_symbol = match self {
            Cell::Wall => "⬜".with(Color::White),
            Cell::Empty => "  ".with(Color::Reset),
            Cell::Label(_) => "  ".on(Color::DarkCyan),
            Cell::Visited => "* ".with(Color::Blue),
            Cell::BadWay => "xx".with(Color::Red),
            Cell::Start => "🟩".with(Color::Green),
            Cell::Goal => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Cell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        styled_symbol
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.styled())
    }
}

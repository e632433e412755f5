use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    frames::{Frame, Renderer},
    maze::Cell,
};

/// Draws frames onto the terminal, two columns per cell.
pub struct TerminalRenderer {
    stdout: Stdout,
    /// Grid dimensions of the last frame drawn
    grid_dims: Option<(u16, u16)>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            grid_dims: None,
        }
    }

    /// Background colour for a labelled cell, or `None` to use its default glyph.
    fn label_color(frame: &Frame, label: u32) -> Option<Color> {
        if frame.hints.random_color {
            // Same label, same colour; skip the darkest part of the cube
            return Some(match label {
                0 => Color::Black,
                n => Color::AnsiValue(17 + (n.wrapping_mul(2_654_435_761) % 214) as u8),
            });
        }
        if frame.hints.search_in_progress {
            // Older discoveries fade from cyan to magenta
            let ratio = label as f64 / frame.grid.area().max(1) as f64;
            return Some(match ratio {
                r if r < 0.1 => Color::Cyan,
                r if r < 0.25 => Color::Yellow,
                r if r < 0.5 => Color::Red,
                _ => Color::Magenta,
            });
        }
        None
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame) -> std::io::Result<()> {
        let grid = &frame.grid;
        let dims = (grid.width(), grid.height());
        if self.grid_dims != Some(dims) {
            self.stdout.queue(terminal::Clear(ClearType::All))?;
            self.grid_dims = Some(dims);
        }

        let path = &frame.hints.highlighted_path;
        for y in 0..grid.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..grid.width() {
                let cell = grid[(x, y)];
                let on_path = !matches!(cell, Cell::Start | Cell::Goal) && path.contains(&(x, y));
                match cell {
                    _ if on_path => {
                        self.stdout.queue(style::PrintStyledContent("  ".on(Color::Green)))?;
                    }
                    Cell::Label(label) => match TerminalRenderer::label_color(frame, label) {
                        Some(color) => {
                            self.stdout.queue(style::PrintStyledContent("  ".on(color)))?;
                        }
                        None => {
                            self.stdout.queue(style::Print(cell))?;
                        }
                    },
                    _ => {
                        self.stdout.queue(style::Print(cell))?;
                    }
                }
            }
        }

        queue!(
            self.stdout,
            cursor::MoveTo(0, grid.height()),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(
                format!("frame v{} | path {}", grid.version(), path.len()).with(Color::DarkGrey)
            ),
        )?;
        self.stdout.flush()
    }
}

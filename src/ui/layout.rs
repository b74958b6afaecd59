use crate::terminal::CursorPos;
use crate::ui::span::{SpanLine, line_width};

/// One widget's contribution to a frame: its rendered lines plus, when the
/// widget owns the cursor, the cursor position local to those lines.
#[derive(Debug, Clone, Default)]
pub struct LayoutBlock {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<(usize, usize)>,
}

impl LayoutBlock {
    pub fn new(lines: Vec<SpanLine>) -> Self {
        Self {
            lines,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, row: usize, col: usize) -> Self {
        self.cursor = Some((row, col));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

impl RenderFrame {
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> usize {
        self.lines.iter().map(|line| line_width(line)).max().unwrap_or(0)
    }
}

/// Stacks widget blocks vertically into a single frame, resolving the first
/// block-local cursor into an absolute row/column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Layout {
    margin: usize,
}

impl Layout {
    pub fn new() -> Self {
        Self { margin: 0 }
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn compose<I>(&self, blocks: I) -> RenderFrame
    where
        I: IntoIterator<Item = LayoutBlock>,
    {
        let mut frame = RenderFrame::default();
        let mut row = 0usize;

        for block in blocks {
            if frame.cursor.is_none()
                && let Some((cursor_row, cursor_col)) = block.cursor
            {
                frame.cursor = Some(CursorPos {
                    row: (row + cursor_row) as u16,
                    col: (self.margin + cursor_col) as u16,
                });
            }

            for mut line in block.lines {
                if self.margin > 0 {
                    line.insert(
                        0,
                        crate::ui::span::Span::new(" ".repeat(self.margin)).no_wrap(),
                    );
                }
                frame.lines.push(line);
                row += 1;
            }
        }

        frame
    }
}

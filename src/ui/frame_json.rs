//! JSON snapshot of a rendered frame, used by the headless mode of the demo
//! binary and by render tests.

use crate::terminal::TerminalSize;
use crate::ui::layout::RenderFrame;
use crate::ui::span::{Span, WrapMode};
use crate::ui::style::Color;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub terminal: SizeSnapshot,
    pub cursor: Option<CursorSnapshot>,
    pub lines: Vec<Vec<SpanSnapshot>>,
}

#[derive(Debug, Serialize)]
pub struct SizeSnapshot {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Serialize)]
pub struct CursorSnapshot {
    pub row: u16,
    pub col: u16,
}

#[derive(Debug, Serialize)]
pub struct SpanSnapshot {
    pub text: String,
    pub wrap_mode: &'static str,
    pub style: StyleSnapshot,
}

#[derive(Debug, Serialize)]
pub struct StyleSnapshot {
    pub color: Option<&'static str>,
    pub background: Option<&'static str>,
    pub bold: bool,
}

pub fn snapshot(frame: &RenderFrame, size: TerminalSize) -> FrameSnapshot {
    FrameSnapshot {
        terminal: SizeSnapshot {
            width: size.width,
            height: size.height,
        },
        cursor: frame.cursor.map(|cursor| CursorSnapshot {
            row: cursor.row,
            col: cursor.col,
        }),
        lines: frame
            .lines
            .iter()
            .map(|line| line.iter().map(span_snapshot).collect())
            .collect(),
    }
}

pub fn frame_to_json(frame: &RenderFrame, size: TerminalSize) -> serde_json::Value {
    serde_json::to_value(snapshot(frame, size)).unwrap_or(serde_json::Value::Null)
}

fn span_snapshot(span: &Span) -> SpanSnapshot {
    SpanSnapshot {
        text: span.text.clone(),
        wrap_mode: match span.wrap_mode {
            WrapMode::NoWrap => "no_wrap",
            WrapMode::Wrap => "wrap",
        },
        style: StyleSnapshot {
            color: span.style.color.map(color_name),
            background: span.style.background.map(color_name),
            bold: span.style.bold,
        },
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::Reset => "reset",
        Color::Black => "black",
        Color::DarkGrey => "dark_grey",
        Color::Red => "red",
        Color::Green => "green",
        Color::Yellow => "yellow",
        Color::Blue => "blue",
        Color::Magenta => "magenta",
        Color::Cyan => "cyan",
        Color::White => "white",
    }
}

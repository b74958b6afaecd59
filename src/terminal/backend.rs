use crate::ui::layout::RenderFrame;
use crate::ui::span::Span;
use crate::ui::style::Color;
use crossterm::cursor::{Hide, MoveTo, MoveToColumn, Show, position};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers as CrosstermKeyModifiers,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Char(char),
    Enter,
    Tab,
    BackTab,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize(TerminalSize),
    Tick,
}

/// Inline-rendering terminal: frames are drawn starting at the row where the
/// program was launched, redrawing in place between events.
pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    origin_row: u16,
    drawn_lines: u16,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout();
        let (width, height) = terminal::size()?;
        let (_, origin_row) = position()?;
        Ok(Self {
            stdout,
            size: TerminalSize { width, height },
            origin_row,
            drawn_lines: 0,
        })
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, DisableLineWrap, Hide)
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnableLineWrap, Show)?;
        terminal::disable_raw_mode()
    }

    pub fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Ok(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Resize(width, height) => {
                self.size = TerminalSize { width, height };
                self.clamp_origin();
                Ok(TerminalEvent::Resize(self.size))
            }
            _ => Ok(TerminalEvent::Tick),
        }
    }

    /// Redraw `frame` in place and park the hardware cursor on the frame's
    /// cursor position, if it has one.
    pub fn draw(&mut self, frame: &RenderFrame) -> io::Result<()> {
        self.reserve_rows(frame.lines.len() as u16)?;

        for (row, line) in frame.lines.iter().enumerate() {
            queue!(
                self.stdout,
                MoveTo(0, self.origin_row + row as u16),
                Clear(ClearType::CurrentLine)
            )?;
            for span in line {
                self.queue_span(span)?;
            }
        }
        for row in frame.lines.len() as u16..self.drawn_lines {
            queue!(
                self.stdout,
                MoveTo(0, self.origin_row + row),
                Clear(ClearType::CurrentLine)
            )?;
        }
        self.drawn_lines = frame.lines.len() as u16;

        match frame.cursor {
            Some(cursor) => queue!(
                self.stdout,
                MoveTo(cursor.col, self.origin_row + cursor.row),
                Show
            )?,
            None => queue!(self.stdout, Hide)?,
        }

        self.stdout.flush()
    }

    /// Leave the drawn frame behind and move to the first free row below it.
    pub fn move_below_frame(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            MoveTo(0, self.origin_row + self.drawn_lines),
            Print("\r\n"),
            MoveToColumn(0)
        )
    }

    fn queue_span(&mut self, span: &Span) -> io::Result<()> {
        if let Some(color) = span.style.color {
            queue!(self.stdout, SetForegroundColor(map_color(color)))?;
        }
        if let Some(color) = span.style.background {
            queue!(self.stdout, SetBackgroundColor(map_color(color)))?;
        }
        if span.style.bold {
            queue!(self.stdout, SetAttribute(Attribute::Bold))?;
        }
        queue!(self.stdout, Print(span.text.as_str()))?;
        if span.style.bold {
            queue!(self.stdout, SetAttribute(Attribute::NormalIntensity))?;
        }
        if span.style.color.is_some() || span.style.background.is_some() {
            queue!(self.stdout, ResetColor)?;
        }
        Ok(())
    }

    /// Scroll the viewport when the frame would run past the bottom edge.
    fn reserve_rows(&mut self, rows: u16) -> io::Result<()> {
        let bottom = self.origin_row.saturating_add(rows);
        if bottom > self.size.height {
            let shift = bottom - self.size.height;
            queue!(self.stdout, terminal::ScrollUp(shift))?;
            self.origin_row = self.origin_row.saturating_sub(shift);
        }
        Ok(())
    }

    fn clamp_origin(&mut self) {
        self.origin_row = self.origin_row.min(self.size.height.saturating_sub(1));
    }
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(key.code),
        modifiers: map_modifiers(key.modifiers),
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

fn map_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::NONE;
    if modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        out = KeyModifiers(out.0 | KeyModifiers::SHIFT.0);
    }
    if modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        out = KeyModifiers(out.0 | KeyModifiers::CONTROL.0);
    }
    if modifiers.contains(CrosstermKeyModifiers::ALT) {
        out = KeyModifiers(out.0 | KeyModifiers::ALT.0);
    }
    out
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::Reset => CrosstermColor::Reset,
        Color::Black => CrosstermColor::Black,
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Red => CrosstermColor::Red,
        Color::Green => CrosstermColor::Green,
        Color::Yellow => CrosstermColor::Yellow,
        Color::Blue => CrosstermColor::Blue,
        Color::Magenta => CrosstermColor::Magenta,
        Color::Cyan => CrosstermColor::Cyan,
        Color::White => CrosstermColor::White,
    }
}

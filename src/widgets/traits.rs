use crate::terminal::{CursorPos, KeyEvent, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Focus & validation modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Node does not participate in focus cycling.
    None,
    /// A single focusable leaf (text input, masked input, …).
    Leaf,
}

/// Controls how strictly a widget validates its current value.
///
/// - `Live`   — called on every keystroke; partial / in-progress input is
///              acceptable (e.g. a masked field while the user is typing).
/// - `Submit` — called when the form is submitted; the value must be
///              complete and valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Live,
    Submit,
}

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub focused_id: Option<String>,
    pub terminal_size: TerminalSize,
    /// Nodes whose validation error should be shown inline.
    pub visible_errors: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(size: TerminalSize) -> Self {
        Self {
            focused_id: None,
            terminal_size: size,
            visible_errors: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

impl DrawOutput {
    pub fn plain_lines(lines: Vec<String>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|line| vec![Span::new(line).no_wrap()])
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Drawable — every node can draw itself
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    ValueChanged { id: String, value: String },
    Submitted { id: String, value: String },
}

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
        self.actions.extend(other.actions);
    }
}

// ---------------------------------------------------------------------------
// Interactive — input nodes
// ---------------------------------------------------------------------------

pub trait Interactive: Send {
    fn focus_mode(&self) -> FocusMode;

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn value(&self) -> Option<String> {
        None
    }
    fn set_value(&mut self, _value: &str) {}

    /// Validate the current value.
    ///
    /// `Live` mode is called on every keystroke; partial input is acceptable.
    /// `Submit` mode is called on form submission; the value must be complete.
    fn validate(&self, _mode: ValidationMode) -> Result<(), String> {
        Ok(())
    }

    /// Focus left the widget. Masked inputs finalize their value here.
    fn on_blur(&mut self) {}

    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}

// ---------------------------------------------------------------------------
// InteractiveNode — combined bound used by the form registry
// ---------------------------------------------------------------------------

pub trait InteractiveNode: Drawable + Interactive {}
impl<T> InteractiveNode for T where T: Drawable + Interactive {}

// ---------------------------------------------------------------------------
// OutputNode — output nodes
// ---------------------------------------------------------------------------

pub trait OutputNode: Drawable {
    fn set_value(&mut self, _value: &str) {}
}

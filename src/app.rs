use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
use crate::ui::layout::{Layout, LayoutBlock, RenderFrame};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::traits::{
    DrawOutput, InteractiveNode, OutputNode, RenderContext, ValidationMode, WidgetAction,
};
use indexmap::IndexMap;
use std::collections::HashMap;

const CONTENT_INDENT: usize = 2;

enum FormNode {
    Input(Box<dyn InteractiveNode>),
    Output(Box<dyn OutputNode>),
}

/// Ordered widget registry with focus cycling, submit validation and frame
/// building. Owns no terminal; the caller drives it with key events and
/// draws the frames it produces.
pub struct FormApp {
    nodes: IndexMap<String, FormNode>,
    focused: Option<String>,
    errors: HashMap<String, String>,
    submitted: bool,
    should_exit: bool,
}

impl Default for FormApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FormApp {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            focused: None,
            errors: HashMap::new(),
            submitted: false,
            should_exit: false,
        }
    }

    pub fn with_input(mut self, widget: impl InteractiveNode + 'static) -> Self {
        let id = widget.id().to_string();
        if self.focused.is_none() {
            self.focused = Some(id.clone());
        }
        self.nodes.insert(id, FormNode::Input(Box::new(widget)));
        self
    }

    pub fn with_output(mut self, widget: impl OutputNode + 'static) -> Self {
        let id = widget.id().to_string();
        self.nodes.insert(id, FormNode::Output(Box::new(widget)));
        self
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn was_submitted(&self) -> bool {
        self.submitted
    }

    pub fn error(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Current values of every input widget, in declaration order.
    pub fn values(&self) -> IndexMap<String, String> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| match node {
                FormNode::Input(widget) => Some((id.clone(), widget.value().unwrap_or_default())),
                FormNode::Output(_) => None,
            })
            .collect()
    }

    pub fn set_output_value(&mut self, id: &str, value: &str) {
        if let Some(FormNode::Output(widget)) = self.nodes.get_mut(id) {
            widget.set_value(value);
        }
    }

    /// Share of inputs that currently pass submit validation, as a
    /// percentage written into the output widget `id`.
    pub fn sync_progress(&mut self, id: &str) {
        let inputs: Vec<bool> = self
            .nodes
            .values()
            .filter_map(|node| match node {
                FormNode::Input(widget) => {
                    Some(widget.validate(ValidationMode::Submit).is_ok())
                }
                FormNode::Output(_) => None,
            })
            .collect();
        if inputs.is_empty() {
            return;
        }
        let done = inputs.iter().filter(|ok| **ok).count();
        let percent = done as f64 / inputs.len() as f64 * 100.0;
        self.set_output_value(id, &format!("{percent}"));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.should_exit = true;
                true
            }
            KeyCode::Tab => {
                self.cycle_focus(1);
                true
            }
            KeyCode::BackTab => {
                self.cycle_focus(-1);
                true
            }
            _ => self.dispatch_to_focused(key),
        }
    }

    fn dispatch_to_focused(&mut self, key: KeyEvent) -> bool {
        let Some(id) = self.focused.clone() else {
            return false;
        };
        let Some(FormNode::Input(widget)) = self.nodes.get_mut(&id) else {
            return false;
        };
        let result = widget.on_key(key);
        if result.handled {
            self.errors.remove(&id);
        }
        let mut submit_requested = false;
        for action in &result.actions {
            if matches!(action, WidgetAction::Submitted { .. }) {
                submit_requested = true;
            }
        }
        if submit_requested {
            self.submit();
        }
        result.handled || submit_requested
    }

    /// Validate every input in Submit mode; exit the form only when all of
    /// them accept.
    pub fn submit(&mut self) {
        if let Some(id) = self.focused.clone()
            && let Some(FormNode::Input(widget)) = self.nodes.get_mut(&id)
        {
            widget.on_blur();
        }

        self.errors.clear();
        for (id, node) in &self.nodes {
            if let FormNode::Input(widget) = node
                && let Err(message) = widget.validate(ValidationMode::Submit)
            {
                self.errors.insert(id.clone(), message);
            }
        }

        if self.errors.is_empty() {
            self.submitted = true;
            self.should_exit = true;
        }
    }

    fn input_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| match node {
                FormNode::Input(_) => Some(id.clone()),
                FormNode::Output(_) => None,
            })
            .collect()
    }

    fn cycle_focus(&mut self, step: isize) {
        let ids = self.input_ids();
        if ids.is_empty() {
            return;
        }
        let current = self
            .focused
            .as_ref()
            .and_then(|id| ids.iter().position(|candidate| candidate == id))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(ids.len() as isize) as usize;

        if let Some(id) = self.focused.clone()
            && let Some(FormNode::Input(widget)) = self.nodes.get_mut(&id)
        {
            widget.on_blur();
        }
        self.focused = Some(ids[next].clone());
    }

    pub fn build_frame(&self, size: TerminalSize) -> RenderFrame {
        let mut ctx = RenderContext::new(size);
        ctx.focused_id = self.focused.clone();
        ctx.visible_errors = self.errors.clone();

        let mut blocks = Vec::<LayoutBlock>::new();
        for (id, node) in &self.nodes {
            blocks.push(match node {
                FormNode::Input(widget) => self.input_block(id, widget.as_ref(), &ctx),
                FormNode::Output(widget) => output_block(widget.as_ref(), &ctx),
            });
        }

        Layout::new().compose(blocks)
    }

    fn input_block(&self, id: &str, widget: &dyn InteractiveNode, ctx: &RenderContext) -> LayoutBlock {
        let focused = ctx.focused_id.as_deref() == Some(id);
        let marker = if focused { ">" } else { " " };
        let label_style = if focused {
            Style::new().color(Color::Cyan).bold()
        } else {
            Style::default()
        };

        let mut lines = vec![vec![
            Span::styled(format!("{marker} {}", widget.label()), label_style).no_wrap(),
        ]];
        let DrawOutput { lines: content } = widget.draw(ctx);
        let content_rows = content.len();
        for mut line in content {
            line.insert(0, Span::new(" ".repeat(CONTENT_INDENT)).no_wrap());
            lines.push(line);
        }
        if let Some(message) = ctx.visible_errors.get(id) {
            lines.push(vec![
                Span::new(" ".repeat(CONTENT_INDENT)).no_wrap(),
                Span::styled(message.clone(), Style::new().color(Color::Red)).no_wrap(),
            ]);
        }
        lines.push(Vec::new());

        let mut block = LayoutBlock::new(lines);
        if focused
            && content_rows > 0
            && let Some(cursor) = widget.cursor_pos()
        {
            block = block.with_cursor(
                1 + cursor.row as usize,
                CONTENT_INDENT + cursor.col as usize,
            );
        }
        block
    }
}

fn output_block(widget: &dyn OutputNode, ctx: &RenderContext) -> LayoutBlock {
    let mut lines = Vec::new();
    if !widget.label().is_empty() {
        lines.push(vec![Span::new(format!("  {}", widget.label())).no_wrap()]);
    }
    for mut line in widget.draw(ctx).lines {
        line.insert(0, Span::new(" ".repeat(CONTENT_INDENT)).no_wrap());
        lines.push(line);
    }
    lines.push(Vec::new());
    LayoutBlock::new(lines)
}

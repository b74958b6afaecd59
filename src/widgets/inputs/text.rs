use super::text_edit;
use crate::terminal::{CursorPos, KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::WidgetBase;
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
    ValidationMode, WidgetAction,
};
use crate::widgets::validators::{Validator, run_validators};
use unicode_width::UnicodeWidthChar;

/// Plain single-line text input, the library's generic unmasked field.
pub struct TextInput {
    base: WidgetBase,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
    validators: Vec<Validator>,
}

impl TextInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(id, label),
            value: String::new(),
            cursor: 0,
            placeholder: None,
            validators: Vec::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = text_edit::char_count(&self.value);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    fn edited_result(&self) -> InteractionResult {
        InteractionResult::with_action(WidgetAction::ValueChanged {
            id: self.base.id().to_string(),
            value: self.value.clone(),
        })
    }
}

impl Drawable for TextInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, _ctx: &RenderContext) -> DrawOutput {
        let first_line = if self.value.is_empty() {
            match &self.placeholder {
                Some(ph) => {
                    vec![Span::styled(ph.clone(), Style::new().color(Color::DarkGrey)).no_wrap()]
                }
                None => vec![Span::new("").no_wrap()],
            }
        } else {
            vec![Span::new(self.value.clone()).no_wrap()]
        };
        DrawOutput {
            lines: vec![first_line],
        }
    }
}

impl Interactive for TextInput {
    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char(ch) => {
                text_edit::insert_char(&mut self.value, &mut self.cursor, ch);
                self.edited_result()
            }
            KeyCode::Backspace => {
                if text_edit::backspace_char(&mut self.value, &mut self.cursor) {
                    return self.edited_result();
                }
                InteractionResult::ignored()
            }
            KeyCode::Delete => {
                if text_edit::delete_char(&mut self.value, &mut self.cursor) {
                    return self.edited_result();
                }
                InteractionResult::ignored()
            }
            KeyCode::Left => {
                if text_edit::move_left(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Right => {
                if text_edit::move_right(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Home => {
                self.cursor = 0;
                InteractionResult::handled()
            }
            KeyCode::End => {
                self.cursor = text_edit::char_count(&self.value);
                InteractionResult::handled()
            }
            KeyCode::Enter => InteractionResult::with_action(WidgetAction::Submitted {
                id: self.base.id().to_string(),
                value: self.value.clone(),
            }),
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = text_edit::char_count(&self.value);
    }

    fn validate(&self, _mode: ValidationMode) -> Result<(), String> {
        run_validators(&self.validators, &self.value)
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        let col: usize = self
            .value
            .chars()
            .take(text_edit::clamp_cursor(self.cursor, &self.value))
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum();
        Some(CursorPos {
            col: col as u16,
            row: 0,
        })
    }
}

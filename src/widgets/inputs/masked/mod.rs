mod engine;
mod model;
mod parser;

pub use model::{CompiledMask, DEFAULT_PLACEHOLDER, EditKind, MaskConfig, MaskToken, PatternKind};

use crate::terminal::{CursorPos, KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::WidgetBase;
use crate::widgets::field::{FieldBuffer, TextFieldHandle};
use crate::widgets::inputs::text_edit;
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
    ValidationMode, WidgetAction,
};
use crate::widgets::validators::{Validator, run_validators};
use engine::CaretSeed;
use unicode_width::UnicodeWidthChar;

const INCOMPLETE_MESSAGE: &str = "Invalid or incomplete value";

/// Result of one change event after the validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit passed the gate; the new canonical masked value.
    Committed(String),
    /// The gate refused; the field keeps its last committed value.
    Rejected,
}

/// The masking pipeline behind a masked field: owns the compiled mask, the
/// committed masked value, and the committed caret. Holds no UI state; the
/// live field is reached only through [`TextFieldHandle`], so the whole
/// pipeline runs headless.
pub struct MaskedField {
    mask: CompiledMask,
    config: MaskConfig,
    committed: String,
    caret: usize,
}

impl MaskedField {
    pub fn new(mask: CompiledMask) -> Self {
        Self::with_config(mask, MaskConfig::default())
    }

    pub fn with_config(mask: CompiledMask, config: MaskConfig) -> Self {
        Self {
            mask,
            config,
            committed: String::new(),
            caret: 0,
        }
    }

    pub fn mask(&self) -> &CompiledMask {
        &self.mask
    }

    pub fn placeholder(&self) -> char {
        self.config.placeholder
    }

    /// The committed canonical masked value. Empty until the first edit or
    /// programmatic set, and again after [`MaskedField::clear`].
    pub fn masked_value(&self) -> &str {
        &self.committed
    }

    /// User-typed characters of the committed value, literals and
    /// placeholders stripped. Derived on demand, never stored.
    pub fn raw_value(&self) -> String {
        engine::extract_raw(&self.committed, &self.mask, self.config.placeholder)
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// True when every pattern slot of the committed value is filled.
    pub fn is_complete(&self) -> bool {
        engine::is_filled(&self.committed, &self.mask, self.config.placeholder)
    }

    /// The placeholder scaffold this mask produces for an empty raw value.
    pub fn scaffold(&self) -> String {
        engine::apply_mask("", &self.mask, self.config.placeholder)
    }

    /// Index of the first unfilled slot of the committed value; where the
    /// caret goes after a programmatic set.
    pub fn next_edit_position(&self) -> usize {
        engine::next_edit_position(&self.committed, &self.mask, self.config.placeholder)
    }

    /// Caret resync for clicks and arrow keys: the value did not change, so
    /// the field's own selection is authoritative and no recalculation runs.
    pub fn sync_caret(&mut self, position: usize) {
        self.caret = position.min(self.mask.len());
    }

    /// Primary entry point for every change event. Extracts the raw value
    /// from `text`, applies the mask, corrects the caret, then runs the
    /// all-or-nothing validation gate. The corrected selection is written
    /// back through `field` strictly after the value commit.
    pub fn on_raw_input(&mut self, field: &mut dyn TextFieldHandle, text: &str) -> EditOutcome {
        let placeholder = self.config.placeholder;
        let live = field
            .selection_end()
            .unwrap_or_else(|| text_edit::char_count(text));
        let old_raw = self.raw_value();
        let new_raw = engine::extract_raw(text, &self.mask, placeholder);
        let seed = CaretSeed {
            anchor: self.caret,
            live,
            kind: EditKind::classify(&old_raw, &new_raw),
        };
        let outcome = engine::apply_with_caret(&new_raw, &self.mask, placeholder, seed);

        if run_validators(&self.config.validators, &outcome.masked).is_err() {
            let caret = self.caret;
            field.set_selection(caret, caret);
            return EditOutcome::Rejected;
        }

        self.committed = outcome.masked;
        self.caret = outcome.caret;
        field.set_selection(self.caret, self.caret);
        EditOutcome::Committed(self.committed.clone())
    }

    /// Same masking pipeline on focus loss; commits and reports the final
    /// masked value independent of the validation gate.
    pub fn on_blur_input(&mut self, text: &str) -> String {
        let placeholder = self.config.placeholder;
        let raw = engine::extract_raw(text, &self.mask, placeholder);
        self.committed = engine::apply_mask(&raw, &self.mask, placeholder);
        self.caret = self.caret.min(self.mask.len());
        self.committed.clone()
    }

    /// Re-mask a programmatically supplied value: extract its raw characters
    /// and run them through the applier. The caret moves to the next
    /// editable slot.
    pub fn set_external_value(&mut self, text: &str) {
        let placeholder = self.config.placeholder;
        let raw = engine::extract_raw(text, &self.mask, placeholder);
        self.committed = engine::apply_mask(&raw, &self.mask, placeholder);
        self.caret = self.next_edit_position();
    }

    /// Reset to the empty masked value, bypassing the mask pipeline.
    pub fn clear(&mut self) {
        self.committed = String::new();
        self.caret = 0;
    }
}

/// Masked text-input widget: a [`MaskedField`] pipeline wired to an
/// in-memory [`FieldBuffer`] that plays the role of the host text field.
/// Keystrokes edit the buffer exactly the way a host field would, then the
/// buffer content is fed through the pipeline as a change event.
pub struct MaskedInput {
    base: WidgetBase,
    field: MaskedField,
    buffer: FieldBuffer,
}

impl MaskedInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, mask: &str) -> Self {
        Self::with_mask(id, label, CompiledMask::parse(mask))
    }

    pub fn with_mask(
        id: impl Into<String>,
        label: impl Into<String>,
        mask: CompiledMask,
    ) -> Self {
        let mut input = Self {
            base: WidgetBase::new(id, label),
            field: MaskedField::new(mask),
            buffer: FieldBuffer::new(),
        };
        input.reset_buffer();
        input
    }

    pub fn with_placeholder_char(mut self, placeholder: char) -> Self {
        self.field.config.placeholder = placeholder;
        self.reset_buffer();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.field.config.validators.push(validator);
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.field.set_external_value(value);
        self.reset_buffer();
        self
    }

    pub fn phone_us(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, "(###) ###-####")
    }

    pub fn date_iso(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, "####-##-##")
    }

    pub fn field(&self) -> &MaskedField {
        &self.field
    }

    pub fn is_complete(&self) -> bool {
        self.field.is_complete()
    }

    /// Rebuild the live buffer from the committed value. A pristine or
    /// cleared field edits against the placeholder scaffold.
    fn reset_buffer(&mut self) {
        if self.field.masked_value().is_empty() {
            let scaffold = self.field.scaffold();
            let first_slot =
                engine::next_edit_position(&scaffold, &self.field.mask, self.field.placeholder());
            self.buffer.set_text(scaffold);
            self.buffer.set_selection(first_slot, first_slot);
            self.field.sync_caret(first_slot);
        } else {
            let caret = self.field.caret();
            self.buffer.set_text(self.field.masked_value().to_string());
            self.buffer.set_selection(caret, caret);
        }
    }

    /// Feed the buffer's current content through the pipeline as one change
    /// event, then re-render the buffer from the outcome.
    fn commit_edit(&mut self) -> InteractionResult {
        let text = self.buffer.text().to_string();
        match self.field.on_raw_input(&mut self.buffer, &text) {
            EditOutcome::Committed(masked) => {
                self.buffer.set_text(masked.clone());
                InteractionResult::with_action(WidgetAction::ValueChanged {
                    id: self.base.id().to_string(),
                    value: masked,
                })
            }
            EditOutcome::Rejected => {
                self.buffer.set_text(self.field.masked_value().to_string());
                InteractionResult::handled()
            }
        }
    }

    fn move_selection(&mut self, moved: bool) -> InteractionResult {
        if !moved {
            return InteractionResult::ignored();
        }
        self.field.sync_caret(self.buffer.selection());
        InteractionResult::handled()
    }

    fn display_text(&self) -> String {
        if self.buffer.text().is_empty() {
            self.field.scaffold()
        } else {
            self.buffer.text().to_string()
        }
    }
}

impl Drawable for MaskedInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        if !self.base.is_focused(ctx) {
            return DrawOutput::plain_lines(vec![self.field.masked_value().to_string()]);
        }

        let placeholder = self.field.placeholder();
        let text = self.display_text();
        let mut spans = Vec::<Span>::new();
        let mut run = String::new();
        let mut run_dim = false;

        for (ch, token) in text.chars().zip(self.field.mask.tokens()) {
            let dim = matches!(token, MaskToken::Pattern(_)) && ch == placeholder;
            if dim != run_dim && !run.is_empty() {
                spans.push(styled_run(std::mem::take(&mut run), run_dim));
            }
            run_dim = dim;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(styled_run(run, run_dim));
        }

        DrawOutput { lines: vec![spans] }
    }
}

fn styled_run(text: String, dim: bool) -> Span {
    if dim {
        Span::styled(text, Style::new().color(Color::DarkGrey)).no_wrap()
    } else {
        Span::new(text).no_wrap()
    }
}

impl Interactive for MaskedInput {
    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char(ch) => {
                self.buffer.insert(ch);
                self.commit_edit()
            }
            KeyCode::Backspace => {
                if !self.buffer.backspace() {
                    return InteractionResult::ignored();
                }
                self.commit_edit()
            }
            KeyCode::Delete => {
                if !self.buffer.delete() {
                    return InteractionResult::ignored();
                }
                self.commit_edit()
            }
            KeyCode::Left => {
                let moved = self.buffer.move_left();
                self.move_selection(moved)
            }
            KeyCode::Right => {
                let moved = self.buffer.move_right();
                self.move_selection(moved)
            }
            KeyCode::Home => {
                self.buffer.move_home();
                self.move_selection(true)
            }
            KeyCode::End => {
                self.buffer.move_end();
                self.move_selection(true)
            }
            KeyCode::Enter => InteractionResult::with_action(WidgetAction::Submitted {
                id: self.base.id().to_string(),
                value: self.field.masked_value().to_string(),
            }),
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<String> {
        Some(self.field.masked_value().to_string())
    }

    fn set_value(&mut self, value: &str) {
        if value.is_empty() {
            self.field.clear();
        } else {
            self.field.set_external_value(value);
        }
        self.reset_buffer();
    }

    fn validate(&self, mode: ValidationMode) -> Result<(), String> {
        if self.field.raw_value().is_empty() {
            return run_validators(&self.field.config.validators, "");
        }
        if mode == ValidationMode::Submit && !self.field.is_complete() {
            return Err(INCOMPLETE_MESSAGE.to_string());
        }
        run_validators(&self.field.config.validators, self.field.masked_value())
    }

    fn on_blur(&mut self) {
        let raw = engine::extract_raw(
            self.buffer.text(),
            &self.field.mask,
            self.field.placeholder(),
        );
        // a pristine field stays pristine; a touched one is finalized
        if self.field.masked_value().is_empty() && raw.is_empty() {
            return;
        }
        let text = self.buffer.text().to_string();
        self.field.on_blur_input(&text);
        self.reset_buffer();
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        let col: usize = self
            .display_text()
            .chars()
            .take(self.buffer.selection())
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum();
        Some(CursorPos {
            col: col as u16,
            row: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CompiledMask, EditOutcome, MaskConfig, MaskedField, MaskedInput};
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
    use crate::widgets::field::{FieldBuffer, TextFieldHandle};
    use crate::widgets::traits::{Interactive, ValidationMode, WidgetAction};
    use crate::widgets::validators;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_str(input: &mut MaskedInput, text: &str) {
        for ch in text.chars() {
            input.on_key(key(KeyCode::Char(ch)));
        }
    }

    // --- pipeline ----------------------------------------------------------

    #[test]
    fn change_event_commits_and_writes_selection_after_the_value() {
        let mut field = MaskedField::new(CompiledMask::parse("(###) ###-####"));
        // the adapter resynced the caret onto the first slot on focus
        field.sync_caret(1);
        let mut handle = FieldBuffer::new();
        handle.set_text("(5__) ___-____");
        handle.set_selection(2, 2);

        let outcome = field.on_raw_input(&mut handle, "(5__) ___-____");
        assert_eq!(outcome, EditOutcome::Committed("(5__) ___-____".to_string()));
        assert_eq!(field.masked_value(), "(5__) ___-____");
        assert_eq!(field.raw_value(), "5");
        assert_eq!(handle.selection_end(), Some(2));
    }

    #[test]
    fn rejected_edit_keeps_the_committed_value_and_caret() {
        let config = MaskConfig {
            validators: vec![validators::custom(
                |value: &str| !value.contains('9'),
                "no nines",
            )],
            ..MaskConfig::default()
        };
        let mut field = MaskedField::with_config(CompiledMask::parse("###"), config);
        let mut handle = FieldBuffer::new();

        handle.set_text("1__");
        handle.set_selection(1, 1);
        assert_eq!(
            field.on_raw_input(&mut handle, "1__"),
            EditOutcome::Committed("1__".to_string())
        );

        handle.set_text("19__");
        handle.set_selection(2, 2);
        assert_eq!(field.on_raw_input(&mut handle, "19__"), EditOutcome::Rejected);
        assert_eq!(field.masked_value(), "1__");
        // selection reverted to the committed caret
        assert_eq!(handle.selection_end(), Some(1));
    }

    #[test]
    fn blur_finalizes_independent_of_the_gate() {
        let config = MaskConfig {
            validators: vec![validators::custom(|_: &str| false, "always rejects")],
            ..MaskConfig::default()
        };
        let mut field = MaskedField::with_config(CompiledMask::parse("###"), config);
        assert_eq!(field.on_blur_input("12"), "12_");
        assert_eq!(field.masked_value(), "12_");
    }

    #[test]
    fn external_value_is_remasked_and_caret_goes_to_next_slot() {
        let mut field = MaskedField::new(CompiledMask::parse("(###) ###-####"));
        field.set_external_value("555-1234");
        assert_eq!(field.masked_value(), "(555) 123-4___");
        assert_eq!(field.caret(), 11);

        field.set_external_value("5551234567");
        assert_eq!(field.masked_value(), "(555) 123-4567");
        assert_eq!(field.caret(), 14);
        assert!(field.is_complete());
    }

    #[test]
    fn clear_bypasses_the_pipeline() {
        let mut field = MaskedField::new(CompiledMask::parse("###"));
        field.set_external_value("123");
        field.clear();
        assert_eq!(field.masked_value(), "");
        assert_eq!(field.caret(), 0);
        assert!(!field.is_complete());
    }

    #[test]
    fn empty_mask_produces_empty_values() {
        let mut field = MaskedField::new(CompiledMask::new(Vec::new()));
        let mut handle = FieldBuffer::new();
        assert_eq!(
            field.on_raw_input(&mut handle, "ignored"),
            EditOutcome::Committed(String::new())
        );
        assert!(field.is_complete());
    }

    // --- widget ------------------------------------------------------------

    #[test]
    fn typing_a_phone_number_masks_and_tracks_the_caret() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        type_str(&mut input, "555");
        assert_eq!(input.field().masked_value(), "(555) ___-____");
        assert_eq!(input.field().caret(), 4);

        type_str(&mut input, "1");
        assert_eq!(input.field().masked_value(), "(555) 1__-____");
        // caret hopped over ") " and the digit it produced
        assert_eq!(input.field().caret(), 7);

        type_str(&mut input, "234567");
        assert_eq!(input.field().masked_value(), "(555) 123-4567");
        assert!(input.is_complete());
    }

    #[test]
    fn rejected_characters_do_not_change_the_value() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        type_str(&mut input, "5x5");
        // 'x' was consumed and discarded by the digit slots
        assert_eq!(input.field().masked_value(), "(55_) ___-____");
    }

    #[test]
    fn backspace_over_a_literal_moves_the_caret_without_changing_the_value() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        type_str(&mut input, "5551");
        assert_eq!(input.field().caret(), 7);

        // deletes the ' ' of "(555) 1…": the pipeline restores it
        input.on_key(key(KeyCode::Left));
        input.on_key(key(KeyCode::Backspace));
        assert_eq!(input.field().masked_value(), "(555) 1__-____");
        assert_eq!(input.field().caret(), 5);
    }

    #[test]
    fn backspace_deletes_the_last_typed_digit() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        type_str(&mut input, "5551");
        input.on_key(key(KeyCode::Backspace));
        assert_eq!(input.field().masked_value(), "(555) ___-____");
        assert_eq!(input.field().raw_value(), "555");
    }

    #[test]
    fn arrows_resync_the_caret_without_recalculation() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        type_str(&mut input, "555");
        input.on_key(key(KeyCode::Home));
        assert_eq!(input.field().caret(), 0);
        input.on_key(key(KeyCode::Right));
        assert_eq!(input.field().caret(), 1);
        input.on_key(key(KeyCode::End));
        assert_eq!(input.field().caret(), 14);
    }

    #[test]
    fn submit_validation_requires_a_complete_value() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        assert!(input.validate(ValidationMode::Submit).is_ok());

        type_str(&mut input, "555");
        assert!(input.validate(ValidationMode::Live).is_ok());
        assert_eq!(
            input.validate(ValidationMode::Submit),
            Err(super::INCOMPLETE_MESSAGE.to_string())
        );

        type_str(&mut input, "1234567");
        assert!(input.validate(ValidationMode::Submit).is_ok());
    }

    #[test]
    fn set_value_and_clear_drive_the_buffer() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        input.set_value("5551234567");
        assert_eq!(input.value(), Some("(555) 123-4567".to_string()));

        input.set_value("");
        assert_eq!(input.value(), Some(String::new()));
        // editing again starts from the scaffold's first slot
        type_str(&mut input, "8");
        assert_eq!(input.field().masked_value(), "(8__) ___-____");
        assert_eq!(input.field().caret(), 2);
    }

    #[test]
    fn blur_keeps_a_pristine_field_empty_and_finalizes_a_touched_one() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        input.on_blur();
        assert_eq!(input.field().masked_value(), "");

        type_str(&mut input, "555");
        input.on_blur();
        assert_eq!(input.field().masked_value(), "(555) ___-____");
    }

    #[test]
    fn change_actions_carry_the_masked_value() {
        let mut input = MaskedInput::phone_us("phone", "Phone");
        let result = input.on_key(key(KeyCode::Char('5')));
        assert_eq!(
            result.actions,
            vec![WidgetAction::ValueChanged {
                id: "phone".to_string(),
                value: "(5__) ___-____".to_string(),
            }]
        );
    }

    #[test]
    fn custom_placeholder_flows_through_the_widget() {
        let mut input =
            MaskedInput::new("code", "Code", "##-##").with_placeholder_char('*');
        type_str(&mut input, "12");
        assert_eq!(input.field().masked_value(), "12-**");
    }
}

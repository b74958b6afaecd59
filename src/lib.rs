pub mod app;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use app::FormApp;

pub use terminal::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, Terminal, TerminalEvent, TerminalSize,
};

pub use ui::frame_json;
pub use ui::layout::{Layout, LayoutBlock, RenderFrame};
pub use ui::span::{Span, SpanLine};
pub use ui::style::{Color, Style};

pub use widgets::field::{FieldBuffer, TextFieldHandle};
pub use widgets::inputs::masked::{
    CompiledMask, EditKind, EditOutcome, MaskConfig, MaskToken, MaskedField, MaskedInput,
    PatternKind,
};
pub use widgets::inputs::text::TextInput;
pub use widgets::outputs::caption::Caption;
pub use widgets::outputs::progress::ProgressOutput;
pub use widgets::validators;

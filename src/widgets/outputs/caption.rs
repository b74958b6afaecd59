use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::traits::{DrawOutput, Drawable, OutputNode, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionStyle {
    #[default]
    Plain,
    Dim,
    Heading,
}

/// Static label/caption lines.
pub struct Caption {
    id: String,
    text: String,
    style: CaptionStyle,
}

impl Caption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            style: CaptionStyle::Plain,
        }
    }

    pub fn dim(mut self) -> Self {
        self.style = CaptionStyle::Dim;
        self
    }

    pub fn heading(mut self) -> Self {
        self.style = CaptionStyle::Heading;
        self
    }

    fn span_style(&self) -> Style {
        match self.style {
            CaptionStyle::Plain => Style::default(),
            CaptionStyle::Dim => Style::new().color(Color::DarkGrey),
            CaptionStyle::Heading => Style::new().color(Color::Cyan).bold(),
        }
    }
}

impl Drawable for Caption {
    fn id(&self) -> &str {
        &self.id
    }

    fn draw(&self, _ctx: &RenderContext) -> DrawOutput {
        DrawOutput {
            lines: self
                .text
                .lines()
                .map(|line| vec![Span::styled(line.to_string(), self.span_style()).no_wrap()])
                .collect(),
        }
    }
}

impl OutputNode for Caption {
    fn set_value(&mut self, value: &str) {
        self.text = value.to_string();
    }
}

use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::traits::{DrawOutput, Drawable, OutputNode, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    ClassicLine,
    BlockClassic,
}

/// Percentage bar over a min/max range.
pub struct ProgressOutput {
    id: String,
    label: String,
    min: f64,
    max: f64,
    bar_width: usize,
    value: f64,
    style: ProgressStyle,
}

impl ProgressOutput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            min: 0.0,
            max: 100.0,
            bar_width: 30,
            value: 0.0,
            style: ProgressStyle::ClassicLine,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = if (max - min).abs() < f64::EPSILON {
            min + 1.0
        } else {
            max
        };
        self.value = self.value.clamp(self.min, self.max);
        self
    }

    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width.max(8);
        self
    }

    pub fn with_style(mut self, style: ProgressStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_target(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn ratio(&self) -> f64 {
        let range = (self.max - self.min).max(f64::EPSILON);
        ((self.value - self.min) / range).clamp(0.0, 1.0)
    }

    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    fn filled_cells(&self) -> usize {
        (self.ratio() * self.bar_width as f64).round() as usize
    }

    fn value_color(&self) -> Color {
        let ratio = self.ratio();
        if ratio < 0.5 {
            Color::Yellow
        } else if ratio < 1.0 {
            Color::Cyan
        } else {
            Color::Green
        }
    }

    fn glyphs(&self) -> (char, char) {
        match self.style {
            ProgressStyle::ClassicLine => ('▬', '─'),
            ProgressStyle::BlockClassic => ('▰', '▱'),
        }
    }
}

impl Drawable for ProgressOutput {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn draw(&self, _ctx: &RenderContext) -> DrawOutput {
        let filled = self.filled_cells().min(self.bar_width);
        let empty = self.bar_width - filled;
        let value_color = self.value_color();
        let (filled_glyph, empty_glyph) = self.glyphs();

        let line = vec![
            Span::new("[").no_wrap(),
            Span::styled(
                filled_glyph.to_string().repeat(filled),
                Style::new().color(value_color).bold(),
            )
            .no_wrap(),
            Span::styled(
                empty_glyph.to_string().repeat(empty),
                Style::new().color(Color::DarkGrey),
            )
            .no_wrap(),
            Span::new("] ").no_wrap(),
            Span::styled(
                format!("{:>5.1}%", self.percent()),
                Style::new().color(value_color).bold(),
            )
            .no_wrap(),
        ];

        DrawOutput { lines: vec![line] }
    }
}

impl OutputNode for ProgressOutput {
    fn set_value(&mut self, value: &str) {
        if let Ok(number) = value.trim().parse::<f64>() {
            self.set_target(number);
        }
    }
}

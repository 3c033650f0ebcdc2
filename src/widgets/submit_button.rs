use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub const SUBMIT_LABEL: &str = "Submit";
pub const BUSY_LABEL: &str = "Thinking...";

/// Width that fits the busy label, a spinner frame and the borders
pub const BUTTON_WIDTH: u16 = 17;

/// The form's submit control. Disabled with a busy indicator while a
/// request is in flight.
#[derive(Debug, Clone, Copy)]
pub struct SubmitButton<'a> {
    loading: bool,
    spinner_frame: &'a str,
}

impl<'a> SubmitButton<'a> {
    pub fn new(loading: bool) -> Self {
        Self {
            loading,
            spinner_frame: "",
        }
    }

    pub fn spinner_frame(mut self, frame: &'a str) -> Self {
        self.spinner_frame = frame;
        self
    }

    pub fn label(&self) -> &'static str {
        if self.loading {
            BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.loading
    }

    fn content(&self) -> Line<'a> {
        if self.loading && !self.spinner_frame.is_empty() {
            Line::from(vec![
                Span::raw(self.spinner_frame),
                Span::raw(" "),
                Span::raw(BUSY_LABEL),
            ])
        } else {
            Line::from(self.label())
        }
    }
}

impl Widget for SubmitButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (text_style, border_style) = if self.is_enabled() {
            (
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Indexed(61))
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Indexed(61)),
            )
        } else {
            (
                Style::default().fg(Color::Gray).bg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };

        Paragraph::new(self.content())
            .alignment(Alignment::Center)
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .render(area, buf);
    }
}

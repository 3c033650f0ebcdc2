use crate::utils::logging::LogRingBuffer;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Number of buffered entries pulled into the view
const LOG_VIEW_ENTRIES: usize = 500;

/// Scrollable view over the in-memory log, toggled with F5
pub struct LogWidget {
    lines: Vec<String>,
    scroll_offset: u16,
    max_scroll: u16,
}

impl LogWidget {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            scroll_offset: 0,
            max_scroll: 0,
        }
    }

    /// Re-read the buffer. A view sitting on the newest entry keeps
    /// following new ones; otherwise the position is kept.
    pub fn refresh(&mut self, buffer: &LogRingBuffer) {
        let following = self.scroll_offset == self.max_scroll;
        self.lines = buffer
            .get_recent(LOG_VIEW_ENTRIES)
            .iter()
            .map(|entry| entry.format_for_display())
            .collect();
        self.max_scroll = u16::try_from(self.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
        if following {
            self.scroll_to_bottom();
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll);
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    /// Handle key events for the log view. Returns true when the view should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll_to_bottom(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(5) => return true,
            _ => {}
        }
        false
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(self.max_scroll);
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;
        // Keep the selected line at the bottom of the window
        let end = (self.scroll_offset as usize + 1).min(self.lines.len());
        let start = end.saturating_sub(visible_height);

        let text = Text::from(
            self.lines[start..end]
                .iter()
                .map(|line| {
                    let color = if line.contains("] ERROR [") {
                        Color::Red
                    } else if line.contains("] WARN [") {
                        Color::Yellow
                    } else {
                        Color::White
                    };
                    Line::styled(line.clone(), Style::default().fg(color))
                })
                .collect::<Vec<_>>(),
        );

        let title = format!(
            "Logs - {} entries (↑↓/jk: scroll, PgUp/PgDn: page, g/G: top/bottom, F5/Esc: close)",
            self.lines.len()
        );

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}

impl Default for LogWidget {
    fn default() -> Self {
        Self::new()
    }
}

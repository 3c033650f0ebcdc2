use crate::api_client::AnswerClient;
use crate::app_state::{AskState, Settled, Ticket};
use crate::config::config::{Config, IconConfig};
use crate::services::SubmissionHandler;
use crate::utils::logging::LogRingBuffer;
use crate::widgets::log_widget::LogWidget;
use crate::widgets::spinner::Spinner;
use crate::widgets::submit_button::{SubmitButton, BUTTON_WIDTH};
use crate::widgets::summary_view::{SummaryScroll, SummaryView};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::Duration;
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

pub const TITLE: &str = "Web Intelligence Agent";
pub const TAGLINE: &str = "Get concise answers to your complex questions";
pub const PLACEHOLDER: &str = "Ask me anything…";

/// How long the loop waits for a key before checking for settled requests
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// What currently has the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiMode {
    /// Typing a question, reading the summary
    Form,
    /// Log view overlay is open
    Logs,
}

/// The root view: heading, query form, submit control and summary panel.
///
/// Owns the UI state and feeds form submissions to the submission handler.
pub struct AskTui {
    state: AskState,

    /// Editing buffer bound to the query
    input: Input,

    submissions: SubmissionHandler,
    spinner: Spinner,
    summary_scroll: SummaryScroll,
    log_widget: LogWidget,
    log_buffer: Option<LogRingBuffer>,
    mode: TuiMode,
    icons: IconConfig,
    should_quit: bool,
}

impl AskTui {
    pub fn new(client: AnswerClient, config: &Config) -> Self {
        Self {
            state: AskState::new(),
            input: Input::default(),
            submissions: SubmissionHandler::new(client),
            spinner: Spinner::new(config.display.use_glyphs),
            summary_scroll: SummaryScroll::default(),
            log_widget: LogWidget::new(),
            log_buffer: None,
            mode: TuiMode::Form,
            icons: config.display.icons.clone(),
            should_quit: false,
        }
    }

    /// Attach the ring buffer the log view reads from
    pub fn with_log_buffer(mut self, buffer: LogRingBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    pub fn state(&self) -> &AskState {
        &self.state
    }

    pub fn mode(&self) -> TuiMode {
        self.mode
    }

    pub fn summary_scroll(&self) -> SummaryScroll {
        self.summary_scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main run loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.process_settled();
            terminal.draw(|f| self.draw(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key_event(key) {
                        break;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Handle keyboard input. Returns true when the app should exit.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        // Global quit keys
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return true;
        }

        if key.code == KeyCode::F(5) && self.mode == TuiMode::Form {
            self.open_logs();
            return false;
        }

        match self.mode {
            TuiMode::Form => self.handle_form_key(key),
            TuiMode::Logs => {
                if self.log_widget.handle_key(key) {
                    self.mode = TuiMode::Form;
                }
                false
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }
            // Submit is consumed here and never reaches the input
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Up => self.summary_scroll.scroll_up(1),
            KeyCode::Down => self.summary_scroll.scroll_down(1),
            KeyCode::PageUp => self.summary_scroll.scroll_up(10),
            KeyCode::PageDown => self.summary_scroll.scroll_down(10),
            // Plain Home/End move the input cursor
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.summary_scroll.reset()
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.summary_scroll.scroll_to_bottom()
            }
            _ => {
                if self.input.handle_event(&Event::Key(key)).is_some() {
                    self.state.set_query(self.input.value());
                }
            }
        }
        false
    }

    fn open_logs(&mut self) {
        if let Some(buffer) = &self.log_buffer {
            self.log_widget.refresh(buffer);
        }
        self.log_widget.scroll_to_bottom();
        self.mode = TuiMode::Logs;
        debug!(target: "app", "Opened log view");
    }

    /// Submit the current query. Empty queries are sent as-is.
    pub fn submit(&mut self) -> Ticket {
        self.spinner.reset();
        self.submissions.submit(&mut self.state)
    }

    /// Apply any requests that finished since the last call
    pub fn process_settled(&mut self) -> Vec<Settled> {
        let applied = self.submissions.apply_settled(&mut self.state);
        for settled in &applied {
            self.after_settled(*settled);
        }
        applied
    }

    /// Wait for the next request to finish and apply it
    pub async fn wait_for_settlement(&mut self) -> Option<Settled> {
        let settled = self.submissions.next_settled(&mut self.state).await?;
        self.after_settled(settled);
        Some(settled)
    }

    fn after_settled(&mut self, settled: Settled) {
        if settled == Settled::Answered {
            self.summary_scroll.reset();
            info!(
                target: "app",
                "Answer received ({} paragraphs)",
                self.state.answer().map_or(0, |a| a.split('\n').count())
            );
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Heading
                Constraint::Length(3), // Query form
                Constraint::Min(0),    // Summary
                Constraint::Length(1), // Status line
            ])
            .split(f.area());

        self.draw_heading(f, chunks[0]);
        self.draw_form(f, chunks[1]);

        self.summary_scroll.fit(self.state.answer(), chunks[2]);
        f.render_widget(
            SummaryView::new(self.state.answer())
                .scroll(self.summary_scroll)
                .icon(&self.icons.summary),
            chunks[2],
        );

        self.draw_status(f, chunks[3]);

        if self.mode == TuiMode::Logs {
            // Entries logged while the overlay is open show up on the next frame
            if let Some(buffer) = &self.log_buffer {
                self.log_widget.refresh(buffer);
            }
            self.log_widget.render(f, chunks[2]);
        }
    }

    fn draw_heading(&self, f: &mut Frame, area: Rect) {
        let heading = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} {}", self.icons.search, TITLE),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(TAGLINE, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));

        f.render_widget(heading, area);
    }

    fn draw_form(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)])
            .split(area);

        let focused = self.mode == TuiMode::Form;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Query")
            .border_style(border_style);

        // Keep the cursor inside the box when the query is wider than it
        let width = chunks[0].width.max(3) - 3;
        let scroll = self.input.visual_scroll(width as usize);

        let input = if self.input.value().is_empty() {
            Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.input.value()).scroll((0, scroll as u16))
        };
        f.render_widget(input.block(block), chunks[0]);

        if focused {
            f.set_cursor_position((
                chunks[0].x + (self.input.visual_cursor().max(scroll) - scroll) as u16 + 1,
                chunks[0].y + 1,
            ));
        }

        let loading = self.state.is_loading();
        let frame = if loading { self.spinner.tick() } else { "" };
        f.render_widget(SubmitButton::new(loading).spinner_frame(frame), chunks[1]);
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!("{} {}", self.icons.api, self.submissions.endpoint()),
            Style::default().fg(Color::Cyan),
        )];

        if let Some(error) = self.state.error() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("{} {}", self.icons.error, error),
                Style::default().fg(Color::Red),
            ));
        } else if self.state.is_loading() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "Waiting for answer",
                Style::default().fg(Color::Yellow),
            ));
        }

        spans.push(Span::styled(
            " | Enter: submit  ↑↓/PgUp/PgDn/^Home/^End: scroll  F5: logs  Esc: quit",
            Style::default().fg(Color::DarkGray),
        ));

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Set up the terminal, run the form until the user quits, then restore it
pub fn run_ask_tui(
    client: AnswerClient,
    config: &Config,
    log_buffer: Option<LogRingBuffer>,
) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AskTui::new(client, config);
    if let Some(buffer) = log_buffer {
        app = app.with_log_buffer(buffer);
    }
    info!(target: "app", "Starting TUI against {}", app.submissions.endpoint());
    let result = app.run(&mut terminal);

    // Cleanup runs even if the loop failed
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

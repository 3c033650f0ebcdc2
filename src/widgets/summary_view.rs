//! Summary panel
//!
//! Renders an answer as a column of paragraphs, one per line of the answer
//! text. Nothing at all is drawn for an absent or empty answer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// One paragraph of an answer, keyed by its position in the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParagraph<'a> {
    pub key: usize,
    pub text: &'a str,
}

/// Split an answer into paragraphs.
///
/// Every `'\n'` starts a new paragraph and empty segments are kept, so
/// `"A\n\nB\n"` yields four paragraphs: `A`, ``, `B`, ``.
pub fn paragraphs(answer: Option<&str>) -> Vec<SummaryParagraph<'_>> {
    match answer {
        Some(answer) if !answer.is_empty() => answer
            .split('\n')
            .enumerate()
            .map(|(key, text)| SummaryParagraph { key, text })
            .collect(),
        _ => Vec::new(),
    }
}

/// Number of rows `answer` takes once wrapped to `width` columns,
/// blank separator rows included.
pub fn wrapped_line_count(answer: Option<&str>, width: u16) -> usize {
    let blocks = paragraphs(answer);
    if blocks.is_empty() || width == 0 {
        return 0;
    }
    Paragraph::new(summary_text(&blocks))
        .wrap(Wrap { trim: false })
        .line_count(width)
}

/// Scroll position of the summary panel.
///
/// The limit is taken from the last layout: `fit` records how far the
/// wrapped answer overflows the visible part of the panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SummaryScroll {
    offset: u16,
    max_offset: u16,
}

impl SummaryScroll {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_offset(&self) -> u16 {
        self.max_offset
    }

    /// Measure `answer` against the panel drawn in `area`
    pub fn fit(&mut self, answer: Option<&str>, area: Rect) {
        let inner = panel_block().inner(area);
        let hidden =
            wrapped_line_count(answer, inner.width).saturating_sub(usize::from(inner.height));
        self.max_offset = u16::try_from(hidden).unwrap_or(u16::MAX);
        self.offset = self.offset.min(self.max_offset);
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.offset = self.offset.saturating_sub(amount);
    }

    /// Scroll down, never past the point where the last line is at the bottom
    pub fn scroll_down(&mut self, amount: u16) {
        self.offset = self.offset.saturating_add(amount).min(self.max_offset);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset;
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

fn panel_block<'a>() -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
}

fn summary_text<'a>(blocks: &[SummaryParagraph<'a>]) -> Text<'a> {
    let mut lines = Vec::with_capacity(blocks.len() * 2);
    for block in blocks {
        if block.key > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(block.text));
    }
    Text::from(lines)
}

pub struct SummaryView<'a> {
    answer: Option<&'a str>,
    scroll: SummaryScroll,
    icon: &'a str,
}

impl<'a> SummaryView<'a> {
    pub fn new(answer: Option<&'a str>) -> Self {
        Self {
            answer,
            scroll: SummaryScroll::default(),
            icon: "📄",
        }
    }

    pub fn scroll(mut self, scroll: SummaryScroll) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn icon(mut self, icon: &'a str) -> Self {
        self.icon = icon;
        self
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let blocks = paragraphs(self.answer);
        if blocks.is_empty() {
            return;
        }

        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.icon),
                Style::default().bg(Color::Indexed(189)).fg(Color::Indexed(54)),
            ),
            Span::styled(
                " Summary ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(summary_text(&blocks))
            .block(panel_block().title(title))
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll.offset(), 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(answer: Option<&str>) -> Vec<&str> {
        paragraphs(answer).into_iter().map(|p| p.text).collect()
    }

    fn render_rows(answer: Option<&str>, width: u16, height: u16) -> Vec<String> {
        render_scrolled(answer, SummaryScroll::default(), width, height)
    }

    fn render_scrolled(
        answer: Option<&str>,
        scroll: SummaryScroll,
        width: u16,
        height: u16,
    ) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        SummaryView::new(answer)
            .icon("#")
            .scroll(scroll)
            .render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_three_paragraphs_in_order() {
        let blocks = paragraphs(Some("A\nB\nC"));
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks,
            vec![
                SummaryParagraph { key: 0, text: "A" },
                SummaryParagraph { key: 1, text: "B" },
                SummaryParagraph { key: 2, text: "C" },
            ]
        );
    }

    #[test]
    fn test_empty_segments_are_kept() {
        assert_eq!(texts(Some("\nA\n\nB\n")), vec!["", "A", "", "B", ""]);
        assert_eq!(texts(Some("\n")), vec!["", ""]);
    }

    #[test]
    fn test_no_paragraphs_for_empty_answer() {
        assert!(paragraphs(None).is_empty());
        assert!(paragraphs(Some("")).is_empty());
    }

    #[test]
    fn test_empty_answer_draws_nothing() {
        for answer in [None, Some("")] {
            let rows = render_rows(answer, 20, 5);
            assert!(rows.iter().all(|row| row.trim().is_empty()));
        }
    }

    #[test]
    fn test_paragraphs_render_separated() {
        let rows = render_rows(Some("A\nB\nC"), 20, 8);
        assert!(rows[0].contains("Summary"));
        assert_eq!(rows[1].trim_matches(|c| c == '│' || c == ' '), "A");
        assert_eq!(rows[2].trim_matches(|c| c == '│' || c == ' '), "");
        assert_eq!(rows[3].trim_matches(|c| c == '│' || c == ' '), "B");
        assert_eq!(rows[5].trim_matches(|c| c == '│' || c == ' '), "C");
    }

    #[test]
    fn test_content_is_not_transformed() {
        let rows = render_rows(Some("**bold** <b>"), 30, 3);
        assert!(rows[1].contains("**bold** <b>"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let answer = Some("A\nB\nC");
        let mut scroll = SummaryScroll::default();
        // Nothing measured yet
        scroll.scroll_down(3);
        assert_eq!(scroll.offset(), 0);

        // Five rendered lines (A, blank, B, blank, C) in two visible rows
        scroll.fit(answer, Rect::new(0, 0, 20, 4));
        scroll.scroll_down(100);
        assert_eq!(scroll.offset(), 3);
        scroll.scroll_up(1);
        assert_eq!(scroll.offset(), 2);
        scroll.reset();
        assert_eq!(scroll.offset(), 0);

        // A panel tall enough for everything does not scroll
        scroll.fit(answer, Rect::new(0, 0, 20, 10));
        scroll.scroll_down(3);
        assert_eq!(scroll.offset(), 0);

        scroll.fit(None, Rect::new(0, 0, 20, 4));
        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 0);
    }

    #[test]
    fn test_fit_pulls_offset_back_when_panel_grows() {
        let answer = Some("A\nB\nC");
        let mut scroll = SummaryScroll::default();
        scroll.fit(answer, Rect::new(0, 0, 20, 4));
        scroll.scroll_to_bottom();
        assert_eq!(scroll.offset(), 3);

        scroll.fit(answer, Rect::new(0, 0, 20, 5));
        assert_eq!(scroll.offset(), 2);
    }

    #[test]
    fn test_wrapped_paragraph_scrolls_to_its_end() {
        let words: Vec<String> = (0..200).map(|i| format!("w{}", i)).collect();
        let long = words.join(" ");
        let answer = Some(long.as_str());
        let area = Rect::new(0, 0, 30, 6);

        // One paragraph, many wrapped rows at 28 columns
        assert!(wrapped_line_count(answer, 28) > 20);

        let mut scroll = SummaryScroll::default();
        scroll.fit(answer, area);
        scroll.scroll_down(10);
        assert_eq!(scroll.offset(), 10);

        let top = render_scrolled(answer, SummaryScroll::default(), 30, 6);
        assert!(!top.iter().any(|row| row.contains("w199")));

        scroll.scroll_to_bottom();
        let bottom = render_scrolled(answer, scroll, 30, 6);
        assert!(bottom[4].contains("w199"), "{:?}", bottom);
        assert!(!bottom.iter().any(|row| row.contains("w0 ")));
    }
}

pub mod palette;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use speedtype::{word_source::WordSource, SessionState};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl<S: WordSource> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let finished = session.state() == SessionState::Finished;

        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let current_style = Style::default()
            .patch(bold_style)
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let results_lines = if finished { 5 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),             // stats
                Constraint::Length(1),             // padding
                Constraint::Min(3),                // words
                Constraint::Length(1),             // progress
                Constraint::Length(1),             // padding
                Constraint::Length(1),             // input
                Constraint::Length(1),             // current word preview
                Constraint::Length(results_lines), // results
                Constraint::Length(1),             // legend
            ])
            .split(area);

        let wpm_style = Style::default()
            .patch(bold_style)
            .fg(palette::wpm_color(session.wpm()));
        let accuracy_style = Style::default()
            .patch(bold_style)
            .fg(palette::accuracy_color(session.accuracy()));

        let stats = Paragraph::new(Line::from(vec![
            Span::styled(format!("{}s", session.remaining_time()), bold_style),
            Span::styled(" left   ", dim_style),
            Span::styled(session.wpm().to_string(), wpm_style),
            Span::styled(" wpm   ", dim_style),
            Span::styled(format!("{}%", session.accuracy()), accuracy_style),
            Span::styled(" acc", dim_style),
        ]))
        .alignment(Alignment::Center);
        stats.render(chunks[0], buf);

        let cursor = session.current_word_index();
        let mut spans = Vec::with_capacity(session.words().len() * 2);
        for (idx, word) in session.words().iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            let style = match idx.cmp(&cursor) {
                std::cmp::Ordering::Less => dim_style,
                std::cmp::Ordering::Equal => current_style,
                std::cmp::Ordering::Greater => Style::default(),
            };
            spans.push(Span::styled(word.as_str(), style));
        }

        let words_area = chunks[2];
        let current_line = line_of_word(session.words(), cursor, words_area.width);
        // keep the current word on the second visible line once typing moves past the first
        let scroll = current_line.saturating_sub(1);

        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0))
            .render(words_area, buf);

        let total = session.words().len();
        let progress = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Word {} of {}", (cursor + 1).min(total), total),
                dim_bold_style,
            ),
            Span::styled(
                format!("   {:.1}% complete", session.progress_percent()),
                dim_style,
            ),
        ]))
        .alignment(Alignment::Center);
        progress.render(chunks[3], buf);

        let input = if session.input_buffer().is_empty() {
            let placeholder = if finished {
                "Press Enter to restart"
            } else {
                "Start typing here..."
            };
            Line::from(vec![
                Span::styled("> ", bold_style),
                Span::styled(placeholder, dim_style.patch(italic_style)),
            ])
        } else {
            Line::from(vec![
                Span::styled("> ", bold_style),
                Span::styled(session.input_buffer(), bold_style),
            ])
        };
        Paragraph::new(input).render(chunks[5], buf);

        if let Some(word) = session.current_word() {
            Paragraph::new(Line::from(vec![
                Span::styled("Current word: ", dim_style),
                Span::styled(word, current_style),
            ]))
            .render(chunks[6], buf);
        }

        if finished {
            let results = Paragraph::new(vec![
                Line::from(Span::styled("Test Complete!", bold_style)),
                Line::from(vec![
                    Span::raw("Final WPM: "),
                    Span::styled(session.wpm().to_string(), wpm_style),
                ]),
                Line::from(vec![
                    Span::raw("Accuracy: "),
                    Span::styled(format!("{}%", session.accuracy()), accuracy_style),
                ]),
                Line::from(vec![
                    Span::raw("Words Typed: "),
                    Span::styled(
                        session.typed_word_count().to_string(),
                        bold_style.fg(Color::Magenta),
                    ),
                ]),
                Line::from(Span::styled(
                    "Press Enter to try again",
                    dim_style.patch(italic_style),
                )),
            ])
            .alignment(Alignment::Center);
            results.render(chunks[7], buf);
        }

        let legend = Paragraph::new(Span::styled(
            "(space) next word / (tab) restart / (esc) quit",
            italic_style,
        ))
        .alignment(Alignment::Center);
        legend.render(chunks[8], buf);
    }
}

/// Zero-based wrapped line the word at `idx` lands on, using greedy word
/// wrapping at `width` columns.
pub fn line_of_word(words: &[String], idx: usize, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut line = 0u16;
    let mut col = 0usize;

    for (i, word) in words.iter().enumerate() {
        let w = word.width();
        let needed = if col == 0 { w } else { col + 1 + w };
        if col > 0 && needed > width {
            line = line.saturating_add(1);
            col = w;
        } else {
            col = needed;
        }
        if i == idx {
            return line;
        }
    }

    line
}

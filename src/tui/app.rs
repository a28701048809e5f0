use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::search::{SearchSession, StatusLine};
use crate::ui::{cards, BookCard, Cover};

/// Minimum card width; the grid uses as many columns as fit, up to four.
const MIN_CARD_WIDTH: u16 = 34;
const MAX_COLUMNS: usize = 4;
/// Title, authors/year, cover, tags, plus borders.
const CARD_HEIGHT: u16 = 7;
const PLACEHOLDER: &str = "Search by book title (e.g. Pride and Prejudice)";
const FOOTER: &str = "Powered by Open Library. Covers served from covers.openlibrary.org.";

/// Interactive search screen state.
pub struct App {
    session: SearchSession,
    cover_endpoint: String,
    scroll_row: usize,
}

impl App {
    pub fn new(session: SearchSession, cover_endpoint: impl Into<String>) -> Self {
        Self {
            session,
            cover_endpoint: cover_endpoint.into(),
            scroll_row: 0,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SearchSession {
        &mut self.session
    }

    /// Handle a key press. Returns true when the user wants to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('u') => self.clear(),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => {
                if self.session.state().query.is_empty() {
                    return true;
                }
                self.clear();
            }
            KeyCode::Char(c) => {
                let mut query = self.session.state().query.clone();
                query.push(c);
                self.session.set_query(query);
            }
            KeyCode::Backspace => {
                let mut query = self.session.state().query.clone();
                if query.pop().is_some() {
                    self.session.set_query(query);
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if self.session.prev_page() {
                    self.scroll_row = 0;
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if self.session.next_page() {
                    self.scroll_row = 0;
                }
            }
            KeyCode::Up => self.scroll_row = self.scroll_row.saturating_sub(1),
            KeyCode::Down => self.scroll_row += 1,
            _ => {}
        }
        false
    }

    fn clear(&mut self) {
        self.session.clear();
        self.scroll_row = 0;
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(CARD_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_search_bar(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);
        self.draw_grid(frame, chunks[3]);
        self.draw_pager(frame, chunks[4]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" clear/quit  "),
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" page  "),
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" scroll  "),
            Span::styled(FOOTER, Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(footer, chunks[5]);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "📚 Book Finder",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Search books by title using Open Library",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, area);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let query = &self.session.state().query;
        let text = if query.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(query.as_str())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .title_bottom(Line::from(" ✕ Esc ").right_aligned());
        frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

        let cursor_x = area.x + 1 + unicode_width::UnicodeWidthStr::width(query.as_str()) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let Some(line) = self.session.state().status_line() else {
            return;
        };
        let style = match line {
            StatusLine::Loading => Style::default().fg(Color::Cyan),
            StatusLine::Error(_) => Style::default().fg(Color::Red),
            StatusLine::NoResults(_) => Style::default().fg(Color::Yellow),
        };
        frame.render_widget(
            Paragraph::new(line.to_string())
                .style(style)
                .alignment(Alignment::Center),
            area,
        );
    }

    fn draw_grid(&mut self, frame: &mut Frame, area: Rect) {
        let cards = cards(&self.session.state().results, &self.cover_endpoint);
        if cards.is_empty() {
            return;
        }

        let columns = ((area.width / MIN_CARD_WIDTH) as usize).clamp(1, MAX_COLUMNS);
        let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
        let total_rows = cards.len().div_ceil(columns);
        self.scroll_row = self.scroll_row.min(total_rows.saturating_sub(visible_rows));

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
            .split(area);

        for (row_idx, row_area) in row_areas.iter().enumerate() {
            let start = (self.scroll_row + row_idx) * columns;
            if start >= cards.len() {
                break;
            }
            let col_areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row_area);

            for (card, col_area) in cards[start..].iter().take(columns).zip(col_areas.iter()) {
                render_card(frame, card, *col_area);
            }
        }
    }

    fn draw_pager(&self, frame: &mut Frame, area: Rect) {
        let Some(pager) = self.session.state().pager() else {
            return;
        };
        let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let disabled = Style::default().fg(Color::DarkGray);

        let line = Line::from(vec![
            Span::styled(
                "← Prev",
                if pager.prev_enabled { enabled } else { disabled },
            ),
            Span::raw(format!("   {}   ", pager)),
            Span::styled(
                "Next →",
                if pager.next_enabled { enabled } else { disabled },
            ),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

fn render_card(frame: &mut Frame, card: &BookCard, area: Rect) {
    let cover = match &card.cover {
        Cover::Image(url) => Span::styled(url.as_str(), Style::default().fg(Color::Blue)),
        Cover::Placeholder => Span::styled(
            "[No cover]",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let tags = card
        .tags
        .iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = vec![
        Line::from(vec![
            Span::styled(card.authors.as_str(), Style::default().fg(Color::Green)),
            Span::raw(" · "),
            Span::styled(card.year.as_str(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(cover),
        Line::from(Span::styled(tags, Style::default().fg(Color::Magenta))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            card.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{make_page, MockSource};
    use crossterm::event::KeyEventKind;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(source: &Arc<MockSource>) -> App {
        let session = SearchSession::new(source.clone(), Duration::from_millis(600));
        App::new(session, "https://covers.openlibrary.org")
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_paging() {
        let source = Arc::new(MockSource::new());
        source.set_page("Dune", 1, make_page("Dune", 1, 20, 45));
        source.set_page("Dune", 2, make_page("Dune", 2, 20, 45));
        let mut app = app_with(&source);

        for c in "Dune".chars() {
            assert!(!app.handle_key(press(KeyCode::Char(c))));
        }
        assert_eq!(app.session().state().query, "Dune");
        app.session_mut().run_until_idle().await;

        let screen = render(&mut app);
        assert!(screen.contains("Page 1 of 3"));
        assert!(screen.contains("Dune #0"));

        app.handle_key(press(KeyCode::Right));
        app.session_mut().run_until_idle().await;
        assert_eq!(app.session().state().page(), 2);
        assert_eq!(source.requests().last().map(|r| r.offset), Some(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_clears_then_quits() {
        let source = Arc::new(MockSource::new());
        let mut app = app_with(&source);

        app.handle_key(press(KeyCode::Char('x')));
        assert!(!app.handle_key(press(KeyCode::Esc)));
        assert!(app.session().state().query.is_empty());
        assert!(app.handle_key(press(KeyCode::Esc)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_c_quits() {
        let source = Arc::new(MockSource::new());
        let mut app = app_with(&source);
        let mut key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        assert!(app.handle_key(key));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_screen_has_no_status_or_pager() {
        let source = Arc::new(MockSource::new());
        let mut app = app_with(&source);
        let screen = render(&mut app);
        assert!(screen.contains("Search by book title"));
        assert!(!screen.contains("Loading"));
        assert!(!screen.contains("Page "));
    }
}

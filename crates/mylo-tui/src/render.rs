//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::text::truncate_with_ellipsis;
use crate::navigation::Route;
use crate::state::AppState;

/// Spinner frames for in-flight tasks.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const HEADER_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);

    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    app.screen
        .render(frame, chunks[1], app.is_submitting(), spinner);

    render_status_line(app, frame, chunks[2]);
}

/// App name plus the back-stack, top route highlighted.
fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        " mylo ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    let stack = app.nav.stack();
    for (index, route) in stack.iter().enumerate() {
        let style = if index + 1 == stack.len() {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let separator = if index == 0 { " " } else { " › " };
        spans.push(Span::styled(separator, Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(route.kind().title(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Notice on the left, signed-in user and quit hint on the right.
fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let right = match app.nav.current() {
        Route::Home(session) => format!("{} · Ctrl+C quit ", session.email()),
        Route::Login | Route::Register => "Ctrl+C quit ".to_string(),
    };
    let right_width = right.chars().count() as u16;

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    if let Some(notice) = &app.notice {
        let text = truncate_with_ellipsis(&notice.text, halves[0].width.saturating_sub(1) as usize);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {text}"),
                Style::default().fg(Color::Green),
            ))),
            halves[0],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        halves[1],
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_login_screen_renders_fields() {
        let app = AppState::new();
        let text = screen_text(&app);
        assert!(text.contains("Login"));
        assert!(text.contains("Email"));
        assert!(text.contains("Password"));
        assert!(text.contains("Ctrl+R"));
    }

    #[test]
    fn test_password_is_masked() {
        let mut app = AppState::new();
        if let crate::screens::Screen::Login(login) = &mut app.screen {
            login.fields[1].value = "hunter22".into();
        }
        let text = screen_text(&app);
        assert!(!text.contains("hunter22"));
        assert!(text.contains("••••••••"));
    }

    #[test]
    fn test_notice_is_shown() {
        let mut app = AppState::new();
        app.set_notice("Login successful");
        assert!(screen_text(&app).contains("Login successful"));
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField, LoginMode},
    ui::{
        components::card::{Card, centered_box},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let login = &state.login;

    let card_area = centered_box(36, 7, area);
    frame.render_widget(Clear, card_area);

    let title = match login.mode {
        LoginMode::Login => "login",
        LoginMode::Register => "register",
    };
    let card = Card::new(title, &theme).focused(true);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Username
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Password
        ])
        .margin(1)
        .split(inner);

    let username_focused = login.focus == LoginField::Username;
    render_input(frame, rows[0], "user", &login.username, false, username_focused, &theme);

    let password_focused = login.focus == LoginField::Password;
    render_input(frame, rows[2], "pass", &login.password, true, password_focused, &theme);

    let below = |offset: u16| Rect {
        x: card_area.x,
        y: card_area.y.saturating_add(card_area.height).saturating_add(offset),
        width: card_area.width,
        height: 1,
    };

    // Error first, otherwise the notice left by a successful registration.
    let status = match (&login.message, &login.notice) {
        (Some(message), _) => Some(Span::styled(
            message.as_str(),
            Style::default().fg(theme.error),
        )),
        (None, Some(notice)) => Some(Span::styled(
            notice.as_str(),
            Style::default().fg(theme.positive),
        )),
        (None, None) => None,
    };
    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(status).alignment(Alignment::Center),
            below(1),
        );
    }

    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(theme.accent)),
        Span::raw(" field  "),
        Span::styled("↑↓", Style::default().fg(theme.accent)),
        Span::raw(" login/register  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" quit"),
    ]);
    let hints_area = Rect {
        x: area.x,
        width: area.width,
        ..below(3)
    };
    if hints_area.y < area.y.saturating_add(area.height) {
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), hints_area);
    }

    let server = Line::from(Span::styled(
        state.base_url.as_str(),
        Style::default().fg(theme.dim),
    ));
    let server_area = Rect {
        x: card_area.x,
        y: card_area.y.saturating_sub(1),
        width: card_area.width,
        height: 1,
    };
    frame.render_widget(Paragraph::new(server).alignment(Alignment::Center), server_area);
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let display = if is_password {
        format!("{}{cursor}", mask_password(value))
    } else {
        format!("{value}{cursor}")
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label} "), Style::default().fg(theme.dim)),
        Span::styled(display, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

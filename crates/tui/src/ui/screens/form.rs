use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::{components::card::Card, theme::Theme};

/// One labelled input of a popup form.
pub struct FormRow<'a> {
    pub label: &'static str,
    pub value: &'a str,
    pub focused: bool,
}

const LABEL_WIDTH: usize = 12;

pub fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    rows: &[FormRow<'_>],
    error: Option<&str>,
    theme: &Theme,
) {
    let height = u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(5);
    let card = Card::new(title, theme).focused(true);
    let inner = card.render_popup(frame, area, 56, height);

    let mut lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            let cursor = if row.focused { "│" } else { "" };
            let value_style = if row.focused {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<LABEL_WIDTH$}", row.label),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(format!("{}{cursor}", row.value), value_style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Dates are YYYY-MM-DD",
            Style::default().fg(theme.dim),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, question: &str, theme: &Theme) {
    let card = Card::new("confirm", theme).focused(true);
    let inner = card.render_popup(frame, area, 44, 5);
    let lines = vec![
        Line::from(question.to_string()),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" delete   "),
            Span::styled("any key", Style::default().fg(theme.accent)),
            Span::raw(" keep"),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

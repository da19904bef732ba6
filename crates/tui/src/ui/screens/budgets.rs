use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use engine::{Budget, Currency, DATE_KEY_FORMAT};

use crate::{
    app::{AppState, BudgetField, BudgetUsage, ListMode},
    ui::{
        components::{card::Card, money::styled_amount_bold, money::usage_gauge},
        screens::form::{FormRow, render_confirm, render_form},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_summary(frame, layout[0], state, &theme);
    render_list(frame, layout[1], state, &theme);

    match state.budgets.mode {
        ListMode::Form => render_budget_form(frame, area, state, &theme),
        ListMode::ConfirmDelete => {
            let category = state
                .budgets
                .selected_budget()
                .and_then(|b| b.category.as_deref())
                .unwrap_or("this");
            render_confirm(frame, area, &format!("Delete the {category} budget?"), &theme);
        }
        ListMode::List | ListMode::Filter => {}
    }
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let budgets = &state.budgets;
    let mut line = vec![
        Span::styled(
            format!("{} budgets", budgets.budgets.len()),
            Style::default().fg(theme.text_muted),
        ),
        Span::raw("   budgeted "),
        styled_amount_bold(budgets.total, state.currency, theme),
    ];
    if let Some(err) = &budgets.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }
    Card::new("Budgets", theme).render_with(frame, area, Paragraph::new(Line::from(line)));
}

fn budget_line(budget: &Budget, usage: Option<&BudgetUsage>, currency: Currency) -> String {
    let category = budget.category.as_deref().unwrap_or("-");
    let amount = budget
        .amount
        .map(|a| a.format(currency))
        .unwrap_or_else(|| "?".to_string());
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_KEY_FORMAT).to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    let spent = usage
        .and_then(|u| u.spent)
        .map(|s| format!("  spent {}", s.format(currency)))
        .unwrap_or_default();
    let remaining = usage
        .and_then(|u| u.remaining)
        .map(|r| format!("  left {}", r.format(currency)))
        .unwrap_or_default();
    format!(
        "{category:<14} {amount:>12}  {} → {}{spent}{remaining}",
        date(budget.start_date),
        date(budget.end_date)
    )
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let budgets = &state.budgets;
    let card = Card::new("Usage", theme).focused(budgets.mode == ListMode::List);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    if budgets.budgets.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No budgets yet. Press a to add one.",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let visible = usize::from(inner.height).max(1);
    let offset = budgets.selected.saturating_sub(visible - 1);

    for (row, (index, budget)) in budgets
        .budgets
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .enumerate()
    {
        let row_area = Rect {
            y: inner.y + u16::try_from(row).unwrap_or(0),
            height: 1,
            ..inner
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(24)])
            .split(row_area);

        let usage = budgets.usage_for(budget);
        let selected = index == budgets.selected;
        let (marker, style) = if selected {
            (
                "» ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("  ", Style::default().fg(theme.text))
        };
        let text = format!("{marker}{}", budget_line(budget, usage, state.currency));
        frame.render_widget(Paragraph::new(Span::styled(text, style)), columns[0]);

        match usage.and_then(|u| u.percentage) {
            Some(percentage) => frame.render_widget(usage_gauge(percentage, theme), columns[1]),
            None => frame.render_widget(
                Paragraph::new(Span::styled("no status", Style::default().fg(theme.dim))),
                columns[1],
            ),
        }
    }
}

fn render_budget_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.budgets.form;
    let focus = form.focus();
    let rows: Vec<FormRow> = BudgetField::ALL
        .into_iter()
        .map(|field| FormRow {
            label: field.label(),
            value: form.field(field),
            focused: field == focus,
        })
        .collect();
    let title = if form.editing.is_some() {
        "edit budget"
    } else {
        "new budget"
    };
    render_form(frame, area, title, &rows, form.error.as_deref(), theme);
}

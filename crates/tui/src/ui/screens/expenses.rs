use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use engine::{DATE_KEY_FORMAT, Expense};

use crate::{
    app::{AppState, ChartKind, ExpenseField, FilterField, ListMode},
    ui::{
        components::{card::Card, charts, money::styled_amount_bold},
        screens::form::{FormRow, render_confirm, render_form},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Filter bar
            Constraint::Min(6),     // List
            Constraint::Length(12), // Chart
        ])
        .split(area);

    render_filter_bar(frame, layout[0], state, &theme);
    render_list(frame, layout[1], state, &theme);
    render_chart(frame, layout[2], state, &theme);

    match state.expenses.mode {
        ListMode::Form => render_expense_form(frame, area, state, &theme),
        ListMode::ConfirmDelete => {
            let title = state
                .expenses
                .selected_expense()
                .and_then(|e| e.title.as_deref())
                .unwrap_or("this expense");
            render_confirm(frame, area, &format!("Delete {title}?"), &theme);
        }
        ListMode::List | ListMode::Filter => {}
    }
}

fn render_filter_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let editing = expenses.mode == ListMode::Filter;

    let mut fields = Vec::new();
    for field in FilterField::ALL {
        let focused = editing && expenses.filter_focus == field;
        let value = expenses.filter_field(field);
        let shown = match (value.is_empty(), focused) {
            (true, false) => "any".to_string(),
            (_, true) => format!("{value}│"),
            (false, false) => value.to_string(),
        };
        let style = if focused {
            Style::default().fg(theme.accent)
        } else if value.is_empty() {
            Style::default().fg(theme.dim)
        } else {
            Style::default().fg(theme.text)
        };
        fields.push(Span::styled(
            format!("{}: ", field.label()),
            Style::default().fg(theme.text_muted),
        ));
        fields.push(Span::styled(shown, style));
        fields.push(Span::raw("   "));
    }

    let mut summary = vec![
        Span::styled(
            format!("{} of {} expenses", expenses.rows.len(), expenses.records.len()),
            Style::default().fg(theme.text_muted),
        ),
        Span::raw("   total "),
        styled_amount_bold(expenses.total, state.currency, theme),
    ];
    if let Some(err) = &expenses.filter_error {
        summary.push(Span::raw("   "));
        summary.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    } else if let Some(err) = &expenses.error {
        summary.push(Span::raw("   "));
        summary.push(Span::styled(err.as_str(), Style::default().fg(theme.error)));
    }

    let card = Card::new("Filter", theme).focused(editing);
    card.render_with(
        frame,
        area,
        Paragraph::new(vec![Line::from(fields), Line::from(summary)]),
    );
}

fn expense_line(expense: &Expense, state: &AppState) -> String {
    let date = expense
        .date
        .map(|d| d.format(DATE_KEY_FORMAT).to_string())
        .unwrap_or_else(|| "----------".to_string());
    let category = expense.category.as_deref().unwrap_or("-");
    let amount = expense
        .amount
        .map(|a| a.format(state.currency))
        .unwrap_or_else(|| "?".to_string());
    let title = expense.title.as_deref().unwrap_or("");
    let description = expense
        .description
        .as_deref()
        .map(|d| format!("  {d}"))
        .unwrap_or_default();
    format!("{date}  {category:<16} {amount:>12}  {title}{description}")
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let card = Card::new("Expenses", theme).focused(expenses.mode == ListMode::List);

    if expenses.rows.is_empty() {
        let message = if expenses.records.is_empty() {
            "No expenses yet. Press a to add one."
        } else {
            "No expense matches the filter. Press c to clear it."
        };
        card.render_with(
            frame,
            area,
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim))),
        );
        return;
    }

    let items: Vec<ListItem> = expenses
        .rows
        .iter()
        .map(|expense| ListItem::new(Line::from(expense_line(expense, state))))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(expenses.selected));

    let list = List::new(items)
        .block(card.block())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_chart(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let card = Card::new(expenses.chart.label(), theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    match expenses.chart {
        ChartKind::Share => {
            charts::render_share(frame, inner, &expenses.buckets, state.currency, theme)
        }
        ChartKind::Bars => charts::render_bars(frame, inner, &expenses.buckets, theme),
        ChartKind::Trend => {
            charts::render_trend(frame, inner, &expenses.buckets, state.currency, theme)
        }
    }
}

fn render_expense_form(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.expenses.form;
    let focus = form.focus();
    let rows: Vec<FormRow> = ExpenseField::ALL
        .into_iter()
        .map(|field| FormRow {
            label: field.label(),
            value: form.field(field),
            focused: field == focus,
        })
        .collect();
    let title = if form.editing.is_some() {
        "edit expense"
    } else {
        "new expense"
    };
    render_form(frame, area, title, &rows, form.error.as_deref(), theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{Currency, Money};

    #[test]
    fn list_line_marks_missing_fields() {
        let state = AppState::new(String::new(), Currency::Usd, String::new());
        let expense = Expense {
            title: Some("Mystery".to_string()),
            ..Expense::default()
        };
        let line = expense_line(&expense, &state);
        assert!(line.starts_with("----------  -"));
        assert!(line.contains("?  Mystery"));

        let expense = Expense {
            title: Some("Rent".to_string()),
            amount: Some(Money::new(120_000)),
            category: Some("Bills".to_string()),
            date: chrono::NaiveDate::from_ymd_opt(2024, 2, 1),
            description: Some("February".to_string()),
            ..Expense::default()
        };
        let line = expense_line(&expense, &state);
        assert!(line.starts_with("2024-02-01  Bills"));
        assert!(line.ends_with("$1,200.00  Rent  February"));
    }
}

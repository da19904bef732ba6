use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, FilterField, ListMode, Section},
    ui::theme::Theme,
};

/// A keyboard hint: the key and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

const FORM: [KeyHint; 3] = [
    hint("Tab", "next"),
    hint("Enter", "save"),
    hint("Esc", "cancel"),
];

const CONFIRM: [KeyHint; 2] = [hint("y", "delete"), hint("any", "keep")];

/// Hints for whatever currently has the keyboard.
pub fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match state.section {
        Section::Expenses => match state.expenses.mode {
            ListMode::List => vec![
                hint("a", "add"),
                hint("e", "edit"),
                hint("d", "delete"),
                hint("/", "filter"),
                hint("c", "clear"),
                hint("g", "chart"),
                hint("r", "refresh"),
            ],
            ListMode::Filter => {
                let mut hints = vec![hint("Tab", "next")];
                if state.expenses.filter_focus == FilterField::Category {
                    hints.push(hint("↑↓", "pick"));
                }
                hints.push(hint("Esc", "done"));
                hints
            }
            ListMode::Form => FORM.to_vec(),
            ListMode::ConfirmDelete => CONFIRM.to_vec(),
        },
        Section::Budgets => match state.budgets.mode {
            ListMode::List | ListMode::Filter => vec![
                hint("a", "add"),
                hint("e", "edit"),
                hint("d", "delete"),
                hint("r", "refresh"),
            ],
            ListMode::Form => {
                let mut hints = FORM.to_vec();
                hints.insert(1, hint("↑↓", "category"));
                hints
            }
            ListMode::ConfirmDelete => CONFIRM.to_vec(),
        },
    }
}

/// Shortcuts that work from any list.
pub fn global_hints() -> Vec<KeyHint> {
    vec![hint("Tab", "section"), hint("l", "logout"), hint("q", "quit")]
}

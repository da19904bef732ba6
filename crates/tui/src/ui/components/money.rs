use engine::{Currency, Money};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Gauge,
};

use crate::ui::theme::Theme;

#[must_use]
pub fn styled_amount(amount: Money, currency: Currency, theme: &Theme) -> Span<'static> {
    let color = if amount.cents() < 0 {
        theme.error
    } else {
        theme.text
    };
    Span::styled(amount.format(currency), Style::default().fg(color))
}

#[must_use]
pub fn styled_amount_bold(amount: Money, currency: Currency, theme: &Theme) -> Span<'static> {
    let span = styled_amount(amount, currency, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    span.style(style)
}

/// Gauge fill for a usage percentage, clamped to 0..=100.
#[must_use]
pub fn usage_percent(percentage: f64) -> u16 {
    if percentage.is_nan() {
        return 0;
    }
    percentage.clamp(0.0, 100.0) as u16
}

/// Green below 80 %, warning up to 100 %, error beyond.
#[must_use]
pub fn usage_color(percentage: f64, theme: &Theme) -> Color {
    if percentage > 100.0 {
        theme.error
    } else if percentage >= 80.0 {
        theme.warning
    } else {
        theme.positive
    }
}

/// Budget usage gauge. The label keeps the real percentage even when the
/// bar is full.
#[must_use]
pub fn usage_gauge(percentage: f64, theme: &Theme) -> Gauge<'static> {
    Gauge::default()
        .gauge_style(Style::default().fg(usage_color(percentage, theme)))
        .percent(usage_percent(percentage))
        .label(format!("{percentage:.1}%"))
}

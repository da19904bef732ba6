use engine::{Bucket, Currency, Money, share};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Paragraph, Sparkline},
};

use crate::ui::theme::Theme;

/// Whole currency units for chart heights; negative totals draw as zero.
#[must_use]
pub fn major_units(total: Money) -> u64 {
    u64::try_from(total.cents()).unwrap_or(0) / 100
}

/// Returns something like `████████░░  80%`.
#[must_use]
pub fn percentage_bar(percentage: u16, width: usize) -> String {
    let filled = ((percentage as usize * width) / 100).min(width);
    let empty = width.saturating_sub(filled);
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(empty),
        percentage
    )
}

fn empty(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Nothing to chart for the current filter.",
            Style::default().fg(theme.dim),
        )),
        area,
    );
}

/// One line per category: label, share bar and amount.
pub fn render_share(
    frame: &mut Frame<'_>,
    area: Rect,
    buckets: &[Bucket],
    currency: Currency,
    theme: &Theme,
) {
    if buckets.is_empty() {
        empty(frame, area, theme);
        return;
    }

    let label_width = buckets
        .iter()
        .map(|b| b.key.chars().count())
        .max()
        .unwrap_or(0)
        .min(16);
    let lines: Vec<Line> = share(buckets)
        .into_iter()
        .zip(buckets)
        .map(|((key, percentage), bucket)| {
            let label: String = key.chars().take(label_width).collect();
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_width$}  "),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    percentage_bar(percentage, 20),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(format!("  {}", bucket.total.format(currency))),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Vertical bars of category totals in whole currency units.
pub fn render_bars(frame: &mut Frame<'_>, area: Rect, buckets: &[Bucket], theme: &Theme) {
    if buckets.is_empty() {
        empty(frame, area, theme);
        return;
    }

    let labels: Vec<String> = buckets.iter().map(|b| b.key.chars().take(8).collect()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(buckets)
        .map(|(label, bucket)| (label.as_str(), major_units(bucket.total)))
        .collect();

    let chart = BarChart::default()
        .data(data.as_slice())
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));
    frame.render_widget(chart, area);
}

/// Day-by-day totals as a sparkline with the covered range underneath.
pub fn render_trend(
    frame: &mut Frame<'_>,
    area: Rect,
    buckets: &[Bucket],
    currency: Currency,
    theme: &Theme,
) {
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        empty(frame, area, theme);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let data: Vec<u64> = buckets
        .iter()
        .map(|b| u64::try_from(b.total.cents()).unwrap_or(0))
        .collect();
    let sparkline = Sparkline::default()
        .data(&data)
        .style(Style::default().fg(theme.accent));
    frame.render_widget(sparkline, layout[0]);

    let peak = buckets
        .iter()
        .max_by_key(|b| b.total)
        .map(|b| format!("peak {} on {}", b.total.format(currency), b.key))
        .unwrap_or_default();
    let caption = Line::from(vec![
        Span::styled(
            format!("{} → {}  ", first.key, last.key),
            Style::default().fg(theme.dim),
        ),
        Span::raw(peak),
    ]);
    frame.render_widget(Paragraph::new(caption), layout[1]);
}

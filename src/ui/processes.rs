use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::format::process_row;
use crate::system::snapshot::Snapshot;
use crate::system::source::MetricKind;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    top_k: usize,
    name_width: usize,
    theme: &Theme,
) {
    let title = format!(" Top {top_k} Processes by CPU Usage ");
    let block = panel_block(&title, theme);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:>5} {:<name_width$} {:>6}", "PID", "NAME", "CPU"),
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    ))];

    if !snapshot.is_available(MetricKind::Processes) {
        lines.push(Line::from(Span::styled(
            "process list unavailable",
            Style::default().fg(theme.status_err),
        )));
    } else {
        lines.extend(snapshot.top_processes.iter().map(|entry| {
            Line::from(Span::styled(
                process_row(entry, name_width),
                Style::default().fg(theme.text_primary),
            ))
        }));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

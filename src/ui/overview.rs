use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::format::{format_megabytes, format_percent};
use crate::system::snapshot::Snapshot;
use crate::system::source::MetricKind;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_gauge(frame, rows[0], " CPU Usage ", snapshot.cpu_percent, theme);
    render_gauge(frame, rows[1], " Memory Usage ", snapshot.memory_percent, theme);
    render_gauge(frame, rows[2], " Disk Usage ", snapshot.disk_percent, theme);
    render_battery(frame, rows[3], snapshot, theme);
    render_network(frame, rows[4], snapshot, theme);
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, value: Option<f64>, theme: &Theme) {
    let block = panel_block(title, theme);
    let Some(percent) = value else {
        let text = Paragraph::new(Span::styled(
            "unavailable",
            Style::default().fg(theme.status_err),
        ))
        .block(block);
        frame.render_widget(text, area);
        return;
    };

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(theme.heat(percent))
                .bg(theme.gauge_unfilled),
        )
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format_percent(Some(percent)));
    frame.render_widget(gauge, area);
}

fn render_battery(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    match snapshot.battery {
        Some(status) => {
            let label = if status.charging {
                format!("{} (Charging)", format_percent(Some(status.percent)))
            } else {
                format_percent(Some(status.percent))
            };
            let gauge = Gauge::default()
                .block(panel_block(" Battery Level ", theme))
                .gauge_style(
                    Style::default()
                        .fg(theme.heat(100.0 - status.percent))
                        .bg(theme.gauge_unfilled),
                )
                .ratio((status.percent / 100.0).clamp(0.0, 1.0))
                .label(label);
            frame.render_widget(gauge, area);
        }
        None => {
            let (text, color) = if snapshot.is_available(MetricKind::Battery) {
                ("No Battery Info", theme.text_secondary)
            } else {
                ("unavailable", theme.status_err)
            };
            let para = Paragraph::new(Span::styled(text, Style::default().fg(color)))
                .block(panel_block(" Battery Level ", theme));
            frame.render_widget(para, area);
        }
    }
}

fn render_network(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let line = match &snapshot.network {
        Some(delta) => Line::from(vec![Span::styled(
            format!(
                "Sent: {} | Received: {}",
                format_megabytes(delta.sent_mb),
                format_megabytes(delta.received_mb)
            ),
            Style::default().fg(theme.text_primary),
        )]),
        None => Line::from(Span::styled(
            "unavailable",
            Style::default().fg(theme.status_err),
        )),
    };
    frame.render_widget(
        Paragraph::new(line).block(panel_block(" Network ", theme)),
        area,
    );
}

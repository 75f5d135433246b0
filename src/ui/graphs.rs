use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Sparkline;

use crate::format::format_percent;
use crate::system::snapshot::Snapshot;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

/// Sparkline bars are integers; percentages keep two decimals this way.
const SCALE: f64 = 100.0;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let cpu_title = format!(" CPU Usage (%) {} ", format_percent(snapshot.cpu_percent));
    render_history(
        frame,
        rows[0],
        &cpu_title,
        &snapshot.cpu_history,
        theme.sparkline_cpu,
        theme,
    );

    let mem_title = format!(
        " Memory Usage (%) {} ",
        format_percent(snapshot.memory_percent)
    );
    render_history(
        frame,
        rows[1],
        &mem_title,
        &snapshot.memory_history,
        theme.sparkline_memory,
        theme,
    );
}

fn render_history(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    history: &[f64],
    color: Color,
    theme: &Theme,
) {
    let data = scaled(history);
    let sparkline = Sparkline::default()
        .block(panel_block(title, theme))
        .data(&data)
        .max((100.0 * SCALE) as u64)
        .style(Style::default().fg(color));
    frame.render_widget(sparkline, area);
}

fn scaled(history: &[f64]) -> Vec<u64> {
    history
        .iter()
        .map(|v| (v.clamp(0.0, 100.0) * SCALE).round() as u64)
        .collect()
}

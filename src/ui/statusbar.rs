use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let mut spans = vec![Span::styled(
        " q quit  Tab/←→ switch view  1-3 jump ",
        Style::default().fg(theme.text_primary),
    )];

    if let Some(snapshot) = snapshot {
        spans.push(Span::styled(
            format!(" tick {} ", snapshot.tick),
            Style::default().fg(theme.text_secondary),
        ));
        if !snapshot.unavailable.is_empty() {
            let names: Vec<&str> = snapshot.unavailable.iter().map(|m| m.label()).collect();
            spans.push(Span::styled(
                format!(" unavailable: {} ", names.join(", ")),
                Style::default().fg(theme.status_err),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

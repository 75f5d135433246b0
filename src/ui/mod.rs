pub mod graphs;
pub mod overview;
pub mod processes;
pub mod statusbar;
pub mod theme;

#[cfg(test)]
mod tests;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

use crate::app::{App, Tab};
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], app.tab, &app.theme);

    match &app.snapshot {
        Some(snapshot) => match app.tab {
            Tab::Overview => overview::render(frame, chunks[1], snapshot, &app.theme),
            Tab::Graphs => graphs::render(frame, chunks[1], snapshot, &app.theme),
            Tab::Processes => processes::render(
                frame,
                chunks[1],
                snapshot,
                app.top_k,
                app.name_width,
                &app.theme,
            ),
        },
        None => render_waiting(frame, chunks[1], &app.theme),
    }

    statusbar::render(frame, chunks[2], app.snapshot.as_ref(), &app.theme);
}

fn render_tabs(frame: &mut Frame, area: Rect, selected: Tab, theme: &Theme) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected.index())
        .block(panel_block(" hostpulse ", theme))
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_waiting(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = Paragraph::new(Line::from(Span::styled(
        "Waiting for first sample...",
        Style::default().fg(theme.text_secondary),
    )))
    .block(panel_block("", theme));
    frame.render_widget(text, area);
}

pub(crate) fn panel_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

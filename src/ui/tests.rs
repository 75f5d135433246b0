use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::app::{App, Tab};
use crate::system::rate::NetworkDelta;
use crate::system::snapshot::{ProcessEntry, Snapshot};
use crate::system::source::{BatteryStatus, MetricKind};
use crate::ui::theme::Theme;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::draw(frame, app)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn make_snapshot() -> Snapshot {
    Snapshot {
        tick: 7,
        cpu_percent: Some(42.5),
        memory_percent: Some(63.0),
        disk_percent: Some(80.25),
        battery: Some(BatteryStatus {
            percent: 77.0,
            charging: true,
        }),
        network: Some(NetworkDelta {
            sent_mb: 1.5,
            received_mb: 0.25,
            elapsed: Duration::from_secs(1),
        }),
        top_processes: vec![
            ProcessEntry {
                pid: 812,
                name: "cargo".to_string(),
                cpu_share: 93.4,
            },
            ProcessEntry {
                pid: 77,
                name: "firefox".to_string(),
                cpu_share: 12.0,
            },
        ],
        cpu_history: vec![0.0, 10.0, 42.5],
        memory_history: vec![0.0, 60.0, 63.0],
        unavailable: Vec::new(),
    }
}

fn app_on(tab: Tab, snapshot: Option<Snapshot>) -> App {
    let mut app = App::new(25, 5, Theme::dark());
    app.tab = tab;
    app.snapshot = snapshot;
    app
}

#[test]
fn waiting_screen_before_first_snapshot() {
    let out = render_app(&app_on(Tab::Overview, None), 80, 12);
    assert!(out.contains("Waiting for first sample"));
    assert!(out.contains("Overview"));
    assert!(out.contains("Top Processes"));
}

#[test]
fn overview_shows_every_metric() {
    let out = render_app(&app_on(Tab::Overview, Some(make_snapshot())), 80, 22);
    assert!(out.contains("CPU Usage"));
    assert!(out.contains("42.5%"));
    assert!(out.contains("63.0%"));
    assert!(out.contains("80.2%") || out.contains("80.3%"));
    assert!(out.contains("77.0% (Charging)"));
    assert!(out.contains("Sent: 1.50 MB | Received: 0.25 MB"));
    assert!(out.contains("tick 7"));
}

#[test]
fn overview_marks_failed_and_absent_fields() {
    let mut snapshot = make_snapshot();
    snapshot.disk_percent = None;
    snapshot.battery = None;
    snapshot.unavailable = vec![MetricKind::Disk];

    let out = render_app(&app_on(Tab::Overview, Some(snapshot)), 80, 22);
    assert!(out.contains("unavailable"));
    assert!(out.contains("No Battery Info"));
    assert!(out.contains("unavailable: disk"));
}

#[test]
fn graphs_tab_titles_carry_current_values() {
    let out = render_app(&app_on(Tab::Graphs, Some(make_snapshot())), 80, 16);
    assert!(out.contains("CPU Usage (%) 42.5%"));
    assert!(out.contains("Memory Usage (%) 63.0%"));
}

#[test]
fn processes_tab_lists_ranked_rows() {
    let out = render_app(&app_on(Tab::Processes, Some(make_snapshot())), 80, 12);
    assert!(out.contains("Top 5 Processes by CPU Usage"));
    assert!(out.contains("  812 cargo"));
    assert!(out.contains("93.4%"));
    let cargo = out.find("cargo").unwrap();
    let firefox = out.find("firefox").unwrap();
    assert!(cargo < firefox);
}

#[test]
fn processes_tab_reports_unavailable_list() {
    let mut snapshot = make_snapshot();
    snapshot.top_processes.clear();
    snapshot.unavailable = vec![MetricKind::Processes];
    let out = render_app(&app_on(Tab::Processes, Some(snapshot)), 80, 12);
    assert!(out.contains("process list unavailable"));
}

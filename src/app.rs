use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Graphs,
    Processes,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Graphs, Tab::Processes];

    pub fn next(self) -> Self {
        match self {
            Tab::Overview => Tab::Graphs,
            Tab::Graphs => Tab::Processes,
            Tab::Processes => Tab::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Overview => Tab::Processes,
            Tab::Graphs => Tab::Overview,
            Tab::Processes => Tab::Graphs,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Graphs => "Graphs",
            Tab::Processes => "Top Processes",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Graphs => 1,
            Tab::Processes => 2,
        }
    }
}

/// Dashboard state. Holds only copies of published snapshots; the sampler's
/// own state is never reachable from here.
pub struct App {
    pub running: bool,
    pub tab: Tab,
    pub snapshot: Option<Snapshot>,
    pub name_width: usize,
    pub top_k: usize,
    pub theme: Theme,
}

impl App {
    pub fn new(name_width: usize, top_k: usize, theme: Theme) -> Self {
        App {
            running: true,
            tab: Tab::default(),
            snapshot: None,
            name_width,
            top_k,
            theme,
        }
    }

    pub fn on_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Action::NextTab,
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Action::PrevTab,
            KeyCode::Char('1') => Action::SelectTab(Tab::Overview),
            KeyCode::Char('2') => Action::SelectTab(Tab::Graphs),
            KeyCode::Char('3') => Action::SelectTab(Tab::Processes),
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::SelectTab(tab) => self.tab = tab,
            Action::None => {}
        }
    }
}

use crate::app::Tab;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    SelectTab(Tab),
    None,
}

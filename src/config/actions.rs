#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalAction {
    Quit,
    Back,
    Help,
    Filter,
    CopyId,
    CopyReference,
    Suspend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Up,
    Down,
    Home,
    End,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    NextPage,
    PrevPage,
    Refresh,
    LoadMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    Next,
    Prev,
    Tenth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    Shell,
    Logs,
    Forward,
    StopForward,
    StopAllForwards,
    Follow,
}

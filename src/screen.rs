//! Screen contract for navigable content.
//!
//! Screens follow the single-funnel update pattern:
//! - `init()` queues startup work, once, when the screen becomes reachable
//! - `handle_key()` queues work from user input
//! - `handle_tick()` only advances animations
//! - `update()` drains queued work and async results - THE SINGLE FUNNEL
//!
//! Only `update()` can return commands or navigation. Async results never touch
//! screen state directly: commands send them into the screen's [`Inbox`], and
//! the screen applies them the next time `update()` runs on the main loop.
//!
//! Optional capabilities ([`Resizable`], [`Filterable`], [`Copyable`], [`Tabbed`])
//! are queried at the call site through the `as_*` methods.

pub mod table;
pub mod tabs;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::Theme;
use crate::commands::Command;
use crate::ui::{Handled, Keybinding};

pub use table::{ColumnDef, DataTable, ErrorPolicy, Page, Source, Status, TableConfig};
pub use tabs::TabSet;

/// A navigation instruction returned from `update()`.
pub enum Navigation {
    /// Show a new screen on top of the current one.
    Push(Box<dyn Screen>),
    /// Leave the current screen.
    Pop,
    /// Give the terminal to an interactive process, then redraw.
    Handoff(ExternalProcess),
}

impl std::fmt::Debug for Navigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(screen) => write!(f, "Push({})", screen.title()),
            Self::Pop => write!(f, "Pop"),
            Self::Handoff(process) => write!(f, "Handoff({process:?})"),
        }
    }
}

/// An interactive program that needs exclusive use of the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProcess {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalProcess {
    /// Run `command` through `sh -c`.
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), command.into()],
        }
    }
}

/// Output of a screen's `update()`: commands to spawn and at most one
/// navigation instruction.
#[derive(Default)]
#[must_use]
pub struct Update {
    pub commands: Vec<Box<dyn Command>>,
    pub navigation: Option<Navigation>,
}

impl Update {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn run(command: impl Command) -> Self {
        Self {
            commands: vec![Box::new(command)],
            navigation: None,
        }
    }

    pub fn push(screen: impl Screen + 'static) -> Self {
        Self {
            commands: Vec::new(),
            navigation: Some(Navigation::Push(Box::new(screen))),
        }
    }

    pub fn pop() -> Self {
        Self {
            commands: Vec::new(),
            navigation: Some(Navigation::Pop),
        }
    }

    pub fn handoff(process: ExternalProcess) -> Self {
        Self {
            commands: Vec::new(),
            navigation: Some(Navigation::Handoff(process)),
        }
    }

    /// Fold `other` into `self`. Commands accumulate; a later navigation
    /// replaces an earlier one.
    pub fn merge(&mut self, other: Self) {
        self.commands.extend(other.commands);
        if other.navigation.is_some() {
            self.navigation = other.navigation;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.commands.is_empty() && self.navigation.is_none()
    }
}

impl<T: Command> From<T> for Update {
    fn from(command: T) -> Self {
        Self::run(command)
    }
}

/// A navigable unit of UI with its own state and message handling.
///
/// The runtime calls methods in this order:
///
/// 1. `init()` - once when the screen is pushed or its tab is first activated
/// 2. `update()` - immediately after init to collect startup commands
/// 3. For each event while the screen is on top:
///    - `handle_tick()` if tick event
///    - `handle_key()` if key event, then `update()`
/// 4. When any command completes: `update()`
/// 5. `destroy()` - when the screen is popped or its tab is invalidated
pub trait Screen {
    /// Queue startup work.
    fn init(&mut self) {}

    /// Release resources (background streams, subprocesses) before the
    /// screen is dropped.
    fn destroy(&mut self) {}

    /// Advance animations.
    fn handle_tick(&mut self) {}

    /// Handle a key event. Work is queued and returned from `update()`.
    fn handle_key(&mut self, key: KeyEvent) -> Handled<()>;

    /// Process queued work and async results.
    ///
    /// # Errors
    /// An error is shown in the status line; the screen stays on the stack.
    fn update(&mut self) -> Result<Update>;

    /// Render the screen into the content area.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segment for this screen.
    fn title(&self) -> String;

    /// Keybindings for the footer and the help overlay.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }

    fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
        None
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        None
    }

    fn as_copyable(&self) -> Option<&dyn Copyable> {
        None
    }

    fn as_tabbed(&self) -> Option<&dyn Tabbed> {
        None
    }
}

/// Receives the content area dimensions on every terminal resize.
pub trait Resizable {
    fn resize(&mut self, width: u16, height: u16);
}

/// Accepts a filter query from the runtime's filter prompt.
pub trait Filterable {
    /// Apply `query`; an empty query clears the filter.
    fn apply_filter(&mut self, query: &str);

    fn filter(&self) -> &str;
}

/// Provides text for the copy-id and copy-reference keys.
///
/// An empty string means there is nothing to copy.
pub trait Copyable {
    fn copy_id(&self) -> String;

    fn copy_reference(&self) -> String;
}

/// Exposes the tab bar of a tabbed screen to the chrome.
pub trait Tabbed {
    fn tab_names(&self) -> Vec<String>;

    fn active_tab(&self) -> usize;
}

/// Per-instance message queue for async results.
///
/// Commands hold a sender; the owning screen drains the receiver in
/// `update()`. When the screen is dropped, late results are discarded because
/// sending fails.
pub struct Inbox<M> {
    tx: UnboundedSender<M>,
    rx: UnboundedReceiver<M>,
}

impl<M> Inbox<M> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> UnboundedSender<M> {
        self.tx.clone()
    }

    /// Queue a message from the main loop itself.
    pub fn queue(&self, message: M) {
        let _ = self.tx.send(message);
    }

    pub fn try_recv(&mut self) -> Option<M> {
        self.rx.try_recv().ok()
    }
}

impl<M> Default for Inbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Task;

    struct Blank;

    impl Screen for Blank {
        fn handle_key(&mut self, _key: KeyEvent) -> Handled<()> {
            Handled::Ignored
        }

        fn update(&mut self) -> Result<Update> {
            Ok(Update::idle())
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn title(&self) -> String {
            "Blank".to_string()
        }
    }

    #[test]
    fn test_merge_accumulates_commands_and_keeps_last_navigation() {
        let mut update = Update::run(Task::new("a", async { Ok(()) }));
        update.merge(Update::push(Blank));
        update.merge(Update::run(Task::new("b", async { Ok(()) })));

        assert_eq!(update.commands.len(), 2);
        assert!(matches!(update.navigation, Some(Navigation::Push(_))));

        update.merge(Update::pop());
        assert!(matches!(update.navigation, Some(Navigation::Pop)));
    }

    #[test]
    fn test_idle() {
        assert!(Update::idle().is_idle());
        assert!(!Update::pop().is_idle());
    }

    #[test]
    fn test_default_capabilities_are_absent() {
        let mut screen = Blank;
        assert!(screen.as_filterable().is_none());
        assert!(screen.as_copyable().is_none());
        assert!(screen.as_resizable().is_none());
        assert!(screen.as_tabbed().is_none());
    }

    #[test]
    fn test_inbox_queue() {
        let mut inbox = Inbox::new();
        inbox.queue(1);
        inbox.sender().send(2).unwrap();
        assert_eq!(inbox.try_recv(), Some(1));
        assert_eq!(inbox.try_recv(), Some(2));
        assert_eq!(inbox.try_recv(), None);
    }

    #[test]
    fn test_shell_process() {
        let process = ExternalProcess::shell("ssh web-1");
        assert_eq!(process.program, "sh");
        assert_eq!(process.args, vec!["-c", "ssh web-1"]);
    }
}

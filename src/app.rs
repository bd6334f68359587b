//! Root runtime: the navigation stack, global keys and the main loop.
//!
//! The loop is single threaded. Terminal events and [`AppEvent`]s are handled
//! one at a time; commands run on tokio tasks and only report back through
//! the event channel or the inbox of the screen that issued them.

mod stack;
mod tracker;

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{Frame, Terminal};
use tokio::sync::Semaphore;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::Theme;
use crate::commands::{Clipboard, Command, CopyToClipboardCmd};
use crate::config::{GlobalAction, KeyResolver};
use crate::error::RuntimeError;
use crate::screen::{ExternalProcess, Navigation, Update};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, HelpOverlay, Keybinding, StatusBar, TextInput, TextInputEvent, Toast,
    ToastManager, ToastType,
};

pub use stack::ScreenStack;
pub use tracker::{CommandId, CommandTracker};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 4.0;

/// Commands allowed to run at the same time; the rest wait for a permit.
pub const MAX_CONCURRENT_COMMANDS: usize = 8;

/// Rows taken by the header and the footer.
const CHROME_HEIGHT: u16 = 2;

/// Messages from commands to the runtime itself.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    CommandCompleted {
        id: CommandId,
        success: bool,
    },
}

pub struct App {
    stack: ScreenStack,
    tracker: CommandTracker,
    status_bar: StatusBar,
    help: HelpOverlay,
    toasts: ToastManager,
    filter_input: Option<TextInput>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    clipboard: Arc<dyn Clipboard>,
    limiter: Arc<Semaphore>,
    event_tx: UnboundedSender<AppEvent>,
    event_rx: UnboundedReceiver<AppEvent>,
    content_size: Option<(u16, u16)>,
    pending_handoff: Option<ExternalProcess>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(resolver: Arc<KeyResolver>, theme: Theme, clipboard: Arc<dyn Clipboard>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            stack: ScreenStack::new(),
            tracker: CommandTracker::new(),
            status_bar: StatusBar::new(),
            help: HelpOverlay::new(),
            toasts: ToastManager::new(),
            filter_input: None,
            resolver,
            theme,
            clipboard,
            limiter: Arc::new(Semaphore::new(MAX_CONCURRENT_COMMANDS)),
            event_tx,
            event_rx,
            content_size: None,
            pending_handoff: None,
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Sender for commands that report to the runtime (toasts).
    pub fn event_sender(&self) -> UnboundedSender<AppEvent> {
        self.event_tx.clone()
    }

    #[cfg(test)]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    pub const fn stack(&self) -> &ScreenStack {
        &self.stack
    }

    #[cfg(test)]
    pub fn is_filtering(&self) -> bool {
        self.filter_input.is_some()
    }

    /// Push a screen and process its startup work.
    pub fn push(&mut self, screen: Box<dyn crate::screen::Screen>) {
        self.stack.push(screen, self.content_size);
        self.update_top();
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.stack.is_empty() {
            return Err(RuntimeError::EmptyStack.into());
        }

        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)
            .map_err(|e| RuntimeError::Terminal(e.to_string()))?;
        tui.enter().map_err(|e| RuntimeError::Terminal(e.to_string()))?;
        let size = tui.size()?;
        self.resize(size.width, size.height);

        loop {
            tokio::select! {
                event = tui.next_event() => {
                    let event = event.ok_or(RuntimeError::ChannelClosed)?;
                    self.handle_event(&mut tui, event)?;
                }
                Some(event) = self.event_rx.recv() => self.handle_app_event(event),
            }

            if let Some(process) = self.pending_handoff.take() {
                self.hand_off(&mut tui, &process)?;
            }
            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.resume()?;
                self.redraw_after_handoff(&mut *tui)?;
            }
            if self.should_quit {
                break;
            }
        }

        info!("Shutting down");
        self.stack.clear();
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.handle_tick(),
            Event::Render => self.render(tui)?,
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.resize(width, height);
                self.render(tui)?;
            }
            Event::Error(e) => warn!("Terminal event error: {e}"),
        }
        Ok(())
    }

    fn hand_off(&mut self, tui: &mut Tui, process: &ExternalProcess) -> Result<()> {
        match tui.hand_off(process) {
            Ok(status) if !status.success() => {
                self.toasts
                    .show(Toast::error(format!("{} exited with {status}", process.program)));
            }
            Ok(_) => {}
            Err(e) => {
                error!("Hand-off failed: {e:#}");
                self.toasts.show(Toast::error(e.to_string()));
            }
        }
        self.redraw_after_handoff(&mut **tui)
    }

    /// Size every screen to the terminal we got back and draw a full frame
    /// before any further input is handled.
    pub fn redraw_after_handoff<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        let size = terminal
            .size()
            .map_err(|e| RuntimeError::Terminal(e.to_string()))?;
        self.resize(size.width, size.height);
        terminal
            .draw(|frame| self.draw(frame))
            .map_err(|e| RuntimeError::Terminal(e.to_string()))?;
        Ok(())
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppEvent::CommandCompleted { id, success } => {
                if let Some(done) = self.tracker.complete(id, success) {
                    debug!(
                        command = %done.name,
                        success = done.success,
                        elapsed_ms = done.duration.as_millis(),
                        "Command completed"
                    );
                }
                self.update_top();
            }
        }
    }

    /// Advance animations and drain the top screen's inbox so background
    /// streams show up without a key press.
    pub fn handle_tick(&mut self) {
        self.status_bar.handle_tick();
        self.toasts.handle_tick();
        if let Some(screen) = self.stack.top_mut() {
            screen.handle_tick();
        }
        self.update_top();
    }

    /// Record the terminal size and pass the content area on to every screen.
    pub fn resize(&mut self, width: u16, height: u16) {
        let content = (width, height.saturating_sub(CHROME_HEIGHT));
        self.content_size = Some(content);
        self.stack.resize(content.0, content.1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.filter_input.is_some() {
            self.handle_filter_key(key);
            return;
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
            return;
        }
        if self.help.is_visible() {
            if self.resolver.matches_global(&key, GlobalAction::Help)
                || self.resolver.matches_global(&key, GlobalAction::Back)
            {
                self.help.hide();
            }
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::Help) {
            self.help.toggle();
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::Back) {
            self.back();
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::Filter) && self.enter_filter() {
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::CopyId) && self.copy(false) {
            return;
        }
        if self.resolver.matches_global(&key, GlobalAction::CopyReference) && self.copy(true) {
            return;
        }

        let Some(screen) = self.stack.top_mut() else {
            return;
        };
        if screen.handle_key(key).is_consumed() {
            self.update_top();
        }
    }

    /// Pop the top screen, or quit when only the root is left.
    fn back(&mut self) {
        if self.stack.is_root() {
            self.should_quit = true;
        } else {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if self.stack.pop() {
            self.filter_input = None;
            self.update_top();
        }
    }

    fn enter_filter(&mut self) -> bool {
        let Some(filterable) = self.stack.top_mut().and_then(|s| s.as_filterable()) else {
            return false;
        };
        let current = filterable.filter().to_string();
        self.filter_input = Some(TextInput::new("/").with_value(current));
        true
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(input) = self.filter_input.as_mut() else {
            return;
        };
        let event = match input.handle_key(key) {
            Ok(handled) => handled.event(),
            Err(e) => {
                warn!("Filter input failed: {e}");
                None
            }
        };
        let query = match event {
            Some(TextInputEvent::Changed(query)) => query,
            Some(TextInputEvent::Submitted(_)) => {
                self.filter_input = None;
                return;
            }
            Some(TextInputEvent::Cancelled) => {
                self.filter_input = None;
                String::new()
            }
            None => return,
        };
        if let Some(filterable) = self.stack.top_mut().and_then(|s| s.as_filterable()) {
            filterable.apply_filter(&query);
        }
    }

    /// Copy from the top screen. Returns false if it is not copyable.
    fn copy(&mut self, reference: bool) -> bool {
        let Some(copyable) = self.stack.top().and_then(|s| s.as_copyable()) else {
            return false;
        };
        let (text, label) = if reference {
            (copyable.copy_reference(), "reference")
        } else {
            (copyable.copy_id(), "id")
        };
        if !text.is_empty() {
            self.spawn(Box::new(CopyToClipboardCmd::new(
                text,
                label,
                self.clipboard.clone(),
                self.event_tx.clone(),
            )));
        }
        true
    }

    /// Run the top screen's `update()` and act on the result until it settles.
    fn update_top(&mut self) {
        let Some(screen) = self.stack.top_mut() else {
            return;
        };
        match screen.update() {
            Ok(update) => self.apply(update),
            Err(e) => {
                error!("Screen update failed: {e:#}");
                self.toasts.show(Toast::error(e.to_string()));
            }
        }
    }

    fn apply(&mut self, update: Update) {
        for command in update.commands {
            self.spawn(command);
        }
        match update.navigation {
            Some(Navigation::Push(screen)) => self.push(screen),
            Some(Navigation::Pop) => self.pop(),
            Some(Navigation::Handoff(process)) => self.pending_handoff = Some(process),
            None => {}
        }
    }

    fn spawn(&mut self, command: Box<dyn Command>) {
        let name = command.name();
        let id = self.tracker.start(name.clone());
        let tx = self.event_tx.clone();
        let limiter = self.limiter.clone();
        debug!(command = %name, "Spawning command");

        tokio::spawn(async move {
            let _permit = limiter.acquire_owned().await.ok();
            let success = match command.execute().await {
                Ok(()) => true,
                Err(e) => {
                    error!(command = %name, "Command failed: {e:#}");
                    false
                }
            };
            let _ = tx.send(AppEvent::CommandCompleted { id, success });
        });
    }

    fn global_keybindings(&mut self) -> Vec<Keybinding> {
        let r = &self.resolver;
        let mut bindings = vec![
            Keybinding::hint(r.display_global(GlobalAction::Back), "Back"),
            Keybinding::hint(r.display_global(GlobalAction::Help), "Help"),
            Keybinding::new(r.display_global(GlobalAction::Quit), "Quit"),
            Keybinding::new(r.display_global(GlobalAction::Suspend), "Suspend"),
        ];
        let filterable = self
            .stack
            .top_mut()
            .is_some_and(|s| s.as_filterable().is_some());
        if filterable {
            bindings.push(Keybinding::hint(
                self.resolver.display_global(GlobalAction::Filter),
                "Filter",
            ));
        }
        if self.stack.top().is_some_and(|s| s.as_copyable().is_some()) {
            bindings.push(Keybinding::new(
                self.resolver.display_global(GlobalAction::CopyId),
                "Copy id",
            ));
            bindings.push(Keybinding::new(
                self.resolver.display_global(GlobalAction::CopyReference),
                "Copy reference",
            ));
        }
        bindings
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header, content, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let breadcrumbs = self.stack.breadcrumbs();
        let running = self.tracker.running_labels();
        self.status_bar
            .render_header(frame, header, &self.theme, &breadcrumbs, &running);

        if let Some(screen) = self.stack.top_mut() {
            screen.render(frame, content, &self.theme);
        }

        let global = self.global_keybindings();
        let screen_bindings = self
            .stack
            .top()
            .map(|s| s.keybindings())
            .unwrap_or_default();

        if let Some(input) = self.filter_input.as_mut() {
            input.render(frame, footer, &self.theme);
        } else if self.toasts.current().is_some() {
            self.toasts.render(frame, footer, &self.theme);
        } else {
            let hints: Vec<Keybinding> = screen_bindings
                .iter()
                .chain(global.iter())
                .cloned()
                .collect();
            self.status_bar
                .render_hints(frame, footer, &self.theme, &hints);
        }

        let title = self.stack.top().map(|s| s.title()).unwrap_or_default();
        self.help.render(
            frame,
            area,
            &self.theme,
            &[(title.as_str(), screen_bindings), ("Global", global)],
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::commands::Task;
    use crate::commands::clipboard::tests::FakeClipboard;
    use crate::screen::{Copyable, Filterable, Resizable, Screen};
    use crate::ui::Handled;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Filterable, copyable screen that logs every call.
    struct Recorder {
        name: &'static str,
        log: Log,
        filter: String,
        id: String,
        next: Option<Update>,
    }

    impl Recorder {
        fn boxed(name: &'static str, log: &Log) -> Box<Self> {
            Box::new(Self {
                name,
                log: log.clone(),
                filter: String::new(),
                id: format!("{name}-id"),
                next: None,
            })
        }

        fn record(&self, event: impl std::fmt::Display) {
            self.log.borrow_mut().push(format!("{}:{event}", self.name));
        }
    }

    impl Screen for Recorder {
        fn init(&mut self) {
            self.record("init");
        }

        fn destroy(&mut self) {
            self.record("destroy");
        }

        fn handle_key(&mut self, key: KeyEvent) -> Handled<()> {
            match key.code {
                KeyCode::Char(c) => {
                    self.record(format!("key {c}"));
                    Handled::Consumed
                }
                _ => Handled::Ignored,
            }
        }

        fn update(&mut self) -> Result<Update> {
            Ok(self.next.take().unwrap_or_default())
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn title(&self) -> String {
            self.name.to_string()
        }

        fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
            Some(self)
        }

        fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
            Some(self)
        }

        fn as_copyable(&self) -> Option<&dyn Copyable> {
            Some(self)
        }
    }

    impl Resizable for Recorder {
        fn resize(&mut self, width: u16, height: u16) {
            self.record(format!("{width}x{height}"));
        }
    }

    impl Filterable for Recorder {
        fn apply_filter(&mut self, query: &str) {
            self.filter = query.to_string();
            self.record(format!("filter {query:?}"));
        }

        fn filter(&self) -> &str {
            &self.filter
        }
    }

    impl Copyable for Recorder {
        fn copy_id(&self) -> String {
            self.id.clone()
        }

        fn copy_reference(&self) -> String {
            String::new()
        }
    }

    /// A screen with no optional capabilities.
    struct Plain;

    impl Screen for Plain {
        fn handle_key(&mut self, _key: KeyEvent) -> Handled<()> {
            Handled::Ignored
        }

        fn update(&mut self) -> Result<Update> {
            Ok(Update::idle())
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn title(&self) -> String {
            "Plain".to_string()
        }
    }

    fn app_with(clipboard: Arc<FakeClipboard>) -> App {
        App::new(Arc::new(KeyResolver::default()), Theme::default(), clipboard)
    }

    fn app() -> App {
        app_with(Arc::new(FakeClipboard::default()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn char_key(c: char) -> KeyEvent {
        key(KeyCode::Char(c))
    }

    #[tokio::test]
    async fn test_back_pops_then_quits_at_root() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));
        app.push(Recorder::boxed("detail", &log));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.stack().len(), 1);
        assert!(!app.should_quit());
        assert_eq!(log.borrow().last().map(String::as_str), Some("detail:destroy"));

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
        assert_eq!(app.stack().len(), 1);
    }

    #[tokio::test]
    async fn test_pop_navigation_at_root_is_noop() {
        let log = Log::default();
        let mut app = app();
        let mut root = Recorder::boxed("root", &log);
        root.next = Some(Update::pop());
        app.push(root);

        assert_eq!(app.stack().len(), 1);
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_push_navigation_initializes_screen() {
        let log = Log::default();
        let mut app = app();
        let mut root = Recorder::boxed("root", &log);
        root.next = Some(Update {
            commands: Vec::new(),
            navigation: Some(Navigation::Push(Recorder::boxed("child", &log))),
        });
        app.resize(80, 24);
        app.push(root);

        assert_eq!(app.stack().len(), 2);
        assert_eq!(app.stack().breadcrumbs(), vec!["root", "child"]);
        assert!(log.borrow().contains(&"child:80x22".to_string()));
        assert!(log.borrow().contains(&"child:init".to_string()));
    }

    #[tokio::test]
    async fn test_resize_reaches_whole_stack() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));
        app.push(Recorder::boxed("detail", &log));
        log.borrow_mut().clear();

        app.resize(120, 40);
        assert_eq!(*log.borrow(), vec!["root:120x38", "detail:120x38"]);
    }

    #[tokio::test]
    async fn test_unbound_keys_reach_top_screen() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));

        app.handle_key(char_key('s'));
        assert_eq!(log.borrow().last().map(String::as_str), Some("root:key s"));
    }

    #[tokio::test]
    async fn test_filter_mode_edits_apply_and_escape_clears() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));

        app.handle_key(char_key('/'));
        assert!(app.is_filtering());

        // Global keys are plain text while filtering
        app.handle_key(char_key('q'));
        assert!(!app.should_quit());
        app.handle_key(char_key('a'));
        app.handle_key(key(KeyCode::Esc));

        assert!(!app.is_filtering());
        let log = log.borrow();
        let filters: Vec<&str> = log
            .iter()
            .filter(|e| e.starts_with("root:filter"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            filters,
            vec![
                "root:filter \"q\"",
                "root:filter \"qa\"",
                "root:filter \"\""
            ]
        );
    }

    #[tokio::test]
    async fn test_filter_enter_keeps_query() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));

        app.handle_key(char_key('/'));
        app.handle_key(char_key('x'));
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.is_filtering());
        assert_eq!(log.borrow().last().map(String::as_str), Some("root:filter \"x\""));

        // Re-entering starts from the active query
        app.handle_key(char_key('/'));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(log.borrow().last().map(String::as_str), Some("root:filter \"\""));
    }

    #[tokio::test]
    async fn test_filter_key_without_capability_is_delegated() {
        let mut app = app();
        app.push(Box::new(Plain));

        app.handle_key(char_key('/'));
        assert!(!app.is_filtering());
    }

    #[tokio::test]
    async fn test_copy_writes_clipboard_and_shows_toast() {
        let clipboard = Arc::new(FakeClipboard::default());
        let log = Log::default();
        let mut app = app_with(clipboard.clone());
        app.push(Recorder::boxed("root", &log));

        app.handle_key(char_key('y'));

        // Toast first, then the completion of the copy command
        let toast = app.event_rx.recv().await.unwrap();
        app.handle_app_event(toast);
        let done = app.event_rx.recv().await.unwrap();
        assert!(matches!(done, AppEvent::CommandCompleted { success: true, .. }));
        app.handle_app_event(done);

        assert_eq!(*clipboard.writes.lock().unwrap(), vec!["root-id".to_string()]);
        assert_eq!(
            app.toasts.current().map(Toast::message),
            Some("Copied id: root-id")
        );
        assert_eq!(app.tracker.running_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_copy_is_silent() {
        let clipboard = Arc::new(FakeClipboard::default());
        let log = Log::default();
        let mut app = app_with(clipboard.clone());
        app.push(Recorder::boxed("root", &log));

        // Recorder has no reference to copy
        app.handle_key(char_key('Y'));
        assert_eq!(app.tracker.running_count(), 0);
        assert!(app.toasts.current().is_none());
    }

    #[tokio::test]
    async fn test_failed_command_is_tracked() {
        let log = Log::default();
        let mut app = app();
        let mut root = Recorder::boxed("root", &log);
        root.next = Some(Update::run(Task::new("Doomed", async {
            Err(color_eyre::eyre::eyre!("boom"))
        })));
        app.push(root);
        assert_eq!(app.tracker.running_count(), 1);

        let done = app.event_rx.recv().await.unwrap();
        assert!(matches!(done, AppEvent::CommandCompleted { success: false, .. }));
        app.handle_app_event(done);
        assert_eq!(app.tracker.running_count(), 0);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("root", &log));

        app.handle_key(char_key('?'));
        app.handle_key(char_key('s'));
        assert!(!log.borrow().iter().any(|e| e == "root:key s"));

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.should_quit());
        app.handle_key(char_key('s'));
        assert_eq!(log.borrow().last().map(String::as_str), Some("root:key s"));
    }

    #[tokio::test]
    async fn test_draw_renders_chrome() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("Resources", &log));
        app.push(Recorder::boxed("Compute", &log));

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Resources › Compute"));
        assert!(text.contains("Back"));
    }

    #[tokio::test]
    async fn test_redraw_after_handoff_resizes_and_draws() {
        let log = Log::default();
        let mut app = app();
        app.push(Recorder::boxed("Resources", &log));
        app.push(Recorder::boxed("Compute", &log));
        log.borrow_mut().clear();

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        app.redraw_after_handoff(&mut terminal).unwrap();

        assert!(log.borrow().iter().any(|e| e == "Resources:100x18"));
        assert!(log.borrow().iter().any(|e| e == "Compute:100x18"));
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Resources › Compute"));
    }
}

//! Lazily created tabs hosted inside one screen.

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;
use tracing::{debug, warn};

use crate::Theme;
use crate::config::{KeyResolver, TabAction};
use crate::screen::{Copyable, Filterable, Resizable, Screen, Tabbed, Update};
use crate::ui::{Handled, Keybinding};

/// Builds the screen for a tab index on first activation.
pub type TabFactory = Box<dyn FnMut(usize) -> Box<dyn Screen>>;

/// Runs before every switch with `(from, to)`; returns tabs to rebuild.
pub type BeforeSwitch = Box<dyn FnMut(usize, usize) -> Vec<usize>>;

const TENTH_TAB: usize = 9;

/// A screen made of named tabs.
///
/// Tab screens are created on first activation and kept afterwards, so
/// switching back to a tab shows it as it was left. Resizes reach only the
/// active tab; the last size is replayed to a tab when it becomes active.
pub struct TabSet {
    title: String,
    names: Vec<String>,
    tabs: Vec<Option<Box<dyn Screen>>>,
    factory: TabFactory,
    before_switch: Option<BeforeSwitch>,
    active: usize,
    size: Option<(u16, u16)>,
    pending: Update,
    /// Last tab update failure, shown in the tab bar until the next switch.
    failure: Option<String>,
    resolver: Arc<KeyResolver>,
}

impl TabSet {
    pub fn new<F>(
        title: impl Into<String>,
        names: Vec<String>,
        factory: F,
        resolver: Arc<KeyResolver>,
    ) -> Self
    where
        F: FnMut(usize) -> Box<dyn Screen> + 'static,
    {
        let tabs = names.iter().map(|_| None).collect();
        Self {
            title: title.into(),
            names,
            tabs,
            factory: Box::new(factory),
            before_switch: None,
            active: 0,
            size: None,
            pending: Update::idle(),
            failure: None,
            resolver,
        }
    }

    #[must_use]
    pub fn before_switch<F>(mut self, hook: F) -> Self
    where
        F: FnMut(usize, usize) -> Vec<usize> + 'static,
    {
        self.before_switch = Some(Box::new(hook));
        self
    }

    pub const fn active(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_created(&self, index: usize) -> bool {
        self.tabs.get(index).is_some_and(Option::is_some)
    }

    fn active_screen(&self) -> Option<&dyn Screen> {
        self.tabs.get(self.active)?.as_deref()
    }

    fn active_screen_mut(&mut self) -> Option<&mut Box<dyn Screen>> {
        self.tabs.get_mut(self.active)?.as_mut()
    }

    /// Switch to `index`. Out-of-range indices and the active tab are ignored.
    pub fn select(&mut self, index: usize) {
        if index >= self.tabs.len() || index == self.active {
            return;
        }
        let from = self.active;
        let stale = self
            .before_switch
            .as_mut()
            .map(|hook| hook(from, index))
            .unwrap_or_default();
        for tab in stale {
            self.invalidate(tab);
        }

        debug!(from, to = index, "Switching tab");
        self.active = index;
        self.failure = None;
        self.activate();
    }

    pub fn next(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + 1) % self.tabs.len());
        }
    }

    pub fn prev(&mut self) {
        if !self.tabs.is_empty() {
            self.select((self.active + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    /// Drop the screen of tab `index`; it is rebuilt on next activation, or
    /// right away if it is the active tab.
    pub fn invalidate(&mut self, index: usize) {
        let Some(slot) = self.tabs.get_mut(index) else {
            return;
        };
        if let Some(mut screen) = slot.take() {
            debug!(tab = index, "Invalidating tab");
            screen.destroy();
        }
        if index == self.active {
            self.activate();
        }
    }

    /// Create the active tab if needed and bring it up to the current size.
    fn activate(&mut self) {
        let index = self.active;
        let size = self.size;
        let Some(slot) = self.tabs.get_mut(index) else {
            return;
        };

        if slot.is_none() {
            let mut screen = (self.factory)(index);
            screen.init();
            *slot = Some(screen);
        }
        let Some(screen) = slot.as_mut() else {
            return;
        };
        if let (Some((width, height)), Some(resizable)) = (size, screen.as_resizable()) {
            resizable.resize(width, height);
        }
    }

    fn digit_tab(key: &KeyEvent) -> Option<usize> {
        if key.modifiers - KeyModifiers::SHIFT != KeyModifiers::NONE {
            return None;
        }
        match key.code {
            KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize - 1),
            _ => None,
        }
    }
}

impl Screen for TabSet {
    fn init(&mut self) {
        self.activate();
    }

    fn destroy(&mut self) {
        for screen in self.tabs.iter_mut().filter_map(Option::as_mut) {
            screen.destroy();
        }
    }

    fn handle_tick(&mut self) {
        if let Some(screen) = self.active_screen_mut() {
            screen.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled<()> {
        let target = Self::digit_tab(&key).or_else(|| {
            self.resolver
                .matches_tab(&key, TabAction::Tenth)
                .then_some(TENTH_TAB)
        });
        if let Some(index) = target
            && index < self.tabs.len()
        {
            self.select(index);
            return Handled::Consumed;
        }
        if self.resolver.matches_tab(&key, TabAction::Next) {
            self.next();
            return Handled::Consumed;
        }
        if self.resolver.matches_tab(&key, TabAction::Prev) {
            self.prev();
            return Handled::Consumed;
        }
        self.active_screen_mut()
            .map_or(Handled::Ignored, |screen| screen.handle_key(key))
    }

    fn update(&mut self) -> Result<Update> {
        let mut update = std::mem::take(&mut self.pending);
        // Inactive tabs still drain their inboxes so finished work lands. A
        // failing tab does not hold back the others.
        for (index, slot) in self.tabs.iter_mut().enumerate() {
            let Some(screen) = slot.as_mut() else {
                continue;
            };
            match screen.update() {
                Ok(tab_update) => update.merge(tab_update),
                Err(e) => {
                    let name = self.names.get(index).map_or("Tab", String::as_str);
                    warn!(tab = index, "Tab update failed: {e:#}");
                    if self.failure.is_none() {
                        self.failure = Some(format!("{name}: {e}"));
                    }
                }
            }
        }
        Ok(update)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [bar_area, content_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        let titles = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| Line::from(format!("{} {name}", (i + 1) % 10)));
        let tabs = Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(theme.subtext0()))
            .highlight_style(
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("│");
        frame.render_widget(tabs, bar_area);

        if let Some(failure) = &self.failure {
            frame.render_widget(
                Line::from(format!("✗ {failure}"))
                    .style(Style::default().fg(theme.error()))
                    .right_aligned(),
                bar_area,
            );
        }

        if let Some(screen) = self.active_screen_mut() {
            screen.render(frame, content_area, theme);
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let mut bindings = self
            .active_screen()
            .map(Screen::keybindings)
            .unwrap_or_default();
        bindings.push(Keybinding::hint(
            format!(
                "{}/{}",
                self.resolver.display_tab(TabAction::Next),
                self.resolver.display_tab(TabAction::Prev)
            ),
            "Tab",
        ));
        let last_digit = self.len().min(TENTH_TAB);
        if last_digit > 1 {
            let mut keys = format!("1-{last_digit}");
            if self.len() > TENTH_TAB {
                keys.push('/');
                keys.push_str(&self.resolver.display_tab(TabAction::Tenth));
            }
            bindings.push(Keybinding::new(keys, "Jump to tab"));
        }
        bindings
    }

    fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
        Some(self)
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        self.active_screen_mut()?.as_filterable()
    }

    fn as_copyable(&self) -> Option<&dyn Copyable> {
        self.active_screen()?.as_copyable()
    }

    fn as_tabbed(&self) -> Option<&dyn Tabbed> {
        Some(self)
    }
}

impl Resizable for TabSet {
    fn resize(&mut self, width: u16, height: u16) {
        // One row goes to the tab bar.
        let size = (width, height.saturating_sub(1));
        self.size = Some(size);
        if let Some(resizable) = self
            .active_screen_mut()
            .and_then(|screen| screen.as_resizable())
        {
            resizable.resize(size.0, size.1);
        }
    }
}

impl Tabbed for TabSet {
    fn tab_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn active_tab(&self) -> usize {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use color_eyre::eyre::eyre;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::commands::Task;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        index: usize,
        log: Log,
    }

    impl Recorder {
        fn record(&self, event: impl std::fmt::Display) {
            self.log.borrow_mut().push(format!("{}:{event}", self.index));
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
            if let KeyCode::Char(c) = key.code {
                self.record(c);
                return Handled::Consumed;
            }
            Handled::Ignored
        }

        fn update(&mut self) -> Result<Update> {
            Ok(Update::idle())
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn title(&self) -> String {
            format!("Recorder {}", self.index)
        }

        fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
            Some(self)
        }
    }

    impl Resizable for Recorder {
        fn resize(&mut self, width: u16, height: u16) {
            self.record(format!("{width}x{height}"));
        }
    }

    fn tab_set(count: usize, log: &Log) -> TabSet {
        let names = (0..count).map(|i| format!("Tab {i}")).collect();
        let factory_log = log.clone();
        TabSet::new(
            "Detail",
            names,
            move |index| {
                Box::new(Recorder {
                    index,
                    log: factory_log.clone(),
                })
            },
            Arc::new(KeyResolver::default()),
        )
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_tabs_are_created_on_first_activation() {
        let log = Log::default();
        let mut tabs = tab_set(3, &log);
        assert!(!tabs.is_created(0));

        tabs.init();
        assert!(tabs.is_created(0));
        assert!(!tabs.is_created(1));

        tabs.select(2);
        tabs.select(0);
        tabs.select(2);
        assert!(!tabs.is_created(1));
        assert_eq!(*log.borrow(), vec!["0:init", "2:init"]);
    }

    #[test]
    fn test_digit_keys_select_tabs() {
        let log = Log::default();
        let mut tabs = tab_set(10, &log);
        tabs.init();

        assert!(tabs.handle_key(key('3')).is_consumed());
        assert_eq!(tabs.active(), 2);

        assert!(tabs.handle_key(key('0')).is_consumed());
        assert_eq!(tabs.active(), 9);

        assert!(tabs.handle_key(key('1')).is_consumed());
        assert_eq!(tabs.active(), 0);
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let log = Log::default();
        let mut tabs = tab_set(2, &log);
        tabs.init();

        assert!(tabs.handle_key(key('5')).is_consumed());
        assert!(tabs.handle_key(key('0')).is_consumed());
        assert_eq!(tabs.active(), 0);
        // Both digits fell through to the active tab
        assert_eq!(*log.borrow(), vec!["0:init", "0:5", "0:0"]);
    }

    #[test]
    fn test_digit_hint_matches_tab_count() {
        let log = Log::default();
        let hint = |tabs: &TabSet| {
            tabs.keybindings()
                .into_iter()
                .find(|binding| binding.description == "Jump to tab")
                .map(|binding| binding.key)
        };

        assert_eq!(hint(&tab_set(4, &log)), Some("1-4".to_string()));
        assert_eq!(hint(&tab_set(10, &log)), Some("1-9/0".to_string()));
        assert_eq!(hint(&tab_set(1, &log)), None);
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let log = Log::default();
        let mut tabs = tab_set(3, &log);
        tabs.init();

        tabs.prev();
        assert_eq!(tabs.active(), 2);
        tabs.next();
        assert_eq!(tabs.active(), 0);

        let _ = tabs.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(tabs.active(), 1);
        let _ = tabs.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(tabs.active(), 0);
    }

    #[test]
    fn test_other_keys_reach_active_tab() {
        let log = Log::default();
        let mut tabs = tab_set(2, &log);
        tabs.init();
        tabs.select(1);

        assert!(tabs.handle_key(key('x')).is_consumed());
        assert_eq!(log.borrow().last().map(String::as_str), Some("1:x"));
        assert!(!tabs.handle_key(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)).is_consumed());
    }

    #[test]
    fn test_resize_reaches_only_active_tab_and_replays_on_activation() {
        let log = Log::default();
        let mut tabs = tab_set(2, &log);
        tabs.init();

        tabs.resize(80, 25);
        tabs.select(1);

        assert_eq!(
            *log.borrow(),
            vec!["0:init", "0:80x24", "1:init", "1:80x24"]
        );
    }

    #[test]
    fn test_before_switch_invalidates_tabs() {
        let log = Log::default();
        let rebuild = Rc::new(RefCell::new(false));
        let flag = rebuild.clone();
        let mut tabs = tab_set(2, &log).before_switch(move |_, to| {
            if to == 1 && flag.replace(false) {
                vec![1]
            } else {
                vec![]
            }
        });
        tabs.init();
        tabs.select(1);
        tabs.select(0);

        *rebuild.borrow_mut() = true;
        tabs.select(1);

        assert_eq!(
            *log.borrow(),
            vec!["0:init", "1:init", "1:destroy", "1:init"]
        );
    }

    /// A tab that either fails every update or queues one load on init.
    struct Loader {
        broken: bool,
        pending: Update,
    }

    impl Screen for Loader {
        fn init(&mut self) {
            if !self.broken {
                self.pending = Update::run(Task::new("load tab", async { Ok(()) }));
            }
        }

        fn handle_key(&mut self, _key: KeyEvent) -> Handled<()> {
            Handled::Ignored
        }

        fn update(&mut self) -> Result<Update> {
            if self.broken {
                return Err(eyre!("tab broke"));
            }
            Ok(std::mem::take(&mut self.pending))
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn title(&self) -> String {
            "Loader".to_string()
        }
    }

    #[test]
    fn test_failing_tab_does_not_block_other_tabs() {
        let names = vec!["Broken".to_string(), "Loaded".to_string()];
        let mut tabs = TabSet::new(
            "Detail",
            names,
            |index| {
                Box::new(Loader {
                    broken: index == 0,
                    pending: Update::idle(),
                })
            },
            Arc::new(KeyResolver::default()),
        );
        tabs.init();
        tabs.select(1);

        let update = tabs.update().unwrap();
        let names: Vec<String> = update.commands.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["load tab"]);
        assert_eq!(tabs.failure(), Some("Broken: tab broke"));

        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                tabs.render(frame, area, &Theme::default());
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Broken: tab broke"));

        tabs.select(0);
        assert_eq!(tabs.failure(), None);
    }

    #[test]
    fn test_destroy_reaches_every_created_tab() {
        let log = Log::default();
        let mut tabs = tab_set(3, &log);
        tabs.init();
        tabs.select(2);
        log.borrow_mut().clear();

        tabs.destroy();
        assert_eq!(*log.borrow(), vec!["0:destroy", "2:destroy"]);
    }

    #[test]
    fn test_capabilities() {
        let log = Log::default();
        let mut tabs = tab_set(3, &log);
        tabs.init();
        tabs.select(1);

        let tabbed = tabs.as_tabbed().unwrap();
        assert_eq!(tabbed.active_tab(), 1);
        assert_eq!(tabbed.tab_names().len(), 3);
        // Recorder tabs are not filterable
        assert!(tabs.as_filterable().is_none());
    }
}

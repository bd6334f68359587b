use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{GlobalAction, NavAction, ResourceAction, TabAction, TableAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions using the configured keybindings.
#[derive(Default)]
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    // Global actions
    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Back => &kb.back,
            GlobalAction::Help => &kb.help,
            GlobalAction::Filter => &kb.filter,
            GlobalAction::CopyId => &kb.copy_id,
            GlobalAction::CopyReference => &kb.copy_reference,
            GlobalAction::Suspend => &kb.suspend,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    // Navigation actions
    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    // Table actions
    fn table(&self, action: TableAction) -> &KeyBinding {
        let kb = &self.keybindings.table;
        match action {
            TableAction::NextPage => &kb.next_page,
            TableAction::PrevPage => &kb.prev_page,
            TableAction::Refresh => &kb.refresh,
            TableAction::LoadMore => &kb.load_more,
        }
    }

    pub fn matches_table(&self, event: &KeyEvent, action: TableAction) -> bool {
        self.table(action).matches(event)
    }

    pub fn display_table(&self, action: TableAction) -> String {
        self.table(action).display()
    }

    // Tab actions
    fn tab(&self, action: TabAction) -> &KeyBinding {
        let kb = &self.keybindings.tabs;
        match action {
            TabAction::Next => &kb.next,
            TabAction::Prev => &kb.prev,
            TabAction::Tenth => &kb.tenth,
        }
    }

    pub fn matches_tab(&self, event: &KeyEvent, action: TabAction) -> bool {
        self.tab(action).matches(event)
    }

    pub fn display_tab(&self, action: TabAction) -> String {
        self.tab(action).display()
    }

    // Resource actions
    fn resource(&self, action: ResourceAction) -> &KeyBinding {
        let kb = &self.keybindings.resource;
        match action {
            ResourceAction::Shell => &kb.shell,
            ResourceAction::Logs => &kb.logs,
            ResourceAction::Forward => &kb.forward,
            ResourceAction::StopForward => &kb.stop_forward,
            ResourceAction::StopAllForwards => &kb.stop_all_forwards,
            ResourceAction::Follow => &kb.follow,
        }
    }

    pub fn matches_resource(&self, event: &KeyEvent, action: ResourceAction) -> bool {
        self.resource(action).matches(event)
    }

    pub fn display_resource(&self, action: ResourceAction) -> String {
        self.resource(action).display()
    }

    /// Owned binding, for tables that register per-item actions.
    pub fn resource_binding(&self, action: ResourceAction) -> KeyBinding {
        self.resource(action).clone()
    }
}

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub back: KeyBinding,
    pub help: KeyBinding,
    pub filter: KeyBinding,
    pub copy_id: KeyBinding,
    pub copy_reference: KeyBinding,
    pub suspend: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableKeybindings {
    pub next_page: KeyBinding,
    pub prev_page: KeyBinding,
    pub refresh: KeyBinding,
    pub load_more: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabKeybindings {
    pub next: KeyBinding,
    pub prev: KeyBinding,
    /// Jumps to the tenth tab; digits 1-9 cover the first nine.
    pub tenth: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceKeybindings {
    pub shell: KeyBinding,
    pub logs: KeyBinding,
    pub forward: KeyBinding,
    pub stop_forward: KeyBinding,
    pub stop_all_forwards: KeyBinding,
    pub follow: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub table: TableKeybindings,
    pub tabs: TabKeybindings,
    pub resource: ResourceKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            back: Key::new(KeyCode::Esc).into(),
            help: Key::char('?').into(),
            filter: Key::char('/').into(),
            copy_id: Key::char('y').into(),
            copy_reference: Key::char('Y').into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::char('k'), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![Key::char('j'), Key::new(KeyCode::Down)]),
            home: KeyBinding::multiple(vec![Key::char('g'), Key::new(KeyCode::Home)]),
            end: KeyBinding::multiple(vec![Key::char('G'), Key::new(KeyCode::End)]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for TableKeybindings {
    fn default() -> Self {
        Self {
            next_page: KeyBinding::multiple(vec![
                Key::char(']'),
                Key::new(KeyCode::PageDown),
                Key::new(KeyCode::Right),
            ]),
            prev_page: KeyBinding::multiple(vec![
                Key::char('['),
                Key::new(KeyCode::PageUp),
                Key::new(KeyCode::Left),
            ]),
            refresh: Key::char('r').into(),
            load_more: Key::char('m').into(),
        }
    }
}

impl Default for TabKeybindings {
    fn default() -> Self {
        Self {
            next: Key::new(KeyCode::Tab).into(),
            prev: Key::new(KeyCode::BackTab).into(),
            tenth: Key::char('0').into(),
        }
    }
}

impl Default for ResourceKeybindings {
    fn default() -> Self {
        Self {
            shell: Key::char('s').into(),
            logs: Key::char('l').into(),
            forward: Key::char('f').into(),
            stop_forward: Key::char('x').into(),
            stop_all_forwards: Key::char('X').into(),
            follow: Key::char('F').into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: KeybindingsConfig = toml::from_str(
            r#"
            [table]
            next_page = "n"
            "#,
        )
        .unwrap();

        assert_eq!(config.table.next_page.display(), "n");
        assert_eq!(config.table.prev_page.display(), "[/PageUp/Left");
        assert_eq!(config.global.quit.display(), "q");
    }
}

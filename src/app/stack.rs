use tracing::debug;

use crate::screen::Screen;

/// The navigation stack. Never empty once the root is pushed.
#[derive(Default)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.screens.len() <= 1
    }

    /// Push a screen that has not been initialized yet.
    ///
    /// The screen gets the current content size before `init()` so its first
    /// render already fits.
    pub fn push(&mut self, mut screen: Box<dyn Screen>, size: Option<(u16, u16)>) {
        debug!(title = %screen.title(), depth = self.screens.len() + 1, "Pushing screen");
        if let (Some((width, height)), Some(resizable)) = (size, screen.as_resizable()) {
            resizable.resize(width, height);
        }
        screen.init();
        self.screens.push(screen);
    }

    /// Pop and destroy the top screen. Popping the last screen is a no-op.
    pub fn pop(&mut self) -> bool {
        if self.is_root() {
            return false;
        }
        if let Some(mut screen) = self.screens.pop() {
            debug!(title = %screen.title(), "Popping screen");
            screen.destroy();
        }
        true
    }

    /// Destroy every screen, top first.
    pub fn clear(&mut self) {
        while let Some(mut screen) = self.screens.pop() {
            screen.destroy();
        }
    }

    pub fn top(&self) -> Option<&dyn Screen> {
        self.screens.last().map(|screen| &**screen)
    }

    pub fn top_mut(&mut self) -> Option<&mut Box<dyn Screen>> {
        self.screens.last_mut()
    }

    /// Every screen in the stack learns the new size, not only the top one.
    pub fn resize(&mut self, width: u16, height: u16) {
        for screen in &mut self.screens {
            if let Some(resizable) = screen.as_resizable() {
                resizable.resize(width, height);
            }
        }
    }

    /// One segment per screen; tabbed screens add their active tab.
    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = Vec::new();
        for screen in &self.screens {
            crumbs.push(screen.title());
            if let Some(tabbed) = screen.as_tabbed()
                && let Some(name) = tabbed.tab_names().get(tabbed.active_tab())
            {
                crumbs.push(name.clone());
            }
        }
        crumbs
    }
}

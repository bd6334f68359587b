//! UI building blocks shared by every screen.
//!
//! - [`Component`] - Reusable, interactive widgets that know nothing about the domain
//! - [`Handled`] - Result of handling an input event
//! - [`Keybinding`] - A key hint shown in the footer and the help overlay
//!
//! The app-level chrome (status bar, help overlay, toasts) also lives here.

mod components;
mod help;
mod status_bar;
mod toast;
mod widgets;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;

pub use components::{TextInput, TextInputEvent};
pub use help::HelpOverlay;
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastManager, ToastType};
pub use widgets::Spinner;

/// Result type alias for UI operations.
pub type Result<T> = std::result::Result<T, color_eyre::Report>;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled but produced no event
/// - `Event(E)` - The input was handled and produced an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<E> {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed but produced no event.
    Consumed,
    /// Input was consumed and produced an event.
    Event(E),
}

impl<E> Handled<E> {
    /// Returns true if the input was consumed (not ignored).
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }

    /// Returns the event if present.
    pub fn event(self) -> Option<E> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }

    /// Maps the event type using the provided function.
    pub fn map<F, U>(self, f: F) -> Handled<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Ignored => Handled::Ignored,
            Self::Consumed => Handled::Consumed,
            Self::Event(e) => Handled::Event(f(e)),
        }
    }
}

impl<E> From<E> for Handled<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Interactive UI building block.
///
/// Components are reusable widgets that handle key events and emit
/// generic outputs. They know nothing about business logic.
pub trait Component {
    /// The output type this component produces (e.g., `TextInputEvent`)
    type Output;

    /// Handle a key event.
    ///
    /// Returns `Ok(Handled::...)` where:
    /// - `Ignored` - key was not handled, parent should process it
    /// - `Consumed` - key was handled but produced no output
    /// - `Event(output)` - key was handled and produced an output
    ///
    /// # Errors
    /// Returns an error if handling the key failed.
    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        _ = key;
        Ok(Handled::Ignored)
    }

    /// Called on each tick for animations and time-based updates.
    fn handle_tick(&mut self) {}

    /// Render the component to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// A key hint for the footer and help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
    /// Shown in the footer, not only in the help overlay.
    pub hint: bool,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            hint: false,
        }
    }

    pub fn hint(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            hint: true,
            ..Self::new(key, description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handled_map_and_event() {
        let handled: Handled<u8> = 3.into();
        assert!(handled.is_consumed());
        assert_eq!(handled.map(|v| v * 2).event(), Some(6));

        let ignored: Handled<u8> = Handled::Ignored;
        assert!(!ignored.is_consumed());
        assert_eq!(ignored.event(), None);
    }
}

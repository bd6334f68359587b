use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;

/// How long a status message stays visible.
const TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Error)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Holds the single transient message shown in the footer.
///
/// A newer toast replaces the current one.
#[derive(Default)]
pub struct ToastManager {
    current: Option<Toast>,
}

impl ToastManager {
    pub const fn new() -> Self {
        Self { current: None }
    }

    pub fn show(&mut self, toast: Toast) {
        self.current = Some(toast);
    }

    pub const fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Drop the message once it expired.
    pub fn handle_tick(&mut self) {
        if self.current.as_ref().is_some_and(Toast::is_expired) {
            self.current = None;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(toast) = &self.current else {
            return;
        };

        let (color, icon) = match toast.toast_type {
            ToastType::Success => (theme.green(), "✓"),
            ToastType::Info => (theme.blue(), "ℹ"),
            ToastType::Error => (theme.red(), "✗"),
        };

        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(
                toast.message.clone(),
                Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

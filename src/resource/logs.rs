//! Live tail of a resource's log command.

use std::collections::VecDeque;
use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use tracing::debug;

use crate::Theme;
use crate::config::{KeyResolver, NavAction, ResourceAction, TableAction};
use crate::resource::Context;
use crate::screen::{Filterable, Resizable, Screen, Update};
use crate::search::{MatchMode, Matcher};
use crate::stream::{
    BackgroundStream, ExitReason, ProcessEvent, ProcessStream, StopHandle, StreamSource,
};
use crate::ui::{Handled, Keybinding};

/// Lines kept in memory; older lines are dropped first.
pub const MAX_LOG_LINES: usize = 5000;

pub struct LogTailScreen {
    title: String,
    command: Option<String>,
    lines: VecDeque<String>,
    source: Option<StreamSource<ProcessEvent>>,
    stop: Option<StopHandle>,
    ended: Option<ExitReason>,
    follow: bool,
    offset: usize,
    height: usize,
    filter: String,
    matcher: Matcher,
    resolver: Arc<KeyResolver>,
}

impl LogTailScreen {
    /// A tail of `command`'s output. `None` renders a "no log source" state.
    pub fn new(ctx: &Context, title: impl Into<String>, command: Option<String>) -> Self {
        let mode = if ctx.settings.fuzzy_filter {
            MatchMode::Fuzzy
        } else {
            MatchMode::Substring
        };
        Self {
            title: title.into(),
            command,
            lines: VecDeque::new(),
            source: None,
            stop: None,
            ended: None,
            follow: true,
            offset: 0,
            height: 0,
            filter: String::new(),
            matcher: Matcher::new(mode),
            resolver: ctx.resolver.clone(),
        }
    }

    pub fn lines(&self) -> &VecDeque<String> {
        &self.lines
    }

    pub const fn is_following(&self) -> bool {
        self.follow
    }

    pub const fn ended(&self) -> Option<&ExitReason> {
        self.ended.as_ref()
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    fn push_line(&mut self, line: String) {
        if self.lines.len() == MAX_LOG_LINES {
            self.lines.pop_front();
            // Keep a paused view on the same text while the front shifts.
            if !self.follow {
                self.offset = self.offset.saturating_sub(1);
            }
        }
        self.lines.push_back(line);
    }

    fn visible(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| self.matcher.matches(line, &self.filter))
            .collect()
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.height.max(1))
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.max_offset(self.visible().len());
        let current = if self.follow { max } else { self.offset.min(max) };
        self.offset = current.saturating_add_signed(delta).min(max);
        self.follow = self.offset == max && delta > 0;
    }

    fn toggle_follow(&mut self) {
        self.follow = !self.follow;
        if !self.follow {
            self.offset = self.max_offset(self.visible().len());
        }
    }

    fn status_label(&self) -> String {
        let mode = if self.follow { "following" } else { "paused" };
        let mut label = format!("{} lines · {mode}", self.lines.len());
        if !self.filter.is_empty() {
            label.push_str(&format!(" · /{}", self.filter));
        }
        if let Some(reason) = &self.ended {
            label.push_str(&format!(" · {reason}"));
        }
        format!(" {label} ")
    }
}

impl Screen for LogTailScreen {
    fn init(&mut self) {
        let Some(command) = &self.command else {
            return;
        };
        debug!(title = %self.title, "Starting log tail");
        let (source, stop) = ProcessStream::shell(command.clone()).start();
        self.source = Some(source);
        self.stop = Some(stop);
    }

    fn destroy(&mut self) {
        if let Some(stop) = self.stop.take() {
            debug!(title = %self.title, "Stopping log tail");
            stop.stop();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled<()> {
        let page = isize::try_from(self.height.max(1)).unwrap_or(isize::MAX);
        if self.resolver.matches_resource(&key, ResourceAction::Follow) {
            self.toggle_follow();
        } else if self.resolver.matches_nav(&key, NavAction::Down) {
            self.scroll_by(1);
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            self.scroll_by(-1);
        } else if self.resolver.matches_table(&key, TableAction::NextPage) {
            self.scroll_by(page);
        } else if self.resolver.matches_table(&key, TableAction::PrevPage) {
            self.scroll_by(-page);
        } else if self.resolver.matches_nav(&key, NavAction::Home) {
            self.follow = false;
            self.offset = 0;
        } else if self.resolver.matches_nav(&key, NavAction::End) {
            self.follow = true;
        } else {
            return Handled::Ignored;
        }
        Handled::Consumed
    }

    fn update(&mut self) -> Result<Update> {
        let mut events = Vec::new();
        if let Some(source) = self.source.as_mut() {
            while let Some(event) = source.try_next() {
                events.push(event);
            }
        }
        for event in events {
            match event {
                ProcessEvent::Line(line) => self.push_line(line),
                ProcessEvent::Ended(reason) => {
                    debug!(title = %self.title, %reason, "Log tail ended");
                    self.ended = Some(reason);
                    self.source = None;
                }
            }
        }
        Ok(Update::idle())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .title(
                Line::from(format!(" {} ", self.title)).style(
                    Style::default()
                        .fg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .title_bottom(
                Line::from(self.status_label())
                    .style(Style::default().fg(theme.subtext0()))
                    .right_aligned(),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.command.is_none() {
            frame.render_widget(
                Paragraph::new("No log source for this resource")
                    .style(Style::default().fg(theme.overlay1()))
                    .centered(),
                inner,
            );
            return;
        }

        self.height = usize::from(inner.height);
        let visible = self.visible();
        let max = self.max_offset(visible.len());
        let offset = if self.follow { max } else { self.offset.min(max) };
        let lines: Vec<Line> = visible
            .iter()
            .skip(offset)
            .take(self.height)
            .map(|line| Line::from(line.to_string()))
            .collect();
        self.offset = offset;

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(theme.text())),
            inner,
        );

        if max > 0 {
            let mut state = ScrollbarState::new(max).position(offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .style(Style::default().fg(theme.overlay0())),
                area.inner(Margin::new(0, 1)),
                &mut state,
            );
        }
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::hint(
                self.resolver.display_resource(ResourceAction::Follow),
                if self.follow { "Pause" } else { "Follow" },
            ),
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Up),
                    self.resolver.display_nav(NavAction::Down)
                ),
                "Scroll",
            ),
            Keybinding::new(
                format!(
                    "{}/{}",
                    self.resolver.display_nav(NavAction::Home),
                    self.resolver.display_nav(NavAction::End)
                ),
                "Top/Bottom",
            ),
        ]
    }

    fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
        Some(self)
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }
}

impl Resizable for LogTailScreen {
    fn resize(&mut self, _width: u16, height: u16) {
        // Two rows go to the border.
        self.height = usize::from(height.saturating_sub(2));
    }
}

impl Filterable for LogTailScreen {
    fn apply_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        if !self.follow {
            self.offset = 0;
        }
    }

    fn filter(&self) -> &str {
        &self.filter
    }
}

//! Generic data table screen.
//!
//! A [`DataTable`] is configured with a data source, a row projection and
//! optional per-item actions. It owns the items, the filtered view over them,
//! the current page and the selection. Fetches are issued as commands; every
//! fetch gets a fresh ticket and cancellation token so that results from a
//! superseded fetch are dropped instead of overwriting newer data.

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use futures::FutureExt;
use futures::future::BoxFuture;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, TableState, Wrap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Theme;
use crate::commands::{Command, Task};
use crate::config::key::KeyBinding;
use crate::config::{KeyResolver, NavAction, TableAction, TableSettings};
use crate::error::{ActionError, FetchError};
use crate::screen::{Copyable, Filterable, Inbox, Screen, Update};
use crate::search::{MatchMode, Matcher};
use crate::ui::{Component, Handled, Keybinding, Spinner};

/// Opaque continuation token returned by a paged source.
pub type Cursor = String;

pub type FetchFn<T> =
    Box<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<Vec<T>, FetchError>>>;
pub type FirstPageFn<T> =
    Box<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<Page<T>, FetchError>>>;
pub type MoreFn<T> =
    Box<dyn Fn(CancellationToken, Cursor) -> BoxFuture<'static, Result<Page<T>, FetchError>>>;
pub type RowFn<T> = Box<dyn Fn(&T) -> Vec<String>>;
pub type ItemFn<T> = Box<dyn Fn(&T) -> Update>;
pub type CopyFn<T> = Box<dyn Fn(&T) -> String>;

/// One batch of items from a paged source.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<Cursor>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A batch with nothing after it.
    pub const fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: None,
            has_more: false,
        }
    }

    pub fn more(items: Vec<T>, cursor: impl Into<Cursor>) -> Self {
        Self {
            items,
            cursor: Some(cursor.into()),
            has_more: true,
        }
    }
}

/// Where the rows come from.
pub enum Source<T> {
    /// Everything in one call.
    Full(FetchFn<T>),
    /// A first page, then optional continuation calls.
    Paged {
        first: FirstPageFn<T>,
        more: Option<MoreFn<T>>,
    },
}

impl<T> Source<T> {
    pub fn full<F>(fetch: F) -> Self
    where
        F: Fn(CancellationToken) -> BoxFuture<'static, Result<Vec<T>, FetchError>> + 'static,
    {
        Self::Full(Box::new(fetch))
    }

    pub fn paged<F, M>(first: F, more: M) -> Self
    where
        F: Fn(CancellationToken) -> BoxFuture<'static, Result<Page<T>, FetchError>> + 'static,
        M: Fn(CancellationToken, Cursor) -> BoxFuture<'static, Result<Page<T>, FetchError>>
            + 'static,
    {
        Self::Paged {
            first: Box::new(first),
            more: Some(Box::new(more)),
        }
    }
}

/// What happens to loaded rows when a refresh fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Keep showing the previous rows under an error banner.
    #[default]
    KeepRows,
    /// Drop the rows and show only the error.
    ClearRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Loaded,
    Error(FetchError),
}

pub struct ColumnDef {
    pub header: &'static str,
    pub constraint: Constraint,
}

impl ColumnDef {
    pub const fn new(header: &'static str, constraint: Constraint) -> Self {
        Self { header, constraint }
    }
}

struct KeyAction<T> {
    binding: KeyBinding,
    description: String,
    handler: ItemFn<T>,
}

/// Everything a [`DataTable`] needs to know about its data.
pub struct TableConfig<T> {
    title: String,
    columns: Vec<ColumnDef>,
    source: Source<T>,
    row: RowFn<T>,
    on_select: Option<(String, ItemFn<T>)>,
    actions: Vec<KeyAction<T>>,
    copy_id: Option<CopyFn<T>>,
    copy_reference: Option<CopyFn<T>>,
    page_size: usize,
    error_policy: ErrorPolicy,
    match_mode: MatchMode,
}

impl<T> TableConfig<T> {
    pub fn new<R>(
        title: impl Into<String>,
        columns: Vec<ColumnDef>,
        source: Source<T>,
        row: R,
    ) -> Self
    where
        R: Fn(&T) -> Vec<String> + 'static,
    {
        let defaults = TableSettings::default();
        Self {
            title: title.into(),
            columns,
            source,
            row: Box::new(row),
            on_select: None,
            actions: Vec::new(),
            copy_id: None,
            copy_reference: None,
            page_size: defaults.page_size,
            error_policy: ErrorPolicy::KeepRows,
            match_mode: MatchMode::Substring,
        }
    }

    /// Apply page size, error policy and match mode from the user's config.
    #[must_use]
    pub fn settings(mut self, settings: &TableSettings) -> Self {
        self.page_size = settings.page_size.max(1);
        self.error_policy = if settings.keep_rows_on_error {
            ErrorPolicy::KeepRows
        } else {
            ErrorPolicy::ClearRows
        };
        self.match_mode = if settings.fuzzy_filter {
            MatchMode::Fuzzy
        } else {
            MatchMode::Substring
        };
        self
    }

    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub const fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Drill-down on Enter.
    #[must_use]
    pub fn on_select<F>(mut self, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&T) -> Update + 'static,
    {
        self.on_select = Some((description.into(), Box::new(handler)));
        self
    }

    /// A key that acts on the selected item.
    #[must_use]
    pub fn action<F>(
        mut self,
        binding: KeyBinding,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&T) -> Update + 'static,
    {
        self.actions.push(KeyAction {
            binding,
            description: description.into(),
            handler: Box::new(handler),
        });
        self
    }

    #[must_use]
    pub fn copy_id<F>(mut self, extract: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.copy_id = Some(Box::new(extract));
        self
    }

    #[must_use]
    pub fn copy_reference<F>(mut self, extract: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.copy_reference = Some(Box::new(extract));
        self
    }
}

enum TableMsg<T> {
    Loaded {
        ticket: u64,
        result: Result<Page<T>, FetchError>,
    },
    Appended {
        ticket: u64,
        result: Result<Page<T>, FetchError>,
    },
    ActionFailed(ActionError),
}

pub struct DataTable<T> {
    config: TableConfig<T>,
    items: Vec<T>,
    rows: Vec<Vec<String>>,
    visible: Vec<usize>,
    page: usize,
    state: TableState,
    cursor: Option<Cursor>,
    has_more: bool,
    status: Status,
    loading_more: bool,
    action_error: Option<ActionError>,
    filter: String,
    matcher: Matcher,
    ticket: u64,
    token: Option<CancellationToken>,
    inbox: Inbox<TableMsg<T>>,
    pending: Update,
    spinner: Spinner,
    resolver: Arc<KeyResolver>,
}

impl<T: Send + 'static> DataTable<T> {
    pub fn new(config: TableConfig<T>, resolver: Arc<KeyResolver>) -> Self {
        let mut spinner = Spinner::new();
        spinner.set_label(format!("Loading {}...", config.title.to_lowercase()));
        let matcher = Matcher::new(config.match_mode);
        Self {
            config,
            items: Vec::new(),
            rows: Vec::new(),
            visible: Vec::new(),
            page: 0,
            state: TableState::default(),
            cursor: None,
            has_more: false,
            status: Status::Loading,
            loading_more: false,
            action_error: None,
            filter: String::new(),
            matcher,
            ticket: 0,
            token: None,
            inbox: Inbox::new(),
            pending: Update::idle(),
            spinner,
            resolver,
        }
    }

    pub const fn status(&self) -> &Status {
        &self.status
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    pub const fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub const fn action_error(&self) -> Option<&ActionError> {
        self.action_error.as_ref()
    }

    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.config.page_size)
    }

    /// "Page X/Y (N items)", with X = 0 when nothing is visible.
    pub fn page_label(&self) -> String {
        let total = self.total_pages();
        let current = if total == 0 { 0 } else { self.page + 1 };
        format!("Page {current}/{total} ({} items)", self.visible.len())
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.config.page_size).min(self.visible.len());
        let end = (start + self.config.page_size).min(self.visible.len());
        start..end
    }

    /// Projected cells of the rows on the current page.
    pub fn visible_rows(&self) -> Vec<&[String]> {
        self.visible[self.page_range()]
            .iter()
            .map(|&i| self.rows[i].as_slice())
            .collect()
    }

    /// Index into the item list of the selected row.
    ///
    /// The selection is relative to the current page, so the absolute
    /// position in the filtered view is `page * page_size + row`.
    pub fn selected_index(&self) -> Option<usize> {
        let row = self.state.selected()?;
        let position = self.page * self.config.page_size + row;
        if position >= self.page_range().end {
            return None;
        }
        self.visible.get(position).copied()
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected_index().and_then(|i| self.items.get(i))
    }

    pub fn select_row(&mut self, row: usize) {
        let len = self.page_range().len();
        if len > 0 {
            self.state.select(Some(row.min(len - 1)));
        }
    }

    fn reset_selection(&mut self) {
        if self.page_range().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.total_pages() {
            self.page += 1;
            self.reset_selection();
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.reset_selection();
        }
    }

    fn issue_ticket(&mut self) -> (u64, CancellationToken) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.ticket += 1;
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        (self.ticket, token)
    }

    /// Start a full reload. Any fetch or load-more still in flight is
    /// cancelled and its result will be ignored.
    pub fn refresh(&mut self) -> Box<dyn Command> {
        let (ticket, token) = self.issue_ticket();
        self.status = Status::Loading;
        self.loading_more = false;
        debug!(title = %self.config.title, ticket, "Refreshing table");

        let future = match &self.config.source {
            Source::Full(fetch) => fetch(token.clone()).map(|r| r.map(Page::complete)).boxed(),
            Source::Paged { first, .. } => first(token.clone()),
        };
        let tx = self.inbox.sender();
        Box::new(Task::new(
            format!("Loading {}", self.config.title),
            async move {
                tokio::select! {
                    biased;
                    () = token.cancelled() => debug!(ticket, "Fetch cancelled"),
                    result = future => {
                        let _ = tx.send(TableMsg::Loaded { ticket, result });
                    }
                }
                Ok(())
            },
        ))
    }

    /// Fetch the next batch and append it. Returns `None` when there is
    /// nothing more to load or a fetch is already in flight.
    pub fn load_more(&mut self) -> Option<Box<dyn Command>> {
        let can_continue = matches!(self.config.source, Source::Paged { more: Some(_), .. });
        if !can_continue || self.loading_more || self.status == Status::Loading || !self.has_more {
            return None;
        }
        let cursor = self.cursor.clone()?;
        let (ticket, token) = self.issue_ticket();
        let Source::Paged {
            more: Some(more), ..
        } = &self.config.source
        else {
            return None;
        };
        let future = more(token.clone(), cursor);
        self.loading_more = true;
        debug!(title = %self.config.title, ticket, "Loading more");

        let tx = self.inbox.sender();
        Some(Box::new(Task::new(
            format!("Loading more {}", self.config.title),
            async move {
                tokio::select! {
                    biased;
                    () = token.cancelled() => debug!(ticket, "Load more cancelled"),
                    result = future => {
                        let _ = tx.send(TableMsg::Appended { ticket, result });
                    }
                }
                Ok(())
            },
        )))
    }

    fn recompute_visible(&mut self) {
        self.visible = (0..self.rows.len())
            .filter(|&i| {
                self.matcher
                    .matches_any(self.rows[i].iter().map(String::as_str), &self.filter)
            })
            .collect();
    }

    fn apply(&mut self, msg: TableMsg<T>) {
        match msg {
            TableMsg::Loaded { ticket, .. } | TableMsg::Appended { ticket, .. }
                if ticket != self.ticket =>
            {
                debug!(ticket, current = self.ticket, "Dropping stale result");
            }
            TableMsg::Loaded { result, .. } => {
                self.token = None;
                match result {
                    Ok(page) => {
                        self.rows = page.items.iter().map(|item| (self.config.row)(item)).collect();
                        self.items = page.items;
                        self.cursor = page.cursor;
                        self.has_more = page.has_more;
                        self.status = Status::Loaded;
                        self.action_error = None;
                        self.recompute_visible();
                        self.page = 0;
                        self.reset_selection();
                    }
                    Err(FetchError::Cancelled) => {}
                    Err(e) => {
                        warn!(title = %self.config.title, "Fetch failed: {e}");
                        if self.config.error_policy == ErrorPolicy::ClearRows {
                            self.items.clear();
                            self.rows.clear();
                            self.visible.clear();
                            self.cursor = None;
                            self.has_more = false;
                            self.page = 0;
                            self.state.select(None);
                        }
                        self.status = Status::Error(e);
                    }
                }
            }
            TableMsg::Appended { result, .. } => {
                self.token = None;
                self.loading_more = false;
                match result {
                    Ok(page) => {
                        self.rows
                            .extend(page.items.iter().map(|item| (self.config.row)(item)));
                        self.items.extend(page.items);
                        self.cursor = page.cursor;
                        self.has_more = page.has_more;
                        self.status = Status::Loaded;
                        let selected = self.state.selected();
                        self.recompute_visible();
                        // Appending never moves the user to another page.
                        self.page = self.page.min(self.total_pages().saturating_sub(1));
                        match selected {
                            Some(row) => self.select_row(row),
                            None => self.reset_selection(),
                        }
                    }
                    Err(FetchError::Cancelled) => {}
                    Err(e) => {
                        warn!(title = %self.config.title, "Load more failed: {e}");
                        self.status = Status::Error(e);
                    }
                }
            }
            TableMsg::ActionFailed(error) => {
                warn!("{error}");
                self.action_error = Some(error);
            }
        }
    }

    /// Route failures of item-action commands back into this table.
    fn guard(&self, update: Update) -> Update {
        let commands = update
            .commands
            .into_iter()
            .map(|command| {
                let tx = self.inbox.sender();
                let name = command.name();
                Box::new(Task::new(name.clone(), async move {
                    if let Err(e) = command.execute().await {
                        let _ = tx.send(TableMsg::ActionFailed(ActionError::new(
                            name,
                            e.to_string(),
                        )));
                        return Err(e);
                    }
                    Ok(())
                })) as Box<dyn Command>
            })
            .collect();
        Update {
            commands,
            navigation: update.navigation,
        }
    }

    fn select_next(&mut self) {
        let len = self.page_range().len();
        if len == 0 {
            return;
        }
        let row = self.state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.state.select(Some(row));
    }

    fn select_previous(&mut self) {
        if self.page_range().is_empty() {
            return;
        }
        let row = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(row));
    }

    fn footer_label(&self) -> String {
        let mut label = self.page_label();
        if !self.filter.is_empty() {
            label.push_str(&format!(" · /{}", self.filter));
        }
        if self.loading_more {
            label.push_str(" · loading more...");
        } else if self.has_more {
            label.push_str(&format!(
                " · {} more",
                self.resolver.display_table(TableAction::LoadMore)
            ));
        }
        format!(" {label} ")
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.visible.is_empty() {
            let message = if self.filter.is_empty() {
                "No items"
            } else {
                "No matching items"
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(theme.overlay1()))
                    .centered(),
                area,
            );
            return;
        }

        let header = Row::new(self.config.columns.iter().map(|c| {
            Cell::from(c.header).style(
                Style::default()
                    .fg(theme.header())
                    .add_modifier(Modifier::BOLD),
            )
        }))
        .style(Style::default().bg(theme.surface0()));

        let rows: Vec<Row> = self.visible[self.page_range()]
            .iter()
            .map(|&i| {
                Row::new(self.rows[i].iter().cloned().map(Cell::from))
                    .style(Style::default().fg(theme.text()))
            })
            .collect();
        let widths: Vec<Constraint> = self.config.columns.iter().map(|c| c.constraint).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

impl<T: Send + 'static> Screen for DataTable<T> {
    fn init(&mut self) {
        let command = self.refresh();
        self.pending.commands.push(command);
    }

    fn destroy(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    fn handle_tick(&mut self) {
        if self.status == Status::Loading || self.loading_more {
            self.spinner.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled<()> {
        if self.resolver.matches_nav(&key, NavAction::Down) {
            self.select_next();
            return Handled::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::Up) {
            self.select_previous();
            return Handled::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::Home) {
            self.select_row(0);
            return Handled::Consumed;
        }
        if self.resolver.matches_nav(&key, NavAction::End) {
            self.select_row(usize::MAX);
            return Handled::Consumed;
        }
        if self.resolver.matches_table(&key, TableAction::NextPage) {
            self.next_page();
            return Handled::Consumed;
        }
        if self.resolver.matches_table(&key, TableAction::PrevPage) {
            self.prev_page();
            return Handled::Consumed;
        }
        if self.resolver.matches_table(&key, TableAction::Refresh) {
            let command = self.refresh();
            self.pending.commands.push(command);
            return Handled::Consumed;
        }
        if self.resolver.matches_table(&key, TableAction::LoadMore) {
            if let Some(command) = self.load_more() {
                self.pending.commands.push(command);
            }
            return Handled::Consumed;
        }

        let update = if self.resolver.matches_nav(&key, NavAction::Select) {
            match (&self.config.on_select, self.selected_item()) {
                (Some((_, handler)), Some(item)) => handler(item),
                _ => return Handled::Ignored,
            }
        } else {
            let Some(action) = self
                .config
                .actions
                .iter()
                .find(|action| action.binding.matches(&key))
            else {
                return Handled::Ignored;
            };
            let Some(item) = self.selected_item() else {
                return Handled::Consumed;
            };
            (action.handler)(item)
        };

        let update = self.guard(update);
        self.pending.merge(update);
        Handled::Consumed
    }

    fn update(&mut self) -> Result<Update> {
        while let Some(msg) = self.inbox.try_recv() {
            self.apply(msg);
        }
        Ok(std::mem::take(&mut self.pending))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let border = if self.filter.is_empty() {
            theme.border()
        } else {
            theme.border_focused()
        };
        let block = Block::bordered()
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .title(
                Line::from(format!(" {} ", self.config.title)).style(
                    Style::default()
                        .fg(theme.mauve())
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .title_bottom(
                Line::from(self.footer_label())
                    .style(Style::default().fg(theme.subtext0()))
                    .right_aligned(),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.status == Status::Loading && self.items.is_empty() {
            self.spinner.render(frame, inner, theme);
            return;
        }

        let banner = match (&self.status, &self.action_error) {
            (Status::Error(e), _) => Some(format!(
                "✗ {e} ({} to retry)",
                self.resolver.display_table(TableAction::Refresh)
            )),
            (_, Some(e)) => Some(format!("✗ {e}")),
            _ => None,
        };

        let Some(banner) = banner else {
            self.render_table(frame, inner, theme);
            return;
        };

        let error_style = Style::default().fg(theme.error());
        if self.items.is_empty() {
            frame.render_widget(
                Paragraph::new(banner)
                    .style(error_style)
                    .wrap(Wrap { trim: true })
                    .centered(),
                inner,
            );
            return;
        }

        let [banner_area, table_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        frame.render_widget(Paragraph::new(banner).style(error_style), banner_area);
        self.render_table(frame, table_area, theme);
    }

    fn title(&self) -> String {
        self.config.title.clone()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let mut bindings = Vec::new();
        if let Some((description, _)) = &self.config.on_select {
            bindings.push(Keybinding::hint(
                self.resolver.display_nav(NavAction::Select),
                description.clone(),
            ));
        }
        for action in &self.config.actions {
            bindings.push(Keybinding::hint(
                action.binding.display(),
                action.description.clone(),
            ));
        }
        bindings.push(Keybinding::hint(
            format!(
                "{}/{}",
                self.resolver.display_table(TableAction::PrevPage),
                self.resolver.display_table(TableAction::NextPage)
            ),
            "Page",
        ));
        bindings.push(Keybinding::hint(
            self.resolver.display_table(TableAction::Refresh),
            "Refresh",
        ));
        if matches!(self.config.source, Source::Paged { more: Some(_), .. }) {
            bindings.push(Keybinding::hint(
                self.resolver.display_table(TableAction::LoadMore),
                "Load more",
            ));
        }
        bindings.push(Keybinding::new(
            format!(
                "{}/{}",
                self.resolver.display_nav(NavAction::Up),
                self.resolver.display_nav(NavAction::Down)
            ),
            "Move",
        ));
        bindings
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        Some(self)
    }

    fn as_copyable(&self) -> Option<&dyn Copyable> {
        if self.config.copy_id.is_some() || self.config.copy_reference.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl<T: Send + 'static> Filterable for DataTable<T> {
    fn apply_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        self.recompute_visible();
        self.page = 0;
        self.reset_selection();
    }

    fn filter(&self) -> &str {
        &self.filter
    }
}

impl<T: Send + 'static> Copyable for DataTable<T> {
    fn copy_id(&self) -> String {
        self.extract(self.config.copy_id.as_ref())
    }

    fn copy_reference(&self) -> String {
        self.extract(self.config.copy_reference.as_ref())
    }
}

impl<T: Send + 'static> DataTable<T> {
    fn extract(&self, extract: Option<&CopyFn<T>>) -> String {
        if self.status == Status::Loading {
            return String::new();
        }
        match (extract, self.selected_item()) {
            (Some(extract), Some(item)) => extract(item),
            _ => String::new(),
        }
    }
}

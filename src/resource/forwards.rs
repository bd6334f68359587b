use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use futures::FutureExt;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use tracing::debug;

use crate::Theme;
use crate::commands::{Batch, Task};
use crate::config::{KeyResolver, ResourceAction};
use crate::resource::Context;
use crate::screen::{
    ColumnDef, Copyable, DataTable, Filterable, Resizable, Screen, Source, TableConfig, Update,
};
use crate::stream::{Forward, ForwardRegistry};
use crate::ui::{Handled, Keybinding};

/// Port forwards started in this session, optionally limited to one resource.
///
/// The rows are a snapshot of the registry. The table reloads itself when
/// the registry generation moves, and after `x` stops the selected forward.
/// `X` stops every listed forward at once.
pub struct ForwardListScreen {
    table: DataTable<Forward>,
    forwards: ForwardRegistry,
    seen_generation: u64,
    pending: Update,
    resolver: Arc<KeyResolver>,
}

pub fn forward_list_screen(ctx: &Context, resource_id: Option<String>) -> ForwardListScreen {
    let registry = ctx.forwards.clone();
    let source = Source::full(move |_token| {
        let mut forwards = registry.snapshot();
        if let Some(id) = &resource_id {
            forwards.retain(|forward| &forward.resource_id == id);
        }
        async move { Ok(forwards) }.boxed()
    });

    let columns = vec![
        ColumnDef::new("Resource", Constraint::Fill(1)),
        ColumnDef::new("Local", Constraint::Length(8)),
        ColumnDef::new("Remote", Constraint::Length(8)),
        ColumnDef::new("Started", Constraint::Length(10)),
        ColumnDef::new("Status", Constraint::Fill(2)),
    ];
    let config = TableConfig::new("Port forwards", columns, source, |f: &Forward| {
        vec![
            f.resource_name.clone(),
            f.local_port.to_string(),
            f.remote_port.to_string(),
            f.started.format("%H:%M:%S").to_string(),
            f.status.to_string(),
        ]
    })
    .settings(&ctx.settings)
    .copy_id(|f: &Forward| format!("localhost:{}", f.local_port));

    ForwardListScreen {
        table: DataTable::new(config, ctx.resolver.clone()),
        forwards: ctx.forwards.clone(),
        seen_generation: ctx.forwards.generation(),
        pending: Update::idle(),
        resolver: ctx.resolver.clone(),
    }
}

impl ForwardListScreen {
    pub const fn table(&self) -> &DataTable<Forward> {
        &self.table
    }

    fn reload(&mut self) {
        self.seen_generation = self.forwards.generation();
        let command = self.table.refresh();
        self.pending.commands.push(command);
    }

    fn stop_selected(&mut self) {
        let Some(id) = self.table.selected_item().map(|forward| forward.id) else {
            return;
        };
        if self.forwards.stop(id) {
            debug!(id, "Stopped forward from list");
        }
        self.reload();
    }

    fn stop_listed(&mut self) {
        let listed: Vec<(u64, u16)> = self
            .table
            .items()
            .iter()
            .map(|forward| (forward.id, forward.local_port))
            .collect();
        if listed.is_empty() {
            return;
        }

        let mut batch = Batch::new(format!("Stop {} forwards", listed.len()));
        for (id, port) in listed {
            let registry = self.forwards.clone();
            batch = batch.with(Task::new(format!("Stop localhost:{port}"), async move {
                registry.stop(id);
                Ok(())
            }));
        }
        self.pending.commands.push(Box::new(batch));
    }
}

impl Screen for ForwardListScreen {
    fn init(&mut self) {
        self.seen_generation = self.forwards.generation();
        self.table.init();
    }

    fn destroy(&mut self) {
        self.table.destroy();
    }

    fn handle_tick(&mut self) {
        self.table.handle_tick();
        if self.forwards.generation() != self.seen_generation {
            self.reload();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled<()> {
        if self.resolver.matches_resource(&key, ResourceAction::StopForward) {
            self.stop_selected();
            return Handled::Consumed;
        }
        if self
            .resolver
            .matches_resource(&key, ResourceAction::StopAllForwards)
        {
            self.stop_listed();
            return Handled::Consumed;
        }
        self.table.handle_key(key)
    }

    fn update(&mut self) -> Result<Update> {
        let mut update = std::mem::take(&mut self.pending);
        update.merge(self.table.update()?);
        Ok(update)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.render(frame, area, theme);
    }

    fn title(&self) -> String {
        self.table.title()
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let mut bindings = vec![
            Keybinding::hint(
                self.resolver.display_resource(ResourceAction::StopForward),
                "Stop forward",
            ),
            Keybinding::new(
                self.resolver.display_resource(ResourceAction::StopAllForwards),
                "Stop all listed",
            ),
        ];
        bindings.extend(self.table.keybindings());
        bindings
    }

    fn as_filterable(&mut self) -> Option<&mut dyn Filterable> {
        self.table.as_filterable()
    }

    fn as_copyable(&self) -> Option<&dyn Copyable> {
        self.table.as_copyable()
    }

    fn as_resizable(&mut self) -> Option<&mut dyn Resizable> {
        self.table.as_resizable()
    }
}

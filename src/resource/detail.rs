use futures::FutureExt;
use ratatui::layout::Constraint;

use crate::config::ResourceAction;
use crate::error::FetchError;
use crate::resource::list::open_shell;
use crate::resource::{Context, LogTailScreen, Resource, forward_list_screen, start_forward};
use crate::screen::{ColumnDef, DataTable, Screen, Source, TabSet, TableConfig};

pub const OVERVIEW_TAB: usize = 0;
pub const TAGS_TAB: usize = 1;
pub const LOGS_TAB: usize = 2;
pub const FORWARDS_TAB: usize = 3;

/// Tabbed view of one resource.
pub type ResourceDetailScreen = TabSet;

type Property = (String, String);

pub fn resource_detail_screen(ctx: &Context, resource: Resource) -> ResourceDetailScreen {
    let names = ["Overview", "Tags", "Logs", "Forwards"]
        .map(String::from)
        .to_vec();
    let title = resource.name.clone();

    let factory_ctx = ctx.clone();
    let factory = move |index: usize| -> Box<dyn Screen> {
        match index {
            OVERVIEW_TAB => Box::new(overview_tab(&factory_ctx, &resource)),
            TAGS_TAB => Box::new(tags_tab(&factory_ctx, &resource)),
            LOGS_TAB => Box::new(LogTailScreen::new(
                &factory_ctx,
                format!("{} logs", resource.name),
                resource.logs.clone(),
            )),
            _ => Box::new(forward_list_screen(&factory_ctx, Some(resource.id.clone()))),
        }
    };

    let registry = ctx.forwards.clone();
    let mut seen = registry.generation();
    TabSet::new(title, names, factory, ctx.resolver.clone()).before_switch(
        move |_from, to| {
            let current = registry.generation();
            if to == FORWARDS_TAB && current != seen {
                seen = current;
                vec![FORWARDS_TAB]
            } else {
                Vec::new()
            }
        },
    )
}

fn property_columns(name: &'static str) -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(name, Constraint::Length(24)),
        ColumnDef::new("Value", Constraint::Fill(1)),
    ]
}

fn overview_tab(ctx: &Context, resource: &Resource) -> DataTable<Property> {
    let client = ctx.client.clone();
    let id = resource.id.clone();
    let source = Source::full(move |token| {
        let client = client.clone();
        let id = id.clone();
        async move { Ok::<_, FetchError>(client.describe(token, &id).await?.overview()) }.boxed()
    });

    let resolver = &ctx.resolver;
    let (shell_target, forward_target) = (resource.clone(), resource.clone());
    let forward_ctx = ctx.clone();
    let (copy_id, copy_reference) = (resource.id.clone(), resource.reference.clone());

    let config = TableConfig::new(
        "Overview",
        property_columns("Property"),
        source,
        |(name, value): &Property| vec![name.clone(), value.clone()],
    )
    .settings(&ctx.settings)
    .action(
        resolver.resource_binding(ResourceAction::Shell),
        "Shell",
        move |_: &Property| open_shell(&shell_target),
    )
    .action(
        resolver.resource_binding(ResourceAction::Forward),
        "Forward",
        move |_: &Property| start_forward(&forward_ctx, &forward_target),
    )
    .copy_id(move |_: &Property| copy_id.clone())
    .copy_reference(move |_: &Property| copy_reference.clone());

    DataTable::new(config, ctx.resolver.clone())
}

fn tags_tab(ctx: &Context, resource: &Resource) -> DataTable<Property> {
    let client = ctx.client.clone();
    let id = resource.id.clone();
    let source = Source::full(move |token| {
        let client = client.clone();
        let id = id.clone();
        async move {
            let resource = client.describe(token, &id).await?;
            Ok::<_, FetchError>(resource.tags.into_iter().collect())
        }
        .boxed()
    });

    let config = TableConfig::new(
        "Tags",
        property_columns("Key"),
        source,
        |(key, value): &Property| vec![key.clone(), value.clone()],
    )
    .settings(&ctx.settings)
    .copy_id(|(_, value): &Property| value.clone())
    .copy_reference(|(key, value): &Property| format!("{key}={value}"));

    DataTable::new(config, ctx.resolver.clone())
}

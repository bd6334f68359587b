use futures::FutureExt;
use ratatui::layout::Constraint;

use crate::config::ResourceAction;
use crate::resource::{
    Context, LogTailScreen, Resource, ResourceKind, resource_detail_screen, start_forward,
    unavailable,
};
use crate::screen::{ColumnDef, DataTable, ExternalProcess, Source, TableConfig, Update};

/// Paged list of the resources of one kind.
pub type ResourceListScreen = DataTable<Resource>;

pub fn resource_list_screen(ctx: &Context, kind: ResourceKind) -> ResourceListScreen {
    let page_size = ctx.settings.page_size;
    let first_client = ctx.client.clone();
    let more_client = ctx.client.clone();
    let source = Source::paged(
        move |token| {
            let client = first_client.clone();
            async move { client.list_page(token, kind, None, page_size).await }.boxed()
        },
        move |token, cursor| {
            let client = more_client.clone();
            async move { client.list_page(token, kind, Some(cursor), page_size).await }.boxed()
        },
    );

    let columns = vec![
        ColumnDef::new("Name", Constraint::Fill(2)),
        ColumnDef::new("ID", Constraint::Fill(2)),
        ColumnDef::new("Region", Constraint::Length(14)),
        ColumnDef::new("State", Constraint::Length(10)),
        ColumnDef::new("Created", Constraint::Length(16)),
    ];
    let resolver = &ctx.resolver;
    let (detail_ctx, logs_ctx, forward_ctx) = (ctx.clone(), ctx.clone(), ctx.clone());

    let config = TableConfig::new(kind.display_name(), columns, source, |r: &Resource| {
        vec![
            r.name.clone(),
            r.id.clone(),
            r.region.clone(),
            r.state.clone(),
            r.created_label(),
        ]
    })
    .settings(&ctx.settings)
    .on_select("Details", move |resource: &Resource| {
        Update::push(resource_detail_screen(&detail_ctx, resource.clone()))
    })
    .action(
        resolver.resource_binding(ResourceAction::Shell),
        "Shell",
        open_shell,
    )
    .action(
        resolver.resource_binding(ResourceAction::Logs),
        "Logs",
        move |resource: &Resource| {
            Update::push(LogTailScreen::new(
                &logs_ctx,
                format!("{} logs", resource.name),
                resource.logs.clone(),
            ))
        },
    )
    .action(
        resolver.resource_binding(ResourceAction::Forward),
        "Forward",
        move |resource: &Resource| start_forward(&forward_ctx, resource),
    )
    .copy_id(|r: &Resource| r.id.clone())
    .copy_reference(|r: &Resource| r.reference.clone());

    DataTable::new(config, ctx.resolver.clone())
}

/// Hand the terminal to the resource's interactive shell.
pub fn open_shell(resource: &Resource) -> Update {
    match &resource.shell {
        Some(command) => Update::handoff(ExternalProcess::shell(command.clone())),
        None => unavailable(
            "Shell",
            format!("{} has no shell configured", resource.name),
        ),
    }
}

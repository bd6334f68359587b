use futures::FutureExt;
use ratatui::layout::Constraint;

use crate::resource::{Context, KindSummary, resource_list_screen};
use crate::screen::{ColumnDef, DataTable, Source, TableConfig, Update};

/// Root screen: one row per resource kind.
pub type KindListScreen = DataTable<KindSummary>;

pub fn kind_list_screen(ctx: &Context) -> KindListScreen {
    let client = ctx.client.clone();
    let source = Source::full(move |token| {
        let client = client.clone();
        async move { client.summaries(token).await }.boxed()
    });

    let columns = vec![
        ColumnDef::new("Kind", Constraint::Length(14)),
        ColumnDef::new("Resources", Constraint::Length(10)),
        ColumnDef::new("Regions", Constraint::Fill(1)),
    ];
    let drill = ctx.clone();
    let config = TableConfig::new("Resources", columns, source, |s: &KindSummary| {
        vec![s.kind.to_string(), s.count.to_string(), s.regions_label()]
    })
    .settings(&ctx.settings)
    .on_select("Open", move |summary: &KindSummary| {
        Update::push(resource_list_screen(&drill, summary.kind))
    })
    .copy_id(|summary: &KindSummary| summary.kind.display_name().to_lowercase());

    DataTable::new(config, ctx.resolver.clone())
}

//! Resource browsing: the provider client and the screens built on the
//! generic table and tab controllers.

mod client;
mod detail;
mod forwards;
mod inventory;
mod kinds;
mod list;
mod logs;
mod model;

use std::sync::Arc;

use color_eyre::eyre::eyre;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppEvent;
use crate::commands::{Chain, Task};
use crate::config::{KeyResolver, TableSettings};
use crate::screen::Update;
use crate::stream::ForwardRegistry;
use crate::ui::ToastType;

pub use client::ResourceClient;
pub use detail::resource_detail_screen;
pub use forwards::forward_list_screen;
pub use inventory::InventoryClient;
pub use kinds::kind_list_screen;
pub use list::resource_list_screen;
pub use logs::LogTailScreen;
pub use model::{KindSummary, Resource, ResourceKind};

/// Shared dependencies handed to every resource screen.
#[derive(Clone)]
pub struct Context {
    pub client: Arc<dyn ResourceClient>,
    pub resolver: Arc<KeyResolver>,
    pub settings: TableSettings,
    pub forwards: ForwardRegistry,
    pub app_tx: UnboundedSender<AppEvent>,
}

impl Context {
    fn toast(&self, message: impl Into<String>, toast_type: ToastType) {
        let _ = self.app_tx.send(AppEvent::ShowToast {
            message: message.into(),
            toast_type,
        });
    }
}

/// An action that cannot run for this resource. Fails as a command so the
/// table shows it as an action error.
fn unavailable(action: &str, message: String) -> Update {
    Update::run(Task::new(action, async move { Err(eyre!(message)) }))
}

/// Start the resource's port forward in the background.
fn start_forward(ctx: &Context, resource: &Resource) -> Update {
    let Some(spec) = resource.forward.clone() else {
        return unavailable(
            "Port forward",
            format!("{} has no port forward configured", resource.name),
        );
    };
    let registry = ctx.forwards.clone();
    let port = spec.local_port;
    let release = Task::new(format!("Release port {port}"), async move {
        registry.stop_port(port);
        Ok(())
    });

    let ctx = ctx.clone();
    let id = resource.id.clone();
    let name = resource.name.clone();
    let start = Task::new("Start forward", async move {
        ctx.forwards.start(id, name.clone(), &spec);
        ctx.toast(
            format!(
                "Forwarding localhost:{} → {name}:{}",
                spec.local_port, spec.remote_port
            ),
            ToastType::Success,
        );
        Ok(())
    });

    Update::run(
        Chain::new(format!("Forwarding {}", resource.name))
            .then(release)
            .then(start),
    )
}

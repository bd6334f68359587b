use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::resource::{KindSummary, Resource, ResourceKind};
use crate::screen::Page;
use crate::screen::table::Cursor;

/// Query side of a cloud provider.
///
/// Implementations must return [`FetchError::Cancelled`] promptly once the
/// token is cancelled and must not keep the token after returning.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// One summary per resource kind.
    async fn summaries(&self, token: CancellationToken) -> Result<Vec<KindSummary>, FetchError>;

    /// A page of resources of `kind`. `cursor` is `None` for the first page.
    async fn list_page(
        &self,
        token: CancellationToken,
        kind: ResourceKind,
        cursor: Option<Cursor>,
        page_size: usize,
    ) -> Result<Page<Resource>, FetchError>;

    /// Full details of one resource.
    async fn describe(&self, token: CancellationToken, id: &str) -> Result<Resource, FetchError>;
}
